//! Audio playback via an external mpv process

pub mod mpv;

pub use mpv::MpvHandle;
