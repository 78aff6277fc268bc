//! Track search against the YouTube Data API

pub mod api;
pub mod models;

pub use api::SearchClient;
pub use models::Track;
