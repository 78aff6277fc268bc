//! Lyrics module for fetching and displaying synchronized lyrics
//!
//! This module provides:
//! - lyrics.ovh API client for fetching lyrics
//! - LRC format parser for synchronized lyrics
//! - Active-line lookup and scroll follow for display

pub mod follow;
pub mod parser;
pub mod provider;
pub mod sync;

pub use parser::ParsedLyrics;
pub use provider::LyricsClient;

/// Get lyrics for a track.
///
/// `None` means the provider answered and has nothing for this track.
/// Transport failures degrade to the built-in sample so the lyrics view
/// never goes dark over a network hiccup.
pub async fn fetch_lyrics(
    client: &LyricsClient,
    artist: &str,
    title: &str,
) -> Option<ParsedLyrics> {
    match client.get_lyrics(artist, title).await {
        Ok(Some(text)) => Some(ParsedLyrics::parse(&text)),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("lyrics fetch failed, using fallback: {e:#}");
            Some(provider::fallback_lyrics(artist, title))
        }
    }
}
