//! lyrics.ovh API client
//!
//! lyrics.ovh is a free lyrics API queried by artist and title.
//! Responses carry plain text; timestamped content is detected by the
//! parser when a provider happens to return LRC.

use serde::Deserialize;

use super::parser::ParsedLyrics;

/// lyrics.ovh API response
#[derive(Debug, Deserialize)]
struct LyricsResponse {
    lyrics: String,
}

/// lyrics.ovh API client
#[derive(Debug, Clone)]
pub struct LyricsClient {
    client: reqwest::Client,
    base_url: String,
}

impl LyricsClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.lyrics.ovh/v1";
    const USER_AGENT: &'static str = "Refrain/0.1.0 (https://github.com/refrain)";

    /// Create a new lyrics client
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to create reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// Fetch lyrics text for a track.
    ///
    /// Returns `Ok(None)` when the provider has no entry for the track
    /// and an error only for transport or server failures.
    pub async fn get_lyrics(&self, artist: &str, title: &str) -> anyhow::Result<Option<String>> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        );

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("lyrics API error: {}", response.status());
        }

        let body: LyricsResponse = response.json().await?;
        if body.lyrics.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body.lyrics))
    }
}

impl Default for LyricsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in synchronized sample shown when the provider is unreachable.
/// Keeps the lyrics view (and its timing) usable offline.
pub fn fallback_lyrics(artist: &str, title: &str) -> ParsedLyrics {
    let lrc = format!(
        "[00:00.00]{title}\n\
         [00:05.00]By {artist}\n\
         [00:10.00]\n\
         [00:15.00]This is a demo song\n\
         [00:20.00]With sample lyrics\n\
         [00:25.00]To show how the player works\n\
         [00:30.00]\n\
         [00:35.00]The beat goes on and on\n\
         [00:40.00]Music fills the air\n\
         [00:45.00]Dancing through the night\n\
         [00:50.00]Without a single care\n\
         [00:55.00]\n\
         [01:00.00]Demo lyrics continue here\n\
         [01:05.00]Showing the sync feature\n\
         [01:10.00]Every line appears\n\
         [01:15.00]At the perfect beat"
    );
    ParsedLyrics::parse(&lrc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_synced() {
        let lyrics = fallback_lyrics("Demo Artist", "Demo Song");
        assert!(lyrics.synced);
        // Two header lines, eleven content lines; blank tags drop out.
        assert_eq!(lyrics.lines.len(), 13);
    }

    #[test]
    fn test_fallback_names_the_track() {
        let lyrics = fallback_lyrics("Demo Artist", "Demo Song");
        assert_eq!(lyrics.lines[0].text, "Demo Song");
        assert_eq!(lyrics.lines[0].start_secs, 0.0);
        assert_eq!(lyrics.lines[1].text, "By Demo Artist");
        assert_eq!(lyrics.lines[1].start_secs, 5.0);
    }

    #[test]
    fn test_fallback_times_ascend() {
        let lyrics = fallback_lyrics("a", "b");
        for pair in lyrics.lines.windows(2) {
            assert!(pair[0].start_secs < pair[1].start_secs);
        }
        assert_eq!(lyrics.lines.last().unwrap().start_secs, 75.0);
    }
}
