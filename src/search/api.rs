//! YouTube Data API v3 search client
//!
//! Key-based search scoped to the music category. Without a key, and
//! whenever the API misbehaves, search degrades to canned demo results
//! so the rest of the app stays usable.

use serde::Deserialize;

use crate::search::models::Track;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// YouTube search client
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SearchClient {
    const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/youtube/v3";
    const MUSIC_CATEGORY_ID: &'static str = "10";
    const MAX_RESULTS: u32 = 20;

    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Refrain/0.1.0 (https://github.com/refrain)")
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to create reqwest client"),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Whether real API search is available (a key is configured)
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for music videos matching `query`.
    ///
    /// Never fails: missing key or API errors fall back to demo results.
    pub async fn search(&self, query: &str) -> Vec<Track> {
        let Some(key) = &self.api_key else {
            return mock_results(query);
        };

        match self.search_api(query, key).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::debug!("search failed, using mock results: {e:#}");
                mock_results(query)
            }
        }
    }

    async fn search_api(&self, query: &str, key: &str) -> anyhow::Result<Vec<Track>> {
        let max_results = Self::MAX_RESULTS.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("videoCategoryId", Self::MUSIC_CATEGORY_ID),
                ("maxResults", max_results.as_str()),
                ("key", key),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("search API error: {}", response.status());
        }

        let body: SearchResponse = response.json().await?;
        let tracks = body
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(Track {
                    video_id,
                    title: item.snippet.title,
                    artist: item.snippet.channel_title,
                    // The search endpoint carries no duration; the
                    // player reports it once playback starts.
                    duration_seconds: None,
                    thumbnail_url: item
                        .snippet
                        .thumbnails
                        .and_then(|t| t.medium)
                        .map(|m| m.url),
                })
            })
            .collect();
        Ok(tracks)
    }
}

/// Canned results for keyless or offline operation
pub fn mock_results(query: &str) -> Vec<Track> {
    let demo = |title: String, artist: &str, duration: u32| Track {
        video_id: "dQw4w9WgXcQ".to_string(),
        title,
        artist: artist.to_string(),
        duration_seconds: Some(duration),
        thumbnail_url: None,
    };

    vec![
        demo(format!("{query} - Song 1"), "Demo Artist", 210),
        demo(format!("{query} - Song 2"), "Another Artist", 185),
        demo(format!("{query} - Remix"), "Remix Artist", 240),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_results_shape() {
        let tracks = mock_results("test tune");
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].title, "test tune - Song 1");
        assert_eq!(tracks[0].artist, "Demo Artist");
        assert_eq!(tracks[0].duration_seconds, Some(210));
        assert_eq!(tracks[2].title, "test tune - Remix");
        for t in &tracks {
            assert_eq!(t.video_id, "dQw4w9WgXcQ");
            assert!(t.watch_url().ends_with("dQw4w9WgXcQ"));
        }
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        assert!(!SearchClient::new(None).has_api_key());
        assert!(!SearchClient::new(Some("   ".to_string())).has_api_key());
        assert!(SearchClient::new(Some("real-key".to_string())).has_api_key());
    }
}
