use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub video_id: String,
    pub title: String,
    pub artist: String,
    pub duration_seconds: Option<u32>,
    #[allow(dead_code)]
    pub thumbnail_url: Option<String>,
}

impl Track {
    /// Public watch URL for this track, the form mpv accepts directly.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    /// One-line display name for headers and plain listings.
    pub fn label(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_omits_empty_artist() {
        let mut t = Track {
            video_id: "v".into(),
            title: "Song".into(),
            artist: "Band".into(),
            duration_seconds: None,
            thumbnail_url: None,
        };
        assert_eq!(t.label(), "Song - Band");
        t.artist.clear();
        assert_eq!(t.label(), "Song");
    }
}
