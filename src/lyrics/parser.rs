//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.00] Another line

/// A single line of lyrics with its start time
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Stable id within the track (sequence number as a string)
    #[allow(dead_code)]
    pub id: String,
    /// Seconds from the start of the track at which this line becomes active
    pub start_secs: f64,
    /// The lyrics text
    pub text: String,
}

impl LyricLine {
    pub fn new(id: impl Into<String>, start_secs: f64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_secs,
            text: text.into(),
        }
    }
}

/// Parsed lyrics for one track
#[derive(Debug, Clone)]
pub struct ParsedLyrics {
    /// Individual lyrics lines, sorted by start time
    pub lines: Vec<LyricLine>,
    /// Whether the lines carry timestamps
    pub synced: bool,
}

impl ParsedLyrics {
    /// Parse lyrics text, detecting LRC timestamps when present.
    ///
    /// Lines with parseable `[mm:ss.xx]` tags become the synchronized
    /// sequence; a tag with empty text contributes nothing. When no tag
    /// parses at all the text degrades to an unsynchronized transcript.
    pub fn parse(content: &str) -> Self {
        let mut timed: Vec<(f64, String)> = Vec::new();
        let mut plain: Vec<String> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || metadata_tag(line).is_some() {
                continue;
            }

            if let Some((stamps, text)) = timed_prefix(line) {
                // A bare tag marks an instrumental gap and produces no line.
                if !text.is_empty() {
                    timed.extend(stamps.into_iter().map(|s| (s, text.to_string())));
                }
                continue;
            }

            if !line.starts_with('[') {
                plain.push(line.to_string());
            }
        }

        if timed.is_empty() {
            let lines = plain
                .into_iter()
                .enumerate()
                .map(|(i, text)| LyricLine::new(i.to_string(), 0.0, text))
                .collect();
            return Self {
                lines,
                synced: false,
            };
        }

        // Stable sort keeps document order for equal start times.
        timed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let lines = timed
            .into_iter()
            .enumerate()
            .map(|(i, (start_secs, text))| LyricLine::new(i.to_string(), start_secs, text))
            .collect();

        Self {
            lines,
            synced: true,
        }
    }

    /// Parse lyrics known to be a plain transcript (no timestamp scan).
    pub fn parse_plain(content: &str) -> Self {
        let lines = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, text)| LyricLine::new(i.to_string(), 0.0, text))
            .collect();
        Self {
            lines,
            synced: false,
        }
    }

    /// Serialize back to the textual form `parse` accepts, for caching.
    pub fn to_lrc(&self) -> String {
        self.lines
            .iter()
            .map(|l| {
                if self.synced {
                    format!("[{}]{}", format_timestamp(l.start_secs), l.text)
                } else {
                    l.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Recognize a metadata tag like `[ti:Title]`. Tag names are short and
/// alphabetic, which is what keeps `[00:12]` out.
fn metadata_tag(line: &str) -> Option<(&str, &str)> {
    let (body, _) = line.strip_prefix('[')?.split_once(']')?;
    let (tag, value) = body.split_once(':')?;
    if tag.len() <= 3 && tag.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some((tag, value.trim()))
    } else {
        None
    }
}

/// Split off the run of leading `[..]` timestamps from a line like
/// `[00:12.34][00:15.00]Lyrics`, returning the stamps and the trimmed text.
fn timed_prefix(mut line: &str) -> Option<(Vec<f64>, &str)> {
    let mut stamps = Vec::new();
    while let Some(rest) = line.strip_prefix('[') {
        let Some((tag, after)) = rest.split_once(']') else {
            break;
        };
        let Some(secs) = parse_timestamp(tag) else {
            break;
        };
        stamps.push(secs);
        line = after;
    }
    if stamps.is_empty() {
        None
    } else {
        Some((stamps, line.trim()))
    }
}

/// Parse a timestamp like "00:12.34", "00:12:34" or "00:12" to seconds.
fn parse_timestamp(s: &str) -> Option<f64> {
    let (min, rest) = s.split_once(':')?;
    let min: u64 = min.parse().ok()?;
    let (sec, frac) = match rest.split_once(['.', ':']) {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (rest, None),
    };
    let sec: u64 = sec.parse().ok()?;
    // The fraction may be tenths, hundredths or milliseconds.
    let ms = match frac {
        None => 0,
        Some(f) => match f.len() {
            1 => f.parse::<u64>().ok()? * 100,
            2 => f.parse::<u64>().ok()? * 10,
            3 => f.parse::<u64>().ok()?,
            _ => return None,
        },
    };
    Some((min * 60_000 + sec * 1000 + ms) as f64 / 1000.0)
}

/// Format seconds as an LRC timestamp ("mm:ss.xx")
fn format_timestamp(secs: f64) -> String {
    let cs = (secs.max(0.0) * 100.0).round() as u64;
    format!("{:02}:{:02}.{:02}", cs / 6000, (cs / 100) % 60, cs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:12"), Some(12.0));
        assert_eq!(parse_timestamp("01:30"), Some(90.0));
        assert_eq!(parse_timestamp("00:12.34"), Some(12.34));
        assert_eq!(parse_timestamp("00:12.340"), Some(12.34));
        assert_eq!(parse_timestamp("00:12:34"), Some(12.34));
        assert_eq!(parse_timestamp("garbage"), None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00.00");
        assert_eq!(format_timestamp(12.34), "00:12.34");
        assert_eq!(format_timestamp(90.0), "01:30.00");
        assert_eq!(format_timestamp(75.0), "01:15.00");
    }

    #[test]
    fn test_metadata_tag() {
        assert_eq!(metadata_tag("[ti:Some Title]"), Some(("ti", "Some Title")));
        assert_eq!(metadata_tag("[ar: Artist ]"), Some(("ar", "Artist")));
        // Timestamps must not look like metadata.
        assert_eq!(metadata_tag("[00:12.34]Line"), None);
        assert_eq!(metadata_tag("no brackets"), None);
    }

    #[test]
    fn test_parse_lrc() {
        let lrc = r#"
[ti:Test Song]
[ar:Test Artist]
[00:12.34]First line
[00:15.00]Second line
"#;
        let parsed = ParsedLyrics::parse(lrc);
        assert!(parsed.synced);
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].start_secs, 12.34);
        assert_eq!(parsed.lines[0].text, "First line");
        assert_eq!(parsed.lines[0].id, "0");
        assert_eq!(parsed.lines[1].id, "1");
    }

    #[test]
    fn test_parse_skips_empty_tagged_lines() {
        let lrc = "[00:05.00]Words\n[00:10.00]\n[00:15.00]More words";
        let parsed = ParsedLyrics::parse(lrc);
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[1].text, "More words");
        assert_eq!(parsed.lines[1].start_secs, 15.0);
    }

    #[test]
    fn test_parse_sorts_by_start_time() {
        let lrc = "[00:20.00]Later\n[00:05.00]Earlier";
        let parsed = ParsedLyrics::parse(lrc);
        assert_eq!(parsed.lines[0].text, "Earlier");
        assert_eq!(parsed.lines[1].text, "Later");
        // Ids follow the sorted order.
        assert_eq!(parsed.lines[0].id, "0");
    }

    #[test]
    fn test_parse_multiple_timestamps_per_line() {
        let lrc = "[00:05.00][00:25.00]Chorus line";
        let parsed = ParsedLyrics::parse(lrc);
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].start_secs, 5.0);
        assert_eq!(parsed.lines[1].start_secs, 25.0);
        assert_eq!(parsed.lines[1].text, "Chorus line");
    }

    #[test]
    fn test_parse_plain_text() {
        let text = "Just some words\n\nAnother line";
        let parsed = ParsedLyrics::parse(text);
        assert!(!parsed.synced);
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].start_secs, 0.0);
        assert_eq!(parsed.lines[1].text, "Another line");
    }

    #[test]
    fn test_lrc_round_trip() {
        let lrc = "[00:12.34]First line\n[01:15.00]Second line";
        let parsed = ParsedLyrics::parse(lrc);
        assert_eq!(parsed.to_lrc(), lrc);

        let reparsed = ParsedLyrics::parse(&parsed.to_lrc());
        assert_eq!(reparsed.lines, parsed.lines);
    }
}
