//! SQLite cache for search results and lyrics
//!
//! One small database file holds both caches. Callers open a connection
//! per operation, usually from the blocking pool, so this type carries
//! no locking of its own.

use std::path::Path;

use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS lyrics_cache (
  video_id TEXT PRIMARY KEY,
  lrc_content TEXT,
  synced INTEGER DEFAULT 0,
  fetched_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS search_cache (
  query TEXT PRIMARY KEY,
  results_json TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);
";

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(SCHEMA).context("apply schema")?;
        Ok(Self { conn })
    }

    pub fn store_search(
        &self,
        query: &str,
        results_json: &str,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO search_cache (query, results_json, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(query) DO UPDATE SET
                   results_json = excluded.results_json,
                   updated_at = excluded.updated_at",
                params![query, results_json, now_unix],
            )
            .context("store search results")?;
        Ok(())
    }

    /// Cached results and their write time, if this query was seen.
    pub fn load_search(&self, query: &str) -> anyhow::Result<Option<(String, i64)>> {
        self.conn
            .query_row(
                "SELECT results_json, updated_at FROM search_cache WHERE query = ?1",
                params![query],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("load search results")
    }

    pub fn store_lyrics(
        &self,
        video_id: &str,
        lrc: &str,
        synced: bool,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO lyrics_cache (video_id, lrc_content, synced, fetched_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(video_id) DO UPDATE SET
                   lrc_content = excluded.lrc_content,
                   synced = excluded.synced,
                   fetched_at = excluded.fetched_at",
                params![video_id, lrc, synced as i64, now_unix],
            )
            .context("store lyrics")?;
        Ok(())
    }

    pub fn load_lyrics(&self, video_id: &str) -> anyhow::Result<Option<(String, bool)>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT lrc_content, synced FROM lyrics_cache WHERE video_id = ?1",
                params![video_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("load lyrics")?;
        Ok(row.map(|(lrc, synced)| (lrc, synced != 0)))
    }
}

/// Seconds since the Unix epoch
pub fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem() -> Storage {
        Storage::bootstrap(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_lyrics_round_trip_and_upsert() {
        let s = mem();
        assert!(s.load_lyrics("abc").unwrap().is_none());

        s.store_lyrics("abc", "[00:01.00]hi", true, 1000).unwrap();
        let (lrc, synced) = s.load_lyrics("abc").unwrap().unwrap();
        assert_eq!(lrc, "[00:01.00]hi");
        assert!(synced);

        // Upsert replaces the previous entry.
        s.store_lyrics("abc", "plain words", false, 2000).unwrap();
        let (lrc, synced) = s.load_lyrics("abc").unwrap().unwrap();
        assert_eq!(lrc, "plain words");
        assert!(!synced);
    }

    #[test]
    fn test_search_upsert_keeps_latest() {
        let s = mem();
        assert!(s.load_search("q").unwrap().is_none());

        s.store_search("q", "[1]", 10).unwrap();
        s.store_search("q", "[2]", 20).unwrap();
        let (json, ts) = s.load_search("q").unwrap().unwrap();
        assert_eq!(json, "[2]");
        assert_eq!(ts, 20);
    }
}
