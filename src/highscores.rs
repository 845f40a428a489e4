//! High score persistence
//!
//! One scalar in key-value storage, stored as a decimal integer string.
//! Read once at startup, overwritten whenever a run beats it.

use crate::platform::KeyValueStore;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "canvas_invaders_high_score";

/// Best score ever recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Parse a stored value; anything unreadable counts as zero
    pub fn parse(raw: Option<&str>) -> Self {
        let best = raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0);
        Self { best }
    }

    /// Load from storage (missing, malformed or unavailable reads as zero)
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(STORAGE_KEY) {
            Ok(raw) => {
                let hs = Self::parse(raw.as_deref());
                log::info!("Loaded high score {}", hs.best);
                hs
            }
            Err(e) => {
                log::warn!("Could not read high score: {e}");
                Self::default()
            }
        }
    }

    /// Check if a score would replace the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a score; writes through to storage only when it beats the best.
    /// Returns true if the score became the new best.
    pub fn submit(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = store.set(STORAGE_KEY, &score.to_string()) {
            log::warn!("Could not save high score {score}: {e}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(HighScore::parse(Some("1500")).best, 1500);
        assert_eq!(HighScore::parse(Some(" 42 ")).best, 42);
        assert_eq!(HighScore::parse(Some("abc")).best, 0);
        assert_eq!(HighScore::parse(Some("-5")).best, 0);
        assert_eq!(HighScore::parse(None).best, 0);
    }

    #[test]
    fn test_submit_persists_only_when_beaten() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "500").unwrap();
        let mut hs = HighScore::load(&store);
        assert_eq!(hs.best, 500);

        assert!(!hs.submit(300, &mut store));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("500"));

        assert!(!hs.submit(500, &mut store));

        assert!(hs.submit(750, &mut store));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("750"));
        assert_eq!(HighScore::load(&store).best, 750);
    }
}
