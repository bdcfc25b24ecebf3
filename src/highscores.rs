//! Local leaderboard of the best runs
//!
//! Kept in LocalStorage on the web; in-memory only on native.

use serde::{Deserialize, Serialize};

use crate::sim::RunSummary;

/// Maximum number of runs kept
pub const MAX_HIGH_SCORES: usize = 10;

/// A recorded run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// How long the ship survived
    pub survived_ms: f64,
    #[serde(default)]
    pub obstacles_dodged: u32,
    /// Unix timestamp (ms) the run ended
    pub timestamp: f64,
}

/// Best runs, highest score first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "asteroid_dodge_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Rank (1-indexed) a score would take, or None if it would not make
    /// the board. Zero never qualifies; ties rank below existing entries.
    pub fn rank_for(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        (rank < MAX_HIGH_SCORES).then_some(rank + 1)
    }

    /// Record a finished run. Returns the rank achieved, if any.
    pub fn record(&mut self, run: &RunSummary, timestamp: f64) -> Option<usize> {
        let rank = self.rank_for(run.score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score: run.score,
                survived_ms: run.survived_ms,
                obstacles_dodged: run.obstacles_dodged,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("New high score {} (rank {})", run.score, rank);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse a stored board. Entries are re-sorted and capped so a
    /// hand-edited or older board still obeys the ranking rules.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Board kept in LocalStorage, or an empty one
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = crate::platform::web::local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        let Some(json) = stored else {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        };

        Self::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Discarding stored high scores: {}", e);
            Self::new()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = crate::platform::web::local_storage() else {
            return;
        };
        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("LocalStorage rejected the high scores: {:?}", e),
            },
            Err(e) => log::warn!("Could not save high scores: {}", e),
        }
    }

    /// Native builds keep the board for the life of the process only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("High scores are not persisted on native builds");
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!(
            "Keeping {} high scores in memory (best {:?})",
            self.entries.len(),
            self.top_score()
        );
    }
}

/// Format a survival time as `m:ss.t`
pub fn format_survival(ms: f64) -> String {
    let tenths = (ms.max(0.0) / 100.0).floor() as u64;
    let minutes = tenths / 600;
    let seconds = (tenths / 10) % 60;
    format!("{}:{:02}.{}", minutes, seconds, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> RunSummary {
        RunSummary {
            score,
            survived_ms: score as f64 * 100.0,
            obstacles_dodged: 0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert_eq!(scores.rank_for(0), None);
        assert_eq!(scores.rank_for(1), Some(1));
    }

    #[test]
    fn test_entries_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&run(50), 1.0), Some(1));
        assert_eq!(scores.record(&run(120), 2.0), Some(1));
        assert_eq!(scores.record(&run(80), 3.0), Some(2));
        // Ties go below the existing entry
        assert_eq!(scores.record(&run(80), 4.0), Some(3));

        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![120, 80, 80, 50]);
        assert_eq!(scores.top_score(), Some(120));
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            scores.record(&run(s * 10), s as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.rank_for(10), None);
        assert_eq!(scores.record(&run(5), 0.0), None);

        assert_eq!(scores.record(&run(15), 0.0), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }

    #[test]
    fn test_stored_board_is_ranked_and_capped() {
        let entries: Vec<String> = (1..=12)
            .map(|s| format!(r#"{{"score":{},"survived_ms":0.0,"timestamp":0.0}}"#, s))
            .collect();
        let json = format!(r#"{{"entries":[{}]}}"#, entries.join(","));

        let scores = HighScores::from_json(&json).unwrap();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(12));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(3));
        assert_eq!(scores.entries[0].obstacles_dodged, 0);

        let again = HighScores::from_json(&scores.to_json().unwrap()).unwrap();
        assert_eq!(again.entries, scores.entries);
    }

    #[test]
    fn test_format_survival() {
        assert_eq!(format_survival(0.0), "0:00.0");
        assert_eq!(format_survival(35_000.0), "0:35.0");
        assert_eq!(format_survival(61_250.0), "1:01.2");
    }
}
