//! Player profile persistence.
//!
//! The rank engine is pure; this module owns the read-modify-write around
//! it. A round is recorded by loading the profile, computing the next rank
//! and personal best, and saving the result before the next round starts.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use prizecheck_core::model::{RankState, RoundResult, Tier};
use prizecheck_core::rank::{update_rank, RankChange};
use prizecheck_core::scoring::MAX_SCORE;

const PROFILE_SCHEMA_VERSION: u32 = 1;

/// Rounds kept in the profile history.
pub const HISTORY_LIMIT: usize = 50;

/// Everything persisted about a player between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub version: u32,
    #[serde(default)]
    pub rank: RankState,
    #[serde(default, deserialize_with = "lenient_score")]
    pub personal_best: Option<u32>,
    #[serde(default)]
    pub rounds_played: u64,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
    /// Most recent rounds, oldest first.
    #[serde(default)]
    pub history: Vec<RoundRecord>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            version: PROFILE_SCHEMA_VERSION,
            rank: RankState::default(),
            personal_best: None,
            rounds_played: 0,
            last_played: None,
            history: Vec::new(),
        }
    }
}

/// A score that is missing, negative or not a number reads as no score.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok()))
}

/// Summary of one recorded round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub score: u32,
    pub accuracy: u32,
    pub used_time: f64,
    pub tier_after: Tier,
}

/// Durable storage for a single player's profile.
pub trait ProfileStore: Send + Sync {
    /// Load the profile. A store with nothing saved, or with an unreadable
    /// profile, yields the default profile.
    fn load(&self) -> Result<Profile>;

    /// Overwrite the stored profile.
    fn save(&self, profile: &Profile) -> Result<()>;
}

/// Profile stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Profile> {
        if !self.path.exists() {
            tracing::debug!("no profile at {}, starting fresh", self.path.display());
            return Ok(Profile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read profile from {}", self.path.display()))?;
        let profile: Profile = match serde_json::from_str(&content) {
            Ok(profile) => profile,
            Err(e) => {
                let backup = self.path.with_extension("json.corrupt");
                tracing::warn!(
                    "profile {} is unreadable ({e}), starting fresh; old file kept at {}",
                    self.path.display(),
                    backup.display()
                );
                std::fs::rename(&self.path, &backup).with_context(|| {
                    format!("failed to move corrupt profile to {}", backup.display())
                })?;
                return Ok(Profile::default());
            }
        };
        // A newer schema is refused rather than overwritten.
        if profile.version != PROFILE_SCHEMA_VERSION {
            anyhow::bail!(
                "unsupported profile version {} (expected {})",
                profile.version,
                PROFILE_SCHEMA_VERSION
            );
        }
        Ok(profile)
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile).context("failed to serialize profile")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write profile to {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process profile store, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: Mutex<Option<Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts from an existing profile.
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile: Mutex::new(Some(profile)),
        }
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Profile> {
        let guard = self
            .profile
            .lock()
            .map_err(|_| anyhow::anyhow!("profile lock poisoned"))?;
        Ok(guard.clone().unwrap_or_default())
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        let mut guard = self
            .profile
            .lock()
            .map_err(|_| anyhow::anyhow!("profile lock poisoned"))?;
        *guard = Some(profile.clone());
        Ok(())
    }
}

/// What changed when a round was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub previous: RankState,
    pub next: RankState,
    pub change: RankChange,
    pub personal_best: u32,
    pub is_new_personal_best: bool,
}

/// Apply a scored round to the stored profile and persist it.
pub fn record_round(store: &dyn ProfileStore, result: &RoundResult) -> Result<RoundOutcome> {
    let mut profile = store.load()?;
    let outcome = apply_round(&mut profile, result, Utc::now());
    store.save(&profile)?;

    tracing::info!(
        score = result.score,
        tier = %outcome.next.tier,
        progress = outcome.next.progress,
        elo = outcome.next.elo,
        "recorded round"
    );

    Ok(outcome)
}

/// Fold a round into `profile` without touching storage.
pub fn apply_round(profile: &mut Profile, result: &RoundResult, now: DateTime<Utc>) -> RoundOutcome {
    let previous = profile.rank;
    let next = update_rank(&previous, result.score as f64, MAX_SCORE as f64);

    let is_new_personal_best = profile.personal_best.map_or(true, |best| result.score > best);
    let personal_best = if is_new_personal_best {
        result.score
    } else {
        profile.personal_best.unwrap_or(result.score)
    };

    profile.rank = next;
    profile.personal_best = Some(personal_best);
    profile.rounds_played += 1;
    profile.last_played = Some(now);
    profile.history.push(RoundRecord {
        id: Uuid::new_v4(),
        played_at: now,
        score: result.score,
        accuracy: result.accuracy,
        used_time: result.used_time,
        tier_after: next.tier,
    });
    if profile.history.len() > HISTORY_LIMIT {
        let excess = profile.history.len() - HISTORY_LIMIT;
        profile.history.drain(..excess);
    }

    RoundOutcome {
        previous,
        next,
        change: next.compare(&previous),
        personal_best,
        is_new_personal_best,
    }
}

/// Overwrite the stored profile with a fresh one.
pub fn reset(store: &dyn ProfileStore) -> Result<Profile> {
    reset_at(store, Tier::PokeBall)
}

/// Overwrite the stored profile with a fresh one starting at `tier`.
pub fn reset_at(store: &dyn ProfileStore, tier: Tier) -> Result<Profile> {
    let mut profile = Profile::default();
    profile.rank.tier = tier;
    store.save(&profile)?;
    tracing::info!(%tier, "profile reset");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prizecheck_core::rank::RankMovement;

    fn result_with_score(score: u32) -> RoundResult {
        RoundResult {
            statuses: vec![],
            correct_guesses: 0,
            incorrect_guesses: 0,
            missed_prizes: 0,
            total_prizes: 6,
            accuracy: 0,
            used_time: 30.0,
            total_time: 120.0,
            time_fraction: 0.75,
            score,
        }
    }

    #[test]
    fn first_round_sets_personal_best() {
        let store = MemoryStore::new();
        let outcome = record_round(&store, &result_with_score(500)).unwrap();
        assert!(outcome.is_new_personal_best);
        assert_eq!(outcome.personal_best, 500);
        assert_eq!(outcome.previous, RankState::default());
        assert_eq!(outcome.next.progress, 28);

        let profile = store.load().unwrap();
        assert_eq!(profile.personal_best, Some(500));
        assert_eq!(profile.rounds_played, 1);
        assert_eq!(profile.history.len(), 1);
        assert_eq!(profile.rank, outcome.next);
    }

    #[test]
    fn lower_score_keeps_personal_best() {
        let store = MemoryStore::new();
        record_round(&store, &result_with_score(700)).unwrap();
        let outcome = record_round(&store, &result_with_score(400)).unwrap();
        assert!(!outcome.is_new_personal_best);
        assert_eq!(outcome.personal_best, 700);

        let outcome = record_round(&store, &result_with_score(700)).unwrap();
        assert!(!outcome.is_new_personal_best);
    }

    #[test]
    fn rank_reads_previous_state() {
        let mut profile = Profile::default();
        profile.rank = RankState {
            tier: Tier::UltraBall,
            progress: 95,
            elo: 1200,
        };
        let store = MemoryStore::with_profile(profile);
        let outcome = record_round(&store, &result_with_score(1000)).unwrap();
        assert_eq!(outcome.next.tier, Tier::MasterBall);
        assert_eq!(outcome.change.movement, RankMovement::Promoted);
        assert!(outcome.next.elo > 1200);
    }

    #[test]
    fn history_is_capped() {
        let mut profile = Profile::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            apply_round(&mut profile, &result_with_score(i as u32), Utc::now());
        }
        assert_eq!(profile.history.len(), HISTORY_LIMIT);
        assert_eq!(profile.history[0].score, 5);
        assert_eq!(profile.rounds_played, (HISTORY_LIMIT + 5) as u64);
    }

    #[test]
    fn json_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("profile.json"));
        assert_eq!(store.load().unwrap(), Profile::default());

        record_round(&store, &result_with_score(820)).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.personal_best, Some(820));
        assert_eq!(loaded.rounds_played, 1);
        assert!(loaded.last_played.is_some());
    }

    #[test]
    fn json_store_rejects_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, r#"{"version": 99}"#).unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("unsupported profile version"));
    }

    #[test]
    fn json_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ garbage").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), Profile::default());
        assert!(!path.exists());
        let backup = dir.path().join("profile.json.corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{ garbage");

        let outcome = record_round(&store, &result_with_score(640)).unwrap();
        assert_eq!(outcome.previous, RankState::default());
        assert_eq!(store.load().unwrap().personal_best, Some(640));
    }

    #[test]
    fn json_store_ignores_non_numeric_personal_best() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "rank": {"tier": "ultraball", "progress": 12}, "personal_best": "lots"}"#,
        )
        .unwrap();
        let profile = JsonFileStore::new(&path).load().unwrap();
        assert!(profile.personal_best.is_none());
        assert_eq!(profile.rank.tier, Tier::UltraBall);
        assert_eq!(profile.rank.progress, 12);
        assert!(path.exists());
    }

    #[test]
    fn json_store_reads_minimal_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "rank": {"tier": "greatball", "progress": 40, "elo": 1200}}"#,
        )
        .unwrap();
        let profile = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(profile.rank.tier, Tier::GreatBall);
        assert_eq!(profile.rank.progress, 40);
        assert!(profile.personal_best.is_none());
    }

    #[test]
    fn reset_at_starts_from_chosen_tier() {
        let store = MemoryStore::new();
        record_round(&store, &result_with_score(900)).unwrap();
        let profile = reset_at(&store, Tier::MasterBall).unwrap();
        assert_eq!(profile.rank.tier, Tier::MasterBall);
        assert_eq!(profile.rank.elo, 1200);
        assert!(profile.personal_best.is_none());
        assert_eq!(store.load().unwrap(), profile);
    }

    #[test]
    fn reset_restores_defaults() {
        let store = MemoryStore::new();
        record_round(&store, &result_with_score(900)).unwrap();
        reset(&store).unwrap();
        assert_eq!(store.load().unwrap(), Profile::default());
    }
}
