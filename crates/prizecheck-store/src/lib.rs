//! prizecheck-store — Host-side collaborators for the prizecheck engines.
//!
//! Loads configuration, persists the player's profile (rank state and
//! personal best) between sessions, and serves card metadata from a local
//! dataset through a read-through cache.

pub mod catalog;
pub mod config;
pub mod profile;

pub use catalog::{CachedCatalog, JsonCatalog};
pub use config::{load_config_from, PrizecheckConfig};
pub use profile::{
    record_round, reset, reset_at, JsonFileStore, MemoryStore, Profile, ProfileStore, RoundOutcome,
};
