//! Card catalogs backed by a local JSON dataset.
//!
//! [`JsonCatalog`] reads every card file in a dataset directory once and
//! indexes it. [`CachedCatalog`] wraps any catalog with a process-lifetime
//! read-through cache that can be dropped with [`CachedCatalog::invalidate`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Deserialize;

use prizecheck_core::catalog::{CardCatalog, CardInfo};

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    set: Option<RawSet>,
    #[serde(default)]
    images: Option<RawImages>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSet {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawImages {
    #[serde(default)]
    small: Option<String>,
    #[serde(default)]
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCardFile {
    List(Vec<RawCard>),
    Wrapped { data: Vec<RawCard> },
}

#[derive(Debug, Deserialize)]
struct RawSetEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "ptcgoCode")]
    ptcgo_code: Option<String>,
}

/// A catalog loaded from a directory of JSON card files.
#[derive(Debug, Default)]
pub struct JsonCatalog {
    cards: HashMap<String, CardInfo>,
    /// Export set code (e.g. "pal") to dataset set id (e.g. "sv2").
    set_codes: HashMap<String, String>,
}

fn build_id(set_id: &str, number: &str) -> String {
    format!("{}-{}", set_id.to_lowercase(), number.to_lowercase())
}

impl JsonCatalog {
    /// Load every `.json` file in `dir`. Unreadable files are skipped with a warning.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("not a directory: {}", dir.display());
        }

        let mut catalog = Self::default();
        let mut files = 0usize;
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("failed to read directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match read_card_file(&path) {
                Ok(cards) => {
                    files += 1;
                    for card in cards {
                        catalog.insert(card);
                    }
                }
                Err(e) => tracing::warn!("skipping {}: {e:#}", path.display()),
            }
        }

        tracing::info!(
            "loaded {} cards from {} ({files} files)",
            catalog.len(),
            dir.display()
        );
        Ok(catalog)
    }

    /// Load the export-code → set-id table from a JSON array of set records.
    pub fn with_set_codes(mut self, sets_file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(sets_file)
            .with_context(|| format!("failed to read sets file: {}", sets_file.display()))?;
        let sets: Vec<RawSetEntry> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse sets file: {}", sets_file.display()))?;
        for set in sets {
            if let (Some(id), Some(code)) = (set.id, set.ptcgo_code) {
                self.set_codes.insert(code.to_lowercase(), id.to_lowercase());
            }
        }
        tracing::debug!("loaded {} set code mappings", self.set_codes.len());
        Ok(self)
    }

    /// Number of indexed cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn insert(&mut self, raw: RawCard) {
        let set_id = raw.set.as_ref().and_then(|s| s.id.clone());
        let key = match (&raw.id, &set_id, &raw.number) {
            (Some(id), _, _) => id.to_lowercase(),
            (None, Some(set_id), Some(number)) => build_id(set_id, number),
            _ => return,
        };
        let image = raw
            .images
            .as_ref()
            .and_then(|i| i.small.clone().or_else(|| i.large.clone()))
            .or(raw.image_url);
        let info = CardInfo {
            id: key.clone(),
            name: raw.name.unwrap_or_else(|| key.to_uppercase()),
            set: raw.set.and_then(|s| s.name),
            number: raw.number.clone(),
            image,
        };
        // Also reachable by set id + number when that differs from the card id.
        if let (Some(set_id), Some(number)) = (set_id, raw.number) {
            let alias = build_id(&set_id, &number);
            if alias != key {
                self.cards.entry(alias).or_insert_with(|| info.clone());
            }
        }
        self.cards.insert(key, info);
    }

    fn candidates(&self, base_id: &str) -> Vec<String> {
        let lower = base_id.to_lowercase();
        let mut candidates = Vec::with_capacity(2);
        if let Some((code, number)) = lower.split_once('-') {
            if let Some(set_id) = self.set_codes.get(code) {
                candidates.push(build_id(set_id, number));
            }
        }
        candidates.push(lower);
        candidates
    }
}

fn read_card_file(path: &Path) -> Result<Vec<RawCard>> {
    let content = std::fs::read_to_string(path)?;
    let parsed: RawCardFile = serde_json::from_str(&content)?;
    Ok(match parsed {
        RawCardFile::List(cards) => cards,
        RawCardFile::Wrapped { data } => data,
    })
}

impl CardCatalog for JsonCatalog {
    fn lookup(&self, base_id: &str) -> Result<Option<CardInfo>> {
        let found = self
            .candidates(base_id)
            .iter()
            .find_map(|key| self.cards.get(key))
            .map(|info| CardInfo {
                id: base_id.to_string(),
                ..info.clone()
            });
        Ok(found)
    }
}

/// Read-through cache in front of another catalog.
///
/// Entries live until [`invalidate`](Self::invalidate) or the process ends.
/// Misses are cached too, so unknown ids are only looked up once.
pub struct CachedCatalog<C> {
    inner: C,
    cache: Mutex<HashMap<String, Option<CardInfo>>>,
}

impl<C: CardCatalog> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached lookups (hits and misses).
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: CardCatalog> CardCatalog for CachedCatalog<C> {
    fn lookup(&self, base_id: &str) -> Result<Option<CardInfo>> {
        let key = base_id.to_lowercase();
        {
            let cache = self
                .cache
                .lock()
                .map_err(|_| anyhow::anyhow!("catalog cache lock poisoned"))?;
            if let Some(hit) = cache.get(&key) {
                return Ok(hit.clone());
            }
        }

        let value = self.inner.lookup(base_id)?;
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("catalog cache lock poisoned"))?;
        cache.insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const CARDS_JSON: &str = r#"[
  {
    "id": "sv2-27",
    "name": "Ralts",
    "number": "27",
    "set": { "id": "sv2", "name": "Paldea Evolved" },
    "images": { "small": "https://images.example/sv2/27.png" }
  },
  {
    "name": "Iono",
    "number": "185",
    "set": { "id": "sv2", "name": "Paldea Evolved" },
    "imageUrl": "https://images.example/sv2/185.png"
  }
]"#;

    const WRAPPED_JSON: &str = r#"{ "data": [ { "id": "sve-5", "name": "Psychic Energy" } ] }"#;

    const SETS_JSON: &str = r#"[ { "id": "sv2", "ptcgoCode": "PAL" }, { "id": "sve" } ]"#;

    fn dataset() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sv2.json"), CARDS_JSON).unwrap();
        std::fs::write(dir.path().join("sve.json"), WRAPPED_JSON).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();
        dir
    }

    #[test]
    fn open_indexes_cards() {
        let dir = dataset();
        let catalog = JsonCatalog::open(dir.path()).unwrap();
        assert_eq!(catalog.len(), 3);

        let ralts = catalog.lookup("SV2-27").unwrap().unwrap();
        assert_eq!(ralts.name, "Ralts");
        assert_eq!(ralts.set.as_deref(), Some("Paldea Evolved"));
        assert_eq!(ralts.id, "SV2-27");

        let iono = catalog.lookup("sv2-185").unwrap().unwrap();
        assert_eq!(iono.image.as_deref(), Some("https://images.example/sv2/185.png"));

        assert!(catalog.lookup("sve-5").unwrap().is_some());
        assert!(catalog.lookup("xyz-1").unwrap().is_none());
    }

    #[test]
    fn set_codes_map_export_ids() {
        let dir = dataset();
        let sets = dir.path().join("sets.txt");
        std::fs::write(&sets, SETS_JSON).unwrap();
        let catalog = JsonCatalog::open(dir.path())
            .unwrap()
            .with_set_codes(&sets)
            .unwrap();

        let ralts = catalog.lookup("pal-27").unwrap().unwrap();
        assert_eq!(ralts.name, "Ralts");
        assert_eq!(ralts.id, "pal-27");
    }

    #[test]
    fn open_requires_directory() {
        assert!(JsonCatalog::open(Path::new("/definitely/not/a/dir")).is_err());
    }

    struct CountingCatalog {
        calls: AtomicU32,
    }

    impl CardCatalog for CountingCatalog {
        fn lookup(&self, base_id: &str) -> Result<Option<CardInfo>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok((base_id == "known").then(|| CardInfo::placeholder(base_id)))
        }
    }

    #[test]
    fn cache_reads_through_once() {
        let cached = CachedCatalog::new(CountingCatalog {
            calls: AtomicU32::new(0),
        });
        assert!(cached.is_empty());

        assert!(cached.lookup("known").unwrap().is_some());
        assert!(cached.lookup("known").unwrap().is_some());
        assert!(cached.lookup("unknown").unwrap().is_none());
        assert!(cached.lookup("unknown").unwrap().is_none());
        assert_eq!(cached.inner().calls.load(Ordering::Relaxed), 2);
        assert_eq!(cached.len(), 2);

        cached.invalidate();
        assert!(cached.is_empty());
        cached.lookup("known").unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::Relaxed), 3);
    }
}
