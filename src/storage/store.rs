use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::{HarvestError, Result},
    listing::IdentityKey,
};

/// Identities of every listing the user has already been told about.
///
/// The file is a JSON array of identity records. It is read whole and
/// rewritten whole; a missing or unreadable file reads as empty.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previously notified identities. Never fails: a broken store means
    /// duplicate notifications, which beats not running at all.
    pub fn load(&self) -> BTreeSet<IdentityKey> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Identity store {} does not exist yet", self.path.display());
                return BTreeSet::new();
            }
            Err(e) => {
                warn!("Could not read identity store {}: {}", self.path.display(), e);
                return BTreeSet::new();
            }
        };

        match serde_json::from_str::<Vec<IdentityKey>>(&raw) {
            Ok(records) => {
                debug!("Loaded {} notified identities", records.len());
                records.into_iter().collect()
            }
            Err(e) => {
                warn!(
                    "Identity store {} is corrupt, treating as empty: {}",
                    self.path.display(),
                    e
                );
                BTreeSet::new()
            }
        }
    }

    /// Union `records` into the persisted set and rewrite the file.
    ///
    /// Returns the number of identities that were not already present.
    pub fn register<I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = IdentityKey>,
    {
        let mut data = self.load();
        let before = data.len();
        data.extend(records);
        let added = data.len() - before;

        self.write_all(&data)?;

        info!(
            "Registered {} new identities ({} total) in {}",
            added,
            data.len(),
            self.path.display()
        );
        Ok(added)
    }

    /// Drop every record
    pub fn clear(&self) -> Result<()> {
        self.write_all(&BTreeSet::new())
    }

    /// Create an empty store file if none exists
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.write_all(&BTreeSet::new())?;
        Ok(true)
    }

    pub fn stats(&self) -> StoreStats {
        let records = self.load();
        let adoptions = records
            .iter()
            .filter(|key| matches!(key, IdentityKey::Adoption(_)))
            .count();

        StoreStats {
            total: records.len(),
            adoptions,
            jobs: records.len() - adoptions,
        }
    }

    /// Write to a sibling temp file and rename it over the store, so the next
    /// `load` sees either the old set or the new one.
    fn write_all(&self, records: &BTreeSet<IdentityKey>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
            }
        }

        let body = serde_json::to_string_pretty(&records.iter().collect::<Vec<_>>())?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, body).map_err(|e| self.store_error(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(self.store_error(e));
        }
        Ok(())
    }

    fn store_error(&self, e: std::io::Error) -> HarvestError {
        HarvestError::Store {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub adoptions: usize,
    pub jobs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{AdoptionIdentity, JobIdentity};

    fn job(req_id: &str) -> IdentityKey {
        IdentityKey::Job(JobIdentity {
            employer: "Viasat".to_string(),
            req_id: req_id.to_string(),
        })
    }

    fn dog(name: &str) -> IdentityKey {
        IdentityKey::Adoption(AdoptionIdentity {
            source: "Rancho Coastal Humane Society".to_string(),
            name: name.to_string(),
            breed: "Poodle".to_string(),
            sex: "female".to_string(),
            age: "2 years".to_string(),
            weight: "20 lbs".to_string(),
            url: "https://rchumanesociety.org/dogs-for-adoption/".to_string(),
        })
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::new(dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notified.json");
        fs::write(&path, "{ not json").unwrap();

        let store = IdentityStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_register_then_load_is_union() {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::new(dir.path().join("notified.json"));

        store.register(vec![job("R1"), dog("Rosie")]).unwrap();
        let added = store.register(vec![job("R2"), job("R1")]).unwrap();
        assert_eq!(added, 1);

        let loaded = store.load();
        assert_eq!(loaded.len(), 3);
        for key in [job("R1"), job("R2"), dog("Rosie")] {
            assert!(loaded.contains(&key), "missing {}", key);
        }
    }

    #[test]
    fn test_register_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notified.json");

        IdentityStore::new(&path).register(vec![dog("Biscuit")]).unwrap();

        let reopened = IdentityStore::new(&path);
        assert!(reopened.load().contains(&dog("Biscuit")));
        assert!(!dir.path().join("nested").join("notified.json.tmp").exists());
    }

    #[test]
    fn test_register_over_corrupt_file_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notified.json");
        fs::write(&path, "garbage").unwrap();

        let store = IdentityStore::new(&path);
        store.register(vec![job("R7")]).unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("notified.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let store = IdentityStore::new(&path);
        assert!(matches!(
            store.register(vec![job("R1")]),
            Err(HarvestError::Store { .. })
        ));
        assert!(!dir.path().join("notified.json.tmp").exists());
    }

    #[test]
    fn test_clear_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::new(dir.path().join("notified.json"));

        assert!(store.ensure_exists().unwrap());
        assert!(!store.ensure_exists().unwrap());

        store.register(vec![job("R1"), dog("Rosie"), dog("Biscuit")]).unwrap();
        let stats = store.stats();
        assert_eq!((stats.total, stats.adoptions, stats.jobs), (3, 2, 1));

        store.clear().unwrap();
        assert!(store.load().is_empty());
    }
}
