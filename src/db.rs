use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{quota_exceeded_error, Error};

/// String-keyed durable store backing a `RecordStore`.
pub trait KvHandle {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the summed length of all keys and values, the way browser
    /// storage enforces its quota.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvHandle for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let used = self.used_bytes() - replaced + key.len() + value.len();
            if used > quota {
                tracing::warn!(key, used, quota, "memory store quota exceeded");
                return Err(quota_exceeded_error());
            }
        }

        self.entries.insert(key.into(), value.into());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value store mirrored to a single JSON object file. Reads are served
/// from memory; every write rewrites the file with temp + rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    #[tracing::instrument(
        name = "FileStore::open",
        skip_all,
        fields(path = %path.as_ref().display())
    )]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(%err, "store file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), Error> {
        let content = serde_json::to_vec_pretty(&self.entries)?;
        atomic_write(&self.path, &content)
    }

    fn restore(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(value) => self.entries.insert(key.into(), value),
            None => self.entries.remove(key),
        };
    }
}

impl KvHandle for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let previous = self.entries.insert(key.into(), value.into());

        if let Err(err) = self.flush() {
            tracing::warn!(%err, "write failed, keeping previous value");
            self.restore(key, previous);
            return Err(err);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn remove(&mut self, key: &str) -> Result<(), Error> {
        let previous = match self.entries.remove(key) {
            Some(previous) => previous,
            None => return Ok(()),
        };

        if let Err(err) = self.flush() {
            self.restore(key, Some(previous));
            return Err(err);
        }

        Ok(())
    }
}

fn atomic_write(target: &Path, content: &[u8]) -> Result<(), Error> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = target.with_extension("tmp");
    fs::write(&temp, content)?;
    fs::rename(&temp, target)?;

    Ok(())
}
