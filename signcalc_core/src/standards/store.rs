//! Process-lifetime cache of loaded standards packs
//!
//! A [`PackStore`] is constructed once and shared (behind an `Arc`) by every
//! pipeline invocation. Each pack slot is filled at most once, on first use,
//! and is read-only afterwards, so concurrent readers never contend on a lock
//! after warm-up.

use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::{CalcError, CalcResult};

use super::pack::{ContentHash, PackId, StandardsPack};

/// Where pack bytes come from
#[derive(Debug, Clone)]
pub enum PackSource {
    /// Packs compiled into the binary
    Builtin,
    /// `<dir>/<pack-id>.toml`
    Directory(PathBuf),
    /// In-memory sources, keyed by pack id (tests, embedding hosts)
    Memory(BTreeMap<PackId, String>),
}

/// Lazily populated, read-only pack cache
#[derive(Debug)]
pub struct PackStore {
    source: PackSource,
    slots: [OnceCell<Arc<StandardsPack>>; 3],
}

impl PackStore {
    pub fn new(source: PackSource) -> Self {
        PackStore {
            source,
            slots: [OnceCell::new(), OnceCell::new(), OnceCell::new()],
        }
    }

    /// Store backed by the packs compiled into the binary
    pub fn builtin() -> Self {
        Self::new(PackSource::Builtin)
    }

    pub fn source(&self) -> &PackSource {
        &self.source
    }

    /// Load a pack, reading and validating it on first reference.
    ///
    /// A failed load leaves the slot empty, so a later call retries the read.
    pub fn load(&self, id: PackId) -> CalcResult<Arc<StandardsPack>> {
        self.slots[id.index()]
            .get_or_try_init(|| {
                let text = self.read_source(id)?;
                let pack = StandardsPack::parse(id, &text)?;
                tracing::info!(pack = id.as_str(), hash = %pack.hash, "standards pack loaded");
                Ok::<_, CalcError>(Arc::new(pack))
            })
            .map(Arc::clone)
    }

    /// Content hash of a pack (loads it if needed)
    pub fn hash(&self, id: PackId) -> CalcResult<ContentHash> {
        Ok(self.load(id)?.hash.clone())
    }

    /// Load every pack the source provides, failing on the first error.
    pub fn warm_up(&self) -> CalcResult<usize> {
        let mut loaded = 0;
        for id in PackId::ALL {
            match self.load(id) {
                Ok(_) => loaded += 1,
                Err(CalcError::PackNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(loaded)
    }

    /// Whether a pack is already cached
    pub fn is_loaded(&self, id: PackId) -> bool {
        self.slots[id.index()].get().is_some()
    }

    fn read_source(&self, id: PackId) -> CalcResult<String> {
        match &self.source {
            PackSource::Builtin => Ok(id.builtin_source().to_string()),
            PackSource::Directory(dir) => {
                let path = dir.join(id.file_name());
                match std::fs::read_to_string(&path) {
                    Ok(text) => Ok(text),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Err(CalcError::pack_not_found(path.display().to_string()))
                    }
                    Err(e) => Err(CalcError::pack_parse(
                        id.as_str(),
                        format!("failed to read {}: {}", path.display(), e),
                    )),
                }
            }
            PackSource::Memory(packs) => packs
                .get(&id)
                .cloned()
                .ok_or_else(|| CalcError::pack_not_found(id.as_str())),
        }
    }
}

impl Default for PackStore {
    fn default() -> Self {
        Self::builtin()
    }
}
