use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError, RwLock},
    time::SystemTime,
};

use crate::{catalog::Catalog, error::CatalogLoadError, prelude::*};

/// Hot-reloadable catalog handle.
///
/// Readers take a [snapshot][SharedCatalog::snapshot] and keep using it for the whole
/// comparison. Reloading swaps the entire catalog at once, so a reader never observes
/// a partially updated catalog.
///
/// Hot reload is poll-based: [`SharedCatalog::reload_if_modified`] compares the file modification
/// time on every call, there is no file system watcher.
pub struct SharedCatalog {
    source: Option<PathBuf>,
    current: RwLock<Arc<Catalog>>,
    modified_at: Mutex<Option<SystemTime>>,
}

impl SharedCatalog {
    pub fn load_or_builtin(source: Option<PathBuf>) -> Self {
        let modified_at = source.as_deref().and_then(modified_at);
        let catalog = Catalog::load_or_builtin(source.as_deref());
        Self {
            source,
            current: RwLock::new(Arc::new(catalog)),
            modified_at: Mutex::new(modified_at),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, catalog: Catalog) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    /// Reload the catalog from its source.
    ///
    /// On failure the current catalog stays in place.
    pub fn reload(&self) -> Result<(), CatalogLoadError> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        let modified_at = modified_at(source);
        let catalog = Catalog::load(source)?;
        self.replace(catalog);
        *self.modified_at.lock().unwrap_or_else(PoisonError::into_inner) = modified_at;
        Ok(())
    }

    /// Reload the catalog when the source file modification time has changed.
    ///
    /// Returns `true` when the catalog has been swapped.
    pub fn reload_if_modified(&self) -> bool {
        let Some(source) = &self.source else {
            return false;
        };
        let modified_at = modified_at(source);
        if *self.modified_at.lock().unwrap_or_else(PoisonError::into_inner) == modified_at {
            return false;
        }
        match self.reload() {
            Ok(()) => {
                info!(path = %source.display(), "reloaded the catalog");
                true
            }
            Err(error) => {
                let error = Error::from(error);
                error!("failed to reload the catalog, keeping the previous one: {error:#}");
                *self.modified_at.lock().unwrap_or_else(PoisonError::into_inner) = modified_at;
                false
            }
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}
