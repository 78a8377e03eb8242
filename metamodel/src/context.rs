//! The live metamodel and its hot-reload lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info, warn};

use crate::config::Environment;
use crate::descriptor::TypeRegistry;
use crate::error::{MetaModelError, Result};
use crate::metamodel::MetaModel;
use crate::specification::SpecificationLoader;

/// Owns the current metamodel snapshot.
///
/// Readers take an `Arc` to the snapshot and keep using it for as long as
/// they like; a reload builds a complete new snapshot and swaps it in
/// atomically, so no reader ever sees a partially built model.
pub struct MetaModelContext {
    loader: SpecificationLoader,
    current: ArcSwap<MetaModel>,
    version: AtomicU64,
}

impl MetaModelContext {
    /// Builds the first snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MetaModelError::Validation`] in production when any
    /// validator reported a failure. Other environments log the failures
    /// and carry on.
    pub fn bootstrap(loader: SpecificationLoader, registry: &TypeRegistry) -> Result<Self> {
        let metamodel = loader.load_version(registry, 1);
        check_failures(&metamodel)?;
        Ok(Self {
            loader,
            current: ArcSwap::from_pointee(metamodel),
            version: AtomicU64::new(1),
        })
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<MetaModel> {
        self.current.load_full()
    }

    /// Version of the current snapshot.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    /// Rebuilds the metamodel from `registry` and swaps it in.
    ///
    /// Concurrent reloads may finish out of order; a build only replaces the
    /// current snapshot if its version is newer, so the current version
    /// never goes backwards. The returned snapshot is the one this call
    /// built, whether or not it became current.
    ///
    /// # Errors
    ///
    /// As for [`bootstrap`](Self::bootstrap). On error the current snapshot
    /// stays in place.
    pub fn reload(&self, registry: &TypeRegistry) -> Result<Arc<MetaModel>> {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let metamodel = self.loader.load_version(registry, version);
        check_failures(&metamodel)?;
        let metamodel = Arc::new(metamodel);
        let previous = self.current.rcu(|current| {
            if current.version() < version {
                Arc::clone(&metamodel)
            } else {
                Arc::clone(current)
            }
        });
        if previous.version() < version {
            info!(version, "metamodel swapped");
        } else {
            debug!(version, current = previous.version(), "stale metamodel build discarded");
        }
        Ok(metamodel)
    }

    /// The loader used for every build.
    #[must_use]
    pub fn loader(&self) -> &SpecificationLoader {
        &self.loader
    }
}

impl std::fmt::Debug for MetaModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaModelContext")
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

fn check_failures(metamodel: &MetaModel) -> Result<()> {
    let failures = metamodel.validation_failures();
    if failures.is_empty() {
        return Ok(());
    }
    match metamodel.config().environment {
        Environment::Production => Err(MetaModelError::Validation(failures.clone())),
        Environment::Prototyping | Environment::UnitTesting => {
            for failure in failures {
                warn!(%failure, "metamodel validation failure");
            }
            Ok(())
        }
    }
}
