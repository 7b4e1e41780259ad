//! A catalog shared between the editing session and run workers.

use super::store::Catalog;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle to a [`Catalog`].
///
/// Edits take the write lock; readers (materialization in particular)
/// hold the read lock for the whole operation, so a record can never
/// disappear halfway through a resolution. Cloning the handle shares the
/// same catalog.
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{ArgumentValue, Catalog, CatalogConfig, SharedCatalog};
/// use u_moo_config::category::Category;
///
/// let shared = SharedCatalog::new(Catalog::builtin(&CatalogConfig::default()).unwrap());
/// let worker = shared.clone();
///
/// shared
///     .write(|catalog| {
///         catalog
///             .create_variant(Category::Mutation, "pm", [("eta", ArgumentValue::literal(5.0))], None)
///             .map(|_| ())
///     })
///     .unwrap();
/// assert!(worker.read(|catalog| catalog.contains(Category::Mutation, "pm_variant")));
/// ```
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Catalog>>,
}

impl SharedCatalog {
    /// Wraps `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Runs `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// A consistent copy of the current catalog.
    pub fn snapshot(&self) -> Catalog {
        self.inner.read().clone()
    }

    /// Replaces the whole catalog, returning the previous one.
    pub fn replace(&self, catalog: Catalog) -> Catalog {
        std::mem::replace(&mut *self.inner.write(), catalog)
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(catalog: Catalog) -> Self {
        Self::new(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::config::CatalogConfig;
    use crate::catalog::types::ArgumentValue;
    use crate::category::Category;
    use std::thread;

    fn shared() -> SharedCatalog {
        SharedCatalog::new(Catalog::builtin(&CatalogConfig::default()).unwrap())
    }

    #[test]
    fn test_concurrent_writers_get_unique_ids() {
        let shared = shared();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let no_overrides: [(&str, ArgumentValue); 0] = [];
                    shared.write(|c| {
                        c.create_variant(Category::Crossover, "sbx", no_overrides, None)
                            .map(|r| r.id.clone())
                            .unwrap()
                    })
                })
            })
            .collect();
        let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(
            shared.read(|c| c.records(Category::Crossover).iter().filter(|r| !r.is_default()).count()),
            8
        );
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = shared();
        let before = shared.snapshot();
        let no_overrides: [(&str, ArgumentValue); 0] = [];
        shared
            .write(|c| c.create_variant(Category::Problem, "zdt1", no_overrides, None).map(|_| ()))
            .unwrap();
        assert!(!before.contains(Category::Problem, "zdt1_variant"));
        assert!(shared.read(|c| c.contains(Category::Problem, "zdt1_variant")));
    }

    #[test]
    fn test_panicking_writer_leaves_catalog_usable() {
        let shared = shared();
        let worker = shared.clone();
        let result = thread::spawn(move || {
            worker.write(|_| panic!("editor crashed"));
        })
        .join();
        assert!(result.is_err());

        let no_overrides: [(&str, ArgumentValue); 0] = [];
        shared
            .write(|c| c.create_variant(Category::Mutation, "pm", no_overrides, None).map(|_| ()))
            .unwrap();
        assert!(shared.read(|c| c.contains(Category::Mutation, "pm_variant")));
    }

    #[test]
    fn test_replace_returns_previous() {
        let shared = shared();
        let empty = Catalog::new(crate::category::Mode::SingleObjective);
        let previous = shared.replace(empty);
        assert!(!previous.is_empty());
        assert!(shared.read(Catalog::is_empty));
    }
}
