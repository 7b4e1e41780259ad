//! The configuration database.
//!
//! A [`Catalog`] holds, per [`Category`](crate::category::Category), the
//! default record of every registered class plus the variants a user
//! derives from them.
//!
//! # Key Types
//!
//! - [`Record`]: id, class name and ordered [`Arguments`]
//! - [`ArgumentValue`]: literal, operator reference, unset, or dependency
//! - [`CatalogBuilder`]: seeds the default records from a registry
//! - [`OperatorResolver`]: maps declared operator defaults to record ids
//! - [`Catalog`]: variant creation, editing, removal and renaming
//! - [`SharedCatalog`]: the catalog behind a read/write lock
//!
//! # Example
//!
//! ```
//! use u_moo_config::catalog::{ArgumentValue, Catalog, CatalogConfig};
//! use u_moo_config::category::Category;
//!
//! let mut catalog = Catalog::builtin(&CatalogConfig::multi_objective()).unwrap();
//! catalog
//!     .create_variant(
//!         Category::Algorithm,
//!         "nsga2",
//!         [("pop_size", ArgumentValue::literal(40))],
//!         Some("small_nsga2"),
//!     )
//!     .unwrap();
//! assert!(catalog.contains(Category::Algorithm, "small_nsga2"));
//! ```

mod builder;
mod config;
mod overrides;
#[cfg(feature = "serde")]
mod persist;
mod resolver;
mod shared;
mod store;
mod types;

pub use builder::CatalogBuilder;
pub use config::CatalogConfig;
pub use resolver::{MatchPolicy, OperatorResolver};
pub use shared::SharedCatalog;
pub use store::{Catalog, RecordSummary};
pub use types::{ArgumentValue, Arguments, Expr, Record, Scalar, FROM_PROBLEM, NO_DEFAULT};
