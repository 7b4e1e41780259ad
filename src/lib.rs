//! Default and variant parameter resolution for evolutionary optimization runs.
//!
//! Turns the constructor signatures of an optimization library into an
//! editable configuration database, and resolves user choices from that
//! database into constructed objects:
//!
//! - **Registry**: registered classes per category with their static
//!   constructor schemas, and the reflector deriving editable defaults.
//! - **Catalog**: one default record per registered class plus user
//!   variants, with operator references between records and deferred
//!   dependency expressions such as `n_obj*K`.
//! - **Resolve**: dependency expansion against the chosen problem and
//!   all-or-nothing materialization through a pluggable factory.
//! - **Run**: expansion of chosen problems × algorithms into materialized
//!   run cells with per-run seeds.
//!
//! # Architecture
//!
//! The crate never constructs library objects itself. Everything that
//! would touch the optimization engine goes through
//! [`resolve::ComponentFactory`]; [`resolve::DryRunFactory`] implements it
//! over the built-in schemas for inspection and testing.
//!
//! # Example
//!
//! ```
//! use u_moo_config::catalog::{ArgumentValue, Catalog, CatalogConfig};
//! use u_moo_config::category::{Category, Mode};
//! use u_moo_config::resolve::DryRunFactory;
//! use u_moo_config::run::{RunConfig, RunPlanner};
//!
//! let mut catalog = Catalog::builtin(&CatalogConfig::multi_objective()).unwrap();
//! catalog
//!     .create_variant(
//!         Category::Algorithm,
//!         "nsga2",
//!         [("pop_size", ArgumentValue::literal(50))],
//!         Some("small_nsga2"),
//!     )
//!     .unwrap();
//!
//! let factory = DryRunFactory::builtin(Mode::MultiObjective);
//! let config = RunConfig::new(["zdt1"], ["small_nsga2"]).with_indicators(["igd"]);
//! let cells = RunPlanner::new(&catalog, &factory).plan(&config).unwrap();
//! assert_eq!(cells[0].algorithm.class_name, "nsga2");
//! ```

pub mod catalog;
pub mod category;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod run;

pub use error::{ConfigError, ConfigResult};
