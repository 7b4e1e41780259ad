//! Record resolution and object construction.
//!
//! Once a problem is chosen, records are turned into live objects:
//! dependency expressions are evaluated against a [`ResolveContext`],
//! operator references are materialized recursively, and the result is
//! handed to a [`ComponentFactory`].
//!
//! # Key Types
//!
//! - [`ResolveContext`]: objective count and Pareto front of the chosen problem
//! - [`DependencyExpander`]: evaluates `n_obj*K` and `get from problem`
//! - [`ComponentFactory`]: the seam to the optimization library
//! - [`Materializer`]: record → object, all-or-nothing
//! - [`DryRunFactory`]: a factory producing inspectable [`Blueprint`]s

mod context;
mod dry_run;
mod expander;
mod factory;
mod materializer;

pub use context::{ParetoFront, ResolveContext};
pub use dry_run::{Blueprint, DryRunFactory};
pub use expander::{DependencyExpander, Expanded};
pub use factory::{ComponentFactory, FactoryError, Kwarg, Kwargs};
pub use materializer::Materializer;
