//! Run-matrix planning.
//!
//! A run sweeps chosen problems × algorithms over several seeds. The
//! planner resolves every cell against the catalog and hands back
//! materialized objects; executing the runs is left to the caller.
//!
//! # Key Types
//!
//! - [`RunConfig`]: chosen ids, seed count and base seed
//! - [`RunPlanner`]: config → materialized [`RunCell`]s
//! - [`IndicatorSlot`]: a materialized indicator or the implicit best value

mod config;
mod planner;

pub use config::RunConfig;
pub use planner::{IndicatorSlot, RunCell, RunPlanner};
