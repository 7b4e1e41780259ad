//! Catalog build configuration.
//!
//! [`CatalogConfig`] fixes the session mode and the constants the manual
//! overrides write into default records.

use super::resolver::MatchPolicy;
use crate::category::Mode;

/// Configuration for [`CatalogBuilder`](super::CatalogBuilder).
///
/// # Defaults
///
/// ```
/// use u_moo_config::catalog::CatalogConfig;
/// use u_moo_config::category::Mode;
///
/// let config = CatalogConfig::default();
/// assert_eq!(config.mode, Mode::MultiObjective);
/// assert_eq!(config.max_evaluations, 1000);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moo_config::catalog::{CatalogConfig, MatchPolicy};
///
/// let config = CatalogConfig::single_objective()
///     .with_max_evaluations(5000)
///     .with_match_policy(MatchPolicy::Structural);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Objective mode of the session.
    pub mode: Mode,

    /// Evaluation cap written into the `n_eval` termination default.
    pub max_evaluations: u64,

    /// Generation cap written into the `n_gen` termination default.
    pub max_generations: u64,

    /// Partition count written into the `das-dennis` reference-direction default.
    pub ref_dirs_partitions: u64,

    /// How declared default operator instances are matched to records.
    ///
    /// [`MatchPolicy::ClassIdentity`] is the baseline. Default records of
    /// the library rarely reproduce the exact arguments an algorithm
    /// declares, so [`MatchPolicy::Structural`] can fail a build that the
    /// baseline accepts.
    pub match_policy: MatchPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            mode: Mode::MultiObjective,
            max_evaluations: 1000,
            max_generations: 100,
            ref_dirs_partitions: 12,
            match_policy: MatchPolicy::ClassIdentity,
        }
    }
}

impl CatalogConfig {
    /// Preset for a multi-objective session.
    pub fn multi_objective() -> Self {
        Self::default()
    }

    /// Preset for a single-objective session.
    pub fn single_objective() -> Self {
        Self {
            mode: Mode::SingleObjective,
            ..Self::default()
        }
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the evaluation cap.
    pub fn with_max_evaluations(mut self, n: u64) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, n: u64) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the reference-direction partition count.
    pub fn with_ref_dirs_partitions(mut self, n: u64) -> Self {
        self.ref_dirs_partitions = n;
        self
    }

    /// Sets the operator match policy.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_evaluations == 0 {
            return Err("max_evaluations must be at least 1".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.ref_dirs_partitions == 0 {
            return Err("ref_dirs_partitions must be at least 1".into());
        }
        let largest = self
            .max_evaluations
            .max(self.max_generations)
            .max(self.ref_dirs_partitions);
        if i64::try_from(largest).is_err() {
            return Err("caps must fit in a signed 64-bit integer".into());
        }
        Ok(())
    }
}
