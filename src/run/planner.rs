//! Run-matrix expansion.

use super::config::RunConfig;
use crate::catalog::Catalog;
use crate::category::Category;
use crate::error::{ConfigError, ConfigResult};
use crate::resolve::{ComponentFactory, Materializer, ResolveContext};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How one cell is measured.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorSlot<O> {
    /// Best objective value; the only measure of a single-objective problem.
    Best,
    /// A materialized performance indicator.
    Measure { id: String, indicator: O },
}

/// One problem × algorithm pair, ready to hand to a run worker.
///
/// Every object is materialized for this cell alone.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCell<O> {
    pub problem_id: String,
    pub algorithm_id: String,
    pub problem: O,
    pub algorithm: O,
    pub termination: O,
    pub indicators: Vec<IndicatorSlot<O>>,
    /// One run per seed.
    pub seeds: Vec<u64>,
}

/// Expands a [`RunConfig`] into materialized [`RunCell`]s.
///
/// Per cell, the problem is materialized first with an empty context; its
/// objective count then resolves the algorithm's dependencies and its
/// Pareto front the indicators'.
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{Catalog, CatalogConfig};
/// use u_moo_config::category::Mode;
/// use u_moo_config::resolve::DryRunFactory;
/// use u_moo_config::run::{IndicatorSlot, RunConfig, RunPlanner};
///
/// let catalog = Catalog::builtin(&CatalogConfig::single_objective()).unwrap();
/// let factory = DryRunFactory::builtin(Mode::SingleObjective);
/// let config = RunConfig::new(["sphere", "ackley"], ["ga"]).with_n_seeds(3).with_seed(1);
///
/// let cells = RunPlanner::new(&catalog, &factory).plan(&config).unwrap();
/// assert_eq!(cells.len(), 2);
/// assert_eq!(cells[0].seeds.len(), 3);
/// assert_eq!(cells[0].indicators, vec![IndicatorSlot::Best]);
/// ```
pub struct RunPlanner<'a, F: ComponentFactory> {
    catalog: &'a Catalog,
    factory: &'a F,
}

impl<'a, F> RunPlanner<'a, F>
where
    F: ComponentFactory,
    F::Object: Send,
{
    /// Creates a planner reading `catalog`.
    pub fn new(catalog: &'a Catalog, factory: &'a F) -> Self {
        Self { catalog, factory }
    }

    /// Materializes every cell of `config`, problems outermost.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidConfig`] when `config` does not validate, and
    /// the first materialization error of any cell.
    pub fn plan(&self, config: &RunConfig) -> ConfigResult<Vec<RunCell<F::Object>>> {
        config.validate().map_err(ConfigError::InvalidConfig)?;

        let seeds = Self::seeds(config);
        let pairs: Vec<(&str, &str)> = config
            .problems
            .iter()
            .flat_map(|p| config.algorithms.iter().map(move |a| (p.as_str(), a.as_str())))
            .collect();

        let cells = self.cells(config, &pairs, &seeds)?;
        info!(
            cells = cells.len(),
            seeds = seeds.len(),
            termination = %config.termination,
            "run plan ready"
        );
        Ok(cells)
    }

    /// The seeds every cell is run with.
    ///
    /// Deterministic for a fixed base seed.
    pub fn seeds(config: &RunConfig) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        (0..config.n_seeds).map(|_| rng.random()).collect()
    }

    #[cfg(feature = "parallel")]
    fn cells(
        &self,
        config: &RunConfig,
        pairs: &[(&str, &str)],
        seeds: &[u64],
    ) -> ConfigResult<Vec<RunCell<F::Object>>> {
        if config.parallel {
            pairs
                .par_iter()
                .map(|(p, a)| self.cell(config, p, a, seeds))
                .collect()
        } else {
            pairs
                .iter()
                .map(|(p, a)| self.cell(config, p, a, seeds))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn cells(
        &self,
        config: &RunConfig,
        pairs: &[(&str, &str)],
        seeds: &[u64],
    ) -> ConfigResult<Vec<RunCell<F::Object>>> {
        pairs
            .iter()
            .map(|(p, a)| self.cell(config, p, a, seeds))
            .collect()
    }

    fn cell(
        &self,
        config: &RunConfig,
        problem_id: &str,
        algorithm_id: &str,
        seeds: &[u64],
    ) -> ConfigResult<RunCell<F::Object>> {
        let materializer = Materializer::new(self.catalog, self.factory);

        let problem = materializer.materialize(Category::Problem, problem_id, &ResolveContext::new())?;
        let n_obj = self.factory.n_obj(&problem);

        let mut ctx = ResolveContext::new();
        ctx.n_obj = n_obj;
        let algorithm = materializer.materialize(Category::Algorithm, algorithm_id, &ctx)?;
        let termination = materializer.materialize(Category::Termination, &config.termination, &ctx)?;

        let single_objective = match n_obj {
            Some(n) => n <= 1,
            None => !self.catalog.mode().is_multi_objective(),
        };
        let indicators = if single_objective {
            vec![IndicatorSlot::Best]
        } else {
            ctx.pareto_front = self.factory.pareto_front(&problem, None);
            config
                .indicators
                .iter()
                .map(|id| {
                    materializer
                        .materialize(Category::PerformanceIndicator, id, &ctx)
                        .map(|indicator| IndicatorSlot::Measure {
                            id: id.clone(),
                            indicator,
                        })
                })
                .collect::<ConfigResult<Vec<_>>>()?
        };

        debug!(
            problem = problem_id,
            algorithm = algorithm_id,
            n_obj = ?n_obj,
            "cell materialized"
        );
        Ok(RunCell {
            problem_id: problem_id.to_string(),
            algorithm_id: algorithm_id.to_string(),
            problem,
            algorithm,
            termination,
            indicators,
            seeds: seeds.to_vec(),
        })
    }
}
