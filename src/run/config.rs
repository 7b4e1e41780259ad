//! Run-matrix configuration.

/// Which records a run sweeps over.
///
/// Every problem is paired with every algorithm; each pair is run once per
/// seed and measured with every indicator. Ids are catalog record ids.
///
/// # Builder Pattern
///
/// ```
/// use u_moo_config::run::RunConfig;
///
/// let config = RunConfig::new(["zdt1", "dtlz2"], ["nsga2"])
///     .with_indicators(["igd", "hv"])
///     .with_termination("n_gen")
///     .with_n_seeds(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.n_cells(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Problem record ids.
    pub problems: Vec<String>,

    /// Algorithm record ids.
    pub algorithms: Vec<String>,

    /// Performance-indicator record ids.
    ///
    /// Ignored for single-objective problems, which are measured by their
    /// best objective value.
    pub indicators: Vec<String>,

    /// Termination record id shared by every cell.
    pub termination: String,

    /// Number of independent seeds per cell.
    pub n_seeds: usize,

    /// Base seed the per-run seeds are drawn from.
    ///
    /// `None` draws a fresh base seed on every plan.
    pub seed: Option<u64>,

    /// Whether cells are materialized in parallel.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            problems: Vec::new(),
            algorithms: Vec::new(),
            indicators: Vec::new(),
            termination: "n_eval".to_string(),
            n_seeds: 1,
            seed: None,
            parallel: false,
        }
    }
}

impl RunConfig {
    /// A run over `problems` × `algorithms` with default settings.
    pub fn new<P, A>(problems: P, algorithms: A) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            problems: problems.into_iter().map(Into::into).collect(),
            algorithms: algorithms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the indicators.
    pub fn with_indicators<I>(mut self, indicators: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the termination.
    pub fn with_termination(mut self, id: impl Into<String>) -> Self {
        self.termination = id.into();
        self
    }

    /// Sets the number of seeds per cell.
    pub fn with_n_seeds(mut self, n: usize) -> Self {
        self.n_seeds = n;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel materialization.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of problem × algorithm cells.
    pub fn n_cells(&self) -> usize {
        self.problems.len() * self.algorithms.len()
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.problems.is_empty() {
            return Err("at least one problem must be chosen".into());
        }
        if self.algorithms.is_empty() {
            return Err("at least one algorithm must be chosen".into());
        }
        if self.termination.trim().is_empty() {
            return Err("a termination must be chosen".into());
        }
        if self.n_seeds == 0 {
            return Err("n_seeds must be at least 1".into());
        }
        Ok(())
    }
}
