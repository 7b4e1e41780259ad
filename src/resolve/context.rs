//! What is known about the chosen problem at materialization time.

/// A Pareto front: one row of objective values per point.
pub type ParetoFront = Vec<Vec<f64>>;

/// Problem facts dependency expressions are evaluated against.
///
/// Both fields are optional: a context probed before any problem is chosen
/// is empty, and problems without a known front leave `pareto_front` unset.
///
/// # Examples
///
/// ```
/// use u_moo_config::resolve::ResolveContext;
///
/// let ctx = ResolveContext::new().with_n_obj(3);
/// assert_eq!(ctx.n_obj, Some(3));
/// assert!(ctx.pareto_front.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveContext {
    /// Objective count of the chosen problem.
    pub n_obj: Option<usize>,

    /// Pareto front of the chosen problem.
    pub pareto_front: Option<ParetoFront>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the objective count.
    pub fn with_n_obj(mut self, n_obj: usize) -> Self {
        self.n_obj = Some(n_obj);
        self
    }

    /// Sets the Pareto front.
    pub fn with_pareto_front(mut self, front: ParetoFront) -> Self {
        self.pareto_front = Some(front);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.n_obj.is_none() && self.pareto_front.is_none()
    }
}
