//! Dependency-expression evaluation.

use super::context::{ParetoFront, ResolveContext};
use crate::catalog::{ArgumentValue, Expr, Scalar};
use crate::error::{ConfigError, ConfigResult};

/// Outcome of expanding one argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expanded {
    /// The value is not a dependency expression; use it unchanged.
    PassThrough,
    /// `n_obj*K` evaluated.
    Scalar(Scalar),
    /// `get from problem` evaluated.
    Front(ParetoFront),
    /// The context lacks what the expression needs.
    ///
    /// Not an error: dependencies are probed before a problem is chosen.
    Unavailable,
}

/// Evaluates dependency expressions against a [`ResolveContext`].
///
/// Accepts both typed [`ArgumentValue::Dependency`] values and string
/// literals shaped like an expression.
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{ArgumentValue, Expr, Scalar};
/// use u_moo_config::resolve::{DependencyExpander, Expanded, ResolveContext};
///
/// let value = ArgumentValue::Dependency(Expr::ObjCountTimes(2));
/// let ctx = ResolveContext::new().with_n_obj(3);
/// assert_eq!(
///     DependencyExpander::expand(&value, &ctx).unwrap(),
///     Expanded::Scalar(Scalar::Int(6))
/// );
/// assert_eq!(
///     DependencyExpander::expand(&value, &ResolveContext::new()).unwrap(),
///     Expanded::Unavailable
/// );
/// ```
pub struct DependencyExpander;

impl DependencyExpander {
    /// Expands `value` against `ctx`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDependencyExpression`] for a string shaped like
    /// `n_obj*K` whose factor is not an integer, or when the product
    /// overflows.
    pub fn expand(value: &ArgumentValue, ctx: &ResolveContext) -> ConfigResult<Expanded> {
        let expr = match value {
            ArgumentValue::Dependency(expr) => *expr,
            ArgumentValue::Literal(Scalar::Str(text)) => match Expr::detect(text) {
                Some(expr) => expr?,
                None => return Ok(Expanded::PassThrough),
            },
            _ => return Ok(Expanded::PassThrough),
        };
        Self::evaluate(expr, ctx)
    }

    /// Evaluates a typed expression.
    pub fn evaluate(expr: Expr, ctx: &ResolveContext) -> ConfigResult<Expanded> {
        match expr {
            Expr::ObjCountTimes(k) => {
                let Some(n_obj) = ctx.n_obj else {
                    return Ok(Expanded::Unavailable);
                };
                i64::try_from(n_obj)
                    .ok()
                    .and_then(|n| n.checked_mul(k))
                    .map(|v| Expanded::Scalar(Scalar::Int(v)))
                    .ok_or_else(|| ConfigError::InvalidDependencyExpression {
                        expression: expr.to_string(),
                        reason: format!("n_obj = {n_obj} overflows the product"),
                    })
            }
            Expr::ProblemParetoFront => Ok(ctx
                .pareto_front
                .clone()
                .map_or(Expanded::Unavailable, Expanded::Front)),
        }
    }
}
