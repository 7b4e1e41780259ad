//! A factory that records what would be constructed.

use super::context::ParetoFront;
use super::factory::{ComponentFactory, FactoryError, Kwarg, Kwargs};
use crate::catalog::Scalar;
use crate::category::{Category, Mode};
use crate::registry::{DeclaredDefault, ParamKind, Registry};

/// A constructor call that was validated but not executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub category: Category,
    pub class_name: String,
    pub kwargs: Kwargs<Blueprint>,
}

impl Blueprint {
    /// A scalar argument.
    pub fn scalar(&self, name: &str) -> Option<&Scalar> {
        self.kwargs.scalar(name)
    }

    /// A nested operator argument.
    pub fn component(&self, name: &str) -> Option<&Blueprint> {
        match self.kwargs.get(name) {
            Some(Kwarg::Component(b)) => Some(b),
            _ => None,
        }
    }

    /// A Pareto-front argument.
    pub fn front(&self, name: &str) -> Option<&ParetoFront> {
        match self.kwargs.get(name) {
            Some(Kwarg::Front(f)) => Some(f),
            _ => None,
        }
    }
}

/// [`ComponentFactory`] producing [`Blueprint`]s.
///
/// Calls are checked against the registry schemas the way a real
/// constructor would check them: required parameters must be present and
/// unknown keywords are refused unless the class collects `**kwargs`.
///
/// Problems report their objective count from an `n_obj` argument or the
/// schema hint, and expose the extreme points of the unit simplex as their
/// Pareto front.
///
/// # Examples
///
/// ```
/// use u_moo_config::category::{Category, Mode};
/// use u_moo_config::resolve::{ComponentFactory, DryRunFactory, Kwargs};
///
/// let factory = DryRunFactory::builtin(Mode::MultiObjective);
/// let zdt1 = factory.construct(Category::Problem, "zdt1", Kwargs::new()).unwrap();
/// assert_eq!(factory.n_obj(&zdt1), Some(2));
/// assert!(factory.construct(Category::Termination, "n_eval", Kwargs::new()).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DryRunFactory {
    registry: Registry,
}

impl DryRunFactory {
    /// Validates calls against `registry`.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Validates calls against the built-in registry of `mode`.
    pub fn builtin(mode: Mode) -> Self {
        Self::new(Registry::builtin(mode))
    }

    fn check(
        &self,
        category: Category,
        class_name: &str,
        kwargs: &Kwargs<Blueprint>,
    ) -> Result<(), FactoryError> {
        if !self.registry.contains(category, class_name) {
            return Err(FactoryError::new(format!(
                "'{class_name}' is not registered in {category}"
            )));
        }
        let Some(schema) = self.registry.schema(category, class_name) else {
            return Ok(());
        };

        if let Some(missing) = schema
            .named_params()
            .find(|p| matches!(p.default, DeclaredDefault::Required) && !kwargs.contains(&p.name))
        {
            return Err(FactoryError::at(&missing.name, "missing required argument"));
        }

        let collects_keywords = schema.params.iter().any(|p| p.kind == ParamKind::VarKeyword);
        if !collects_keywords {
            if let Some((name, _)) = kwargs.iter().find(|(name, _)| schema.param(name).is_none()) {
                return Err(FactoryError::at(name, "unexpected keyword argument"));
            }
        }
        Ok(())
    }
}

impl ComponentFactory for DryRunFactory {
    type Object = Blueprint;

    fn construct(
        &self,
        category: Category,
        class_name: &str,
        kwargs: Kwargs<Blueprint>,
    ) -> Result<Blueprint, FactoryError> {
        self.check(category, class_name, &kwargs)?;
        Ok(Blueprint {
            category,
            class_name: class_name.to_string(),
            kwargs,
        })
    }

    fn n_obj(&self, problem: &Blueprint) -> Option<usize> {
        if problem.category != Category::Problem {
            return None;
        }
        problem
            .scalar("n_obj")
            .and_then(Scalar::as_int)
            .and_then(|n| usize::try_from(n).ok())
            .or_else(|| {
                self.registry
                    .schema(Category::Problem, &problem.class_name)
                    .and_then(|s| s.objectives)
            })
    }

    fn pareto_front(&self, problem: &Blueprint, _ref_dirs: Option<&Blueprint>) -> Option<ParetoFront> {
        let n_obj = self.n_obj(problem)?;
        Some(
            (0..n_obj)
                .map(|i| (0..n_obj).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassSchema;

    fn factory() -> DryRunFactory {
        DryRunFactory::new(
            Registry::new()
                .with_class(Category::RefDirs, ClassSchema::new("das-dennis").required("n_dim").arg("n_partitions", 12))
                .with_class(Category::Problem, ClassSchema::new("dtlz2").arg("n_var", 10).arg("n_obj", 3).var_kwargs()),
        )
    }

    fn kwargs(entries: &[(&str, i64)]) -> Kwargs<Blueprint> {
        let mut kwargs = Kwargs::new();
        for (name, value) in entries {
            kwargs.push(*name, Kwarg::Scalar(Scalar::Int(*value)));
        }
        kwargs
    }

    #[test]
    fn test_required_argument_enforced() {
        let factory = factory();
        let err = factory
            .construct(Category::RefDirs, "das-dennis", Kwargs::new())
            .unwrap_err();
        assert_eq!(err.argument.as_deref(), Some("n_dim"));

        let blueprint = factory
            .construct(Category::RefDirs, "das-dennis", kwargs(&[("n_dim", 3)]))
            .unwrap();
        assert_eq!(blueprint.scalar("n_dim"), Some(&Scalar::Int(3)));
    }

    #[test]
    fn test_unknown_keywords() {
        let factory = factory();
        let err = factory
            .construct(Category::RefDirs, "das-dennis", kwargs(&[("n_dim", 3), ("seed", 1)]))
            .unwrap_err();
        assert_eq!(err.argument.as_deref(), Some("seed"));
        assert!(factory
            .construct(Category::Problem, "dtlz2", kwargs(&[("k", 5)]))
            .is_ok());
        assert!(factory
            .construct(Category::Problem, "zdt1", Kwargs::new())
            .is_err());
    }

    #[test]
    fn test_problem_queries() {
        let factory = factory();
        let default = factory.construct(Category::Problem, "dtlz2", Kwargs::new()).unwrap();
        assert_eq!(factory.n_obj(&default), None);

        let five = factory
            .construct(Category::Problem, "dtlz2", kwargs(&[("n_obj", 5)]))
            .unwrap();
        assert_eq!(factory.n_obj(&five), Some(5));
        let front = factory.pareto_front(&five, None).unwrap();
        assert_eq!(front.len(), 5);
        assert_eq!(front[2], vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_schema_objective_hint() {
        let factory = DryRunFactory::builtin(Mode::SingleObjective);
        let sphere = factory.construct(Category::Problem, "sphere", Kwargs::new()).unwrap();
        assert_eq!(factory.n_obj(&sphere), Some(1));
        let n_gen = factory.construct(Category::Termination, "n_gen", kwargs(&[("n_max_gen", 5)])).unwrap();
        assert_eq!(factory.n_obj(&n_gen), None);
    }
}
