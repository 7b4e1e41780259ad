//! Record → live object construction.

use super::context::ResolveContext;
use super::expander::{DependencyExpander, Expanded};
use super::factory::{ComponentFactory, Kwarg, Kwargs};
use crate::catalog::{ArgumentValue, Catalog, Expr, Record, Scalar};
use crate::category::Category;
use crate::error::{ConfigError, ConfigResult};
use tracing::debug;

/// Turns catalog records into objects through a [`ComponentFactory`].
///
/// A record is checked as a whole before the factory is called: every
/// argument reachable through operator references must have a value and
/// every reference must name an existing record. A failing record therefore
/// never produces a partial object.
///
/// The materializer holds no state between calls. To materialize from a
/// [`SharedCatalog`](crate::catalog::SharedCatalog), run it inside
/// [`read`](crate::catalog::SharedCatalog::read).
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{Catalog, CatalogConfig, Scalar};
/// use u_moo_config::category::{Category, Mode};
/// use u_moo_config::resolve::{DryRunFactory, Materializer, ResolveContext};
///
/// let catalog = Catalog::builtin(&CatalogConfig::multi_objective()).unwrap();
/// let factory = DryRunFactory::builtin(Mode::MultiObjective);
/// let materializer = Materializer::new(&catalog, &factory);
///
/// let ctx = ResolveContext::new().with_n_obj(3);
/// let ref_dirs = materializer
///     .materialize(Category::RefDirs, "das-dennis", &ctx)
///     .unwrap();
/// assert_eq!(ref_dirs.scalar("n_dim"), Some(&Scalar::Int(3)));
/// ```
pub struct Materializer<'a, F: ComponentFactory> {
    catalog: &'a Catalog,
    factory: &'a F,
}

impl<'a, F: ComponentFactory> Materializer<'a, F> {
    /// Creates a materializer reading `catalog`.
    pub fn new(catalog: &'a Catalog, factory: &'a F) -> Self {
        Self { catalog, factory }
    }

    /// The factory objects are constructed with.
    pub fn factory(&self) -> &F {
        self.factory
    }

    /// Constructs record `id` of `category`.
    ///
    /// Operator arguments are materialized first, in their own categories,
    /// with the same `ctx`. Dependency arguments are expanded against
    /// `ctx`; one the context cannot satisfy is left out so the class
    /// falls back to its own default.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::RecordNotFound`] for an unknown id
    /// - [`ConfigError::UnresolvedArgument`] when any reachable argument is
    ///   still unset
    /// - [`ConfigError::DanglingReference`] for a reference to a missing record
    /// - [`ConfigError::MisplacedDependency`] and
    ///   [`ConfigError::InvalidDependencyExpression`] from expansion
    /// - [`ConfigError::Construction`] when the factory refuses a call
    pub fn materialize(
        &self,
        category: Category,
        id: &str,
        ctx: &ResolveContext,
    ) -> ConfigResult<F::Object> {
        self.check(category, id)?;
        self.construct(category, id, ctx)
    }

    /// Runs the pre-construction checks of [`materialize`](Self::materialize)
    /// without calling the factory.
    pub fn check(&self, category: Category, id: &str) -> ConfigResult<()> {
        let mut path = Vec::new();
        self.check_record(category, id, &mut path)
    }

    fn check_record(
        &self,
        category: Category,
        id: &str,
        path: &mut Vec<(Category, String)>,
    ) -> ConfigResult<()> {
        let record = self.catalog.get(category, id)?;
        if let Some(argument) = record.arguments.first_unset() {
            return Err(ConfigError::UnresolvedArgument {
                category,
                id: id.to_string(),
                argument: argument.to_string(),
            });
        }

        path.push((category, id.to_string()));
        for (name, value) in record.arguments.iter() {
            match (category.operator_target(name), value) {
                (Some(target_category), ArgumentValue::OperatorRef(target)) => {
                    if !self.catalog.contains(target_category, target) {
                        return Err(ConfigError::DanglingReference {
                            category,
                            id: id.to_string(),
                            argument: name.to_string(),
                            target_category,
                            target: target.clone(),
                        });
                    }
                    if !path.iter().any(|(c, i)| *c == target_category && i == target) {
                        self.check_record(target_category, target, path)?;
                    }
                }
                (_, ArgumentValue::Dependency(expr)) if !category.accepts_dependency(name) => {
                    return Err(ConfigError::MisplacedDependency {
                        category,
                        id: id.to_string(),
                        argument: name.to_string(),
                        expression: expr.to_string(),
                    });
                }
                (_, ArgumentValue::Literal(Scalar::Str(text))) if category.accepts_dependency(name) => {
                    if let Some(Err(e)) = Expr::detect(text) {
                        return Err(e);
                    }
                }
                _ => {}
            }
        }
        path.pop();
        Ok(())
    }

    fn construct(
        &self,
        category: Category,
        id: &str,
        ctx: &ResolveContext,
    ) -> ConfigResult<F::Object> {
        let record = self.catalog.get(category, id)?;
        let kwargs = self.kwargs(category, record, ctx)?;

        debug!(
            category = %category,
            id,
            class = %record.class_name,
            kwargs = kwargs.len(),
            "materializing"
        );
        self.factory
            .construct(category, &record.class_name, kwargs)
            .map_err(|e| ConfigError::Construction {
                category,
                id: id.to_string(),
                class_name: record.class_name.clone(),
                argument: e.argument,
                reason: e.reason,
            })
    }

    fn kwargs(
        &self,
        category: Category,
        record: &Record,
        ctx: &ResolveContext,
    ) -> ConfigResult<Kwargs<F::Object>> {
        let mut kwargs = Kwargs::new();
        for (name, value) in record.arguments.iter() {
            if let (Some(target_category), ArgumentValue::OperatorRef(target)) =
                (category.operator_target(name), value)
            {
                let component = self.construct(target_category, target, ctx)?;
                kwargs.push(name, Kwarg::Component(component));
                continue;
            }

            if category.accepts_dependency(name) {
                match DependencyExpander::expand(value, ctx)? {
                    Expanded::PassThrough => {}
                    Expanded::Scalar(s) => {
                        kwargs.push(name, Kwarg::Scalar(s));
                        continue;
                    }
                    Expanded::Front(front) => {
                        kwargs.push(name, Kwarg::Front(front));
                        continue;
                    }
                    Expanded::Unavailable => {
                        debug!(
                            category = %category,
                            id = %record.id,
                            argument = name,
                            "dependency unavailable, argument left to the class default"
                        );
                        continue;
                    }
                }
            }

            let scalar = match value {
                ArgumentValue::Literal(s) => s.clone(),
                ArgumentValue::OperatorRef(text) => Scalar::Str(text.clone()),
                ArgumentValue::Unset => {
                    return Err(ConfigError::UnresolvedArgument {
                        category,
                        id: record.id.clone(),
                        argument: name.to_string(),
                    })
                }
                ArgumentValue::Dependency(expr) => {
                    return Err(ConfigError::MisplacedDependency {
                        category,
                        id: record.id.clone(),
                        argument: name.to_string(),
                        expression: expr.to_string(),
                    })
                }
            };
            kwargs.push(name, Kwarg::Scalar(scalar));
        }
        Ok(kwargs)
    }
}
