//! Default-record population.
//!
//! [`CatalogBuilder`] seeds one default [`Record`] per registered class:
//! reflection, operator-marker resolution, then the manual override table.

use super::config::CatalogConfig;
use super::overrides::{overrides, Override};
use super::resolver::OperatorResolver;
use super::store::Catalog;
use super::types::{ArgumentValue, Arguments, Record, Scalar};
use crate::category::Category;
use crate::error::{ConfigError, ConfigResult};
use crate::registry::{Reflected, Reflector, Registry};
use tracing::{debug, info, warn};

/// Builds the default records of a session.
///
/// Building is deterministic: the same registry and configuration always
/// yield an equal [`Catalog`].
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{ArgumentValue, CatalogBuilder, CatalogConfig};
/// use u_moo_config::category::{Category, Mode};
/// use u_moo_config::registry::Registry;
///
/// let registry = Registry::builtin(Mode::MultiObjective);
/// let config = CatalogConfig::multi_objective();
/// let catalog = CatalogBuilder::new(&registry, &config).build_all().unwrap();
///
/// let nsga2 = catalog.get(Category::Algorithm, "nsga2").unwrap();
/// assert_eq!(
///     nsga2.arguments.get("selection"),
///     Some(&ArgumentValue::operator("tournament"))
/// );
/// ```
pub struct CatalogBuilder<'a> {
    registry: &'a Registry,
    config: &'a CatalogConfig,
    overrides: Vec<Override>,
}

impl<'a> CatalogBuilder<'a> {
    /// Creates a builder over `registry` for the session described by `config`.
    pub fn new(registry: &'a Registry, config: &'a CatalogConfig) -> Self {
        Self {
            registry,
            config,
            overrides: overrides(config),
        }
    }

    /// Builds the default records of one category, in registry order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Reflection`] for a class without a schema and
    /// [`ConfigError::UnknownOperator`] for a declared default operator
    /// that matches no record.
    pub fn build(&self, category: Category) -> ConfigResult<Vec<Record>> {
        let reflector = Reflector::new(self.registry);
        let resolver = OperatorResolver::new(self.registry, self.config.match_policy);

        let mut records = Vec::with_capacity(self.registry.classes(category).len());
        for entry in self.registry.classes(category) {
            let table = reflector.reflect(category, &entry.name)?;
            let mut arguments = Arguments::new();
            for (name, reflected) in table {
                match self.argument_value(&resolver, category, &name, reflected)? {
                    Some(value) => {
                        arguments.set(name, value);
                    }
                    None => debug!(
                        category = %category,
                        class = %entry.name,
                        argument = %name,
                        "dropping operator default on a plain argument"
                    ),
                }
            }

            self.apply_overrides(category, &entry.name, &mut arguments);

            if arguments.get("selection").is_some_and(ArgumentValue::is_unset)
                && category.operator_target("selection").is_some()
            {
                warn!(
                    category = %category,
                    id = %entry.name,
                    "selection left unset, must be chosen by hand"
                );
            }

            debug!(
                category = %category,
                id = %entry.name,
                arguments = arguments.len(),
                "default record populated"
            );
            records.push(Record::default_of(entry.name.clone(), arguments));
        }
        Ok(records)
    }

    /// Builds every category into a fresh [`Catalog`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidConfig`] when the configuration does not
    /// validate, and any error of [`build`](Self::build).
    pub fn build_all(&self) -> ConfigResult<Catalog> {
        self.config.validate().map_err(ConfigError::InvalidConfig)?;

        let mut catalog = Catalog::new(self.config.mode);
        for category in Category::ALL {
            for record in self.build(category)? {
                catalog.push_default(category, record);
            }
        }
        info!(
            mode = ?self.config.mode,
            records = catalog.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    fn argument_value(
        &self,
        resolver: &OperatorResolver<'_>,
        category: Category,
        name: &str,
        reflected: Reflected,
    ) -> ConfigResult<Option<ArgumentValue>> {
        let Some(target) = category.operator_target(name) else {
            return Ok(match reflected {
                Reflected::Unset => Some(ArgumentValue::Unset),
                Reflected::Literal(value) => Some(ArgumentValue::Literal(value)),
                Reflected::Operator { .. } => None,
            });
        };

        if target == Category::Selection {
            return Ok(Some(ArgumentValue::Unset));
        }

        let value = match reflected {
            Reflected::Operator { instance, .. } => {
                ArgumentValue::OperatorRef(resolver.resolve(target, Some(&instance))?)
            }
            Reflected::Unset | Reflected::Literal(Scalar::Null) => {
                ArgumentValue::OperatorRef(resolver.resolve(target, None)?)
            }
            Reflected::Literal(value) => ArgumentValue::Literal(value),
        };
        Ok(Some(value))
    }

    fn apply_overrides(&self, category: Category, id: &str, arguments: &mut Arguments) {
        for rule in &self.overrides {
            if rule.applies(self.config.mode, category, id) && arguments.contains(rule.argument) {
                arguments.set(rule.argument, rule.value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolver::MatchPolicy;
    use crate::catalog::types::Expr;
    use crate::category::Mode;
    use crate::registry::{ClassSchema, Instance};

    fn build(config: &CatalogConfig) -> Catalog {
        let registry = Registry::builtin(config.mode);
        CatalogBuilder::new(&registry, config).build_all().unwrap()
    }

    fn arg(catalog: &Catalog, category: Category, id: &str, name: &str) -> Option<ArgumentValue> {
        catalog
            .arguments(category, id)
            .unwrap()
            .get(name)
            .cloned()
    }

    // ---- Population ----

    #[test]
    fn test_one_default_per_registered_class() {
        let config = CatalogConfig::multi_objective();
        let registry = Registry::builtin(config.mode);
        let catalog = build(&config);
        for category in Category::ALL {
            let ids: Vec<&str> = catalog.records(category).iter().map(|r| r.id.as_str()).collect();
            let names: Vec<&str> = registry
                .classes(category)
                .iter()
                .map(|e| e.name.as_str())
                .collect();
            assert_eq!(ids, names, "{category}");
            assert!(catalog.records(category).iter().all(Record::is_default));
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        for config in [CatalogConfig::multi_objective(), CatalogConfig::single_objective()] {
            assert_eq!(build(&config), build(&config));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CatalogConfig::default().with_max_generations(0);
        let registry = Registry::builtin(config.mode);
        let err = CatalogBuilder::new(&registry, &config).build_all().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    // ---- Operator arguments ----

    #[test]
    fn test_nsga2_operator_references() {
        let catalog = build(&CatalogConfig::multi_objective());
        let get = |name| arg(&catalog, Category::Algorithm, "nsga2", name);
        assert_eq!(get("selection"), Some(ArgumentValue::operator("tournament")));
        assert_eq!(get("crossover"), Some(ArgumentValue::operator("sbx")));
        assert_eq!(get("mutation"), Some(ArgumentValue::operator("pm")));
        assert_eq!(get("sampling"), Some(ArgumentValue::operator("float_random")));
        assert_eq!(get("pop_size"), Some(ArgumentValue::literal(100)));
        assert_eq!(get("eliminate_duplicates"), None);
        assert_eq!(get("survival"), None);
    }

    #[test]
    fn test_missing_operator_default_takes_first_record() {
        let catalog = build(&CatalogConfig::multi_objective());
        let first_ref_dirs = catalog.records(Category::RefDirs)[0].id.clone();
        assert_eq!(first_ref_dirs, "das-dennis");
        assert_eq!(
            arg(&catalog, Category::Algorithm, "nsga3", "ref_dirs"),
            Some(ArgumentValue::operator("das-dennis"))
        );
        let first_decomposition = catalog.records(Category::Decomposition)[0].id.clone();
        assert_eq!(
            arg(&catalog, Category::Algorithm, "moead", "decomposition"),
            Some(ArgumentValue::operator(first_decomposition))
        );
    }

    #[test]
    fn test_selection_without_override_stays_unset() {
        let catalog = build(&CatalogConfig::multi_objective());
        assert_eq!(
            arg(&catalog, Category::Algorithm, "rvea", "selection"),
            Some(ArgumentValue::Unset)
        );
    }

    #[test]
    fn test_soo_ga_selection() {
        let catalog = build(&CatalogConfig::single_objective());
        assert_eq!(
            arg(&catalog, Category::Algorithm, "ga", "selection"),
            Some(ArgumentValue::operator("tournament"))
        );
        assert_eq!(
            arg(&catalog, Category::Algorithm, "de", "sampling"),
            Some(ArgumentValue::operator("lhs"))
        );
    }

    // ---- Overrides ----

    #[test]
    fn test_termination_caps() {
        let catalog = build(&CatalogConfig::single_objective());
        assert_eq!(
            arg(&catalog, Category::Termination, "n_eval", "n_max_evals"),
            Some(ArgumentValue::literal(1000))
        );
        assert_eq!(
            arg(&catalog, Category::Termination, "n_gen", "n_max_gen"),
            Some(ArgumentValue::literal(100))
        );
        assert_eq!(
            arg(&catalog, Category::Termination, "time", "max_time"),
            Some(ArgumentValue::Unset)
        );
    }

    #[test]
    fn test_ref_dirs_dependencies() {
        let catalog = build(&CatalogConfig::multi_objective());
        assert_eq!(
            arg(&catalog, Category::RefDirs, "das-dennis", "n_dim"),
            Some(ArgumentValue::Dependency(Expr::ObjCountTimes(1)))
        );
        assert_eq!(
            arg(&catalog, Category::RefDirs, "das-dennis", "n_partitions"),
            Some(ArgumentValue::literal(12))
        );
        assert_eq!(
            arg(&catalog, Category::RefDirs, "energy", "n_points"),
            Some(ArgumentValue::Dependency(Expr::ObjCountTimes(30)))
        );
        assert_eq!(
            arg(&catalog, Category::RefDirs, "layer-energy", "partitions"),
            Some(ArgumentValue::Dependency(Expr::ObjCountTimes(2)))
        );
    }

    #[test]
    fn test_indicator_front_dependency() {
        let catalog = build(&CatalogConfig::multi_objective());
        for id in ["gd", "igd", "igd+", "hv"] {
            assert_eq!(
                arg(&catalog, Category::PerformanceIndicator, id, "pf"),
                Some(ArgumentValue::Dependency(Expr::ProblemParetoFront)),
                "{id}"
            );
        }
    }

    #[test]
    fn test_dascmop_difficulty_only_where_declared() {
        let catalog = build(&CatalogConfig::multi_objective());
        for record in catalog
            .records(Category::Problem)
            .iter()
            .filter(|r| r.id.starts_with("dascmop"))
        {
            assert_eq!(record.arguments.get("difficulty"), Some(&ArgumentValue::literal(1)));
            assert!(!record.arguments.contains("difficulty_factors"));
        }
    }

    // ---- Failures ----

    #[test]
    fn test_reflection_error_propagates() {
        let mut registry = Registry::builtin(Mode::MultiObjective);
        registry.register_opaque(Category::Problem, "native");
        let config = CatalogConfig::multi_objective();
        let err = CatalogBuilder::new(&registry, &config)
            .build(Category::Problem)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Reflection { ref class_name, .. } if class_name == "native"));
    }

    #[test]
    fn test_unknown_operator_propagates() {
        let registry = Registry::new()
            .with_class(Category::Mutation, ClassSchema::new("pm").arg("eta", 20.0))
            .with_class(
                Category::Algorithm,
                ClassSchema::new("custom").arg("mutation", Instance::of("pm").with("eta", 3.0)),
            )
            .with_class(Category::Sampling, ClassSchema::new("lhs"));
        let config = CatalogConfig::multi_objective().with_match_policy(MatchPolicy::Structural);
        let err = CatalogBuilder::new(&registry, &config)
            .build(Category::Algorithm)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownOperator {
                category: Category::Mutation,
                class_name: "pm".into(),
            }
        );
    }

    #[test]
    fn test_non_null_literal_on_operator_argument_kept() {
        let registry = Registry::new()
            .with_class(Category::Mutation, ClassSchema::new("pm"))
            .with_class(
                Category::Algorithm,
                ClassSchema::new("custom").arg("mutation", "pm"),
            );
        let config = CatalogConfig::multi_objective();
        let records = CatalogBuilder::new(&registry, &config)
            .build(Category::Algorithm)
            .unwrap();
        assert_eq!(
            records[0].arguments.get("mutation"),
            Some(&ArgumentValue::Literal(Scalar::Str("pm".into())))
        );
    }
}
