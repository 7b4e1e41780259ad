//! Operator-reference resolution.
//!
//! Maps a declared default operator instance to the id of the catalog
//! record that reproduces it.

use super::store::Catalog;
use super::types::{ArgumentValue, Scalar};
use crate::category::Category;
use crate::error::{ConfigError, ConfigResult};
use crate::registry::{Instance, Registry};

/// How an operator instance is matched against candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The candidate's class equals the instance's class.
    #[default]
    ClassIdentity,
    /// Same class and the same resolved argument tuple.
    Structural,
}

/// A candidate record reduced to what matching compares.
struct Candidate<'c> {
    id: &'c str,
    class_name: &'c str,
    args: Vec<(String, Scalar)>,
}

/// Cross-category lookup from operator instances to record ids.
///
/// Without a catalog, candidates are the default records implied by the
/// registry; with one, every record of the category (defaults and variants,
/// in catalog order) is a candidate.
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{MatchPolicy, OperatorResolver};
/// use u_moo_config::category::{Category, Mode};
/// use u_moo_config::registry::{Instance, Registry};
///
/// let registry = Registry::builtin(Mode::MultiObjective);
/// let resolver = OperatorResolver::new(&registry, MatchPolicy::ClassIdentity);
///
/// let sbx = Instance::of("sbx").with("eta", 30.0);
/// assert_eq!(resolver.resolve(Category::Crossover, Some(&sbx)).unwrap(), "sbx");
/// assert_eq!(resolver.resolve(Category::Mutation, None).unwrap(), "pm");
/// ```
pub struct OperatorResolver<'a> {
    registry: &'a Registry,
    catalog: Option<&'a Catalog>,
    policy: MatchPolicy,
}

impl<'a> OperatorResolver<'a> {
    /// Creates a resolver over the registry's default records.
    pub fn new(registry: &'a Registry, policy: MatchPolicy) -> Self {
        Self {
            registry,
            catalog: None,
            policy,
        }
    }

    /// Uses the records of `catalog` as candidates.
    pub fn with_catalog(mut self, catalog: &'a Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// The active match policy.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Resolves a declared default to a record id of `category`.
    ///
    /// `None` (no default, or a null default) resolves to the first class
    /// registered for the category.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownOperator`] when no candidate matches, or when
    /// the category has no registered class at all.
    pub fn resolve(&self, category: Category, declared: Option<&Instance>) -> ConfigResult<String> {
        let Some(instance) = declared else {
            return self
                .registry
                .first(category)
                .map(str::to_string)
                .ok_or_else(|| ConfigError::UnknownOperator {
                    category,
                    class_name: "None".to_string(),
                });
        };

        let target = match self.policy {
            MatchPolicy::ClassIdentity => Vec::new(),
            MatchPolicy::Structural => self
                .registry
                .schema(category, &instance.class_name)
                .map(|schema| schema.effective_args(instance))
                .unwrap_or_else(|| instance.args.clone()),
        };

        self.candidates(category)
            .into_iter()
            .find(|c| {
                c.class_name == instance.class_name
                    && (self.policy == MatchPolicy::ClassIdentity
                        || same_arguments(&c.args, &target))
            })
            .map(|c| c.id.to_string())
            .ok_or_else(|| ConfigError::UnknownOperator {
                category,
                class_name: instance.class_name.clone(),
            })
    }

    fn candidates(&self, category: Category) -> Vec<Candidate<'_>> {
        match self.catalog {
            Some(catalog) => catalog
                .records(category)
                .iter()
                .map(|record| Candidate {
                    id: &record.id,
                    class_name: &record.class_name,
                    args: record
                        .arguments
                        .iter()
                        .filter_map(|(name, value)| match value {
                            ArgumentValue::Literal(s) => Some((name.to_string(), s.clone())),
                            _ => None,
                        })
                        .collect(),
                })
                .collect(),
            None => self
                .registry
                .classes(category)
                .iter()
                .map(|entry| Candidate {
                    id: &entry.name,
                    class_name: &entry.name,
                    args: entry
                        .schema
                        .as_ref()
                        .map(|s| s.effective_args(&Instance::of(entry.name.as_str())))
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Order-insensitive equality of two argument tuples.
fn same_arguments(a: &[(String, Scalar)], b: &[(String, Scalar)]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(name, value)| b.iter().any(|(n, v)| n == name && v == value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Mode;
    use crate::registry::ClassSchema;

    fn registry() -> Registry {
        Registry::new()
            .with_class(
                Category::Crossover,
                ClassSchema::new("sbx").arg("prob", 0.9).arg("eta", 15.0),
            )
            .with_class(Category::Crossover, ClassSchema::new("ux"))
    }

    // ---- Fallback ----

    #[test]
    fn test_none_resolves_to_first_registered() {
        for mode in [Mode::MultiObjective, Mode::SingleObjective] {
            let registry = Registry::builtin(mode);
            let resolver = OperatorResolver::new(&registry, MatchPolicy::ClassIdentity);
            for category in Category::ALL.iter().copied().filter(|c| c.is_operator()) {
                assert_eq!(
                    resolver.resolve(category, None).unwrap(),
                    registry.first(category).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_empty_category_fails() {
        let registry = Registry::new();
        let resolver = OperatorResolver::new(&registry, MatchPolicy::ClassIdentity);
        assert!(matches!(
            resolver.resolve(Category::Mutation, None),
            Err(ConfigError::UnknownOperator { .. })
        ));
    }

    // ---- Class identity ----

    #[test]
    fn test_class_identity_ignores_arguments() {
        let registry = registry();
        let resolver = OperatorResolver::new(&registry, MatchPolicy::ClassIdentity);
        let instance = Instance::of("sbx").with("eta", 30.0);
        assert_eq!(resolver.resolve(Category::Crossover, Some(&instance)).unwrap(), "sbx");
        let ux = Instance::of("ux");
        assert_eq!(resolver.resolve(Category::Crossover, Some(&ux)).unwrap(), "ux");
    }

    #[test]
    fn test_unknown_class_fails() {
        let registry = registry();
        let resolver = OperatorResolver::new(&registry, MatchPolicy::ClassIdentity);
        let err = resolver
            .resolve(Category::Crossover, Some(&Instance::of("erx")))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownOperator {
                category: Category::Crossover,
                class_name: "erx".into(),
            }
        );
    }

    // ---- Structural ----

    #[test]
    fn test_structural_requires_equal_arguments() {
        let registry = registry();
        let resolver = OperatorResolver::new(&registry, MatchPolicy::Structural);

        let same = Instance::of("sbx").with("eta", 15.0);
        assert_eq!(resolver.resolve(Category::Crossover, Some(&same)).unwrap(), "sbx");

        let different = Instance::of("sbx").with("eta", 30.0);
        assert!(resolver
            .resolve(Category::Crossover, Some(&different))
            .is_err());
    }

    #[test]
    fn test_argument_order_irrelevant() {
        let a = vec![
            ("eta".to_string(), Scalar::Float(15.0)),
            ("prob".to_string(), Scalar::Float(0.9)),
        ];
        let b = vec![
            ("prob".to_string(), Scalar::Float(0.9)),
            ("eta".to_string(), Scalar::Float(15.0)),
        ];
        assert!(same_arguments(&a, &b));
        assert!(!same_arguments(&a, &b[..1]));
    }
}
