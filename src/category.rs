//! Component categories and catalog modes.
//!
//! Every record in a catalog belongs to exactly one [`Category`]. The set is
//! closed: the optimization library exposes one registry per category and a
//! catalog always carries all of them, in the order of [`Category::ALL`].

use std::fmt;
use std::str::FromStr;

/// A component kind that can be configured and materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Mutation,
    Crossover,
    Selection,
    Sampling,
    Decomposition,
    RefDirs,
    Problem,
    Termination,
    PerformanceIndicator,
    Algorithm,
}

/// Operator-reference arguments of an algorithm, mapped to the category
/// the referenced record lives in.
const ALGORITHM_OPERATORS: &[(&str, Category)] = &[
    ("sampling", Category::Sampling),
    ("selection", Category::Selection),
    ("crossover", Category::Crossover),
    ("mutation", Category::Mutation),
    ("decomposition", Category::Decomposition),
    ("ref_dirs", Category::RefDirs),
];

const REF_DIRS_DEPENDENCIES: &[&str] = &["n_dim", "n_points", "partitions"];
const INDICATOR_DEPENDENCIES: &[&str] = &["pf"];

impl Category {
    /// All categories, operator categories first.
    ///
    /// Catalogs are populated in this order so that operator records exist
    /// before the algorithms referring to them.
    pub const ALL: [Category; 10] = [
        Category::Mutation,
        Category::Crossover,
        Category::Selection,
        Category::Sampling,
        Category::Decomposition,
        Category::RefDirs,
        Category::Problem,
        Category::Termination,
        Category::PerformanceIndicator,
        Category::Algorithm,
    ];

    /// Stable snake-case name, used in persisted catalogs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Category::Mutation => "mutation",
            Category::Crossover => "crossover",
            Category::Selection => "selection",
            Category::Sampling => "sampling",
            Category::Decomposition => "decomposition",
            Category::RefDirs => "ref_dirs",
            Category::Problem => "problem",
            Category::Termination => "termination",
            Category::PerformanceIndicator => "performance_indicator",
            Category::Algorithm => "algorithm",
        }
    }

    /// Whether records of this category can be referenced by an
    /// operator-reference argument.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Category::Mutation
                | Category::Crossover
                | Category::Selection
                | Category::Sampling
                | Category::Decomposition
                | Category::RefDirs
        )
    }

    /// Operator-reference arguments declared by this category.
    ///
    /// Only algorithms compose other records; every other category returns
    /// an empty slice.
    pub fn operator_arguments(self) -> &'static [(&'static str, Category)] {
        match self {
            Category::Algorithm => ALGORITHM_OPERATORS,
            _ => &[],
        }
    }

    /// The category referenced by `argument`, if it is an operator-reference
    /// argument of this category.
    pub fn operator_target(self, argument: &str) -> Option<Category> {
        self.operator_arguments()
            .iter()
            .find(|(name, _)| *name == argument)
            .map(|(_, target)| *target)
    }

    /// Arguments on which dependency expressions are resolved.
    pub fn dependency_arguments(self) -> &'static [&'static str] {
        match self {
            Category::RefDirs => REF_DIRS_DEPENDENCIES,
            Category::PerformanceIndicator => INDICATOR_DEPENDENCIES,
            _ => &[],
        }
    }

    /// Whether a dependency expression is allowed on `argument`.
    pub fn accepts_dependency(self, argument: &str) -> bool {
        self.dependency_arguments().contains(&argument)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.name() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Objective mode of a configuration session.
///
/// The mode is fixed when a catalog is built: it selects the problem,
/// algorithm and indicator registries and the mode-specific overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Single-objective optimization.
    SingleObjective,
    /// Multi-objective optimization.
    #[default]
    MultiObjective,
}

impl Mode {
    /// Returns `true` for [`Mode::MultiObjective`].
    pub fn is_multi_objective(self) -> bool {
        self == Mode::MultiObjective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories_unique_names() {
        let mut names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Category::ALL.len());
    }

    #[test]
    fn test_operators_precede_composites() {
        let first_composite = Category::ALL
            .iter()
            .position(|c| !c.is_operator())
            .unwrap();
        assert!(Category::ALL[first_composite..]
            .iter()
            .all(|c| !c.is_operator()));
    }

    #[test]
    fn test_name_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>(), Ok(category));
        }
        assert!("operators".parse::<Category>().is_err());
    }

    #[test]
    fn test_operator_targets() {
        assert_eq!(
            Category::Algorithm.operator_target("mutation"),
            Some(Category::Mutation)
        );
        assert_eq!(
            Category::Algorithm.operator_target("ref_dirs"),
            Some(Category::RefDirs)
        );
        assert_eq!(Category::Algorithm.operator_target("pop_size"), None);
        assert_eq!(Category::Problem.operator_target("mutation"), None);
        assert!(Category::Algorithm
            .operator_arguments()
            .iter()
            .all(|(_, target)| target.is_operator()));
    }

    #[test]
    fn test_dependency_arguments() {
        assert!(Category::RefDirs.accepts_dependency("n_dim"));
        assert!(Category::RefDirs.accepts_dependency("partitions"));
        assert!(!Category::RefDirs.accepts_dependency("n_partitions"));
        assert!(Category::PerformanceIndicator.accepts_dependency("pf"));
        assert!(!Category::Algorithm.accepts_dependency("pf"));
    }

    #[test]
    fn test_default_mode() {
        assert!(Mode::default().is_multi_objective());
        assert!(!Mode::SingleObjective.is_multi_objective());
    }
}
