//! Manual default overrides.
//!
//! Applied to default records after reflection. An override only replaces
//! an argument the class declares; it never adds one.

use super::config::CatalogConfig;
use super::types::{ArgumentValue, Expr};
use crate::category::{Category, Mode};

/// Which records of a category an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// Exactly this record id.
    Id(&'static str),
    /// Every record id starting with this prefix.
    Prefix(&'static str),
    /// Every record of the category.
    Any,
}

impl Target {
    fn matches(self, id: &str) -> bool {
        match self {
            Target::Id(target) => target == id,
            Target::Prefix(prefix) => id.starts_with(prefix),
            Target::Any => true,
        }
    }
}

/// One `(category, id, argument) → value` rule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Override {
    /// Restricts the rule to one mode; `None` applies to both.
    pub mode: Option<Mode>,
    pub category: Category,
    pub target: Target,
    pub argument: &'static str,
    pub value: ArgumentValue,
}

impl Override {
    fn new(
        mode: Option<Mode>,
        category: Category,
        target: Target,
        argument: &'static str,
        value: ArgumentValue,
    ) -> Self {
        Self {
            mode,
            category,
            target,
            argument,
            value,
        }
    }

    /// Whether the rule applies to record `id` of `category` in `mode`.
    pub fn applies(&self, mode: Mode, category: Category, id: &str) -> bool {
        self.mode.map_or(true, |m| m == mode) && self.category == category && self.target.matches(id)
    }
}

const MOO_TOURNAMENT_ALGORITHMS: &[&str] = &["nsga2", "nsga3", "unsga3", "smsemoa", "agemoea"];
const SOO_TOURNAMENT_ALGORITHMS: &[&str] = &["ga"];

/// The override table for `config`.
pub(crate) fn overrides(config: &CatalogConfig) -> Vec<Override> {
    let moo = Some(Mode::MultiObjective);
    let soo = Some(Mode::SingleObjective);
    let obj_count = |k| ArgumentValue::Dependency(Expr::ObjCountTimes(k));
    // validate() guarantees the caps fit
    let int = |n: u64| ArgumentValue::literal(i64::try_from(n).unwrap_or(i64::MAX));

    let mut table = Vec::new();

    for id in MOO_TOURNAMENT_ALGORITHMS {
        table.push(Override::new(
            moo,
            Category::Algorithm,
            Target::Id(*id),
            "selection",
            ArgumentValue::operator("tournament"),
        ));
    }
    for id in SOO_TOURNAMENT_ALGORITHMS {
        table.push(Override::new(
            soo,
            Category::Algorithm,
            Target::Id(*id),
            "selection",
            ArgumentValue::operator("tournament"),
        ));
    }

    table.extend([
        Override::new(
            None,
            Category::Termination,
            Target::Id("n_eval"),
            "n_max_evals",
            int(config.max_evaluations),
        ),
        Override::new(
            None,
            Category::Termination,
            Target::Id("n_gen"),
            "n_max_gen",
            int(config.max_generations),
        ),
        Override::new(None, Category::RefDirs, Target::Any, "n_dim", obj_count(1)),
        Override::new(
            None,
            Category::RefDirs,
            Target::Id("das-dennis"),
            "n_partitions",
            int(config.ref_dirs_partitions),
        ),
        Override::new(None, Category::RefDirs, Target::Any, "n_points", obj_count(30)),
        Override::new(None, Category::RefDirs, Target::Any, "partitions", obj_count(2)),
        Override::new(
            None,
            Category::PerformanceIndicator,
            Target::Any,
            "pf",
            ArgumentValue::Dependency(Expr::ProblemParetoFront),
        ),
        Override::new(
            moo,
            Category::Problem,
            Target::Prefix("dascmop"),
            "difficulty",
            ArgumentValue::literal(1),
        ),
        Override::new(
            moo,
            Category::Problem,
            Target::Prefix("dascmop"),
            "difficulty_factors",
            ArgumentValue::literal(1),
        ),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_matching() {
        assert!(Target::Id("n_eval").matches("n_eval"));
        assert!(!Target::Id("n_eval").matches("n_gen"));
        assert!(Target::Prefix("dascmop").matches("dascmop7"));
        assert!(!Target::Prefix("dascmop").matches("dtlz1"));
        assert!(Target::Any.matches("anything"));
    }

    #[test]
    fn test_mode_restricted_rules() {
        let table = overrides(&CatalogConfig::default());
        let difficulty = table
            .iter()
            .find(|o| o.argument == "difficulty")
            .unwrap();
        assert!(difficulty.applies(Mode::MultiObjective, Category::Problem, "dascmop3"));
        assert!(!difficulty.applies(Mode::SingleObjective, Category::Problem, "dascmop3"));
        assert!(!difficulty.applies(Mode::MultiObjective, Category::Algorithm, "dascmop3"));
    }

    #[test]
    fn test_caps_follow_config() {
        let config = CatalogConfig::default()
            .with_max_evaluations(2500)
            .with_max_generations(40);
        let table = overrides(&config);
        let value_of = |arg: &str| {
            table
                .iter()
                .find(|o| o.argument == arg && o.category == Category::Termination)
                .map(|o| o.value.clone())
        };
        assert_eq!(value_of("n_max_evals"), Some(ArgumentValue::literal(2500)));
        assert_eq!(value_of("n_max_gen"), Some(ArgumentValue::literal(40)));
    }

    #[test]
    fn test_selection_rules_per_mode() {
        let table = overrides(&CatalogConfig::default());
        let selects = |mode, id| {
            table
                .iter()
                .any(|o| o.argument == "selection" && o.applies(mode, Category::Algorithm, id))
        };
        assert!(selects(Mode::MultiObjective, "nsga2"));
        assert!(!selects(Mode::SingleObjective, "nsga2"));
        assert!(selects(Mode::SingleObjective, "ga"));
        assert!(!selects(Mode::MultiObjective, "rvea"));
    }
}
