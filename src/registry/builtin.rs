//! Classes registered by the optimization library.
//!
//! Operator, termination and indicator registries are shared by both modes;
//! problems and algorithms depend on the mode.

use super::types::{ClassSchema, Instance};
use super::Registry;
use crate::catalog::Scalar;
use crate::category::{Category, Mode};

pub(super) fn registry(mode: Mode) -> Registry {
    let mut registry = Registry::new();
    let groups = [
        (Category::Mutation, mutations()),
        (Category::Crossover, crossovers()),
        (Category::Selection, selections()),
        (Category::Sampling, samplings()),
        (Category::Decomposition, decompositions()),
        (Category::RefDirs, ref_dirs()),
        (Category::Termination, terminations()),
        (Category::PerformanceIndicator, indicators()),
    ];
    for (category, schemas) in groups {
        for schema in schemas {
            registry.register(category, schema);
        }
    }

    let (problems, algorithms) = match mode {
        Mode::MultiObjective => (moo_problems(), moo_algorithms()),
        Mode::SingleObjective => (soo_problems(), soo_algorithms()),
    };
    for schema in problems {
        registry.register(Category::Problem, schema);
    }
    for schema in algorithms {
        registry.register(Category::Algorithm, schema);
    }
    registry
}

// ---- Operators ----

fn mutations() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("pm")
            .arg("prob", 1.0)
            .arg("prob_var", Scalar::Null)
            .arg("eta", 20.0)
            .arg("at_least_once", false)
            .var_kwargs(),
        ClassSchema::new("bitflip")
            .arg("prob", 1.0)
            .arg("prob_var", Scalar::Null)
            .var_kwargs(),
        ClassSchema::new("inversion").arg("prob", 1.0),
        ClassSchema::new("gauss")
            .arg("sigma", 0.1)
            .arg("prob_var", Scalar::Null)
            .var_kwargs(),
    ]
}

fn crossovers() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("sbx")
            .arg("prob", 0.9)
            .arg("prob_var", 0.5)
            .arg("eta", 15.0)
            .arg("prob_exch", 1.0)
            .arg("prob_bin", 0.5)
            .arg("n_offsprings", 2)
            .var_kwargs(),
        ClassSchema::new("pntx").required("n_points").var_kwargs(),
        ClassSchema::new("ux").var_kwargs(),
        ClassSchema::new("hux").arg("prob_hux", 0.5).var_kwargs(),
        ClassSchema::new("exp").arg("prob_exp", 0.75).var_kwargs(),
        ClassSchema::new("ox").arg("shift", false).var_kwargs(),
        ClassSchema::new("erx").var_kwargs(),
    ]
}

fn selections() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("random").var_kwargs(),
        ClassSchema::new("tournament")
            .callable("func_comp", "binary_tournament")
            .arg("pressure", 2)
            .var_kwargs(),
    ]
}

fn samplings() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("float_random"),
        ClassSchema::new("int_random"),
        ClassSchema::new("bin_random"),
        ClassSchema::new("perm_random"),
        ClassSchema::new("lhs")
            .arg("smooth", true)
            .arg("iterations", 100)
            .arg("criterion", "maxmin"),
    ]
}

fn decompositions() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("pbi").arg("eps", 0.0).arg("theta", 5.0).var_kwargs(),
        ClassSchema::new("tchebi").arg("eps", 0.0).var_kwargs(),
        ClassSchema::new("weighted_sum").var_kwargs(),
        ClassSchema::new("asf").arg("eps", 0.0).var_kwargs(),
        ClassSchema::new("aasf")
            .arg("eps", 0.0)
            .arg("beta", 25.0)
            .var_kwargs(),
    ]
}

fn ref_dirs() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("das-dennis")
            .required("n_dim")
            .required("n_partitions")
            .var_kwargs(),
        ClassSchema::new("energy")
            .required("n_dim")
            .required("n_points")
            .arg("seed", Scalar::Null)
            .var_kwargs(),
        ClassSchema::new("reduction")
            .required("n_dim")
            .required("n_points")
            .arg("kmeans", true)
            .arg("seed", Scalar::Null)
            .var_kwargs(),
        ClassSchema::new("layer-energy")
            .required("n_dim")
            .required("partitions")
            .var_kwargs(),
    ]
}

// ---- Terminations and indicators ----

fn terminations() -> Vec<ClassSchema> {
    vec![
        ClassSchema::new("n_eval").required("n_max_evals"),
        ClassSchema::new("n_gen").required("n_max_gen"),
        ClassSchema::new("time").required("max_time"),
        ClassSchema::new("x_tol")
            .arg("tol", 1e-8)
            .arg("n_last", 20)
            .arg("n_max_gen", 1000)
            .arg("n_max_evals", Scalar::Null)
            .var_kwargs(),
        ClassSchema::new("f_tol")
            .arg("tol", 0.0025)
            .arg("n_last", 30)
            .arg("n_max_gen", 1000)
            .arg("n_max_evals", Scalar::Null)
            .var_kwargs(),
        ClassSchema::new("cv_tol")
            .arg("tol", 1e-8)
            .arg("n_last", 20)
            .var_kwargs(),
    ]
}

fn indicators() -> Vec<ClassSchema> {
    let distance = |name: &str| {
        ClassSchema::new(name)
            .required("pf")
            .arg("zero_to_one", false)
            .opaque("ideal", "None")
            .opaque("nadir", "None")
            .var_kwargs()
    };
    vec![
        distance("gd"),
        distance("gd+"),
        distance("igd"),
        distance("igd+"),
        ClassSchema::new("hv")
            .arg("ref_point", Scalar::Null)
            .arg("pf", Scalar::Null)
            .arg("nds", true)
            .arg("norm_ref_point", true)
            .var_kwargs(),
    ]
}

// ---- Multi-objective problems and algorithms ----

fn moo_problems() -> Vec<ClassSchema> {
    let mut problems = vec![
        ClassSchema::new("zdt1").arg("n_var", 30).var_kwargs().objectives(2),
        ClassSchema::new("zdt2").arg("n_var", 30).var_kwargs().objectives(2),
        ClassSchema::new("zdt3").arg("n_var", 30).var_kwargs().objectives(2),
        ClassSchema::new("zdt4").arg("n_var", 10).var_kwargs().objectives(2),
        ClassSchema::new("zdt5")
            .arg("m", 11)
            .arg("n", 5)
            .arg("normalize", true)
            .var_kwargs()
            .objectives(2),
        ClassSchema::new("zdt6").arg("n_var", 10).var_kwargs().objectives(2),
    ];

    for (name, n_var) in [
        ("dtlz1", 7),
        ("dtlz2", 10),
        ("dtlz3", 10),
        ("dtlz5", 10),
        ("dtlz6", 10),
        ("dtlz7", 10),
    ] {
        problems.push(
            ClassSchema::new(name)
                .arg("n_var", n_var)
                .arg("n_obj", 3)
                .var_kwargs(),
        );
    }
    problems.push(
        ClassSchema::new("dtlz4")
            .arg("n_var", 10)
            .arg("n_obj", 3)
            .arg("alpha", 100)
            .arg("d", 100)
            .var_kwargs(),
    );

    for i in 1..=9 {
        let n_obj = if i <= 6 { 2 } else { 3 };
        problems.push(
            ClassSchema::new(format!("dascmop{i}"))
                .required("difficulty")
                .arg("n_var", 30)
                .var_kwargs()
                .objectives(n_obj),
        );
    }
    problems
}

fn evolutionary(name: &str, crossover: Instance, mutation: Instance) -> ClassSchema {
    ClassSchema::new(name)
        .arg("pop_size", 100)
        .arg("sampling", Instance::of("float_random"))
        .arg("selection", Instance::of("tournament").with("pressure", 2))
        .arg("crossover", crossover)
        .arg("mutation", mutation)
}

fn moo_algorithms() -> Vec<ClassSchema> {
    let pm = || Instance::of("pm").with("eta", 20.0);
    let sbx_30 = || Instance::of("sbx").with("eta", 30.0).with("prob", 1.0);
    let reference_based = |name: &str| {
        ClassSchema::new(name)
            .required("ref_dirs")
            .arg("pop_size", Scalar::Null)
            .arg("sampling", Instance::of("float_random"))
            .arg("selection", Instance::of("tournament").with("pressure", 2))
            .arg("crossover", sbx_30())
            .arg("mutation", pm())
            .arg("eliminate_duplicates", true)
            .arg("n_offsprings", Scalar::Null)
            .var_kwargs()
    };

    vec![
        evolutionary(
            "nsga2",
            Instance::of("sbx").with("eta", 15.0).with("prob", 0.9),
            pm(),
        )
        .opaque("survival", "RankAndCrowding()")
        .arg("eliminate_duplicates", Instance::of("default_duplicate_elimination"))
        .arg("n_offsprings", Scalar::Null)
        .var_kwargs(),
        reference_based("nsga3"),
        reference_based("unsga3"),
        ClassSchema::new("moead")
            .required("ref_dirs")
            .arg("n_neighbors", 20)
            .arg("decomposition", Scalar::Null)
            .arg("prob_neighbor_mating", 0.9)
            .arg("sampling", Instance::of("float_random"))
            .arg("crossover", Instance::of("sbx").with("prob", 1.0).with("eta", 20.0))
            .arg("mutation", pm())
            .var_kwargs(),
        ClassSchema::new("ctaea")
            .required("ref_dirs")
            .arg("sampling", Instance::of("float_random"))
            .arg("selection", Instance::of("restricted_mating"))
            .arg("crossover", Instance::of("sbx").with("n_offsprings", 1))
            .arg("mutation", Instance::of("pm"))
            .arg("eliminate_duplicates", true)
            .var_kwargs(),
        evolutionary("smsemoa", Instance::of("sbx"), Instance::of("pm"))
            .opaque("survival", "LeastHypervolumeContributionSurvival()")
            .arg("eliminate_duplicates", true)
            .arg("normalize", true)
            .var_kwargs(),
        evolutionary(
            "agemoea",
            Instance::of("sbx").with("prob", 0.9).with("eta", 15.0),
            pm(),
        )
        .arg("eliminate_duplicates", true)
        .arg("n_offsprings", Scalar::Null)
        .var_kwargs(),
        ClassSchema::new("rvea")
            .required("ref_dirs")
            .arg("alpha", 2.0)
            .arg("adapt_freq", 0.1)
            .arg("pop_size", Scalar::Null)
            .arg("sampling", Instance::of("float_random"))
            .arg("selection", Instance::of("random"))
            .arg("crossover", sbx_30())
            .arg("mutation", pm())
            .var_kwargs(),
    ]
}

// ---- Single-objective problems and algorithms ----

fn soo_problems() -> Vec<ClassSchema> {
    let with_n_var = |name: &str, n_var: i64| {
        ClassSchema::new(name)
            .arg("n_var", n_var)
            .var_kwargs()
            .objectives(1)
    };
    vec![
        ClassSchema::new("ackley")
            .arg("n_var", 2)
            .arg("a", 20.0)
            .arg("b", 0.2)
            .arg("c", std::f64::consts::TAU)
            .var_kwargs()
            .objectives(1),
        ClassSchema::new("rastrigin")
            .arg("n_var", 2)
            .arg("A", 10.0)
            .var_kwargs()
            .objectives(1),
        with_n_var("sphere", 10),
        with_n_var("rosenbrock", 2),
        with_n_var("griewank", 2),
        with_n_var("zakharov", 2),
        with_n_var("schwefel", 2),
        ClassSchema::new("himmelblau").var_kwargs().objectives(1),
        ClassSchema::new("g1").var_kwargs().objectives(1),
    ]
}

fn soo_algorithms() -> Vec<ClassSchema> {
    vec![
        evolutionary(
            "ga",
            Instance::of("sbx"),
            Instance::of("pm"),
        )
        .opaque("survival", "FitnessSurvival()")
        .arg("eliminate_duplicates", true)
        .arg("n_offsprings", Scalar::Null)
        .var_kwargs(),
        ClassSchema::new("de")
            .arg("pop_size", 100)
            .arg("n_offsprings", Scalar::Null)
            .arg("sampling", Instance::of("lhs"))
            .arg("variant", "DE/rand/1/bin")
            .arg("CR", 0.5)
            .arg("F", Scalar::Null)
            .arg("dither", "vector")
            .arg("jitter", false)
            .var_kwargs(),
        ClassSchema::new("brkga")
            .arg("n_elites", 200)
            .arg("n_offsprings", 700)
            .arg("n_mutants", 100)
            .arg("bias", 0.7)
            .arg("sampling", Instance::of("float_random"))
            .arg("eliminate_duplicates", Instance::of("no_duplicate_elimination"))
            .var_kwargs(),
        ClassSchema::new("nelder-mead")
            .arg("x0", Scalar::Null)
            .callable("func_params", "adaptive_params")
            .arg("adaptive", true)
            .var_kwargs(),
        ClassSchema::new("pattern-search")
            .arg("x0", Scalar::Null)
            .arg("init_delta", 0.25)
            .arg("init_rho", 0.5)
            .arg("step_size", 1.0)
            .var_kwargs(),
        ClassSchema::new("pso")
            .arg("pop_size", 25)
            .arg("sampling", Instance::of("lhs"))
            .arg("w", 0.9)
            .arg("c1", 2.0)
            .arg("c2", 2.0)
            .arg("adaptive", true)
            .arg("max_velocity_rate", 0.2)
            .var_kwargs(),
        ClassSchema::new("cmaes")
            .arg("x0", Scalar::Null)
            .arg("sigma", 0.1)
            .arg("normalize", true)
            .arg("restarts", 0)
            .var_kwargs(),
        ClassSchema::new("es")
            .arg("n_offsprings", 200)
            .arg("pop_size", Scalar::Null)
            .arg("rule", 1.0 / 7.0)
            .arg("phi", 1.0)
            .arg("gamma", 0.85)
            .arg("sampling", Instance::of("float_random"))
            .var_kwargs(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_has_schema() {
        for mode in [Mode::MultiObjective, Mode::SingleObjective] {
            let registry = registry(mode);
            for category in Category::ALL {
                assert!(
                    !registry.classes(category).is_empty(),
                    "{category} empty in {mode:?}"
                );
                for entry in registry.classes(category) {
                    assert!(entry.schema.is_some(), "{} lacks schema", entry.name);
                }
            }
        }
    }

    #[test]
    fn test_mode_specific_registries() {
        let moo = registry(Mode::MultiObjective);
        let soo = registry(Mode::SingleObjective);
        assert!(moo.contains(Category::Algorithm, "nsga2"));
        assert!(!soo.contains(Category::Algorithm, "nsga2"));
        assert!(soo.contains(Category::Algorithm, "ga"));
        assert!(soo.contains(Category::Problem, "ackley"));
        assert_eq!(
            moo.classes(Category::Mutation),
            soo.classes(Category::Mutation)
        );
    }

    #[test]
    fn test_first_registered_operators() {
        let registry = registry(Mode::MultiObjective);
        assert_eq!(registry.first(Category::Mutation), Some("pm"));
        assert_eq!(registry.first(Category::Crossover), Some("sbx"));
        assert_eq!(registry.first(Category::Sampling), Some("float_random"));
        assert_eq!(registry.first(Category::Decomposition), Some("pbi"));
        assert_eq!(registry.first(Category::RefDirs), Some("das-dennis"));
    }

    #[test]
    fn test_dascmop_family_objectives() {
        let registry = registry(Mode::MultiObjective);
        let n_obj = |name: &str| registry.schema(Category::Problem, name).and_then(|s| s.objectives);
        assert_eq!(n_obj("dascmop1"), Some(2));
        assert_eq!(n_obj("dascmop9"), Some(3));
        assert_eq!(n_obj("dtlz2"), None);
    }
}
