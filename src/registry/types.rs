//! Static constructor schemas.
//!
//! A [`ClassSchema`] is the declared signature of a constructible class:
//! its parameters in declaration order, each with a [`ParamKind`] and a
//! [`DeclaredDefault`]. Schemas are plain data handed over by the host
//! library; nothing here inspects live objects.

use crate::catalog::Scalar;

/// How a constructor parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// The implicit receiver (`self`).
    Receiver,
    /// A regular named parameter.
    Positional,
    /// Catch-all positional collector (`*args`).
    VarPositional,
    /// Catch-all keyword collector (`**kwargs`).
    VarKeyword,
}

/// A live object used as a constructor default.
///
/// Only its class and the scalar arguments it was built with are recorded;
/// that is all operator matching needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Registered class name.
    pub class_name: String,
    /// Scalar constructor arguments it was built with.
    pub args: Vec<(String, Scalar)>,
}

impl Instance {
    /// An instance built with the class defaults.
    pub fn of(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            args: Vec::new(),
        }
    }

    /// Adds an explicit constructor argument.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }
}

/// The default a parameter declares.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredDefault {
    /// No default; the argument must be supplied.
    Required,
    /// A primitive default.
    Scalar(Scalar),
    /// A constructed object.
    Instance(Instance),
    /// A function object.
    Callable(String),
    /// Any other non-primitive value.
    Opaque(String),
}

macro_rules! declared_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DeclaredDefault {
                fn from(value: $ty) -> Self {
                    DeclaredDefault::Scalar(value.into())
                }
            }
        )*
    };
}

declared_scalar!(bool, i32, i64, f64, &str, Scalar);

impl From<Instance> for DeclaredDefault {
    fn from(value: Instance) -> Self {
        DeclaredDefault::Instance(value)
    }
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSchema {
    pub name: String,
    pub kind: ParamKind,
    pub default: DeclaredDefault,
}

/// Declared constructor signature of a class.
///
/// # Examples
///
/// ```
/// use u_moo_config::registry::{ClassSchema, Instance};
///
/// let schema = ClassSchema::new("nsga2")
///     .arg("pop_size", 100)
///     .arg("mutation", Instance::of("pm").with("eta", 20.0))
///     .var_kwargs();
///
/// assert_eq!(schema.named_params().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSchema {
    /// Registered class name.
    pub name: String,
    /// Parameters in declaration order, receiver first.
    pub params: Vec<ParamSchema>,
    /// Number of objectives, for problem classes that fix it.
    pub objectives: Option<usize>,
}

impl ClassSchema {
    /// Starts a schema with the implicit receiver parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![ParamSchema {
                name: "self".into(),
                kind: ParamKind::Receiver,
                default: DeclaredDefault::Required,
            }],
            objectives: None,
        }
    }

    fn push(mut self, name: impl Into<String>, kind: ParamKind, default: DeclaredDefault) -> Self {
        self.params.push(ParamSchema {
            name: name.into(),
            kind,
            default,
        });
        self
    }

    /// Adds a parameter with a default.
    pub fn arg(self, name: impl Into<String>, default: impl Into<DeclaredDefault>) -> Self {
        self.push(name, ParamKind::Positional, default.into())
    }

    /// Adds a parameter without a default.
    pub fn required(self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::Positional, DeclaredDefault::Required)
    }

    /// Adds a parameter defaulting to a function object.
    pub fn callable(self, name: impl Into<String>, function: impl Into<String>) -> Self {
        self.push(name, ParamKind::Positional, DeclaredDefault::Callable(function.into()))
    }

    /// Adds a parameter defaulting to a non-primitive value.
    pub fn opaque(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.push(name, ParamKind::Positional, DeclaredDefault::Opaque(description.into()))
    }

    /// Adds a `*args` collector.
    pub fn var_args(self) -> Self {
        self.push("args", ParamKind::VarPositional, DeclaredDefault::Required)
    }

    /// Adds a `**kwargs` collector.
    pub fn var_kwargs(self) -> Self {
        self.push("kwargs", ParamKind::VarKeyword, DeclaredDefault::Required)
    }

    /// Fixes the objective count of a problem class.
    pub fn objectives(mut self, n_obj: usize) -> Self {
        self.objectives = Some(n_obj);
        self
    }

    /// Named parameters, without receiver and collectors.
    pub fn named_params(&self) -> impl Iterator<Item = &ParamSchema> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
    }

    /// Looks up a named parameter.
    pub fn param(&self, name: &str) -> Option<&ParamSchema> {
        self.named_params().find(|p| p.name == name)
    }

    /// Scalar defaults overlaid with the explicit arguments of `instance`.
    ///
    /// This is the argument tuple a live instance of this class was
    /// effectively constructed with.
    pub fn effective_args(&self, instance: &Instance) -> Vec<(String, Scalar)> {
        let mut args: Vec<(String, Scalar)> = self
            .named_params()
            .filter_map(|p| match &p.default {
                DeclaredDefault::Scalar(s) => Some((p.name.clone(), s.clone())),
                _ => None,
            })
            .collect();
        for (name, value) in &instance.args {
            match args.iter_mut().find(|(n, _)| n == name) {
                Some((_, slot)) => *slot = value.clone(),
                None => args.push((name.clone(), value.clone())),
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_and_collectors_excluded() {
        let schema = ClassSchema::new("zdt1")
            .arg("n_var", 30)
            .var_args()
            .var_kwargs();
        assert_eq!(schema.params.len(), 4);
        let named: Vec<&str> = schema.named_params().map(|p| p.name.as_str()).collect();
        assert_eq!(named, vec!["n_var"]);
    }

    #[test]
    fn test_effective_args_overlay() {
        let schema = ClassSchema::new("sbx")
            .arg("prob", 0.9)
            .arg("eta", 15.0)
            .callable("repair", "identity");
        let instance = Instance::of("sbx").with("eta", 30.0).with("n_offsprings", 1);

        let args = schema.effective_args(&instance);
        assert_eq!(
            args,
            vec![
                ("prob".to_string(), Scalar::Float(0.9)),
                ("eta".to_string(), Scalar::Float(30.0)),
                ("n_offsprings".to_string(), Scalar::Int(1)),
            ]
        );
    }

    #[test]
    fn test_objectives_hint() {
        let schema = ClassSchema::new("dtlz2").arg("n_obj", 3).objectives(3);
        assert_eq!(schema.objectives, Some(3));
        assert!(schema.param("n_obj").is_some());
        assert!(schema.param("self").is_none());
    }
}
