//! Record and argument value types.
//!
//! An argument slot holds an [`ArgumentValue`]: a literal scalar, a
//! reference to another record, an explicit "no value yet" marker, or a
//! deferred [`Expr`] resolved once a problem is chosen.

use crate::error::{ConfigError, ConfigResult};
use std::fmt;
use std::str::FromStr;

/// Text form of [`ArgumentValue::Unset`].
pub const NO_DEFAULT: &str = "NO_DEFAULT";

/// Text form of [`Expr::ProblemParetoFront`].
pub const FROM_PROBLEM: &str = "get from problem";

const OBJ_COUNT_PREFIX: &str = "n_obj*";

/// A primitive argument value.
///
/// Only these types are editable; constructor defaults of any other type
/// are left to the class itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl Scalar {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of `Int` and `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(true) => f.write_str("True"),
            Scalar::Bool(false) => f.write_str("False"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v:?}"),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Null => f.write_str("None"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

/// A deferred computation resolved against the chosen problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Expr {
    /// `n_obj*K`: the problem's objective count times `K`.
    ObjCountTimes(i64),
    /// `get from problem`: the problem's Pareto front.
    ProblemParetoFront,
}

impl Expr {
    /// Recognizes dependency-expression text.
    ///
    /// Returns `None` when `text` is not shaped like an expression at all,
    /// and `Some(Err(..))` when it is but the factor is malformed.
    ///
    /// ```
    /// use u_moo_config::catalog::Expr;
    ///
    /// assert_eq!(Expr::detect("n_obj*2"), Some(Ok(Expr::ObjCountTimes(2))));
    /// assert_eq!(Expr::detect("get from problem"), Some(Ok(Expr::ProblemParetoFront)));
    /// assert!(matches!(Expr::detect("n_obj*x"), Some(Err(_))));
    /// assert_eq!(Expr::detect("das-dennis"), None);
    /// ```
    pub fn detect(text: &str) -> Option<ConfigResult<Expr>> {
        let trimmed = text.trim();
        if trimmed == FROM_PROBLEM {
            return Some(Ok(Expr::ProblemParetoFront));
        }
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let factor = compact.strip_prefix(OBJ_COUNT_PREFIX)?;
        Some(
            factor
                .parse::<i64>()
                .map(Expr::ObjCountTimes)
                .map_err(|e| ConfigError::InvalidDependencyExpression {
                    expression: text.to_string(),
                    reason: e.to_string(),
                }),
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::ObjCountTimes(k) => write!(f, "{OBJ_COUNT_PREFIX}{k}"),
            Expr::ProblemParetoFront => f.write_str(FROM_PROBLEM),
        }
    }
}

impl FromStr for Expr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expr::detect(s).unwrap_or_else(|| {
            Err(ConfigError::InvalidDependencyExpression {
                expression: s.to_string(),
                reason: format!("expected '{OBJ_COUNT_PREFIX}K' or '{FROM_PROBLEM}'"),
            })
        })
    }
}

impl TryFrom<String> for Expr {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Expr> for String {
    fn from(expr: Expr) -> Self {
        expr.to_string()
    }
}

/// The value held by one argument slot of a record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArgumentValue {
    /// A primitive value passed to the constructor as is.
    Literal(Scalar),
    /// The id of a record in the category the argument refers to.
    OperatorRef(String),
    /// No value yet; the record cannot be materialized until one is given.
    Unset,
    /// Resolved against the chosen problem at materialization time.
    Dependency(Expr),
}

impl ArgumentValue {
    pub fn literal(value: impl Into<Scalar>) -> Self {
        ArgumentValue::Literal(value.into())
    }

    pub fn operator(id: impl Into<String>) -> Self {
        ArgumentValue::OperatorRef(id.into())
    }

    /// Whether the slot still lacks a value.
    pub fn is_unset(&self) -> bool {
        matches!(self, ArgumentValue::Unset)
    }

    /// The literal scalar, if any.
    pub fn as_literal(&self) -> Option<&Scalar> {
        match self {
            ArgumentValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// The referenced record id, if any.
    pub fn as_operator(&self) -> Option<&str> {
        match self {
            ArgumentValue::OperatorRef(id) => Some(id),
            _ => None,
        }
    }

    /// Parses edited text into a value.
    ///
    /// Grammar, first match wins: `NO_DEFAULT` is unset, `None` is null,
    /// `True`/`False` are booleans, then integers, floats, dependency
    /// expressions, and finally plain strings. Infinite and NaN floats are
    /// refused. Operator references are not produced here since they depend
    /// on the argument being edited.
    ///
    /// ```
    /// use u_moo_config::catalog::{ArgumentValue, Expr, Scalar};
    ///
    /// assert_eq!(ArgumentValue::parse_text("50").unwrap(), ArgumentValue::literal(50));
    /// assert_eq!(ArgumentValue::parse_text("None").unwrap(), ArgumentValue::Literal(Scalar::Null));
    /// assert_eq!(
    ///     ArgumentValue::parse_text("n_obj*3").unwrap(),
    ///     ArgumentValue::Dependency(Expr::ObjCountTimes(3))
    /// );
    /// assert!(ArgumentValue::parse_text("n_obj*k").is_err());
    /// ```
    pub fn parse_text(text: &str) -> ConfigResult<Self> {
        let trimmed = text.trim();
        let value = match trimmed {
            NO_DEFAULT => ArgumentValue::Unset,
            "None" => ArgumentValue::Literal(Scalar::Null),
            "True" | "true" => ArgumentValue::literal(true),
            "False" | "false" => ArgumentValue::literal(false),
            _ => {
                if let Ok(v) = trimmed.parse::<i64>() {
                    ArgumentValue::literal(v)
                } else if let Ok(v) = trimmed.parse::<f64>() {
                    if !v.is_finite() {
                        return Err(ConfigError::NonFiniteValue {
                            value: trimmed.to_string(),
                        });
                    }
                    ArgumentValue::literal(v)
                } else if let Some(expr) = Expr::detect(trimmed) {
                    ArgumentValue::Dependency(expr?)
                } else {
                    ArgumentValue::literal(text)
                }
            }
        };
        Ok(value)
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Literal(s) => write!(f, "{s}"),
            ArgumentValue::OperatorRef(id) => f.write_str(id),
            ArgumentValue::Unset => f.write_str(NO_DEFAULT),
            ArgumentValue::Dependency(expr) => write!(f, "{expr}"),
        }
    }
}

impl From<Scalar> for ArgumentValue {
    fn from(value: Scalar) -> Self {
        ArgumentValue::Literal(value)
    }
}

impl From<Expr> for ArgumentValue {
    fn from(value: Expr) -> Self {
        ArgumentValue::Dependency(value)
    }
}

/// Ordered argument table of a record.
///
/// Keeps constructor declaration order; new names are appended.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    entries: Vec<(String, ArgumentValue)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an argument by name.
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replaces the value of `name`, or appends it when absent.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: ArgumentValue) -> Option<ArgumentValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ArgumentValue> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterates `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// First argument whose value is still unset.
    pub fn first_unset(&self) -> Option<&str> {
        self.iter().find(|(_, v)| v.is_unset()).map(|(n, _)| n)
    }
}

impl<N: Into<String>> FromIterator<(N, ArgumentValue)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (N, ArgumentValue)>>(iter: T) -> Self {
        let mut args = Arguments::new();
        for (name, value) in iter {
            args.set(name, value);
        }
        args
    }
}

/// A named configuration unit: a class plus its argument table.
///
/// A record is a *default* when its id equals its class name; every other
/// record is a user-created *variant*.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique id within the category.
    pub id: String,
    /// Registered name of the constructible class.
    pub class_name: String,
    /// Constructor arguments.
    pub arguments: Arguments,
}

impl Record {
    /// Creates the default record of a class.
    pub fn default_of(class_name: impl Into<String>, arguments: Arguments) -> Self {
        let class_name = class_name.into();
        Self {
            id: class_name.clone(),
            class_name,
            arguments,
        }
    }

    /// Whether this is the default record of its class.
    pub fn is_default(&self) -> bool {
        self.id == self.class_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Text grammar ----

    #[test]
    fn test_parse_text_scalars() {
        assert_eq!(ArgumentValue::parse_text("NO_DEFAULT").unwrap(), ArgumentValue::Unset);
        assert_eq!(
            ArgumentValue::parse_text("True").unwrap(),
            ArgumentValue::literal(true)
        );
        assert_eq!(
            ArgumentValue::parse_text("false").unwrap(),
            ArgumentValue::literal(false)
        );
        assert_eq!(
            ArgumentValue::parse_text(" 12 ").unwrap(),
            ArgumentValue::literal(12)
        );
        assert_eq!(
            ArgumentValue::parse_text("0.9").unwrap(),
            ArgumentValue::literal(0.9)
        );
        assert_eq!(
            ArgumentValue::parse_text("DE/rand/1/bin").unwrap(),
            ArgumentValue::literal("DE/rand/1/bin")
        );
    }

    #[test]
    fn test_parse_text_dependencies() {
        assert_eq!(
            ArgumentValue::parse_text("n_obj * 2").unwrap(),
            ArgumentValue::Dependency(Expr::ObjCountTimes(2))
        );
        assert_eq!(
            ArgumentValue::parse_text("get from problem").unwrap(),
            ArgumentValue::Dependency(Expr::ProblemParetoFront)
        );
        assert!(matches!(
            ArgumentValue::parse_text("n_obj*x"),
            Err(ConfigError::InvalidDependencyExpression { .. })
        ));
        assert_eq!(
            ArgumentValue::parse_text("n_obj*0").unwrap(),
            ArgumentValue::Dependency(Expr::ObjCountTimes(0))
        );
        assert_eq!(
            ArgumentValue::parse_text("n_obj*-1").unwrap(),
            ArgumentValue::Dependency(Expr::ObjCountTimes(-1))
        );
    }

    #[test]
    fn test_parse_text_rejects_non_finite_floats() {
        for text in ["inf", "-inf", "NaN", "infinity"] {
            assert!(
                matches!(
                    ArgumentValue::parse_text(text),
                    Err(ConfigError::NonFiniteValue { .. })
                ),
                "{text}"
            );
        }
        assert_eq!(ArgumentValue::parse_text("1e3").unwrap(), ArgumentValue::literal(1000.0));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        let values = [
            ArgumentValue::Unset,
            ArgumentValue::Literal(Scalar::Null),
            ArgumentValue::literal(true),
            ArgumentValue::literal(7),
            ArgumentValue::literal(1.0),
            ArgumentValue::literal("vector"),
            ArgumentValue::Dependency(Expr::ObjCountTimes(4)),
            ArgumentValue::Dependency(Expr::ProblemParetoFront),
        ];
        for value in values {
            let text = value.to_string();
            assert_eq!(ArgumentValue::parse_text(&text).unwrap(), value, "{text}");
        }
    }

    #[test]
    fn test_expr_from_str_rejects_plain_text() {
        assert!("sbx".parse::<Expr>().is_err());
        assert_eq!("n_obj*5".parse::<Expr>().unwrap(), Expr::ObjCountTimes(5));
    }

    // ---- Arguments ----

    #[test]
    fn test_arguments_keep_order() {
        let mut args: Arguments = vec![
            ("pop_size", ArgumentValue::literal(100)),
            ("mutation", ArgumentValue::operator("pm")),
        ]
        .into_iter()
        .collect();
        args.set("eliminate_duplicates", ArgumentValue::literal(true));
        args.set("pop_size", ArgumentValue::literal(50));

        let names: Vec<&str> = args.names().collect();
        assert_eq!(names, vec!["pop_size", "mutation", "eliminate_duplicates"]);
        assert_eq!(args.get("pop_size"), Some(&ArgumentValue::literal(50)));
    }

    #[test]
    fn test_arguments_first_unset() {
        let mut args = Arguments::new();
        args.set("n_var", ArgumentValue::literal(30));
        args.set("difficulty", ArgumentValue::Unset);
        assert_eq!(args.first_unset(), Some("difficulty"));
        args.remove("difficulty");
        assert_eq!(args.first_unset(), None);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_record_default_classification() {
        let record = Record::default_of("nsga2", Arguments::new());
        assert!(record.is_default());
        let variant = Record {
            id: "nsga2_variant".into(),
            ..record
        };
        assert!(!variant.is_default());
    }
}
