//! Error taxonomy.
//!
//! Every variant carries the category, record id and argument it concerns
//! where those exist, so callers can surface them verbatim.

use crate::category::Category;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building, editing or materializing a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A class has no introspectable constructor schema.
    #[error("{category}: cannot reflect class '{class_name}': {reason}")]
    Reflection {
        category: Category,
        class_name: String,
        reason: String,
    },

    /// A declared default operator instance matches no catalog record.
    #[error("{category}: no record matches operator instance of class '{class_name}'")]
    UnknownOperator {
        category: Category,
        class_name: String,
    },

    /// Record id lookup miss.
    #[error("{category}: record '{id}' not found")]
    RecordNotFound { category: Category, id: String },

    /// A rename target id is already taken.
    #[error("{category}: record id '{id}' already exists")]
    DuplicateId { category: Category, id: String },

    /// A malformed `n_obj*K` expression.
    #[error("invalid dependency expression '{expression}': {reason}")]
    InvalidDependencyExpression { expression: String, reason: String },

    /// A dependency expression placed on an argument that is never expanded.
    #[error("{category}/{id}: argument '{argument}' does not accept dependency expression '{expression}'")]
    MisplacedDependency {
        category: Category,
        id: String,
        argument: String,
        expression: String,
    },

    /// Materialization attempted while a required argument is still unset.
    #[error("{category}/{id}: argument '{argument}' has no value")]
    UnresolvedArgument {
        category: Category,
        id: String,
        argument: String,
    },

    /// An operator-reference argument names a record that does not exist.
    #[error("{category}/{id}: argument '{argument}' refers to missing {target_category} record '{target}'")]
    DanglingReference {
        category: Category,
        id: String,
        argument: String,
        target_category: Category,
        target: String,
    },

    /// A default record was asked to change.
    #[error("{category}: '{id}' is a default record and cannot be {action}")]
    DefaultRecord {
        category: Category,
        id: String,
        action: &'static str,
    },

    /// The external factory refused to construct an object.
    #[error("{category}/{id}: constructing '{class_name}' failed{}: {reason}", .argument.as_ref().map(|a| format!(" at argument '{a}'")).unwrap_or_default())]
    Construction {
        category: Category,
        id: String,
        class_name: String,
        argument: Option<String>,
        reason: String,
    },

    /// An infinite or NaN float given as an argument value.
    #[error("non-finite number '{value}' cannot be stored as an argument value")]
    NonFiniteValue { value: String },

    /// A persisted catalog could not be restored.
    #[error("persisted catalog rejected: {0}")]
    Persistence(String),

    /// A configuration struct failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConfigError {
    /// The category the error concerns, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            ConfigError::Reflection { category, .. }
            | ConfigError::UnknownOperator { category, .. }
            | ConfigError::RecordNotFound { category, .. }
            | ConfigError::DuplicateId { category, .. }
            | ConfigError::MisplacedDependency { category, .. }
            | ConfigError::UnresolvedArgument { category, .. }
            | ConfigError::DanglingReference { category, .. }
            | ConfigError::DefaultRecord { category, .. }
            | ConfigError::Construction { category, .. } => Some(*category),
            ConfigError::InvalidDependencyExpression { .. }
            | ConfigError::NonFiniteValue { .. }
            | ConfigError::Persistence(_)
            | ConfigError::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ConfigError::UnresolvedArgument {
            category: Category::Problem,
            id: "dascmop1".into(),
            argument: "difficulty".into(),
        };
        assert_eq!(
            err.to_string(),
            "problem/dascmop1: argument 'difficulty' has no value"
        );
        assert_eq!(err.category(), Some(Category::Problem));
    }

    #[test]
    fn test_construction_message_with_and_without_argument() {
        let with = ConfigError::Construction {
            category: Category::Mutation,
            id: "pm".into(),
            class_name: "pm".into(),
            argument: Some("eta".into()),
            reason: "must be positive".into(),
        };
        assert_eq!(
            with.to_string(),
            "mutation/pm: constructing 'pm' failed at argument 'eta': must be positive"
        );

        let without = ConfigError::Construction {
            category: Category::Mutation,
            id: "pm".into(),
            class_name: "pm".into(),
            argument: None,
            reason: "boom".into(),
        };
        assert_eq!(without.to_string(), "mutation/pm: constructing 'pm' failed: boom");
    }

    #[test]
    fn test_category_absent_for_expression_errors() {
        let err = ConfigError::InvalidDependencyExpression {
            expression: "n_obj*x".into(),
            reason: "bad factor".into(),
        };
        assert_eq!(err.category(), None);
    }
}
