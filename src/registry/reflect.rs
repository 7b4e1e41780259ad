//! Default-argument reflection over static schemas.

use super::types::{DeclaredDefault, Instance, ParamKind};
use super::Registry;
use crate::catalog::Scalar;
use crate::category::Category;
use crate::error::{ConfigError, ConfigResult};
use tracing::debug;

/// Classes registered alongside operators that are not selectable operators.
///
/// A default instance of one of these is treated like any other
/// non-primitive default and dropped.
pub const LOOK_ALIKE_CLASSES: &[&str] = &[
    "no_repair",
    "no_duplicate_elimination",
    "default_duplicate_elimination",
    "rank_and_crowding",
];

/// Classified default of one constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Reflected {
    /// No declared default.
    Unset,
    /// A primitive default.
    Literal(Scalar),
    /// A default operator instance, not yet matched to a record.
    Operator { category: Category, instance: Instance },
}

/// Derives editable default-argument tables from class schemas.
pub struct Reflector<'a> {
    registry: &'a Registry,
}

impl<'a> Reflector<'a> {
    /// Creates a reflector over `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Returns the classified defaults of `class_name` in declaration order.
    ///
    /// The receiver and `*args`/`**kwargs` collectors are skipped. Defaults
    /// that are neither primitive nor an operator instance are dropped: the
    /// class keeps its own default for them.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Reflection`] when the class is unknown or registered
    /// without a schema.
    pub fn reflect(
        &self,
        category: Category,
        class_name: &str,
    ) -> ConfigResult<Vec<(String, Reflected)>> {
        let schema = self.registry.schema(category, class_name).ok_or_else(|| {
            let reason = if self.registry.contains(category, class_name) {
                "constructor signature is not introspectable"
            } else {
                "class is not registered"
            };
            ConfigError::Reflection {
                category,
                class_name: class_name.to_string(),
                reason: reason.to_string(),
            }
        })?;

        let mut table = Vec::new();
        for param in &schema.params {
            if param.kind != ParamKind::Positional {
                continue;
            }
            let reflected = match &param.default {
                DeclaredDefault::Required => Some(Reflected::Unset),
                DeclaredDefault::Scalar(value) => Some(Reflected::Literal(value.clone())),
                DeclaredDefault::Instance(instance) => self.classify_instance(instance),
                DeclaredDefault::Callable(_) | DeclaredDefault::Opaque(_) => None,
            };
            match reflected {
                Some(r) => table.push((param.name.clone(), r)),
                None => debug!(
                    category = %category,
                    class = class_name,
                    argument = %param.name,
                    "dropping non-primitive default"
                ),
            }
        }
        Ok(table)
    }

    fn classify_instance(&self, instance: &Instance) -> Option<Reflected> {
        if LOOK_ALIKE_CLASSES.contains(&instance.class_name.as_str()) {
            return None;
        }
        self.registry
            .operator_category_of(&instance.class_name)
            .map(|category| Reflected::Operator {
                category,
                instance: instance.clone(),
            })
    }
}
