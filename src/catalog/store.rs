//! The variant store: all records of a session, per category.
//!
//! [`Catalog`] owns every mutation of the configuration database so the
//! record invariants hold at all times:
//!
//! - ids are unique within a category;
//! - a record is a default iff its id equals its class name, and defaults
//!   are never edited, renamed or removed;
//! - variants never take an id equal to their class name.

use super::builder::CatalogBuilder;
use super::config::CatalogConfig;
use super::resolver::{MatchPolicy, OperatorResolver};
use super::types::{ArgumentValue, Arguments, Record, Scalar};
use crate::category::{Category, Mode};
use crate::error::{ConfigError, ConfigResult};
use crate::registry::{Instance, Registry};
use std::collections::BTreeMap;
use tracing::debug;

/// One row of [`Catalog::list_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub id: String,
    pub is_default: bool,
    pub class_name: String,
}

/// Records of every category, in insertion order.
///
/// # Examples
///
/// ```
/// use u_moo_config::catalog::{ArgumentValue, Catalog, CatalogConfig};
/// use u_moo_config::category::Category;
///
/// let mut catalog = Catalog::builtin(&CatalogConfig::default()).unwrap();
/// let variant = catalog
///     .create_variant(
///         Category::Algorithm,
///         "nsga2",
///         [("pop_size", ArgumentValue::literal(50))],
///         None,
///     )
///     .unwrap();
/// assert_eq!(variant.id, "nsga2_variant");
/// assert_eq!(variant.class_name, "nsga2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    mode: Mode,
    records: BTreeMap<Category, Vec<Record>>,
}

impl Catalog {
    /// An empty catalog holding every category.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            records: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// Builds the default catalog of the library's built-in registry.
    pub fn builtin(config: &CatalogConfig) -> ConfigResult<Self> {
        let registry = Registry::builtin(config.mode);
        CatalogBuilder::new(&registry, config).build_all()
    }

    /// The session mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Records of `category` in order.
    pub fn records(&self, category: Category) -> &[Record] {
        self.records
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Whether no category holds a record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(id, is_default, class_name)` of every record of `category`.
    pub fn list_records(&self, category: Category) -> Vec<RecordSummary> {
        self.records(category)
            .iter()
            .map(|r| RecordSummary {
                id: r.id.clone(),
                is_default: r.is_default(),
                class_name: r.class_name.clone(),
            })
            .collect()
    }

    /// Whether `id` exists in `category`.
    pub fn contains(&self, category: Category, id: &str) -> bool {
        self.records(category).iter().any(|r| r.id == id)
    }

    /// Looks up a record.
    pub fn get(&self, category: Category, id: &str) -> ConfigResult<&Record> {
        self.records(category)
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(category, id))
    }

    /// The argument table of a record.
    pub fn arguments(&self, category: Category, id: &str) -> ConfigResult<&Arguments> {
        self.get(category, id).map(|r| &r.arguments)
    }

    /// Derives a variant from a default or variant record.
    ///
    /// The source's class and arguments are cloned and `overrides` applied
    /// on top. The id is `id` when given, `"<class>_variant"` otherwise; on
    /// collision `" (1)"`, `" (2)"`, ... is appended until unique. The
    /// source record is left untouched.
    ///
    /// # Errors
    ///
    /// [`ConfigError::RecordNotFound`] for an unknown source, and the
    /// argument validation errors of [`set_argument`](Self::set_argument).
    pub fn create_variant<I, N>(
        &mut self,
        category: Category,
        source_id: &str,
        overrides: I,
        id: Option<&str>,
    ) -> ConfigResult<&Record>
    where
        I: IntoIterator<Item = (N, ArgumentValue)>,
        N: Into<String>,
    {
        let source = self.get(category, source_id)?;
        let class_name = source.class_name.clone();
        let mut arguments = source.arguments.clone();

        let base = id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{class_name}_variant"));
        let new_id = self.unique_id(category, &base);

        for (name, value) in overrides {
            let name = name.into();
            self.check_value(category, &new_id, &name, &value)?;
            arguments.set(name, value);
        }

        debug!(category = %category, source = source_id, id = %new_id, "created variant");
        let records = self.records.entry(category).or_default();
        records.push(Record {
            id: new_id,
            class_name,
            arguments,
        });
        let index = records.len() - 1;
        Ok(&records[index])
    }

    /// Removes a variant record.
    ///
    /// Records referring to it keep their reference; materializing them
    /// reports a [`ConfigError::DanglingReference`].
    pub fn remove(&mut self, category: Category, id: &str) -> ConfigResult<Record> {
        let index = self.variant_index(category, id, "removed")?;
        let records = self.records.entry(category).or_default();
        let removed = records.remove(index);
        debug!(category = %category, id, "removed variant");
        Ok(removed)
    }

    /// Renames a variant record.
    ///
    /// Operator references to the old id in other categories follow the
    /// rename.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateId`] when `new_id` is taken (which includes
    /// the id of every default record).
    pub fn rename(&mut self, category: Category, old_id: &str, new_id: &str) -> ConfigResult<()> {
        let index = self.variant_index(category, old_id, "renamed")?;
        if old_id == new_id {
            return Ok(());
        }
        if new_id.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(format!(
                "{category}: record id must not be empty"
            )));
        }
        if self.contains(category, new_id) {
            return Err(ConfigError::DuplicateId {
                category,
                id: new_id.to_string(),
            });
        }

        if let Some(records) = self.records.get_mut(&category) {
            records[index].id = new_id.to_string();
        }
        for (owner, records) in self.records.iter_mut() {
            for (argument, target) in owner.operator_arguments() {
                if *target != category {
                    continue;
                }
                for record in records.iter_mut() {
                    if record.arguments.get(argument).and_then(ArgumentValue::as_operator)
                        == Some(old_id)
                    {
                        record
                            .arguments
                            .set(*argument, ArgumentValue::operator(new_id));
                    }
                }
            }
        }
        debug!(category = %category, old_id, new_id, "renamed variant");
        Ok(())
    }

    /// Replaces one argument of a variant record.
    ///
    /// Returns the previous value, `None` when the argument is new.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DefaultRecord`] when `id` is a default record
    /// - [`ConfigError::DanglingReference`] when an operator argument names
    ///   a record missing from its category
    /// - [`ConfigError::MisplacedDependency`] when a dependency expression
    ///   is put on an argument that is never expanded
    /// - [`ConfigError::NonFiniteValue`] for an infinite or NaN float
    pub fn set_argument(
        &mut self,
        category: Category,
        id: &str,
        name: &str,
        value: ArgumentValue,
    ) -> ConfigResult<Option<ArgumentValue>> {
        let index = self.variant_index(category, id, "edited")?;
        self.check_value(category, id, name, &value)?;
        let records = self.records.entry(category).or_default();
        Ok(records[index].arguments.set(name, value))
    }

    /// Replaces one argument of a variant record from edited text.
    ///
    /// Operator arguments take the text as a record id (or `NO_DEFAULT`);
    /// every other argument goes through
    /// [`ArgumentValue::parse_text`].
    pub fn set_argument_text(
        &mut self,
        category: Category,
        id: &str,
        name: &str,
        text: &str,
    ) -> ConfigResult<Option<ArgumentValue>> {
        let value = match category.operator_target(name) {
            Some(_) if text.trim() == super::types::NO_DEFAULT => ArgumentValue::Unset,
            Some(_) => ArgumentValue::operator(text.trim()),
            None => ArgumentValue::parse_text(text)?,
        };
        self.set_argument(category, id, name, value)
    }

    /// Finds the record (default or variant) that reproduces `instance`.
    ///
    /// Matching is structural: class and resolved argument tuple must both
    /// agree.
    pub fn identify(
        &self,
        registry: &Registry,
        category: Category,
        instance: &Instance,
    ) -> ConfigResult<String> {
        OperatorResolver::new(registry, MatchPolicy::Structural)
            .with_catalog(self)
            .resolve(category, Some(instance))
    }

    pub(crate) fn push_default(&mut self, category: Category, record: Record) {
        self.records.entry(category).or_default().push(record);
    }

    pub(crate) fn push_record(&mut self, category: Category, record: Record) -> ConfigResult<()> {
        if self.contains(category, &record.id) {
            return Err(ConfigError::DuplicateId {
                category,
                id: record.id,
            });
        }
        self.records.entry(category).or_default().push(record);
        Ok(())
    }

    fn unique_id(&self, category: Category, base: &str) -> String {
        if !self.contains(category, base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base} ({i})"))
            .find(|candidate| !self.contains(category, candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn variant_index(&self, category: Category, id: &str, action: &'static str) -> ConfigResult<usize> {
        let index = self
            .records(category)
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found(category, id))?;
        if self.records(category)[index].is_default() {
            return Err(ConfigError::DefaultRecord {
                category,
                id: id.to_string(),
                action,
            });
        }
        Ok(index)
    }

    fn check_value(
        &self,
        category: Category,
        id: &str,
        name: &str,
        value: &ArgumentValue,
    ) -> ConfigResult<()> {
        match value {
            ArgumentValue::OperatorRef(target) => match category.operator_target(name) {
                Some(target_category) if !self.contains(target_category, target) => {
                    Err(ConfigError::DanglingReference {
                        category,
                        id: id.to_string(),
                        argument: name.to_string(),
                        target_category,
                        target: target.clone(),
                    })
                }
                _ => Ok(()),
            },
            ArgumentValue::Literal(Scalar::Float(v)) if !v.is_finite() => {
                Err(ConfigError::NonFiniteValue { value: v.to_string() })
            }
            ArgumentValue::Dependency(expr) if !category.accepts_dependency(name) => {
                Err(ConfigError::MisplacedDependency {
                    category,
                    id: id.to_string(),
                    argument: name.to_string(),
                    expression: expr.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

fn not_found(category: Category, id: &str) -> ConfigError {
    ConfigError::RecordNotFound {
        category,
        id: id.to_string(),
    }
}
