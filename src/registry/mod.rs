//! Class registries and constructor reflection.
//!
//! The optimization library exposes, per [`Category`], an ordered list of
//! registered classes. [`Registry`] is that list plus the static
//! [`ClassSchema`] of each class; [`Reflector`] turns a schema into the
//! editable default-argument table of a class.
//!
//! # Key Types
//!
//! - [`Registry`]: registered classes per category, in declaration order
//! - [`ClassSchema`]: declared constructor signature
//! - [`Reflector`]: schema → classified argument defaults

mod builtin;
mod reflect;
mod types;

pub use reflect::{Reflected, Reflector, LOOK_ALIKE_CLASSES};
pub use types::{ClassSchema, DeclaredDefault, Instance, ParamKind, ParamSchema};

use crate::category::{Category, Mode};
use std::collections::HashMap;

/// One registered class.
///
/// `schema` is `None` for classes whose constructor cannot be reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub name: String,
    pub schema: Option<ClassSchema>,
}

/// Registered classes per category.
///
/// # Examples
///
/// ```
/// use u_moo_config::category::{Category, Mode};
/// use u_moo_config::registry::{ClassSchema, Registry};
///
/// let registry = Registry::new()
///     .with_class(Category::Mutation, ClassSchema::new("pm").arg("eta", 20.0))
///     .with_class(Category::Mutation, ClassSchema::new("bitflip"));
/// assert_eq!(registry.first(Category::Mutation), Some("pm"));
///
/// let builtin = Registry::builtin(Mode::MultiObjective);
/// assert!(builtin.schema(Category::Algorithm, "nsga2").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    classes: HashMap<Category, Vec<RegistryEntry>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The classes the optimization library registers for `mode`.
    pub fn builtin(mode: Mode) -> Self {
        builtin::registry(mode)
    }

    /// Registers a class with its schema.
    ///
    /// Re-registering a name replaces the previous schema in place.
    pub fn register(&mut self, category: Category, schema: ClassSchema) {
        let entry = RegistryEntry {
            name: schema.name.clone(),
            schema: Some(schema),
        };
        self.insert(category, entry);
    }

    /// Registers a class whose constructor cannot be reflected.
    pub fn register_opaque(&mut self, category: Category, name: impl Into<String>) {
        let entry = RegistryEntry {
            name: name.into(),
            schema: None,
        };
        self.insert(category, entry);
    }

    fn insert(&mut self, category: Category, entry: RegistryEntry) {
        let entries = self.classes.entry(category).or_default();
        match entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_class(mut self, category: Category, schema: ClassSchema) -> Self {
        self.register(category, schema);
        self
    }

    /// Registered classes of `category`, in registration order.
    pub fn classes(&self, category: Category) -> &[RegistryEntry] {
        self.classes
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first registered class name of `category`.
    pub fn first(&self, category: Category) -> Option<&str> {
        self.classes(category).first().map(|e| e.name.as_str())
    }

    /// Whether `name` is registered in `category`.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.classes(category).iter().any(|e| e.name == name)
    }

    /// The schema of a registered class, if it has one.
    pub fn schema(&self, category: Category, name: &str) -> Option<&ClassSchema> {
        self.classes(category)
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.schema.as_ref())
    }

    /// The operator category a class is registered in.
    ///
    /// Operator categories are searched in [`Category::ALL`] order.
    pub fn operator_category_of(&self, class_name: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| c.is_operator())
            .find(|c| self.contains(*c, class_name))
    }

    /// Total number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
