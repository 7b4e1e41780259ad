//! Persisted catalog form.
//!
//! A catalog is stored as a JSON object with a mode flag and one
//! `id → {class_name, arguments}` map per category:
//!
//! ```json
//! {
//!   "multi_objective": true,
//!   "categories": {
//!     "mutation": {
//!       "pm": { "class_name": "pm", "arguments": { "eta": { "literal": 20.0 } } }
//!     }
//!   }
//! }
//! ```
//!
//! Map order is the catalog's enumeration order and survives a round trip.

use super::store::Catalog;
use super::types::{ArgumentValue, Arguments, Record};
use crate::category::{Category, Mode};
use crate::error::{ConfigError, ConfigResult};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use tracing::debug;

/// A JSON object whose key order is kept and whose keys are unique.
#[derive(Debug, Clone, PartialEq)]
struct OrderedMap<V>(Vec<(String, V)>);

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with unique keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(de::Error::custom(format!("duplicate key '{key}'")));
            }
            entries.push((key, value));
        }
        Ok(OrderedMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordDocument {
    class_name: String,
    arguments: OrderedMap<ArgumentValue>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    multi_objective: bool,
    categories: OrderedMap<OrderedMap<RecordDocument>>,
}

impl From<&Catalog> for CatalogDocument {
    fn from(catalog: &Catalog) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| {
                let records = catalog
                    .records(*category)
                    .iter()
                    .map(|record| {
                        let arguments = record
                            .arguments
                            .iter()
                            .map(|(name, value)| (name.to_string(), value.clone()))
                            .collect();
                        (
                            record.id.clone(),
                            RecordDocument {
                                class_name: record.class_name.clone(),
                                arguments: OrderedMap(arguments),
                            },
                        )
                    })
                    .collect();
                (category.name().to_string(), OrderedMap(records))
            })
            .collect();
        Self {
            multi_objective: catalog.mode().is_multi_objective(),
            categories: OrderedMap(categories),
        }
    }
}

impl CatalogDocument {
    fn into_catalog(self) -> ConfigResult<Catalog> {
        let mode = if self.multi_objective {
            Mode::MultiObjective
        } else {
            Mode::SingleObjective
        };

        let mut seen = Vec::with_capacity(Category::ALL.len());
        let mut catalog = Catalog::new(mode);
        for (key, records) in self.categories.0 {
            let category = Category::from_str(&key).map_err(ConfigError::Persistence)?;
            seen.push(category);
            for (id, doc) in records.0 {
                let record = Record {
                    id,
                    class_name: doc.class_name,
                    arguments: doc.arguments.0.into_iter().collect::<Arguments>(),
                };
                check_dependencies(category, &record)?;
                catalog.push_record(category, record)?;
            }
        }

        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|c| !seen.contains(c))
            .map(|c| c.name())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Persistence(format!(
                "missing categories: {}",
                missing.join(", ")
            )));
        }
        Ok(catalog)
    }
}

fn check_dependencies(category: Category, record: &Record) -> ConfigResult<()> {
    for (name, value) in record.arguments.iter() {
        if let ArgumentValue::Dependency(expr) = value {
            if !category.accepts_dependency(name) {
                return Err(ConfigError::MisplacedDependency {
                    category,
                    id: record.id.clone(),
                    argument: name.to_string(),
                    expression: expr.to_string(),
                });
            }
        }
    }
    Ok(())
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CatalogDocument::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = CatalogDocument::deserialize(deserializer)?;
        document.into_catalog().map_err(de::Error::custom)
    }
}

impl Catalog {
    /// Serializes the catalog to its persisted JSON form.
    ///
    /// ```
    /// use u_moo_config::catalog::{Catalog, CatalogConfig};
    ///
    /// let catalog = Catalog::builtin(&CatalogConfig::single_objective()).unwrap();
    /// let json = catalog.to_json().unwrap();
    /// assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    /// ```
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Persistence(e.to_string()))
    }

    /// Restores a catalog from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Persistence`] for malformed JSON, an unknown or
    /// missing category key, or a duplicated id within a category;
    /// [`ConfigError::MisplacedDependency`] for a dependency expression on
    /// an argument that is never expanded.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| ConfigError::Persistence(e.to_string()))?;
        let catalog = document.into_catalog()?;
        debug!(records = catalog.len(), "catalog restored");
        Ok(catalog)
    }
}
