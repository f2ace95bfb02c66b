use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;

/// A typed runtime option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Str(String),
    Int(i32),
    Long(i64),
    Bool(bool),
    Float(f32),
    Double(f64),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(i64::from(*v)),
            ConfigValue::Long(v) => Some(*v),
            ConfigValue::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Type-directed stringification used in `ConfigurationChanged` events.
impl fmt::Display for ConfigValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ConfigValue::Str(v) => f.write_str(v),
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Long(v) => write!(f, "{v}"),
            ConfigValue::Bool(v) => write!(f, "{v}"),
            // Debug keeps the fractional part, so 1.0 never reads as an Int
            ConfigValue::Float(v) => write!(f, "{v:?}"),
            ConfigValue::Double(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}
impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}
impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(v)
    }
}
impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Long(v)
    }
}
impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}
impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(v)
    }
}
impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Double(v)
    }
}

/// Named runtime options. Writes merge; existing names are only overwritten.
#[derive(Debug, Default)]
pub struct ConfigStore {
    options: RwLock<BTreeMap<String, ConfigValue>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `incoming` and returns one `(name, stringified value)` per
    /// incoming entry, in input order.
    pub fn merge(
        &self,
        incoming: &IndexMap<String, ConfigValue>,
    ) -> Vec<(String, String)> {
        let mut options = self.options.write();
        incoming
            .iter()
            .map(|(name, value)| {
                options.insert(name.clone(), value.clone());
                (name.clone(), value.to_string())
            })
            .collect()
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<ConfigValue> {
        self.options.read().get(name).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, ConfigValue> {
        self.options.read().clone()
    }

    pub fn len(&self) -> usize {
        self.options.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.read().is_empty()
    }
}
