use serde::Deserialize;
use serde::Serialize;

use crate::utils::now_millis;
use crate::Result;
use crate::ServiceError;

/// Declared interpretation of a record's `value`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeTag {
    #[default]
    String = 0,
    Integer = 1,
    Float = 2,
    Boolean = 3,
}

impl TypeTag {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for TypeTag {
    type Error = ServiceError;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(TypeTag::String),
            1 => Ok(TypeTag::Integer),
            2 => Ok(TypeTag::Float),
            3 => Ok(TypeTag::Boolean),
            other => Err(ServiceError::invalid(format!("unknown record type tag {other}"))),
        }
    }
}

/// A structured datum identified by an integer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i32,
    pub name: String,
    pub value: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
}

/// Field order of the wire form: id, name, value, timestamp, type tag.
type WireRecord = (i32, String, String, i64, i32);

impl Record {
    pub fn new(
        id: i32,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            value: String::new(),
            timestamp: now_millis(),
            type_tag: TypeTag::String,
        }
    }

    pub fn with_value(
        mut self,
        value: impl Into<String>,
        type_tag: TypeTag,
    ) -> Self {
        self.value = value.into();
        self.type_tag = type_tag;
        self
    }

    /// Encodes the record in its fixed field order.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let wire: (i32, &str, &str, i64, i32) = (
            self.id,
            &self.name,
            &self.value,
            self.timestamp,
            self.type_tag.code(),
        );
        Ok(bincode::serialize(&wire)?)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        let (id, name, value, timestamp, tag): WireRecord = bincode::deserialize(bytes)?;
        Ok(Self {
            id,
            name,
            value,
            timestamp,
            type_tag: TypeTag::try_from(tag)?,
        })
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value.trim() {
            v if v.eq_ignore_ascii_case("true") => Some(true),
            v if v.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Whether `value` parses as the declared type tag.
    pub fn is_well_typed(&self) -> bool {
        match self.type_tag {
            TypeTag::String => true,
            TypeTag::Integer => self.as_i64().is_some(),
            TypeTag::Float => self.as_f64().is_some(),
            TypeTag::Boolean => self.as_bool().is_some(),
        }
    }
}
