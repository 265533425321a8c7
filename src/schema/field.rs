//! Field descriptors
//!
//! A field descriptor is the per-field row of a record kind's constraint
//! table: name, semantic type, presence, numeric bounds and description.

use serde::Serialize;
use serde_json::{Map, Value};

/// Semantic type of a field as the viewer understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text
    Text,
    /// Whole number
    Integer,
    /// Floating point number
    Decimal,
    /// true / false
    Boolean,
    /// Text that must be a well-formed email address
    Email,
}

impl FieldType {
    /// JSON type used to represent the value on the wire
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldType::Text | FieldType::Email => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "number",
            FieldType::Boolean => "boolean",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal)
    }
}

/// Whether a field has to be supplied
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// Must be present and non-null
    Required,
    /// May be absent or null
    Optional,
    /// May be absent, in which case the value is filled in; null is rejected
    Default(Value),
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl Constraints {
    /// Check a number against the bounds, returning the failure reason
    pub fn check(&self, value: f64) -> Option<String> {
        if let Some(min) = self.minimum {
            if value < min {
                return Some(format!("below minimum {}", min));
            }
        }
        if let Some(max) = self.maximum {
            if value > max {
                return Some(format!("exceeds maximum {}", max));
            }
        }
        None
    }

    /// Bounds as JSON keywords (`minimum` / `maximum`)
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(min) = self.minimum {
            map.insert("minimum".to_string(), number_value(min));
        }
        if let Some(max) = self.maximum {
            map.insert("maximum".to_string(), number_value(max));
        }
        map
    }
}

/// One field of a record kind
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub presence: Presence,
    pub constraints: Constraints,
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// Creates a required field.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::with_presence(name, field_type, Presence::Required)
    }

    /// Creates an optional (nullable) field.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::with_presence(name, field_type, Presence::Optional)
    }

    fn with_presence(name: impl Into<String>, field_type: FieldType, presence: Presence) -> Self {
        Self {
            name: name.into(),
            field_type,
            presence,
            constraints: Constraints::default(),
            description: None,
        }
    }

    /// Gives the field a default, filled in when the field is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::Default(value.into());
        self
    }

    /// Sets an inclusive lower bound.
    pub fn minimum(mut self, min: f64) -> Self {
        self.constraints.minimum = Some(min);
        self
    }

    /// Sets an inclusive upper bound.
    pub fn maximum(mut self, max: f64) -> Self {
        self.constraints.maximum = Some(max);
        self
    }

    /// Sets the human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.presence, Presence::Optional)
    }

    pub fn default_value(&self) -> Option<&Value> {
        match &self.presence {
            Presence::Default(value) => Some(value),
            _ => None,
        }
    }
}

/// Render a bound as a JSON number, keeping whole numbers integral
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
