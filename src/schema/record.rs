//! Record kinds
//!
//! A `RecordSchema` is the constraint table of one record kind: its name, the
//! collection it lives in and its ordered field descriptors. Validation walks
//! the table once and reports every violation it finds.

use super::field::{FieldDescriptor, Presence};
use super::naming::collection_name;
use super::validate::{coerce, UnknownFieldPolicy, ValidationError, ValidationErrors, ValidationOptions};
use serde_json::{Map, Value};
use tracing::debug;

/// A validated document: declared fields coerced, defaults filled in
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    name: String,
    collection: String,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Creates an empty record kind stored in its derived collection.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            collection: collection_name(&name),
            name,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Sets the human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a field; declaration order is preserved.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_required())
    }

    /// Validate a candidate document.
    ///
    /// Returns the coerced document, or every violation found. Declared fields
    /// are checked in declaration order; undeclared keys are handled per
    /// `options.unknown_fields` and reported after them.
    pub fn validate(
        &self,
        candidate: &Map<String, Value>,
        options: &ValidationOptions,
    ) -> Result<Document, ValidationErrors> {
        let mut output = Document::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            let name = field.name.as_str();

            match (candidate.get(name), &field.presence) {
                (None, Presence::Required) | (Some(Value::Null), Presence::Required) => {
                    errors.push(ValidationError::missing(name));
                }
                (None, Presence::Optional) => {}
                (None, Presence::Default(value)) => {
                    output.insert(name.to_string(), value.clone());
                }
                (Some(Value::Null), Presence::Optional) => {
                    output.insert(name.to_string(), Value::Null);
                }
                (Some(value), _) => match self.check_value(field, value, options) {
                    Ok(coerced) => {
                        output.insert(name.to_string(), coerced);
                    }
                    Err(reason) => errors.push(ValidationError::invalid(name, reason)),
                },
            }
        }

        for (key, value) in candidate {
            if self.get_field(key).is_some() {
                continue;
            }
            match options.unknown_fields {
                UnknownFieldPolicy::Allow => {
                    output.insert(key.clone(), value.clone());
                }
                UnknownFieldPolicy::Ignore => {}
                UnknownFieldPolicy::Forbid => errors.push(ValidationError::unknown(key)),
            }
        }

        match ValidationErrors::from_vec(errors) {
            None => Ok(output),
            Some(errors) => {
                debug!(
                    "Rejected {} document with {} violation(s): {}",
                    self.name,
                    errors.len(),
                    errors
                );
                Err(errors)
            }
        }
    }

    fn check_value(
        &self,
        field: &FieldDescriptor,
        value: &Value,
        options: &ValidationOptions,
    ) -> Result<Value, String> {
        let coerced = coerce(field.field_type, value, options.coercion)?;

        if field.field_type.is_numeric() {
            if let Some(reason) = coerced.as_f64().and_then(|n| field.constraints.check(n)) {
                return Err(reason);
            }
        }

        Ok(coerced)
    }
}
