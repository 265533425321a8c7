//! JSON Schema rendering
//!
//! Renders a record kind as a JSON Schema object so generic form builders can
//! consume it. Optional fields become `anyOf [<type>, null]` with a null
//! default; email fields carry `format: email`.

use super::field::{FieldDescriptor, FieldType, Presence};
use super::record::RecordSchema;
use serde_json::{json, Map, Value};

impl RecordSchema {
    /// JSON Schema describing documents of this kind
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields() {
            properties.insert(field.name.clone(), field_schema(field));
        }

        let required: Vec<&str> = self.required_fields().map(|f| f.name.as_str()).collect();

        let mut schema = Map::new();
        schema.insert("title".to_string(), json!(self.name()));
        if let Some(description) = self.get_description() {
            schema.insert("description".to_string(), json!(description));
        }
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));

        Value::Object(schema)
    }
}

fn field_schema(field: &FieldDescriptor) -> Value {
    let mut type_schema = Map::new();
    type_schema.insert("type".to_string(), json!(field.field_type.json_type()));
    if field.field_type == FieldType::Email {
        type_schema.insert("format".to_string(), json!("email"));
    }
    type_schema.extend(field.constraints.to_json());

    let mut schema = match field.presence {
        Presence::Optional => {
            let mut wrapper = Map::new();
            wrapper.insert(
                "anyOf".to_string(),
                json!([Value::Object(type_schema), {"type": "null"}]),
            );
            wrapper.insert("default".to_string(), Value::Null);
            wrapper
        }
        Presence::Default(ref value) => {
            type_schema.insert("default".to_string(), value.clone());
            type_schema
        }
        Presence::Required => type_schema,
    };

    schema.insert("title".to_string(), json!(title_case(&field.name)));
    if let Some(description) = &field.description {
        schema.insert("description".to_string(), json!(description));
    }

    Value::Object(schema)
}

/// `utm_source` -> `Utm Source`
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
