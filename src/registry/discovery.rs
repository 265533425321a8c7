//! Discovery document
//!
//! The shape served to the viewer when it asks for `/schema`: one entry per
//! collection with its field descriptors in declaration order.

use crate::schema::{FieldDescriptor, RecordSchema, ValidationOptions};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct SchemaDocument {
    pub validation: ValidationOptions,
    pub collections: Vec<CollectionSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    pub kind: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: crate::schema::FieldType,
    pub required: bool,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub constraints: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&FieldDescriptor> for FieldEntry {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type,
            required: field.is_required(),
            nullable: field.is_nullable(),
            default: field.default_value().cloned(),
            constraints: field.constraints.to_json(),
            description: field.description.clone(),
        }
    }
}

impl From<&RecordSchema> for CollectionSchema {
    fn from(schema: &RecordSchema) -> Self {
        Self {
            kind: schema.name().to_string(),
            collection: schema.collection().to_string(),
            description: schema.get_description().map(str::to_string),
            fields: schema.fields().iter().map(FieldEntry::from).collect(),
        }
    }
}
