//! Collection models
//!
//! Each model exists twice: as a typed struct for Rust callers and as the
//! constraint table (`RecordSchema`) the viewer reads and validates against.
//! The two must describe the same fields.

use crate::schema::{collection_name, FieldDescriptor, FieldType, RecordSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record kind with a typed representation
pub trait Record: Serialize + DeserializeOwned {
    /// Declared kind name, e.g. `User`
    const KIND: &'static str;

    /// Constraint table for this kind
    fn schema() -> RecordSchema;

    /// Collection documents of this kind are stored in
    fn collection() -> String {
        collection_name(Self::KIND)
    }
}

fn default_true() -> bool {
    true
}

/// Users collection schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Record for User {
    const KIND: &'static str = "User";

    fn schema() -> RecordSchema {
        RecordSchema::new(Self::KIND)
            .description("Users collection schema")
            .field(FieldDescriptor::required("name", FieldType::Text).description("Full name"))
            .field(FieldDescriptor::required("email", FieldType::Text).description("Email address"))
            .field(FieldDescriptor::required("address", FieldType::Text).description("Address"))
            .field(
                FieldDescriptor::optional("age", FieldType::Integer)
                    .minimum(0.0)
                    .maximum(120.0)
                    .description("Age in years"),
            )
            .field(
                FieldDescriptor::required("is_active", FieldType::Boolean)
                    .default(true)
                    .description("Whether user is active"),
            )
    }
}

/// Products collection schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

impl Record for Product {
    const KIND: &'static str = "Product";

    fn schema() -> RecordSchema {
        RecordSchema::new(Self::KIND)
            .description("Products collection schema")
            .field(FieldDescriptor::required("title", FieldType::Text).description("Product title"))
            .field(
                FieldDescriptor::optional("description", FieldType::Text)
                    .description("Product description"),
            )
            .field(
                FieldDescriptor::required("price", FieldType::Decimal)
                    .minimum(0.0)
                    .description("Price in dollars"),
            )
            .field(
                FieldDescriptor::required("category", FieldType::Text)
                    .description("Product category"),
            )
            .field(
                FieldDescriptor::required("in_stock", FieldType::Boolean)
                    .default(true)
                    .description("Whether product is in stock"),
            )
    }
}

/// Dental practice marketing leads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub full_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default = "default_true")]
    pub consent: bool,
}

impl Record for Lead {
    const KIND: &'static str = "Lead";

    fn schema() -> RecordSchema {
        RecordSchema::new(Self::KIND)
            .description("Dental practice marketing leads")
            .field(
                FieldDescriptor::required("full_name", FieldType::Text)
                    .description("Prospective patient full name"),
            )
            .field(FieldDescriptor::required("phone", FieldType::Text).description("Phone number"))
            .field(FieldDescriptor::optional("email", FieldType::Email).description("Email address"))
            .field(
                FieldDescriptor::optional("service", FieldType::Text)
                    .description("Interested service e.g., Cleaning, Whitening, Implants"),
            )
            .field(
                FieldDescriptor::optional("preferred_date", FieldType::Text)
                    .description("Preferred appointment date (string)"),
            )
            .field(
                FieldDescriptor::optional("preferred_time", FieldType::Text)
                    .description("Preferred appointment time (string)"),
            )
            .field(
                FieldDescriptor::optional("message", FieldType::Text)
                    .description("Additional message or symptoms"),
            )
            .field(
                FieldDescriptor::optional("source", FieldType::Text)
                    .description("Lead source or campaign"),
            )
            .field(FieldDescriptor::optional("utm_source", FieldType::Text))
            .field(FieldDescriptor::optional("utm_medium", FieldType::Text))
            .field(FieldDescriptor::optional("utm_campaign", FieldType::Text))
            .field(
                FieldDescriptor::required("consent", FieldType::Boolean)
                    .default(true)
                    .description("Consent to be contacted"),
            )
    }
}

/// Constraint tables of every built-in model, in declaration order
pub fn builtin_schemas() -> Vec<RecordSchema> {
    vec![User::schema(), Product::schema(), Lead::schema()]
}
