//! Schema Registry
//!
//! Holds the record kinds the viewer knows about, keyed by collection.
//! The registry is built once and never mutated, so it can be shared
//! freely across threads.
//!
//! The viewer uses it in two ways:
//! - discovery: `discovery()` lists every collection with its fields
//! - validation on write: `validate(collection, doc)` must succeed before a
//!   document is persisted

mod discovery;

pub use discovery::{CollectionSchema, FieldEntry, SchemaDocument};

use crate::config::Config;
use crate::error::{RegistryError, Result};
use crate::models::{builtin_schemas, Record};
use crate::schema::{Document, RecordSchema, ValidationOptions};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::info;

pub struct SchemaRegistry {
    kinds: Vec<RecordSchema>,
    by_collection: HashMap<String, usize>,
    options: ValidationOptions,
}

impl SchemaRegistry {
    /// Registry of the built-in models
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_kinds(builtin_schemas(), config.validation)
    }

    /// Registry of an arbitrary set of kinds
    pub fn with_kinds(kinds: Vec<RecordSchema>, options: ValidationOptions) -> Result<Self> {
        let mut by_collection = HashMap::new();

        for (idx, kind) in kinds.iter().enumerate() {
            if let Some(existing) = by_collection.insert(kind.collection().to_string(), idx) {
                return Err(RegistryError::DuplicateCollection {
                    collection: kind.collection().to_string(),
                    first: kinds[existing].name().to_string(),
                    second: kind.name().to_string(),
                });
            }
        }

        info!(
            "Schema registry ready with {} collection(s): {:?} (unknown_fields={:?}, coercion={:?})",
            kinds.len(),
            kinds.iter().map(|k| k.collection()).collect::<Vec<_>>(),
            options.unknown_fields,
            options.coercion
        );

        Ok(Self {
            kinds,
            by_collection,
            options,
        })
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &RecordSchema> {
        self.kinds.iter()
    }

    pub fn collections(&self) -> Vec<&str> {
        self.kinds.iter().map(|k| k.collection()).collect()
    }

    /// Look up a kind by its declared name (`User`)
    pub fn get_kind(&self, kind: &str) -> Result<&RecordSchema> {
        self.kinds
            .iter()
            .find(|k| k.name() == kind)
            .ok_or_else(|| RegistryError::UnknownKind {
                kind: kind.to_string(),
            })
    }

    /// Look up a kind by the collection it is stored in (`user`)
    pub fn get_collection(&self, collection: &str) -> Result<&RecordSchema> {
        self.by_collection
            .get(collection)
            .map(|&idx| &self.kinds[idx])
            .ok_or_else(|| RegistryError::UnknownCollection {
                collection: collection.to_string(),
            })
    }

    /// Discovery document for the viewer's `/schema` query
    pub fn discovery(&self) -> SchemaDocument {
        SchemaDocument {
            validation: self.options,
            collections: self.kinds.iter().map(CollectionSchema::from).collect(),
        }
    }

    /// Validate a document about to be written to `collection`
    pub fn validate(&self, collection: &str, doc: &Map<String, Value>) -> Result<Document> {
        let schema = self.get_collection(collection)?;

        schema
            .validate(doc, &self.options)
            .map_err(|errors| RegistryError::Validation {
                collection: collection.to_string(),
                errors,
            })
    }

    /// Validate a document and convert it to its typed model
    pub fn parse<T: Record>(&self, doc: &Map<String, Value>) -> Result<T> {
        let validated = self.validate(&T::collection(), doc)?;

        serde_json::from_value(Value::Object(validated)).map_err(|e| RegistryError::Deserialize {
            kind: T::KIND.to_string(),
            cause: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lead, Product, User};
    use crate::schema::{FieldDescriptor, FieldType, UnknownFieldPolicy, ViolationKind};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(&Config::default()).unwrap()
    }

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn violations(result: Result<Document>) -> Vec<(String, ViolationKind)> {
        match result {
            Err(RegistryError::Validation { errors, .. }) => {
                errors.iter().map(|e| (e.field.clone(), e.kind)).collect()
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_collections() {
        let registry = registry();
        assert_eq!(registry.collections(), vec!["user", "product", "lead"]);
        assert_eq!(registry.get_kind("Lead").unwrap().collection(), "lead");
        assert_eq!(registry.get_collection("product").unwrap().name(), "Product");
        assert!(matches!(
            registry.get_collection("orders"),
            Err(RegistryError::UnknownCollection { .. })
        ));
        assert!(matches!(
            registry.get_kind("Order"),
            Err(RegistryError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_duplicate_collection_rejected() {
        let kinds = vec![RecordSchema::new("User"), RecordSchema::new("user")];
        let result = SchemaRegistry::with_kinds(kinds, ValidationOptions::default());

        match result {
            Err(RegistryError::DuplicateCollection { collection, first, second }) => {
                assert_eq!(collection, "user");
                assert_eq!(first, "User");
                assert_eq!(second, "user");
            }
            _ => panic!("expected duplicate collection error"),
        }
    }

    #[test]
    fn test_override_collection_lookup() {
        let post = RecordSchema::new("BlogPost")
            .field(FieldDescriptor::required("title", FieldType::Text));
        let registry = SchemaRegistry::with_kinds(vec![post], ValidationOptions::default()).unwrap();

        assert!(registry.get_collection("blogs").is_ok());
        assert!(registry.get_collection("blogpost").is_err());
    }

    #[test]
    fn test_user_defaults() {
        let out = registry()
            .validate(
                "user",
                &doc(json!({"name": "Ann", "email": "a@b.com", "address": "1 Main St"})),
            )
            .unwrap();

        assert!(!out.contains_key("age"));
        assert_eq!(out.get("is_active"), Some(&json!(true)));
    }

    #[test]
    fn test_user_age_out_of_range() {
        let result = registry().validate(
            "user",
            &doc(json!({"name": "Ann", "email": "a@b.com", "address": "1 Main St", "age": 150})),
        );

        match result {
            Err(RegistryError::Validation { errors, .. }) => {
                assert_eq!(errors.len(), 1);
                let age = errors.for_field("age");
                assert_eq!(age[0].reason.as_deref(), Some("exceeds maximum 120"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_product_negative_price() {
        let result = registry().validate(
            "product",
            &doc(json!({"title": "Widget", "price": -5, "category": "tools"})),
        );

        assert_eq!(
            violations(result),
            vec![("price".to_string(), ViolationKind::InvalidValue)]
        );
    }

    #[test]
    fn test_lead_minimal() {
        let out = registry()
            .validate("lead", &doc(json!({"full_name": "Jo", "phone": "555-1234"})))
            .unwrap();

        assert_eq!(out.get("consent"), Some(&json!(true)));
        assert!(!out.contains_key("email"));
    }

    #[test]
    fn test_lead_bad_email() {
        let result = registry().validate(
            "lead",
            &doc(json!({"full_name": "Jo", "phone": "555-1234", "email": "not-an-email"})),
        );

        assert_eq!(
            violations(result),
            vec![("email".to_string(), ViolationKind::InvalidValue)]
        );
    }

    #[test]
    fn test_lead_rejects_undeliverable_email_domains() {
        let registry = registry();

        for email in ["a@1.2.3.4", "a@example.test", "a@host.localhost", "a@box.local"] {
            let result = registry.validate(
                "lead",
                &doc(json!({"full_name": "Jo", "phone": "555-1234", "email": email})),
            );
            assert_eq!(
                violations(result),
                vec![("email".to_string(), ViolationKind::InvalidValue)],
                "{} accepted",
                email
            );
        }
    }

    #[test]
    fn test_user_age_lax_inputs() {
        let registry = registry();
        let base = json!({"name": "Ann", "email": "a@b.com", "address": "1 Main St"});

        let mut with_bool = doc(base.clone());
        with_bool.insert("age".to_string(), json!(true));
        let out = registry.validate("user", &with_bool).unwrap();
        assert_eq!(out.get("age"), Some(&json!(1)));

        let mut huge = doc(base);
        huge.insert("age".to_string(), json!(1e20));
        match registry.validate("user", &huge) {
            Err(RegistryError::Validation { errors, .. }) => {
                let reason = errors.for_field("age")[0].reason.clone().unwrap_or_default();
                assert!(reason.starts_with("integer out of range"), "{}", reason);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_every_missing_required_field_is_named() {
        let registry = registry();

        for kind in registry.kinds() {
            let errors = kind
                .validate(&Map::new(), registry.options())
                .unwrap_err();

            for field in kind.required_fields() {
                assert!(
                    errors.has_field(&field.name),
                    "{} missing error for {}",
                    kind.name(),
                    field.name
                );
            }
            assert_eq!(errors.len(), kind.required_fields().count());
        }
    }

    #[test]
    fn test_complete_documents_pass() {
        let registry = registry();
        let samples = [
            (
                "user",
                json!({"name": "Ann", "email": "a@b.com", "address": "1 Main St", "age": 0, "is_active": false}),
            ),
            (
                "product",
                json!({"title": "Widget", "description": null, "price": 0, "category": "tools", "in_stock": false}),
            ),
            (
                "lead",
                json!({
                    "full_name": "Jo",
                    "phone": "555-1234",
                    "email": "jo@example.com",
                    "service": "Whitening",
                    "preferred_date": "Friday",
                    "preferred_time": "after 5",
                    "message": null,
                    "source": "instagram",
                    "utm_source": "ig",
                    "utm_medium": "social",
                    "utm_campaign": "smile",
                    "consent": true
                }),
            ),
        ];

        for (collection, sample) in samples {
            assert!(
                registry.validate(collection, &doc(sample)).is_ok(),
                "{} sample rejected",
                collection
            );
        }
    }

    #[test]
    fn test_validate_is_idempotent() {
        let registry = registry();
        let candidate = doc(json!({"title": "Widget", "price": "abc", "category": 3}));

        let first = format!("{:?}", registry.validate("product", &candidate));
        let second = format!("{:?}", registry.validate("product", &candidate));
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_typed() {
        let registry = registry();

        let product: Product = registry
            .parse(&doc(json!({"title": "Widget", "price": "9.5", "category": "tools"})))
            .unwrap();
        assert_eq!(product.price, 9.5);
        assert!(product.in_stock);
        assert_eq!(product.description, None);

        let lead: Lead = registry
            .parse(&doc(json!({"full_name": "Jo", "phone": "555-1234", "email": " jo@example.com "})))
            .unwrap();
        assert_eq!(lead.email.as_deref(), Some("jo@example.com"));

        let err = registry
            .parse::<User>(&doc(json!({"name": "Ann"})))
            .unwrap_err();
        assert_eq!(err.code(), "validation_failed");
    }

    #[test]
    fn test_forbid_policy_from_config() {
        let config = Config {
            validation: ValidationOptions {
                unknown_fields: UnknownFieldPolicy::Forbid,
                ..Default::default()
            },
            ..Default::default()
        };
        let registry = SchemaRegistry::new(&config).unwrap();

        let result = registry.validate(
            "lead",
            &doc(json!({"full_name": "Jo", "phone": "555-1234", "fax": "555-0000"})),
        );
        assert_eq!(
            violations(result),
            vec![("fax".to_string(), ViolationKind::UnknownField)]
        );
    }

    #[test]
    fn test_discovery_document() {
        let document = registry().discovery();
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["validation"]["unknown_fields"], "allow");
        assert_eq!(json["validation"]["coercion"], "lax");
        assert_eq!(json["collections"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["collections"][2]["collection"], "lead");
        assert_eq!(json["collections"][2]["fields"][2]["type"], "email");
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();
    }
}
