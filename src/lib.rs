//! Flames Schemas Library
//!
//! Declares the collections the Flames database viewer manages and the
//! rules documents must satisfy before they are written.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod schema;

pub use config::Config;
pub use error::{RegistryError, Result};
pub use models::{Lead, Product, Record, User};
pub use registry::SchemaRegistry;
