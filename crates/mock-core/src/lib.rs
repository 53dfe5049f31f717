//! Core types for the data-mocker framework.
//!
//! This crate provides the foundational pieces used across data-mocker:
//!
//! - [`FieldSpec`] - The field-type catalog (scalars, temporals and composites)
//! - [`TypeRegistry`] - Maps descriptor type names to constructors
//! - [`Descriptor`] - The canonical string tree a schema encodes to
//! - [`Provider`] - The random-value source handed to every `mock()` call
//!
//! # Architecture
//!
//! ```text
//! mock-core (this crate)
//!    │
//!    ├─── mock-infer            (builds FieldSpecs from sample values)
//!    ├─── mock-populate-jsonl   (writes mock records as JSON Lines)
//!    └─── data-mocker           (facade, declarations and CLI)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mock_core::{decode, Descriptor, FieldSpec, Provider, Resolution, TypeRegistry};
//!
//! let mut schema = FieldSpec::dict([
//!     ("symbol", FieldSpec::string()),
//!     ("update_at", FieldSpec::timestamp(Resolution::Millis)),
//! ]);
//!
//! let descriptor = schema.descriptor();
//! assert_eq!(descriptor.to_string(), r#"{"symbol":"Str","update_at":"Timestamp_3"}"#);
//!
//! let registry = TypeRegistry::builtin();
//! let mut decoded = decode(&descriptor, &registry).unwrap();
//! let mut provider = Provider::seeded(42);
//! let record = decoded.mock(&mut provider).unwrap();
//! assert!(record["update_at"].is_i64());
//! # let _ = schema.mock(&mut provider);
//! # let _: Descriptor = descriptor;
//! ```

pub mod composite;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod provider;
pub mod registry;
pub mod step;

// Re-exports for convenience
pub use composite::{KeyedComposite, OrderedComposite};
pub use descriptor::{decode, encode_scalar, split_scalar, Descriptor, DELIMITER, ESCAPE};
pub use error::FieldError;
pub use field::{
    CustomField, DatetimeField, FakeField, FieldSpec, FloatField, IntField, Resolution,
    TimestampField, DEFAULT_DATETIME_FORMAT, ISO_DATETIME_FORMAT, TIMESTAMP_WINDOW_WEEKS,
};
pub use provider::{Provider, ProviderExtension};
pub use registry::{FieldConstructor, TypeRegistry};
pub use step::{default_step, format_step, parse_step};
