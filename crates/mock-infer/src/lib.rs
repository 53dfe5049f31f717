//! Schema inference for data-mocker.
//!
//! This crate provides the [`Matcher`], which proposes a [`FieldSpec`] for a
//! concrete sample value. Inference is a pure function of the sample, the
//! [`TypeRegistry`]'s datetime formats and timestamp resolutions, and the
//! matcher's reference time.
//!
//! # Example
//!
//! ```rust
//! use mock_core::{Descriptor, TypeRegistry};
//! use mock_infer::Matcher;
//! use serde_json::json;
//!
//! let registry = TypeRegistry::builtin();
//! let matcher = Matcher::new(&registry);
//!
//! let field = matcher.infer(&json!({"name": "i am strong", "count": "10000"})).unwrap();
//! assert_eq!(
//!     field.descriptor(),
//!     Descriptor::from_json(r#"{"name": "Str", "count": "StrInt"}"#).unwrap()
//! );
//! ```
//!
//! [`FieldSpec`]: mock_core::FieldSpec
//! [`TypeRegistry`]: mock_core::TypeRegistry

pub mod matcher;

pub use matcher::{classify_str, InferError, Matcher, TIMESTAMP_WINDOW_WEEKS};
