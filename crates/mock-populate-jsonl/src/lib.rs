//! JSONL (JSON Lines) output for mock records.
//!
//! Each call to the schema's `mock()` becomes one line of compact JSON.
//!
//! # Example
//!
//! ```ignore
//! use mock_core::{FieldSpec, Provider};
//! use mock_populate_jsonl::JsonlPopulator;
//!
//! let models = FieldSpec::dict([("name", FieldSpec::string()), ("age", FieldSpec::uint8())]);
//! let mut populator = JsonlPopulator::new(models, Provider::seeded(42));
//!
//! let metrics = populator.populate("output.jsonl", 1000)?;
//! println!("Generated {} rows in {:?}", metrics.rows_written, metrics.total_duration);
//! ```

pub mod args;
pub mod error;
pub mod populator;

pub use args::{CommonMockArgs, JsonlOutputArgs};
pub use error::JsonlPopulatorError;
pub use populator::{JsonlPopulator, PopulateMetrics, DEFAULT_BUFFER_SIZE};
