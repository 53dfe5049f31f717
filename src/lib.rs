//! DataMocker Library
//!
//! Infers field schemas from sample documents, encodes them as descriptor
//! trees, and generates mock records that match them.
//!
//! # Features
//!
//! - Inference: integers, floats, numeric strings, datetimes and epoch timestamps
//! - Descriptors: a JSON/YAML string tree that decodes back to the same schema
//! - Declarative schemas: named fields built in code or from a YAML file
//! - Output: records as JSON values or JSON Lines files
//!
//! # CLI Usage
//!
//! ```bash
//! # Infer a descriptor tree from a sample
//! data-mocker infer --input sample.json --format yaml
//!
//! # Generate 1000 records from a descriptor tree
//! data-mocker mock --schema schema.yaml --count 1000 --seed 42 --output out.jsonl
//!
//! # Generate records from a declaration file
//! data-mocker declare --file declaration.yaml --count 10
//! ```

use clap::Args;
use std::path::PathBuf;

pub mod declare;
pub mod error;
pub mod mocker;
pub mod schema;

pub use declare::{Declaration, FieldDeclaration, SchemaBuilder};
pub use error::SchemaError;
pub use mocker::DataMocker;
pub use schema::{load_descriptor, load_sample, DocumentFormat};

// Re-export the workspace crates for convenience
pub use mock_core as fields;
pub use mock_infer as infer;
pub use mock_populate_jsonl as jsonl;

#[derive(Args, Clone, Debug)]
pub struct InferOpts {
    /// Sample document (JSON, or YAML by extension)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output format of the descriptor tree
    #[arg(long, value_enum, default_value = "json")]
    pub format: DocumentFormat,

    /// Write the descriptor tree to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}
