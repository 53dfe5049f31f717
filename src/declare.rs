//! Declarative schemas.
//!
//! A schema is a set of named bindings. `declare` binds a type name whose
//! default instance is built from the registry when the schema is built;
//! `field` binds an explicit instance and wins over a declared default for
//! the same name, keeping the name's position. A `root` replaces the derived
//! keyed composite entirely.
//!
//! The same shape can be loaded from YAML:
//!
//! ```yaml
//! seed: 42
//! fields:
//!   - name: symbol
//!     type: Str
//!   - name: price
//!     type: Float
//!     args: [3, 2]
//!   - name: update_at
//!     type: Timestamp
//!     args: [3]
//! ```

use crate::error::SchemaError;
use crate::mocker::DataMocker;
use indexmap::IndexMap;
use mock_core::{
    decode, Descriptor, FieldError, FieldSpec, KeyedComposite, Provider, ProviderExtension,
    TypeRegistry,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
enum Binding {
    /// Type name, default-constructed at build time
    Declared(String),
    Explicit(FieldSpec),
}

/// Builds a [`DataMocker`] from named field bindings.
#[derive(Default)]
pub struct SchemaBuilder {
    registry: Option<TypeRegistry>,
    bindings: IndexMap<String, Binding>,
    root: Option<FieldSpec>,
    seed: Option<u64>,
    extensions: Vec<Arc<dyn ProviderExtension>>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct fields with `registry` instead of the built-in one.
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Bind `name` to a default instance of `type_name`.
    ///
    /// Ignored if `name` already has an explicit instance.
    pub fn declare(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        if !matches!(self.bindings.get(&name), Some(Binding::Explicit(_))) {
            self.bindings.insert(name, Binding::Declared(type_name.into()));
        }
        self
    }

    /// Bind `name` to an explicit instance.
    pub fn field(mut self, name: impl Into<String>, field: FieldSpec) -> Self {
        self.bindings.insert(name.into(), Binding::Explicit(field));
        self
    }

    /// Use `root` as the whole schema, ignoring every named binding.
    pub fn root(mut self, root: FieldSpec) -> Self {
        self.root = Some(root);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn provider<P: ProviderExtension + 'static>(mut self, extension: P) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn build(self) -> Result<DataMocker, FieldError> {
        let registry = self.registry.unwrap_or_default();

        let models = match self.root {
            Some(root) => {
                if !self.bindings.is_empty() {
                    debug!(
                        "Explicit root overrides {} named bindings",
                        self.bindings.len()
                    );
                }
                root
            }
            None => {
                let mut fields = IndexMap::with_capacity(self.bindings.len());
                for (name, binding) in self.bindings {
                    let field = match binding {
                        Binding::Declared(type_name) => registry.construct(&type_name, &[])?,
                        Binding::Explicit(field) => field,
                    };
                    fields.insert(name, field);
                }
                FieldSpec::Dict(KeyedComposite::new(fields))
            }
        };

        let mut provider = match self.seed {
            Some(seed) => Provider::seeded(seed),
            None => Provider::new(),
        };
        for extension in self.extensions {
            provider.add_shared_provider(extension);
        }

        Ok(DataMocker::from_parts(models, registry, provider))
    }
}

/// One named field in a [`Declaration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    /// Constructor arguments; numbers and booleans are taken as their text.
    #[serde(default, deserialize_with = "scalar_args", skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// A schema declared in a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,

    /// Descriptor tree that replaces the named fields entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Descriptor>,
}

impl Declaration {
    /// Load a declaration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a declaration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build a mocker, constructing every field through `registry`.
    ///
    /// Fields without arguments are declared defaults; fields with arguments
    /// are constructed before any default.
    pub fn into_mocker(self, registry: TypeRegistry) -> Result<DataMocker, SchemaError> {
        let mut builder = SchemaBuilder::new();

        for field in self.fields {
            builder = if field.args.is_empty() {
                builder.declare(field.name, field.type_name)
            } else {
                let spec = registry.construct(&field.type_name, &field.args)?;
                builder.field(field.name, spec)
            };
        }
        if let Some(root) = &self.root {
            builder = builder.root(decode(root, &registry)?);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }

        Ok(builder.registry(registry).build()?)
    }
}

fn scalar_args<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let values = Vec::<serde_yaml::Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!(
                "field arguments must be scalars, got {other:?}"
            ))),
        })
        .collect()
}
