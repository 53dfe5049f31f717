//! The `DataMocker` facade: one root field tree, the registry it decodes
//! and infers with, and the provider it mocks with.

use crate::declare::SchemaBuilder;
use crate::error::SchemaError;
use crate::schema::load_descriptor;
use mock_core::{decode, Descriptor, FieldError, FieldSpec, Provider, ProviderExtension, TypeRegistry};
use mock_infer::{InferError, Matcher};
use mock_populate_jsonl::JsonlPopulator;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Generates records from a root field tree.
#[derive(Debug)]
pub struct DataMocker {
    models: FieldSpec,
    registry: TypeRegistry,
    provider: Provider,
}

impl Default for DataMocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DataMocker {
    /// An empty keyed root with the built-in registry and an entropy-seeded provider.
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::builtin())
    }

    /// An empty keyed root that decodes and infers with `registry`.
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            models: FieldSpec::Dict(Default::default()),
            registry,
            provider: Provider::new(),
        }
    }

    pub(crate) fn from_parts(models: FieldSpec, registry: TypeRegistry, provider: Provider) -> Self {
        Self {
            models,
            registry,
            provider,
        }
    }

    /// Infer the root from a sample document.
    pub fn from_sample(sample: &Value) -> Result<Self, InferError> {
        Self::new().infer(sample)
    }

    /// Rebuild the root from a descriptor tree.
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self, FieldError> {
        Self::new().decode(descriptor)
    }

    /// Rebuild the root from a JSON or YAML descriptor file.
    pub fn from_descriptor_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let descriptor = load_descriptor(path)?;
        Ok(Self::from_descriptor(&descriptor)?)
    }

    /// Start a declarative schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Replace the root with an explicit field tree.
    pub fn with_models(mut self, models: FieldSpec) -> Self {
        self.models = models;
        self
    }

    /// Re-seed the provider for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.provider.reseed(seed);
        self
    }

    /// Replace the root with one inferred from `sample` using this registry.
    pub fn infer(self, sample: &Value) -> Result<Self, InferError> {
        let models = Matcher::new(&self.registry).infer(sample)?;
        debug!("Inferred schema {}", models.descriptor());
        Ok(self.with_models(models))
    }

    /// Replace the root with one decoded from `descriptor` using this registry.
    pub fn decode(self, descriptor: &Descriptor) -> Result<Self, FieldError> {
        let models = decode(descriptor, &self.registry)?;
        Ok(self.with_models(models))
    }

    /// Produce one record.
    pub fn mock(&mut self) -> Result<Value, FieldError> {
        self.models.mock(&mut self.provider)
    }

    /// Produce `count` records; temporal fields advance once per record.
    pub fn mock_many(&mut self, count: usize) -> Result<Vec<Value>, FieldError> {
        (0..count).map(|_| self.mock()).collect()
    }

    pub fn descriptor(&self) -> Descriptor {
        self.models.descriptor()
    }

    pub fn models(&self) -> &FieldSpec {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut FieldSpec {
        &mut self.models
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn provider_mut(&mut self) -> &mut Provider {
        &mut self.provider
    }

    /// Register a provider extension; it applies to every field from the next
    /// `mock()` on.
    pub fn add_provider<P: ProviderExtension + 'static>(&mut self, extension: P) {
        self.provider.add_provider(extension);
    }

    /// Hand the root and provider to a JSONL writer.
    pub fn into_populator(self) -> JsonlPopulator {
        JsonlPopulator::new(self.models, self.provider)
    }
}
