//! Random-value provider shared by every field during generation.
//!
//! Fields never own randomness: each `mock()` call receives the provider,
//! so an extension registered with [`Provider::add_provider`] is visible to
//! every field, including fields created before the registration.

use crate::error::FieldError;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Named generation methods contributed by an integrator.
pub trait ProviderExtension: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Generate a value for `method`, or `None` if this extension does not expose it.
    fn call(&self, method: &str, rng: &mut StdRng) -> Option<Value>;
}

/// Source of primitive random values (words, bounded floats and integers).
pub struct Provider {
    rng: StdRng,
    extensions: Vec<Arc<dyn ProviderExtension>>,
}

impl Provider {
    /// Create a provider seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            extensions: Vec::new(),
        }
    }

    /// Create a provider with a fixed seed (same seed = same values).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            extensions: Vec::new(),
        }
    }

    /// Re-seed the underlying RNG, keeping registered extensions.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Register an extension. Later registrations shadow earlier ones for the same method.
    pub fn add_provider<P: ProviderExtension + 'static>(&mut self, extension: P) {
        self.add_shared_provider(Arc::new(extension));
    }

    /// Register an extension that is already shared elsewhere.
    pub fn add_shared_provider(&mut self, extension: Arc<dyn ProviderExtension>) {
        debug!("Registered provider extension '{}'", extension.name());
        self.extensions.push(extension);
    }

    /// Names of the registered extensions, in registration order.
    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Call a named generation method.
    ///
    /// Extensions are consulted newest first, then the built-in `word` and
    /// `pyfloat` methods.
    pub fn call(&mut self, method: &str) -> Result<Value, FieldError> {
        for extension in self.extensions.iter().rev() {
            if let Some(value) = extension.call(method, &mut self.rng) {
                return Ok(value);
            }
        }

        match method {
            "word" => Ok(Value::String(self.word())),
            "pyfloat" => Ok(Value::from(self.pyfloat(2, 10))),
            _ => Err(FieldError::UnknownProviderMethod(method.to_string())),
        }
    }

    /// A single lorem-ipsum word.
    pub fn word(&mut self) -> String {
        Word().fake_with_rng::<String, _>(&mut self.rng)
    }

    /// A float with at most `left` integer digits, exactly `right` fractional
    /// digits of randomness and a random sign.
    pub fn pyfloat(&mut self, left: u32, right: u32) -> f64 {
        let int_part: u64 = if left == 0 {
            0
        } else {
            self.rng.random_range(0..10u64.pow(left))
        };
        let frac_part: u64 = if right == 0 {
            0
        } else {
            self.rng.random_range(0..10u64.pow(right))
        };
        let sign = if self.rng.random_bool(0.5) { "-" } else { "" };

        format!(
            "{sign}{int_part}.{frac_part:0width$}",
            width = right as usize
        )
        .parse()
        .unwrap_or_default()
    }

    /// A uniformly distributed integer in `[min, max]`.
    pub fn int_in(&mut self, min: i128, max: i128) -> i128 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Direct access to the RNG for custom fields.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("extensions", &self.extension_names())
            .finish_non_exhaustive()
    }
}
