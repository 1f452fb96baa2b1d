//! Configuration for flatcoll
//!
//! Centralized container defaults with a fluent builder.

use crate::error::{FlatError, Result};

/// Default initial slot count for arrays
pub const DEFAULT_ARRAY_CAPACITY: usize = 8;

/// Default initial slot count for hash sets
pub const DEFAULT_SET_CAPACITY: usize = 16;

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Array Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity (in elements) of arrays built from this config
    pub array_capacity: usize,

    /// Halve array capacity when length drops below half of it.
    /// Turning this off avoids thrashing around the threshold at the cost
    /// of never returning memory.
    pub shrink_arrays: bool,

    // -------------------------------------------------------------------------
    // Hash Set Configuration
    // -------------------------------------------------------------------------
    /// Initial slot count of hash sets built from this config (must be > 0)
    pub set_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            array_capacity: DEFAULT_ARRAY_CAPACITY,
            shrink_arrays: true,
            set_capacity: DEFAULT_SET_CAPACITY,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config describes constructible containers
    pub fn validate(&self) -> Result<()> {
        if self.set_capacity == 0 {
            return Err(FlatError::Config(
                "set_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the initial array capacity (in elements)
    pub fn array_capacity(mut self, capacity: usize) -> Self {
        self.config.array_capacity = capacity;
        self
    }

    /// Enable or disable the array shrink rule
    pub fn shrink_arrays(mut self, enabled: bool) -> Self {
        self.config.shrink_arrays = enabled;
        self
    }

    /// Set the initial hash set capacity (in slots)
    pub fn set_capacity(mut self, capacity: usize) -> Self {
        self.config.set_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
