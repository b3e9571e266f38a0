//! Input size limits for the command-line front end.
//!
//! The engine itself accepts any input; these limits stop the CLI from
//! loading unbounded files into memory.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits applied before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum size of the citation-bearing text (default: 10MB)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,

    /// Maximum size of the serialized agent run (default: 64MB)
    #[serde(default = "default_max_run_bytes")]
    pub max_run_bytes: u64,
}

fn default_max_input_bytes() -> u64 {
    10 * 1024 * 1024
}
fn default_max_run_bytes() -> u64 {
    64 * 1024 * 1024
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_run_bytes: default_max_run_bytes(),
        }
    }
}

impl InputLimits {
    /// Validate the citation-bearing text
    pub fn validate_input(&self, input: &str) -> Result<(), InputViolation> {
        let size = input.len() as u64;
        if size > self.max_input_bytes {
            return Err(InputViolation::MaxInputBytes {
                actual: size,
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }

    /// Validate the size of a run file before parsing it
    pub fn validate_run_size(&self, size: u64) -> Result<(), InputViolation> {
        if size > self.max_run_bytes {
            return Err(InputViolation::MaxRunBytes {
                actual: size,
                limit: self.max_run_bytes,
            });
        }
        Ok(())
    }
}

/// Input limit violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputViolation {
    #[error("Maximum input bytes exceeded: {actual} > {limit}")]
    MaxInputBytes { actual: u64, limit: u64 },

    #[error("Maximum run file bytes exceeded: {actual} > {limit}")]
    MaxRunBytes { actual: u64, limit: u64 },
}
