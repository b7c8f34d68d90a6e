//! Engine configuration
//!
//! Ceilings applied to tokens being consumed and parameters used when
//! producing them. Presets follow the same shape as the key crate's KDF
//! presets; every field can be overridden with a `with_*` setter or loaded
//! from any serde format.

use crate::error::{JoseError, Result};
use serde::{Deserialize, Serialize};

/// Default ceiling for inflated `zip: "DEF"` payloads (250 KiB)
pub const DEFAULT_MAX_INFLATED_SIZE: usize = 250 * 1024;

/// Minimum PBES2 salt input length (RFC 7518 §4.8.1.1)
pub const MIN_PBES2_SALT_SIZE: usize = 8;

/// JOSE engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoseConfig {
    /// Largest payload, in bytes, that a compressed token may inflate to
    pub max_inflated_size: usize,
    /// DEFLATE level (0-9) used when a token asks for `zip: "DEF"`
    pub compression_level: u32,
    /// PBKDF2 iteration count written to `p2c` on new PBES2 tokens
    pub pbes2_iterations: u32,
    /// Random salt length written to `p2s` on new PBES2 tokens
    pub pbes2_salt_size: usize,
    /// Largest `p2c` accepted from a token being decrypted
    pub pbes2_max_iterations: u32,
}

impl Default for JoseConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl JoseConfig {
    /// Balanced defaults
    #[must_use]
    pub fn standard() -> Self {
        Self {
            max_inflated_size: DEFAULT_MAX_INFLATED_SIZE,
            compression_level: 6,
            pbes2_iterations: 8192,
            pbes2_salt_size: 12,
            pbes2_max_iterations: 1_000_000,
        }
    }

    /// Tight ceilings for untrusted input, stronger PBES2 parameters on output
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_inflated_size: 64 * 1024,
            compression_level: 6,
            pbes2_iterations: 310_000,
            pbes2_salt_size: 16,
            pbes2_max_iterations: 600_000,
        }
    }

    /// Generous ceilings for trusted peers exchanging large payloads
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_inflated_size: 16 * 1024 * 1024,
            compression_level: 6,
            pbes2_iterations: 8192,
            pbes2_salt_size: 12,
            pbes2_max_iterations: 10_000_000,
        }
    }

    /// Set the inflated payload ceiling
    #[must_use]
    pub fn with_max_inflated_size(mut self, bytes: usize) -> Self {
        self.max_inflated_size = bytes;
        self
    }

    /// Set the DEFLATE level
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the PBES2 iteration count for new tokens
    #[must_use]
    pub fn with_pbes2_iterations(mut self, iterations: u32) -> Self {
        self.pbes2_iterations = iterations;
        self
    }

    /// Set the PBES2 salt length for new tokens
    #[must_use]
    pub fn with_pbes2_salt_size(mut self, bytes: usize) -> Self {
        self.pbes2_salt_size = bytes;
        self
    }

    /// Set the largest PBES2 iteration count accepted on decrypt
    #[must_use]
    pub fn with_pbes2_max_iterations(mut self, iterations: u32) -> Self {
        self.pbes2_max_iterations = iterations;
        self
    }

    /// Check that the settings are usable together
    ///
    /// # Errors
    /// Returns `JoseError::InvalidConfig` when the compression level is above 9,
    /// the PBES2 salt is shorter than 8 bytes, the PBES2 iteration count is zero,
    /// or new tokens would use more iterations than this engine accepts back.
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(JoseError::invalid_config(format!(
                "compression level {} is outside 0-9",
                self.compression_level
            )));
        }
        if self.pbes2_salt_size < MIN_PBES2_SALT_SIZE {
            return Err(JoseError::invalid_config(format!(
                "PBES2 salt of {} bytes is shorter than {MIN_PBES2_SALT_SIZE}",
                self.pbes2_salt_size
            )));
        }
        if self.pbes2_iterations == 0 {
            return Err(JoseError::invalid_config("PBES2 iteration count is zero"));
        }
        if self.pbes2_iterations > self.pbes2_max_iterations {
            return Err(JoseError::invalid_config(format!(
                "PBES2 iteration count {} exceeds accepted maximum {}",
                self.pbes2_iterations, self.pbes2_max_iterations
            )));
        }
        Ok(())
    }
}
