use serde::{Deserialize, Serialize};

use preauth_types::EntityKind;

use crate::error::{RegistryError, RegistryResult};

/// Tunables for key generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Probe the store and retry until a generated key is unused.
    pub unique_keys: bool,
    /// Upper bound on probes per generated key when `unique_keys` is set.
    pub max_key_attempts: u32,
    /// Exclusive bound of the numeric suffix for sub-record keys.
    pub sub_record_key_range: u32,
    /// Exclusive bound of the numeric suffix for composite form keys.
    pub form_key_range: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            unique_keys: true,
            max_key_attempts: 16,
            sub_record_key_range: EntityKind::Provider.default_key_range(),
            form_key_range: EntityKind::PreAuth.default_key_range(),
        }
    }
}

impl RegistryConfig {
    /// Plain random keys with no collision probing.
    pub fn unchecked() -> Self {
        Self {
            unique_keys: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> RegistryResult<()> {
        if self.sub_record_key_range == 0 || self.form_key_range == 0 {
            return Err(RegistryError::Config("key ranges must be non-zero".into()));
        }
        if self.unique_keys && self.max_key_attempts == 0 {
            return Err(RegistryError::Config(
                "max_key_attempts must be at least 1 when unique_keys is set".into(),
            ));
        }
        Ok(())
    }
}
