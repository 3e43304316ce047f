use crate::{env_parse, ConfigError, FromEnv};

/// Bounds of the id sequence used by the in-memory entity store.
///
/// The defaults here are the only definition of the product id range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub id_start: i32,
    pub id_max: i32,
}

impl StoreConfig {
    pub const DEFAULT_ID_START: i32 = 100_000;
    pub const DEFAULT_ID_MAX: i32 = 999_999;

    pub fn new(id_start: i32, id_max: i32) -> Result<Self, ConfigError> {
        if id_start < 1 {
            return Err(ConfigError::Invalid {
                key: "PRODUCT_ID_START".to_string(),
                details: format!("must be at least 1, got {}", id_start),
            });
        }
        if id_start > id_max {
            return Err(ConfigError::Invalid {
                key: "PRODUCT_ID_MAX".to_string(),
                details: format!("must not be below PRODUCT_ID_START ({})", id_start),
            });
        }
        Ok(Self { id_start, id_max })
    }
}

impl FromEnv for StoreConfig {
    /// Reads:
    /// - PRODUCT_ID_START: defaults to 100000
    /// - PRODUCT_ID_MAX: defaults to 999999
    fn from_env() -> Result<Self, ConfigError> {
        let id_start = env_parse("PRODUCT_ID_START", Self::DEFAULT_ID_START)?;
        let id_max = env_parse("PRODUCT_ID_MAX", Self::DEFAULT_ID_MAX)?;
        Self::new(id_start, id_max)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_start: Self::DEFAULT_ID_START,
            id_max: Self::DEFAULT_ID_MAX,
        }
    }
}
