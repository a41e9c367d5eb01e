//! Runtime configuration.
//!
//! Consolidates the environment variable reads and provides validated
//! settings for the draw generator, new rounds and card packs.

use crate::game::entities::RoundType;

/// Largest card pack `CardPack::generate_from_config` will build.
const MAX_CARD_PACK_SIZE: u32 = 10_000;

/// Settings loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct LotoConfig {
    /// Fixed seed for reproducible draws (`LOTO_RNG_SEED`)
    pub rng_seed: Option<u64>,
    /// Kind given to rounds created from the config (`LOTO_DEFAULT_ROUND_TYPE`)
    pub default_round_type: RoundType,
    /// Seconds each pause slide stays up (`LOTO_DIAPORAMA_DELAY_SECS`)
    pub diaporama_delay_secs: f64,
    /// Cards generated per pack (`LOTO_CARD_PACK_SIZE`)
    pub card_pack_size: u32,
}

impl Default for LotoConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            default_round_type: RoundType::OneTwoQuineFullCard,
            diaporama_delay_secs: 5.0,
            card_pack_size: 100,
        }
    }
}

impl LotoConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a seed or round type is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let rng_seed = std::env::var("LOTO_RNG_SEED")
            .ok()
            .map(|v| {
                v.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                    var: "LOTO_RNG_SEED".to_string(),
                    reason: format!("{v:?} is not an unsigned integer"),
                })
            })
            .transpose()?;

        let default_round_type = match std::env::var("LOTO_DEFAULT_ROUND_TYPE") {
            Ok(v) => parse_round_type(&v).ok_or_else(|| ConfigError::Invalid {
                var: "LOTO_DEFAULT_ROUND_TYPE".to_string(),
                reason: format!("unknown round type {v:?}"),
            })?,
            Err(_) => defaults.default_round_type,
        };

        Ok(LotoConfig {
            rng_seed,
            default_round_type,
            diaporama_delay_secs: parse_env_or(
                "LOTO_DIAPORAMA_DELAY_SECS",
                defaults.diaporama_delay_secs,
            ),
            card_pack_size: parse_env_or("LOTO_CARD_PACK_SIZE", defaults.card_pack_size),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diaporama_delay_secs.is_nan() || self.diaporama_delay_secs < 0.0 {
            return Err(ConfigError::Invalid {
                var: "LOTO_DIAPORAMA_DELAY_SECS".to_string(),
                reason: "Must be zero (no slideshow) or a positive number of seconds".to_string(),
            });
        }

        if self.card_pack_size == 0 {
            return Err(ConfigError::Invalid {
                var: "LOTO_CARD_PACK_SIZE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.card_pack_size > MAX_CARD_PACK_SIZE {
            return Err(ConfigError::Invalid {
                var: "LOTO_CARD_PACK_SIZE".to_string(),
                reason: format!("Must be at most {MAX_CARD_PACK_SIZE}"),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Accepts either the variant name in any case (`fullcard`) or the localized
/// name (`Gros lot`).
fn parse_round_type(value: &str) -> Option<RoundType> {
    let value = value.trim();
    let by_ident = match value.to_lowercase().as_str() {
        "onequine" => Some(RoundType::OneQuine),
        "twoquines" => Some(RoundType::TwoQuines),
        "fullcard" => Some(RoundType::FullCard),
        "onequinefullcard" => Some(RoundType::OneQuineFullCard),
        "onetwoquinefullcard" => Some(RoundType::OneTwoQuineFullCard),
        "enfant" => Some(RoundType::Enfant),
        "inverse" => Some(RoundType::Inverse),
        "pause" => Some(RoundType::Pause),
        _ => None,
    };
    by_ident.or_else(|| value.parse().ok())
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
