//! Trainer configuration
//!
//! Defaults, overridable through `CUBEMEMO_*` environment variables.
//! Unparsable values keep the default and log a warning.

use std::path::PathBuf;
use std::str::FromStr;

use crate::cube::DEFAULT_SCRAMBLE_LENGTH;
use crate::encoding::EncodingConvention;
use crate::fsrs::{FSRSParameters, DEFAULT_MAXIMUM_INTERVAL, DEFAULT_RETENTION};
use crate::session::DEFAULT_NEW_CARDS_LIMIT;

pub const ENV_DATA_DIR: &str = "CUBEMEMO_DATA_DIR";
pub const ENV_NEW_CARDS_LIMIT: &str = "CUBEMEMO_NEW_CARDS_LIMIT";
pub const ENV_SCRAMBLE_LENGTH: &str = "CUBEMEMO_SCRAMBLE_LENGTH";
pub const ENV_ENCODING: &str = "CUBEMEMO_ENCODING";
pub const ENV_REQUEST_RETENTION: &str = "CUBEMEMO_REQUEST_RETENTION";
pub const ENV_MAXIMUM_INTERVAL: &str = "CUBEMEMO_MAXIMUM_INTERVAL";
pub const ENV_ENABLE_FUZZ: &str = "CUBEMEMO_ENABLE_FUZZ";

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// `None` means the platform data directory
    pub data_dir: Option<PathBuf>,
    /// Limit for sessions created fresh
    pub new_cards_limit: u32,
    pub scramble_length: usize,
    /// Encoding used when there is no saved state
    pub encoding: EncodingConvention,
    pub request_retention: f64,
    pub maximum_interval: u32,
    pub enable_fuzz: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            new_cards_limit: DEFAULT_NEW_CARDS_LIMIT,
            scramble_length: DEFAULT_SCRAMBLE_LENGTH,
            encoding: EncodingConvention::default(),
            request_retention: DEFAULT_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzz: false,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(text) => text.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %text, "Ignoring unparsable setting");
            default
        }),
    }
}

impl TrainerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let encoding = match lookup(ENV_ENCODING) {
            None => defaults.encoding,
            Some(name) => EncodingConvention::parse_name(&name).unwrap_or_else(|| {
                tracing::warn!(key = ENV_ENCODING, value = %name, "Unknown encoding");
                defaults.encoding
            }),
        };

        let request_retention = parse_or(
            ENV_REQUEST_RETENTION,
            lookup(ENV_REQUEST_RETENTION),
            defaults.request_retention,
        );
        let request_retention = if request_retention > 0.0 && request_retention < 1.0 {
            request_retention
        } else {
            tracing::warn!(request_retention, "Retention must lie in (0, 1)");
            defaults.request_retention
        };

        Self {
            data_dir: lookup(ENV_DATA_DIR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            new_cards_limit: parse_or(
                ENV_NEW_CARDS_LIMIT,
                lookup(ENV_NEW_CARDS_LIMIT),
                defaults.new_cards_limit,
            )
            .max(1),
            scramble_length: parse_or(
                ENV_SCRAMBLE_LENGTH,
                lookup(ENV_SCRAMBLE_LENGTH),
                defaults.scramble_length,
            ),
            encoding,
            request_retention,
            maximum_interval: parse_or(
                ENV_MAXIMUM_INTERVAL,
                lookup(ENV_MAXIMUM_INTERVAL),
                defaults.maximum_interval,
            )
            .max(1),
            enable_fuzz: parse_or(ENV_ENABLE_FUZZ, lookup(ENV_ENABLE_FUZZ), defaults.enable_fuzz),
        }
    }

    pub fn fsrs_parameters(&self) -> FSRSParameters {
        FSRSParameters {
            request_retention: self.request_retention,
            maximum_interval: self.maximum_interval,
            enable_fuzz: self.enable_fuzz,
            ..FSRSParameters::default()
        }
    }
}
