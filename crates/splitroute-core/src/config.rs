//! Configuration types for Splitroute

use serde::{Deserialize, Serialize};

use crate::RouterError;

/// Tuning knobs for one optimizer call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Slice granularity in percent (20 gives 20, 40, 60, 80, 100)
    #[serde(default = "default_percent_increment")]
    pub percent_increment: u8,

    /// Maximum number of ranked combinations returned
    #[serde(default = "default_num_top_routes")]
    pub num_top_routes: usize,

    /// Route quotes kept per percentage bucket before combining
    #[serde(default = "default_num_top_partial_quotes")]
    pub num_top_partial_quotes: usize,

    /// Maximum number of routes combined into one split
    #[serde(default = "default_max_splits")]
    pub max_splits: usize,
}

fn default_percent_increment() -> u8 {
    20
}

fn default_num_top_routes() -> usize {
    50
}

fn default_num_top_partial_quotes() -> usize {
    10
}

fn default_max_splits() -> usize {
    3
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            percent_increment: default_percent_increment(),
            num_top_routes: default_num_top_routes(),
            num_top_partial_quotes: default_num_top_partial_quotes(),
            max_splits: default_max_splits(),
        }
    }
}

impl RouterConfig {
    /// Apply caller overrides on top of this configuration.
    pub fn merged(&self, options: &RouteOptions) -> Self {
        Self {
            percent_increment: options.percent_increment.unwrap_or(self.percent_increment),
            num_top_routes: options.num_top_routes.unwrap_or(self.num_top_routes),
            num_top_partial_quotes: options
                .num_top_partial_quotes
                .unwrap_or(self.num_top_partial_quotes),
            max_splits: options.max_splits.unwrap_or(self.max_splits),
        }
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.percent_increment == 0 || self.percent_increment > 100 {
            return Err(RouterError::InvalidConfig {
                message: format!(
                    "percentIncrement must be within 1..=100, got {}",
                    self.percent_increment
                ),
            });
        }
        if self.num_top_routes == 0 {
            return Err(RouterError::InvalidConfig {
                message: "numTopRoutes must be greater than zero".to_string(),
            });
        }
        if self.num_top_partial_quotes == 0 {
            return Err(RouterError::InvalidConfig {
                message: "numTopPartialQuotes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// `max_splits` with zero treated as "no splitting".
    pub fn effective_max_splits(&self) -> usize {
        self.max_splits.max(1)
    }
}

/// Optional per-call overrides of [`RouterConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_increment: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_top_routes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_top_partial_quotes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_splits: Option<usize>,
}
