//! Error types for Splitroute

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::TokenId;

/// Call-level routing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("No route exists between {input} and {output}")]
    RouteDoesNotExist { input: TokenId, output: TokenId },

    #[error("Trade amount must be greater than zero")]
    ZeroInputAmount,

    #[error("Trade amount is too high for the available liquidity")]
    TradeAmountTooHigh,

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid router configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Routing failed: {detail}")]
    General { detail: String },
}

impl RouterError {
    pub fn general(detail: impl Into<String>) -> Self {
        Self::General {
            detail: detail.into(),
        }
    }

    /// Get a stable, wire-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RouteDoesNotExist { .. } => "ROUTE_DOES_NOT_EXIST",
            Self::ZeroInputAmount => "ZERO_INPUT_AMOUNT",
            Self::TradeAmountTooHigh => "TRADE_AMOUNT_TOO_HIGH",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::General { .. } => "GENERAL",
        }
    }

    /// Diagnostic detail for the variants that carry one
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::RouteDoesNotExist { input, output } => Some(format!("{} -> {}", input, output)),
            Self::InvalidAmount { message } | Self::InvalidConfig { message } => {
                Some(message.clone())
            }
            Self::General { detail } => Some(detail.clone()),
            Self::ZeroInputAmount | Self::TradeAmountTooHigh => None,
        }
    }
}

impl From<anyhow::Error> for RouterError {
    fn from(err: anyhow::Error) -> Self {
        Self::General {
            detail: format!("{:#}", err),
        }
    }
}

/// Result type alias for routing operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Per-hop failure reported by a quote engine.
///
/// These never reach the caller individually; the optimizer collects the
/// kinds it observed to diagnose an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteErrorKind {
    /// The swap ran past the last fetched price-range window
    SequenceExhausted,
    /// A required price-range window has not been initialized on-chain
    RangeNotInitialized,
    /// The swap crossed into a window outside the provided sequence
    RangeCrossing,
    /// The price moved beyond the allowed bounds
    PriceLimitExceeded,
    ZeroTradableAmount,
    AmountOutBelowMinimum,
    AmountInAboveMaximum,
    InvalidPriceLimitDirection,
}

impl QuoteErrorKind {
    /// Whether this failure means the pool ran out of liquidity for the size
    pub fn is_liquidity_exhaustion(&self) -> bool {
        matches!(self, Self::SequenceExhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SequenceExhausted => "sequence_exhausted",
            Self::RangeNotInitialized => "range_not_initialized",
            Self::RangeCrossing => "range_crossing",
            Self::PriceLimitExceeded => "price_limit_exceeded",
            Self::ZeroTradableAmount => "zero_tradable_amount",
            Self::AmountOutBelowMinimum => "amount_out_below_minimum",
            Self::AmountInAboveMaximum => "amount_in_above_maximum",
            Self::InvalidPriceLimitDirection => "invalid_price_limit_direction",
        }
    }
}

impl fmt::Display for QuoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
