//! Response DTO
//!
//! JSON shape returned to callers of the optimizer.

use serde::{Deserialize, Serialize};
use splitroute_core::RouterError;

use crate::quote::SplitRoute;

/// Serialized outcome of one routing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_routes: Option<Vec<SplitRoute>>,
    /// Stable error code, e.g. `TRADE_AMOUNT_TOO_HIGH`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RouteResponse {
    pub fn routes(best_routes: Vec<SplitRoute>) -> Self {
        Self {
            success: true,
            best_routes: Some(best_routes),
            error: None,
            detail: None,
        }
    }

    pub fn failure(err: &RouterError) -> Self {
        Self {
            success: false,
            best_routes: None,
            error: Some(err.error_code().to_string()),
            detail: err.detail(),
        }
    }

    /// Successful call that found nothing to execute
    pub fn is_no_route(&self) -> bool {
        self.success && self.best_routes.as_ref().map_or(true, Vec::is_empty)
    }
}

impl From<Result<Vec<SplitRoute>, RouterError>> for RouteResponse {
    fn from(result: Result<Vec<SplitRoute>, RouterError>) -> Self {
        match result {
            Ok(routes) => Self::routes(routes),
            Err(err) => Self::failure(&err),
        }
    }
}
