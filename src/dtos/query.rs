//! Query DTOs - query string parameters

use crate::core::AppError;
use serde::{Deserialize, Serialize};

/// Trip search filters; empty or missing values mean "no filter"
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TripSearchQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

impl TripSearchQuery {
    /// Destination substring as sent, `None` when blank
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Budget ceiling, `Ok(None)` when blank
    pub fn budget(&self) -> Result<Option<f64>, AppError> {
        match self.budget.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|b| b.is_finite())
                .map(Some)
                .ok_or_else(|| AppError::bad_request("Budget must be a number")),
        }
    }
}
