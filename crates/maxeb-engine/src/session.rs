//! Recalculation state for a view layer.
//!
//! A view recalculates on every input change. A failed run records its
//! message and leaves the last good result in place until a later run
//! succeeds.

use maxeb_types::{ComparisonResult, SimulationInput};

use crate::compare::calculate;
use crate::Result;

/// Latest successful result plus the latest failure message.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    result: Option<ComparisonResult>,
    error: Option<String>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute for `input`.
    ///
    /// Clears the previous error first. On success the new result replaces
    /// the old one; on failure the message is kept and the old result stays.
    pub fn recalculate(&mut self, input: &SimulationInput) -> Result<&ComparisonResult> {
        self.error = None;
        match calculate(input) {
            Ok(result) => Ok(&*self.result.insert(result)),
            Err(e) => {
                tracing::warn!(error = %e, "calculation failed, keeping previous result");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
