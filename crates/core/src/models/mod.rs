pub mod announcement;
pub mod booking;
pub mod calendar;
pub mod schedule;
pub mod window;

use serde::{Deserialize, Serialize};

/// Body returned by every write endpoint that has nothing else to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
