use serde::{Deserialize, Serialize};

/// Response to an on-demand scan submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Scan identifier, used to poll its status
    pub id: String,

    /// Number of IPs queued
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub credits_left: i64,
}

/// Progress of an on-demand scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStatus {
    pub id: String,

    #[serde(default)]
    pub count: u64,

    /// One of SUBMITTING, QUEUE, PROCESSING, DONE
    pub status: String,

    #[serde(default)]
    pub created: Option<String>,
}

impl ScanStatus {
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.eq_ignore_ascii_case("done")
    }
}
