//! Body of `GET /health`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: OverallStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

/// One probe per backing dependency.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: Probe,
    pub mail: Probe,
}

#[derive(Debug, Serialize)]
pub struct Probe {
    pub status: ProbeStatus,
    pub message: String,
}

impl Probe {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Ok,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Error,
            message: message.into(),
        }
    }
}

impl HealthChecks {
    pub fn overall(&self) -> OverallStatus {
        if [&self.database, &self.mail]
            .iter()
            .all(|p| p.status == ProbeStatus::Ok)
        {
            OverallStatus::Healthy
        } else {
            OverallStatus::Degraded
        }
    }
}
