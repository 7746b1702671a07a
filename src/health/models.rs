use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    pub last_checked: DateTime<Utc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl ComponentHealth {
    fn with_status(status: ComponentStatus, message: Option<String>, elapsed: Option<u64>) -> Self {
        Self {
            status,
            message,
            response_time_ms: elapsed,
            last_checked: Utc::now(),
            details: BTreeMap::new(),
        }
    }

    pub fn healthy(response_time_ms: u64) -> Self {
        Self::with_status(ComponentStatus::Healthy, None, Some(response_time_ms))
    }

    pub fn degraded(message: impl Into<String>, response_time_ms: Option<u64>) -> Self {
        Self::with_status(ComponentStatus::Degraded, Some(message.into()), response_time_ms)
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Unhealthy, Some(message.into()), None)
    }

    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Body of `GET /health_check/components`
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    pub status: ComponentStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthCheckResponse {
    pub fn new(version: String, uptime_seconds: u64) -> Self {
        Self {
            status: ComponentStatus::Healthy,
            timestamp: Utc::now(),
            version,
            uptime_seconds,
            components: BTreeMap::new(),
        }
    }

    /// Overall status is the worst component status
    pub fn add_component(&mut self, name: &str, health: ComponentHealth) {
        match (self.status, health.status) {
            (_, ComponentStatus::Unhealthy) => self.status = ComponentStatus::Unhealthy,
            (ComponentStatus::Healthy, ComponentStatus::Degraded) => {
                self.status = ComponentStatus::Degraded
            }
            _ => {}
        }
        self.components.insert(name.to_string(), health);
    }

    pub fn is_unhealthy(&self) -> bool {
        self.status == ComponentStatus::Unhealthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_component_wins() {
        let mut report = HealthCheckResponse::new("0.1.0".to_string(), 1);
        report.add_component("database", ComponentHealth::healthy(2));
        assert_eq!(report.status, ComponentStatus::Healthy);

        report.add_component("llm", ComponentHealth::degraded("slow", Some(1500)));
        assert_eq!(report.status, ComponentStatus::Degraded);

        report.add_component("retriever", ComponentHealth::unhealthy("down"));
        report.add_component("other", ComponentHealth::degraded("slow", None));
        assert!(report.is_unhealthy());
    }

    #[test]
    fn empty_details_are_not_serialized() {
        let value = serde_json::to_value(ComponentHealth::healthy(3)).unwrap();
        assert_eq!(value["status"], "healthy");
        assert!(value.get("details").is_none());
        assert!(value.get("message").is_none());
    }
}
