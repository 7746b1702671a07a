use super::models::{ComponentHealth, HealthCheckResponse};
use crate::connectors::{ConnectorError, LlmConnector, RetrieverConnector};
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const SLOW_RESPONSE_THRESHOLD_MS: u64 = 1000;

/// Probes the database and the external connectors concurrently
pub struct HealthChecker {
    pool: SqlitePool,
    llm: Arc<dyn LlmConnector>,
    retriever: Arc<dyn RetrieverConnector>,
    start_time: Instant,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn timed_out() -> ComponentHealth {
    ComponentHealth::unhealthy("Timeout")
}

impl HealthChecker {
    pub fn new(
        pool: SqlitePool,
        llm: Arc<dyn LlmConnector>,
        retriever: Arc<dyn RetrieverConnector>,
    ) -> Self {
        Self {
            pool,
            llm,
            retriever,
            start_time: Instant::now(),
        }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let version = env!("CARGO_PKG_VERSION").to_string();
        let uptime = self.start_time.elapsed().as_secs();
        let mut response = HealthCheckResponse::new(version, uptime);

        let (db_result, llm_result, retriever_result) = tokio::join!(
            timeout(CHECK_TIMEOUT, self.check_database()),
            timeout(CHECK_TIMEOUT, check_connector("LLM server", self.llm.health())),
            timeout(
                CHECK_TIMEOUT,
                check_connector("Retriever", self.retriever.health())
            ),
        );

        response.add_component("database", db_result.unwrap_or_else(|_| timed_out()));
        response.add_component("llm", llm_result.unwrap_or_else(|_| timed_out()));
        response.add_component(
            "retriever",
            retriever_result.unwrap_or_else(|_| timed_out()),
        );

        response
    }

    #[tracing::instrument(name = "Check database health", skip(self))]
    async fn check_database(&self) -> ComponentHealth {
        let start = Instant::now();

        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                let elapsed = elapsed_ms(start);
                let health = if elapsed > SLOW_RESPONSE_THRESHOLD_MS {
                    ComponentHealth::degraded("Database responding slowly", Some(elapsed))
                } else {
                    ComponentHealth::healthy(elapsed)
                };

                health
                    .detail("pool_size", self.pool.size())
                    .detail("idle_connections", self.pool.num_idle() as u64)
            }
            Err(e) => {
                tracing::error!("Database health check failed: {:?}", e);
                ComponentHealth::unhealthy(format!("Database error: {}", e))
            }
        }
    }
}

async fn check_connector<F>(name: &str, probe: F) -> ComponentHealth
where
    F: Future<Output = Result<(), ConnectorError>>,
{
    let start = Instant::now();

    match probe.await {
        Ok(()) => {
            let elapsed = elapsed_ms(start);
            if elapsed > SLOW_RESPONSE_THRESHOLD_MS {
                ComponentHealth::degraded(format!("{} responding slowly", name), Some(elapsed))
            } else {
                ComponentHealth::healthy(elapsed)
            }
        }
        Err(e) => {
            tracing::warn!("{} health check failed: {}", name, e);
            ComponentHealth::unhealthy(format!("{} error: {}", name, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::llm_service::mock::MockLlmConnector;
    use crate::connectors::retriever_service::mock::MockRetrieverConnector;
    use crate::health::ComponentStatus;

    #[tokio::test]
    async fn reports_every_component() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let checker = HealthChecker::new(
            pool,
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
        );

        let report = checker.check_all().await;
        assert_eq!(report.status, ComponentStatus::Healthy);
        assert_eq!(
            report.components.keys().collect::<Vec<_>>(),
            vec!["database", "llm", "retriever"]
        );
    }

    #[tokio::test]
    async fn failing_probe_is_unhealthy() {
        let health = check_connector("LLM server", async {
            Err(ConnectorError::ServiceUnavailable("connection refused".to_string()))
        })
        .await;

        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert!(health.message.unwrap().starts_with("LLM server error"));
    }
}
