//! Health check service for verifying dependencies
//!
//! Checks the PostgreSQL pool and the Gemini API. Spotify is called with
//! per-user tokens only, so it has no service-level check.

use serde::Serialize;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use vibelist_gemini_client::GeminiClient;

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub name: &'static str,
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceHealth {
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: None,
            details: None,
        }
    }

    pub fn unhealthy(
        name: &'static str,
        error: impl Into<String>,
        response_time: Duration,
    ) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: Some(error.into()),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Healthy only if every service is healthy
    pub status: ServiceStatus,
    pub services: Vec<ServiceHealth>,
    pub total_time_ms: u64,
    pub version: &'static str,
}

impl HealthCheckResponse {
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services.iter().all(|s| s.status == ServiceStatus::Healthy) {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service
#[derive(Clone)]
pub struct HealthService {
    pool: PgPool,
    gemini: GeminiClient,
}

impl HealthService {
    pub fn new(pool: PgPool, gemini: GeminiClient) -> Self {
        Self { pool, gemini }
    }

    /// Run a trivial query on the shared pool
    pub async fn check_database(&self) -> ServiceHealth {
        let start = Instant::now();
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => ServiceHealth::healthy("database", start.elapsed()),
            Err(e) => ServiceHealth::unhealthy(
                "database",
                format!("Query failed: {}", e),
                start.elapsed(),
            ),
        }
    }

    /// Confirm the configured model is reachable with the configured key
    pub async fn check_gemini(&self) -> ServiceHealth {
        let start = Instant::now();
        let details = serde_json::json!({ "model": self.gemini.config().model });
        match self.gemini.health_check().await {
            Ok(true) => ServiceHealth::healthy("gemini", start.elapsed()).with_details(details),
            Ok(false) => ServiceHealth::unhealthy("gemini", "Model not available", start.elapsed())
                .with_details(details),
            Err(e) => ServiceHealth::unhealthy("gemini", e.to_string(), start.elapsed())
                .with_details(details),
        }
    }

    /// Run all health checks in parallel
    pub async fn check_all(&self) -> HealthCheckResponse {
        let start = Instant::now();
        let (database, gemini) = tokio::join!(self.check_database(), self.check_gemini());
        HealthCheckResponse::new(vec![database, gemini], start.elapsed())
    }
}
