//! `GraphSourceClient` — the single `GraphSource` implementation.
//!
//! One pooled reqwest client built at startup; every call is bounded by
//! min(per-call timeout, remaining request deadline) and classified into
//! the core taxonomy on failure.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use ripple_core::{
    CentralityScore, Deadline, GraphSource, ImpactError, NeighborhoodPayload, RippleConfig,
    SourceHealth,
};

use crate::endpoints;
use crate::payload::{HealthDto, ServicesDto};

/// Logical source name carried into freshness payloads and logs.
const SOURCE_NAME: &str = "graph-service";

pub struct GraphSourceClient {
    http: reqwest::Client,
    base_url: Url,
    call_timeout: Duration,
}

impl GraphSourceClient {
    pub fn new(config: &RippleConfig) -> Result<Self, ImpactError> {
        if config.upstream_base_url.is_empty() {
            return Err(ImpactError::validation("upstream_base_url is required"));
        }
        let base_url = Url::parse(&config.upstream_base_url).map_err(|e| {
            ImpactError::validation(format!("invalid upstream_base_url: {e}"))
        })?;
        let call_timeout = config.effective_upstream_timeout();
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(10)))
            .timeout(call_timeout)
            .build()
            .map_err(|e| ImpactError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            call_timeout,
        })
    }

    /// GET an endpoint and decode its JSON body.
    ///
    /// `named_service` marks calls where an upstream 404 means "this
    /// service does not exist" rather than a broken source.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        named_service: Option<&str>,
        deadline: &Deadline,
    ) -> Result<T, ImpactError> {
        deadline.check(endpoint)?;
        let started = Instant::now();

        let mut url = self.base_url.join(endpoint).map_err(|e| {
            ImpactError::internal(format!("invalid endpoint {endpoint}: {e}"))
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let response = self
            .http
            .get(url)
            .timeout(deadline.cap(self.call_timeout))
            .send()
            .await
            .map_err(|e| self.classify_transport(endpoint, e, started))?;

        let status = response.status();
        if let Some(err) = classify_status(status, named_service) {
            warn_failed(endpoint, started, &err);
            return Err(err);
        }

        match response.json::<T>().await {
            Ok(body) => {
                tracing::debug!(
                    endpoint,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "upstream call ok"
                );
                Ok(body)
            }
            Err(e) => {
                let err = ImpactError::Protocol {
                    message: format!("{endpoint}: {e}"),
                };
                warn_failed(endpoint, started, &err);
                Err(err)
            }
        }
    }

    fn classify_transport(
        &self,
        endpoint: &str,
        error: reqwest::Error,
        started: Instant,
    ) -> ImpactError {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let classified = if error.is_timeout() {
            ImpactError::SourceTimeout {
                operation: endpoint.to_string(),
                elapsed_ms,
            }
        } else if error.is_decode() {
            ImpactError::Protocol {
                message: format!("{endpoint}: {error}"),
            }
        } else {
            // Connect refusals, DNS failures, and broken transports all
            // land here; reqwest's messages are credential-free.
            ImpactError::SourceUnavailable {
                message: format!("{endpoint}: {error}"),
            }
        };
        tracing::warn!(endpoint, elapsed_ms, error = %classified, "upstream call failed");
        classified
    }
}

/// Map a non-success status into the taxonomy; `None` means proceed.
fn classify_status(status: StatusCode, named_service: Option<&str>) -> Option<ImpactError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(service) = named_service {
            return Some(ImpactError::ServiceNotFound {
                service: service.to_string(),
            });
        }
    }
    Some(ImpactError::Upstream {
        message: format!("upstream returned {status}"),
    })
}

fn warn_failed(endpoint: &str, started: Instant, err: &ImpactError) {
    tracing::warn!(
        endpoint,
        elapsed_ms = started.elapsed().as_millis() as u64,
        error = %err,
        "upstream call failed"
    );
}

#[async_trait]
impl GraphSource for GraphSourceClient {
    async fn check_health(&self, deadline: &Deadline) -> Result<SourceHealth, ImpactError> {
        let dto: HealthDto = self
            .get_json(endpoints::HEALTH, &[], None, deadline)
            .await?;
        Ok(dto.into_health(SOURCE_NAME))
    }

    async fn get_neighborhood(
        &self,
        service: &str,
        depth: u32,
        deadline: &Deadline,
    ) -> Result<NeighborhoodPayload, ImpactError> {
        self.get_json(
            endpoints::NEIGHBORHOOD,
            &[("service", service.to_string()), ("depth", depth.to_string())],
            Some(service),
            deadline,
        )
        .await
    }

    async fn get_centrality_scores(
        &self,
        deadline: &Deadline,
    ) -> Result<Vec<CentralityScore>, ImpactError> {
        self.get_json(endpoints::CENTRALITY, &[], None, deadline)
            .await
    }

    async fn list_services(&self, deadline: &Deadline) -> Result<Vec<String>, ImpactError> {
        let dto: ServicesDto = self
            .get_json(endpoints::SERVICES, &[], None, deadline)
            .await?;
        Ok(dto.services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(classify_status(StatusCode::OK, None).is_none());

        let err = classify_status(StatusCode::NOT_FOUND, Some("checkout")).unwrap();
        assert!(matches!(err, ImpactError::ServiceNotFound { ref service } if service == "checkout"));

        // 404 on an unnamed endpoint is a broken source, not a missing service.
        let err = classify_status(StatusCode::NOT_FOUND, None).unwrap();
        assert!(matches!(err, ImpactError::Upstream { .. }));

        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, Some("checkout")).unwrap();
        assert!(matches!(err, ImpactError::Upstream { .. }));

        let err = classify_status(StatusCode::BAD_GATEWAY, None).unwrap();
        assert!(matches!(err, ImpactError::Upstream { .. }));
    }

    #[test]
    fn rejects_missing_base_url() {
        let config = RippleConfig::default();
        assert!(matches!(
            GraphSourceClient::new(&config),
            Err(ImpactError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_malformed_base_url() {
        let config = RippleConfig {
            upstream_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            GraphSourceClient::new(&config),
            Err(ImpactError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn expired_deadline_short_circuits_before_io() {
        let config = RippleConfig {
            upstream_base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = GraphSourceClient::new(&config).unwrap();
        let deadline = Deadline::after(Duration::ZERO);
        let err = client.check_health(&deadline).await.unwrap_err();
        assert!(matches!(err, ImpactError::SourceTimeout { .. }));
    }
}
