//! Healthcheck engine integration tests
//!
//! Every test talks HTTP to a wiremock server or to a closed local port.

#[cfg(test)]
mod tests {
    use crate::common::{
        endpoint_for, fast_options, hang_up_url, healthy_service, refused_url, request_count,
        service_with,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use platform_health::monitoring::telemetry::{
        TelemetryEvent, TelemetryExporter, TelemetrySampler, TelemetryTracer,
    };
    use platform_health::{
        HealthError, HealthStatus, HealthcheckEngine, HealthcheckOptions, ServiceEndpoint,
    };
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct CollectingExporter {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    #[async_trait]
    impl TelemetryExporter for CollectingExporter {
        fn name(&self) -> &str {
            "collecting"
        }

        async fn export(&self, batch: &[TelemetryEvent]) -> platform_health::Result<()> {
            self.events.lock().extend_from_slice(batch);
            Ok(())
        }
    }

    // ==================== Single endpoint ====================

    #[tokio::test]
    async fn test_healthy_endpoint() {
        let server = healthy_service("/healthz").await;
        let engine = HealthcheckEngine::new(fast_options()).unwrap();

        let health = engine.check(&endpoint_for("api", &server, "/healthz")).await;

        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.http_status_code, Some(200));
        assert!(health.error.is_none());
        assert_eq!(health.name, "api");
        assert_eq!(health.url, format!("{}/healthz", server.uri()));
    }

    #[tokio::test]
    async fn test_unexpected_status_is_unhealthy() {
        let server = service_with("/healthz", 503, None).await;
        let engine = HealthcheckEngine::new(fast_options()).unwrap();

        let health = engine.check(&endpoint_for("api", &server, "/healthz")).await;

        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.http_status_code, Some(503));
        assert_eq!(health.error.as_deref(), Some("Unexpected status: 503"));
    }

    #[tokio::test]
    async fn test_custom_expected_status_codes() {
        let server = service_with("/accepted", 202, None).await;
        let engine = HealthcheckEngine::new(fast_options()).unwrap();

        let default_codes = endpoint_for("jobs", &server, "/accepted");
        assert_eq!(engine.check(&default_codes).await.status, HealthStatus::Unhealthy);

        let custom = default_codes.with_expected_status_codes([202]);
        assert_eq!(engine.check(&custom).await.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_connection_refused_is_simplified() {
        let engine = HealthcheckEngine::new(fast_options()).unwrap();
        let endpoint = ServiceEndpoint::new("webapp", refused_url());

        let health = engine.check(&endpoint).await;

        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(
            health.error.as_deref(),
            Some("Connection refused - service not running")
        );
        assert!(health.http_status_code.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_ignores_words_in_the_url() {
        let engine = HealthcheckEngine::new(fast_options()).unwrap();
        let base = hang_up_url().await;
        let plain = ServiceEndpoint::new("plain", base.clone()).with_health_path("/healthz");
        let tls_named = ServiceEndpoint::new("tls", base).with_health_path("/tls-status");

        let plain = engine.check(&plain).await;
        let tls_named = engine.check(&tls_named).await;

        assert_eq!(plain.status, HealthStatus::Unhealthy);
        assert_eq!(tls_named.status, HealthStatus::Unhealthy);
        let error = tls_named.error.unwrap();
        assert!(!error.contains("SSL/TLS"), "{}", error);
        assert!(!error.contains("tls-status"), "{}", error);
        assert!(!error.contains("127.0.0.1"), "{}", error);
        assert!(error.matches("connection closed before message completed").count() <= 1);
    }

    #[tokio::test]
    async fn test_is_healthy() {
        let server = healthy_service("/ping").await;
        let engine = HealthcheckEngine::new(fast_options()).unwrap();

        assert!(engine.is_healthy(&endpoint_for("api", &server, "/ping")).await);
        assert!(
            !engine
                .is_healthy(&ServiceEndpoint::new("down", refused_url()))
                .await
        );
    }

    // ==================== Degraded threshold ====================

    #[tokio::test]
    async fn test_slow_response_is_degraded() {
        let server = service_with("/slow", 200, Some(Duration::from_millis(250))).await;
        let options = fast_options()
            .with_timeout(Duration::from_secs(2))
            .with_degraded_threshold_ms(100);
        let engine = HealthcheckEngine::new(options).unwrap();

        let health = engine.check(&endpoint_for("api", &server, "/slow")).await;

        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(health.response_time_ms >= 100);
        assert!(health.error.is_none());
    }

    #[tokio::test]
    async fn test_fast_response_under_threshold_is_healthy() {
        let server = service_with("/fast", 200, Some(Duration::from_millis(20))).await;
        let options = fast_options().with_degraded_threshold_ms(1_000);
        let engine = HealthcheckEngine::new(options).unwrap();

        let health = engine.check(&endpoint_for("api", &server, "/fast")).await;
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    // ==================== Retries ====================

    #[tokio::test]
    async fn test_retry_exhaustion_on_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hang"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(400)))
            .expect(3)
            .mount(&server)
            .await;

        let options = fast_options()
            .with_timeout(Duration::from_millis(100))
            .with_retry_count(2);
        let engine = HealthcheckEngine::new(options).unwrap();

        let health = engine.check(&endpoint_for("api", &server, "/hang")).await;

        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.error.as_deref(), Some("Request timed out"));
        assert_eq!(request_count(&server).await, 3);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_retry_stops_after_first_healthy_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let engine = HealthcheckEngine::new(fast_options().with_retry_count(2)).unwrap();
        let health = engine.check(&endpoint_for("api", &server, "/flaky")).await;

        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.http_status_code, Some(200));
        assert_eq!(request_count(&server).await, 2);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_retry_keeps_last_attempt_not_best() {
        let server = MockServer::start().await;
        // first attempt: slow but successful (Degraded)
        Mock::given(method("GET"))
            .and(path("/wobbly"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        // second attempt: hard failure
        Mock::given(method("GET"))
            .and(path("/wobbly"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let options = fast_options()
            .with_timeout(Duration::from_secs(2))
            .with_retry_count(1)
            .with_degraded_threshold_ms(100);
        let engine = HealthcheckEngine::new(options).unwrap();

        let health = engine.check(&endpoint_for("api", &server, "/wobbly")).await;

        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.error.as_deref(), Some("Unexpected status: 500"));
    }

    // ==================== Batches ====================

    #[tokio::test]
    async fn test_parallel_preserves_input_order() {
        let a = service_with("/a", 200, Some(Duration::from_millis(400))).await;
        let b = service_with("/b", 200, None).await;
        let c = service_with("/c", 200, Some(Duration::from_millis(400))).await;

        let options = fast_options()
            .with_timeout(Duration::from_secs(2))
            .with_parallel(true)
            .with_endpoints(vec![
                endpoint_for("a", &a, "/a"),
                endpoint_for("b", &b, "/b"),
                endpoint_for("c", &c, "/c"),
            ]);
        let engine = HealthcheckEngine::new(options).unwrap();

        let started = Instant::now();
        let result = engine.check_all().await;
        let elapsed = started.elapsed();

        let names: Vec<_> = result.services().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(result.overall_status(), HealthStatus::Healthy);
        // run concurrently, not back to back
        assert!(elapsed < Duration::from_millis(750), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_sequential_runs_in_list_order() {
        let a = healthy_service("/a").await;
        let b = service_with("/b", 500, None).await;

        let options = fast_options().with_endpoints(vec![
            endpoint_for("b", &b, "/b"),
            endpoint_for("a", &a, "/a"),
        ]);
        let engine = HealthcheckEngine::new(options).unwrap();
        let result = engine.check_all().await;

        let names: Vec<_> = result.services().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(result.overall_status(), HealthStatus::Unhealthy);
        assert_eq!(result.healthy_count(), 1);
        assert_eq!(result.unhealthy_count(), 1);
    }

    #[tokio::test]
    async fn test_local_scenario_with_one_service_down() {
        let api = service_with(
            "/healthz/readiness",
            200,
            Some(Duration::from_millis(50)),
        )
        .await;

        let options = HealthcheckOptions::local()
            .with_retry_count(0)
            .with_endpoints(vec![
                ServiceEndpoint::new("api", api.uri())
                    .with_health_path("/healthz/readiness")
                    .critical(true),
                ServiceEndpoint::new("webapp", refused_url()),
            ]);
        let engine = HealthcheckEngine::new(options).unwrap();

        let result = engine.check_all().await;

        assert_eq!(result.overall_status(), HealthStatus::Unhealthy);
        let api = result.service("api").unwrap();
        assert_eq!(api.status, HealthStatus::Healthy);
        let webapp = result.service("webapp").unwrap();
        assert_eq!(webapp.status, HealthStatus::Unhealthy);
        assert_eq!(
            webapp.error.as_deref(),
            Some("Connection refused - service not running")
        );
        assert!(result.trace_id().is_none());
    }

    #[tokio::test]
    async fn test_empty_endpoint_list_is_unknown() {
        let engine = HealthcheckEngine::new(fast_options()).unwrap();
        let result = engine.check_all().await;
        assert_eq!(result.overall_status(), HealthStatus::Unknown);
        assert!(result.services().is_empty());
    }

    #[tokio::test]
    async fn test_shared_client() {
        let server = healthy_service("/healthz").await;
        let client = reqwest::Client::new();
        let options = fast_options().with_endpoint(endpoint_for("api", &server, "/healthz"));

        let first = HealthcheckEngine::with_client(client.clone(), options.clone());
        let second = HealthcheckEngine::with_client(client, options);

        assert!(first.check_all().await.is_healthy());
        assert!(second.check_all().await.is_healthy());
    }

    // ==================== Cancellation ====================

    #[tokio::test]
    async fn test_cancellation_keeps_completed_results() {
        let fast = healthy_service("/fast").await;
        let slow = service_with("/slow", 200, Some(Duration::from_secs(3))).await;

        let options = fast_options()
            .with_timeout(Duration::from_secs(10))
            .with_parallel(true)
            .with_endpoints(vec![
                endpoint_for("slow", &slow, "/slow"),
                endpoint_for("fast", &fast, "/fast"),
            ]);
        let engine = HealthcheckEngine::new(options).unwrap();

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = engine.check_all_with_cancellation(&token).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(3));

        match err {
            HealthError::Cancelled { completed } => {
                assert_eq!(completed.len(), 1);
                assert_eq!(completed[0].name, "fast");
                assert_eq!(completed[0].status, HealthStatus::Healthy);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancellation_stops_retries() {
        let server = service_with("/down", 500, None).await;
        let options = fast_options()
            .with_retry_count(5)
            .with_retry_delay(Duration::from_secs(5));
        let engine = HealthcheckEngine::new(options).unwrap();
        let endpoint = endpoint_for("api", &server, "/down");

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let err = engine
            .check_with_cancellation(&endpoint, &token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_uncancelled_token_completes_normally() {
        let server = healthy_service("/healthz").await;
        let options = fast_options().with_endpoint(endpoint_for("api", &server, "/healthz"));
        let engine = HealthcheckEngine::new(options).unwrap();

        let result = engine
            .check_all_with_cancellation(&CancellationToken::new())
            .await
            .unwrap();
        assert!(result.is_healthy());
    }

    // ==================== Metadata and tracing ====================

    #[tokio::test]
    async fn test_metadata_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let options = fast_options().with_metadata(true);
        let engine = HealthcheckEngine::new(options).unwrap();
        let endpoint = endpoint_for("api", &server, "/healthz").critical(true);

        let health = engine.check(&endpoint).await;
        let metadata = health.metadata.unwrap();

        assert_eq!(metadata["attempts"], 1);
        assert_eq!(metadata["critical"], true);
        assert_eq!(metadata["expectedStatusCodes"], serde_json::json!([200, 201, 204]));
        assert_eq!(metadata["contentLength"], 2);
    }

    #[tokio::test]
    async fn test_no_metadata_by_default() {
        let server = healthy_service("/healthz").await;
        let engine = HealthcheckEngine::new(fast_options()).unwrap();
        let health = engine.check(&endpoint_for("api", &server, "/healthz")).await;
        assert!(health.metadata.is_none());
    }

    #[tokio::test]
    async fn test_tracing_records_events() {
        let api = healthy_service("/healthz").await;
        let web = service_with("/", 500, None).await;

        let exporter = Arc::new(CollectingExporter::default());
        let tracer = Arc::new(
            TelemetryTracer::new(TelemetrySampler::new(1.0), 100).with_exporter(exporter.clone()),
        );

        let options = fast_options()
            .with_tracing(true)
            .with_endpoints(vec![
                endpoint_for("api", &api, "/healthz"),
                ServiceEndpoint::new("webapp", web.uri()),
            ]);
        let engine = HealthcheckEngine::new(options)
            .unwrap()
            .with_tracer(tracer.clone());

        let result = engine.check_all().await;
        let trace_id = result.trace_id().unwrap().to_string();
        assert_eq!(trace_id.len(), 32);
        assert_eq!(result.span_id().unwrap().len(), 16);
        assert_eq!(tracer.pending().await, 3);

        tracer.flush().await;
        let events = exporter.events.lock().clone();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.trace_id == trace_id));
        assert_eq!(events[2].name, "healthcheck.check_all");
        assert_eq!(
            events[0].parent_span_id.as_deref(),
            result.span_id()
        );
    }
}
