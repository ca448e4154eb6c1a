//! Configuration integration tests
//!
//! Load YAML from disk and check the engine options it resolves to.

#[cfg(test)]
mod tests {
    use crate::common::{endpoint_for, healthy_service};
    use platform_health::config::{HealthPreset, Validate};
    use platform_health::{Config, HealthError, HealthStatus, HealthcheckEngine};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ==================== Loading ====================

    #[tokio::test]
    async fn test_shipped_example_parses() {
        let content = include_str!("../../config/health.yaml.example");
        let config = Config::from_yaml_str(content).unwrap();
        assert_eq!(config.health.preset, Some(HealthPreset::Local));
        assert!(!config.health.to_options().custom_endpoints.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_endpoint_rejected() {
        let file = write_config(
            r#"
health:
  endpoints:
    - name: "api"
      url: "tcp://localhost:5010"
"#,
        );
        let err = Config::from_file(file.path()).await.unwrap_err();
        match err {
            HealthError::Config(message) => assert!(message.contains("Health config error")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_yaml_rejected() {
        let file = write_config("server: [unclosed");
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[test]
    fn test_sections_validate_independently() {
        let config = Config::default();
        assert!(config.server.validate().is_ok());
        assert!(config.health.validate().is_ok());
        assert!(config.telemetry.validate().is_ok());
    }

    // ==================== Config to engine ====================

    #[tokio::test]
    async fn test_configured_endpoints_drive_engine() {
        let server = healthy_service("/healthz").await;
        let endpoint = endpoint_for("api", &server, "/healthz");
        let yaml = format!(
            r#"
health:
  preset: pre_deploy
  timeout_ms: 1000
  retry_count: 0
  endpoints:
    - name: "api"
      url: "{}"
      health_path: "/healthz"
"#,
            server.uri()
        );
        let config = Config::from_yaml_str(&yaml).unwrap();
        let options = config.health.to_options();

        assert_eq!(options.timeout, Duration::from_secs(1));
        assert!(!options.parallel);
        assert!(options.include_metadata);
        assert_eq!(options.custom_endpoints[0].check_url(), endpoint.check_url());

        let engine = HealthcheckEngine::new(options).unwrap();
        let result = engine.check_all().await;
        assert_eq!(result.overall_status(), HealthStatus::Healthy);
        assert_eq!(result.services()[0].metadata.as_ref().unwrap()["attempts"], 1);
        assert!(result.trace_id().is_some());
    }
}
