use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use vidmeta_common::observability::LogFormat;
use vidmeta_config::{ConfigError, VidmetaConfigLoader};

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
client:
  server_url: "http://meta.local:5000"
  date_format: "%Y-%m-%d"
server:
  bind: "0.0.0.0:5000"
  youtube_api_key: "${VIDMETA_TEST_YT_KEY}"
logging:
  level: "debug"
  format: "json"
"#;

#[test]
#[serial]
fn file_values_override_defaults() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "vidmeta.yaml", FILE_YAML);

    temp_env::with_var("VIDMETA_TEST_YT_KEY", Some("AIza-test"), || {
        let cfg = VidmetaConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(cfg.client.server_url, "http://meta.local:5000");
        assert_eq!(cfg.client.date_format, "%Y-%m-%d");
        assert_eq!(cfg.client.endpoint, "/extract_details");
        assert_eq!(cfg.server.bind, "0.0.0.0:5000");
        assert_eq!(cfg.server.youtube_api_key.as_deref(), Some("AIza-test"));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    });
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "vidmeta.yaml", FILE_YAML);

    temp_env::with_vars(
        [
            ("VIDMETA__CLIENT__SERVER_URL", Some("http://override:9000")),
            ("VIDMETA__CLIENT__TIMEOUT_SECS", Some("12")),
            ("VIDMETA__LOGGING__STDERR", Some("true")),
        ],
        || {
            let cfg = VidmetaConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(cfg.client.server_url, "http://override:9000");
            assert_eq!(cfg.client.timeout_secs, Some(12));
            assert!(cfg.logging.stderr);
            assert_eq!(cfg.server.bind, "0.0.0.0:5000");
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let cfg = VidmetaConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");

    assert_eq!(cfg.client.server_url, "http://127.0.0.1:5000");
    assert_eq!(cfg.client.watch_host, "www.youtube.com");
    assert_eq!(cfg.server.thumbnail_size, "medium");
    assert_eq!(cfg.client.timeout(), None);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = VidmetaConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Source(_)));
}

#[test]
#[serial]
fn invalid_endpoint_is_rejected() {
    let err = VidmetaConfigLoader::new()
        .with_yaml_str("client:\n  endpoint: \"no-slash\"\n")
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
