//! Loader for `vidmeta.yaml` with environment overlays.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file (or inline
//! snippets), then `VIDMETA__SECTION__KEY` environment variables. String values
//! go through `${VAR}` expansion afterwards, so a file can say
//! `youtube_api_key: "${YOUTUBE_API_KEY}"`.
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use vidmeta_common::observability::{LogConfig, LogFormat};
use vidmeta_common::{DEFAULT_WATCH_HOST, EXTRACT_DETAILS_PATH};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "VIDMETA";
const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VidmetaConfig {
    pub client: ClientConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Where the view controller sends requests and how it renders results.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub endpoint: String,
    /// Host of the canonical watch link.
    pub watch_host: String,
    /// `strftime` pattern for the publication date.
    pub date_format: String,
    /// Request timeout. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            endpoint: EXTRACT_DETAILS_PATH.into(),
            watch_host: DEFAULT_WATCH_HOST.into(),
            date_format: "%-m/%-d/%Y".into(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub youtube_api_base: String,
    pub youtube_api_key: Option<String>,
    /// Preferred thumbnail variant (`default`, `medium`, `high`, ...).
    pub thumbnail_size: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".into(),
            youtube_api_base: "https://www.googleapis.com/youtube/v3/".into(),
            youtube_api_key: None,
            thumbnail_size: "medium".into(),
        }
    }
}

impl ServerConfig {
    /// Configured key, else `$YOUTUBE_API_KEY`. Blank values and unexpanded
    /// `${...}` placeholders count as missing.
    pub fn api_key(&self) -> Option<String> {
        let usable = |k: &str| !k.trim().is_empty() && !k.contains("${");
        self.youtube_api_key
            .clone()
            .filter(|k| usable(k))
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| usable(k)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
            dir: None,
            stderr: false,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.level.clone(),
        }
    }
}

impl VidmetaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.client.endpoint.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "client.endpoint must start with '/', got {:?}",
                self.client.endpoint
            )));
        }
        if self.client.watch_host.trim().is_empty() {
            return Err(ConfigError::Invalid("client.watch_host is empty".into()));
        }
        if self.client.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid("client.server_url is empty".into()));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring.
pub struct VidmetaConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for VidmetaConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VidmetaConfigLoader {
    /// Defaults only; environment overrides are applied in [`Self::load`].
    ///
    /// ```
    /// use vidmeta_config::VidmetaConfigLoader;
    ///
    /// let cfg = VidmetaConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(cfg.client.endpoint, "/extract_details");
    /// assert_eq!(cfg.client.timeout_secs, None);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format follows the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use vidmeta_config::VidmetaConfigLoader;
    ///
    /// let cfg = VidmetaConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// client:
    ///   server_url: "http://video-meta.internal:8080"
    ///   timeout_secs: 20
    /// server:
    ///   thumbnail_size: "high"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.client.server_url, "http://video-meta.internal:8080");
    /// assert_eq!(cfg.client.timeout_secs, Some(20));
    /// assert_eq!(cfg.client.watch_host, "www.youtube.com");
    /// assert_eq!(cfg.server.thumbnail_size, "high");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Apply env overrides, expand `${VAR}` placeholders, deserialize and validate.
    pub fn load(self) -> Result<VidmetaConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: VidmetaConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_sections() {
        temp_env::with_vars([("YT_KEY", Some("k-1")), ("PORT", Some("5001"))], || {
            let mut v = json!({
                "server": { "youtube_api_key": "${YT_KEY}", "bind": "0.0.0.0:$PORT" },
                "client": { "timeout_secs": null, "tags": ["$PORT", 1] }
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "server": { "youtube_api_key": "k-1", "bind": "0.0.0.0:5001" },
                    "client": { "timeout_secs": null, "tags": ["5001", 1] }
                })
            );
        });
    }

    #[test]
    fn expands_through_chained_variables() {
        temp_env::with_vars(
            [("INNER", Some("qux")), ("OUTER", Some("mid-${INNER}"))],
            || {
                let mut v = json!("x=${OUTER}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("x=mid-qux"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${VIDMETA_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${VIDMETA_DOES_NOT_EXIST}"));
    }

    #[test]
    fn placeholder_api_key_counts_as_missing() {
        temp_env::with_var(API_KEY_ENV, None::<&str>, || {
            let server = ServerConfig {
                youtube_api_key: Some("${YOUTUBE_API_KEY}".into()),
                ..ServerConfig::default()
            };
            assert_eq!(server.api_key(), None);
        });
    }

    #[test]
    fn api_key_falls_back_to_environment() {
        temp_env::with_var(API_KEY_ENV, Some("from-env"), || {
            assert_eq!(ServerConfig::default().api_key().as_deref(), Some("from-env"));
            let explicit = ServerConfig {
                youtube_api_key: Some("from-file".into()),
                ..ServerConfig::default()
            };
            assert_eq!(explicit.api_key().as_deref(), Some("from-file"));
        });
    }

    #[test]
    fn endpoint_must_be_absolute_path() {
        let mut cfg = VidmetaConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.client.endpoint = "extract_details".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn logging_section_maps_to_log_config() {
        let logging = LoggingConfig {
            level: "debug".into(),
            format: LogFormat::Json,
            dir: Some(PathBuf::from("/tmp/vidmeta-logs")),
            stderr: true,
        };
        let lc = logging.to_log_config("vidmeta-test");
        assert_eq!(lc.app_name, "vidmeta-test");
        assert_eq!(lc.default_filter, "debug");
        assert_eq!(lc.format, LogFormat::Json);
        assert!(lc.emit_stderr);
    }
}
