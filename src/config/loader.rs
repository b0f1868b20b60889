//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "DUT_HARNESS";

const CONFIG_FILE_NAME: &str = "dut-harness.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "DUT_HARNESS_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `DUT_HARNESS_CONFIG` environment variable (explicit path)
    /// 2. `./dut-harness.toml`
    /// 3. the platform config directory (`~/.config/dut-harness/` on Linux)
    /// 4. Built-in defaults
    ///
    /// Environment variables override any file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Defaults plus environment overrides, no file.
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut config = Config::default();
        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path: None,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Write the current configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        save_to_file(&self.config, path.as_ref())
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "{CONFIG_PATH_ENV} points at a missing file");
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|p| p.exists())
}

/// Platform config directory for the harness.
pub fn get_default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "dut-harness").map(|d| d.config_dir().to_path_buf())
}

pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn save_to_file(config: &Config, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str, what: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse(format!("{ENV_PREFIX}_{key}"), what))
}

/// Apply environment variable overrides to the configuration.
///
/// Variables follow `DUT_HARNESS_<SECTION>_<KEY>`, for example
/// `DUT_HARNESS_DUT1_PORT=/dev/ttyACM0` or `DUT_HARNESS_EXPECT_TIMEOUT_MS=20000`.
/// The bare `DUT1_PORT` / `DUT2_PORT` names used by bench setups are also read.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    for (label, endpoint) in [("DUT1", &mut config.duts.dut1), ("DUT2", &mut config.duts.dut2)] {
        if let Some(port) =
            env_var(&format!("{label}_PORT")).or_else(|| std::env::var(format!("{label}_PORT")).ok())
        {
            endpoint.port = Some(port);
        }
        let key = format!("{label}_BAUD");
        if let Some(val) = env_var(&key) {
            endpoint.baud = parse_env(&key, &val, "Invalid baud rate")?;
        }
    }

    if let Some(val) = env_var("EXPECT_TIMEOUT_MS") {
        config.expect.default_timeout_ms = parse_env("EXPECT_TIMEOUT_MS", &val, "Invalid timeout")?;
    }
    if let Some(val) = env_var("READINESS_ENABLED") {
        config.readiness.enabled = val.eq_ignore_ascii_case("true") || val == "1";
    }
    if let Some(val) = env_var("READINESS_PROMPT") {
        config.readiness.prompt = val;
    }
    if let Some(val) = env_var("READINESS_BOOT_MARKER") {
        config.readiness.boot_marker = val;
    }
    if let Some(val) = env_var("SCENARIO_PEER_NAME") {
        config.scenario.peer_name = val;
    }
    if let Some(val) = env_var("LOGGING_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}

fn validate(config: &Config) -> ConfigResult<()> {
    for (key, endpoint) in [("duts.dut1", &config.duts.dut1), ("duts.dut2", &config.duts.dut2)] {
        if endpoint.baud == 0 {
            return Err(ConfigError::validation(format!("{key}.baud"), "must be non-zero"));
        }
    }
    if config.expect.buffer_limit == 0 {
        return Err(ConfigError::validation("expect.buffer_limit", "must be non-zero"));
    }
    if config.readiness.enabled && config.readiness.prompt.is_empty() {
        return Err(ConfigError::validation(
            "readiness.prompt",
            "must be set when readiness probing is enabled",
        ));
    }
    if config.scenario.peer_name.is_empty() {
        return Err(ConfigError::validation("scenario.peer_name", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_default_loader() {
        let loader = ConfigLoader::with_defaults().unwrap();
        assert_eq!(loader.config().expect.default_timeout_ms, 10_000);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        env::set_var("DUT_HARNESS_DUT2_BAUD", "921600");
        env::set_var("DUT_HARNESS_SCENARIO_PEER_NAME", "bench_periph");

        let loader = ConfigLoader::with_defaults().unwrap();
        assert_eq!(loader.config().duts.dut2.baud, 921_600);
        assert_eq!(loader.config().scenario.peer_name, "bench_periph");

        env::remove_var("DUT_HARNESS_DUT2_BAUD");
        env::remove_var("DUT_HARNESS_SCENARIO_PEER_NAME");
    }

    #[test]
    #[serial]
    fn test_bare_port_env() {
        env::set_var("DUT1_PORT", "/dev/ttyACM0");

        let loader = ConfigLoader::with_defaults().unwrap();
        assert_eq!(loader.config().duts.dut1.port.as_deref(), Some("/dev/ttyACM0"));

        env::remove_var("DUT1_PORT");
    }

    #[test]
    #[serial]
    fn test_bad_env_value() {
        env::set_var("DUT_HARNESS_EXPECT_TIMEOUT_MS", "soon");
        let err = ConfigLoader::with_defaults().unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));
        env::remove_var("DUT_HARNESS_EXPECT_TIMEOUT_MS");
    }

    #[test]
    #[serial]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut loader = ConfigLoader::with_defaults().unwrap();
        loader.config.duts.dut1.port = Some("COM7".into());
        loader.save_to(&path).unwrap();

        let reloaded = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(reloaded.config().duts.dut1.port.as_deref(), Some("COM7"));
        assert_eq!(reloaded.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_validation_rejects_zero_baud() {
        let mut config = Config::default();
        config.duts.dut2.baud = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
