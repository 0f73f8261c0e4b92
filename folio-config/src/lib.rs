//! Loader for Folio configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (every field is optional),
//! 2. YAML files and inline snippets, in the order they were attached,
//! 3. `FOLIO__SECTION__KEY` environment variables.
//!
//! After merging, `${VAR}` placeholders inside string values are expanded
//! and the result is validated.
use config::{Config, Environment, File};
use folio_common::Theme;
use folio_common::observability::LogFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name looked up in the working directory and the user config dir.
pub const DEFAULT_CONFIG_FILE: &str = "folio.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub version: Option<String>,
    pub terminal: TerminalConfig,
    pub particles: ParticleConfig,
    pub ui: UiConfig,
    pub log: LogSettings,
    /// YAML file replacing the built-in portfolio content.
    pub profile_path: Option<PathBuf>,
}

/// Hero terminal animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub tick_ms: u64,
    pub reset_delay_ms: u64,
    pub cursor_blink_ms: u64,
    pub prompt: String,
    /// Replaces the built-in session script when set.
    pub script: Option<Vec<String>>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            tick_ms: 80,
            reset_delay_ms: 2000,
            cursor_blink_ms: 500,
            prompt: "guest@folio:~".into(),
            script: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub enabled: bool,
    pub count: usize,
    /// Pairs closer than this (field units) are linked.
    pub link_distance: f64,
    /// Maximum absolute velocity component per step.
    pub max_speed: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 50,
            link_distance: 100.0,
            max_speed: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    pub frame_ms: u64,
    pub toast_ms: u64,
    /// Fraction of a skill card that must be on screen before it is revealed.
    pub reveal_threshold: f64,
    /// Row below the top of the viewport used by the scroll-spy.
    pub probe_offset: u16,
    /// Rows scrolled before the header collapses.
    pub scrolled_threshold: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            frame_ms: 80,
            toast_ms: 2000,
            reveal_threshold: 0.3,
            probe_offset: 1,
            scrolled_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            filter: "info".into(),
        }
    }
}

impl FolioConfig {
    /// Reject values the animator and UI cannot run with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let durations = [
            ("terminal.tick_ms", self.terminal.tick_ms),
            ("terminal.reset_delay_ms", self.terminal.reset_delay_ms),
            ("terminal.cursor_blink_ms", self.terminal.cursor_blink_ms),
            ("ui.frame_ms", self.ui.frame_ms),
            ("ui.toast_ms", self.ui.toast_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigLoadError::Invalid(format!("{name} must be greater than zero")));
        }
        if let Some(script) = &self.terminal.script {
            if script.is_empty() {
                return Err(ConfigLoadError::Invalid(
                    "terminal.script must contain at least one line".into(),
                ));
            }
        }
        let t = self.ui.reveal_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigLoadError::Invalid(format!(
                "ui.reveal_threshold must be in (0, 1], got {t}"
            )));
        }
        if self.particles.link_distance < 0.0 || self.particles.max_speed < 0.0 {
            return Err(ConfigLoadError::Invalid(
                "particle distances and speeds must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration, e.g. for `folio --dump-config`.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Candidate config files, most specific first.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut out = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        out.push(dir.join("folio").join(DEFAULT_CONFIG_FILE));
    }
    out
}

const SCRIPT_POINTER: &str = "/terminal/script";

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

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct FolioConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FolioConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FolioConfigLoader {
    /// Start from built-in defaults; `FOLIO__` env overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use folio_config::FolioConfigLoader;
    ///
    /// let config = FolioConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.terminal.tick_ms, 80);
    /// assert_eq!(config.terminal.reset_delay_ms, 2000);
    /// assert!(config.terminal.script.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use folio_common::Theme;
    /// use folio_config::FolioConfigLoader;
    ///
    /// let cfg = FolioConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// terminal:
    ///   tick_ms: 40
    ///   script: ["$ whoami", "guest"]
    /// ui:
    ///   theme: light
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("test"));
    /// assert_eq!(cfg.terminal.tick_ms, 40);
    /// assert_eq!(cfg.terminal.reset_delay_ms, 2000);
    /// assert_eq!(cfg.terminal.script.as_ref().map(Vec::len), Some(2));
    /// assert_eq!(cfg.ui.theme, Theme::Light);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into [`FolioConfig`].
    ///
    /// ```
    /// use folio_config::FolioConfigLoader;
    ///
    /// unsafe { std::env::set_var("FOLIO_DOC_PROMPT", "doc@folio:~"); }
    ///
    /// let config = FolioConfigLoader::new()
    ///     .with_yaml_str("terminal:\n  prompt: \"${FOLIO_DOC_PROMPT}\"\n")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.terminal.prompt, "doc@folio:~");
    ///
    /// unsafe { std::env::remove_var("FOLIO_DOC_PROMPT"); }
    /// ```
    pub fn load(self) -> Result<FolioConfig, ConfigLoadError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        // Script lines are shell text shown verbatim, so `$HOME` stays literal.
        let script = v.pointer_mut(SCRIPT_POINTER).map(Value::take);
        expand_env_in_value(&mut v);
        if let (Some(slot), Some(script)) = (v.pointer_mut(SCRIPT_POINTER), script) {
            *slot = script;
        }

        let typed: FolioConfig = serde_json::from_value(v)
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
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
        temp_env::with_var("FOLIO_TEST_NAME", Some("ada"), || {
            let mut v = json!("${FOLIO_TEST_NAME}@folio:~");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("ada@folio:~"));
        });
    }

    #[test]
    fn expands_inside_script_arrays() {
        temp_env::with_var("FOLIO_TEST_ROLE", Some("Engineer"), || {
            let mut v = json!({ "script": ["$ whoami", "guest - ${FOLIO_TEST_ROLE}", 3] });
            expand_env_in_value(&mut v);
            assert_eq!(v, json!({ "script": ["$ whoami", "guest - Engineer", 3] }));
        });
    }

    #[test]
    fn expands_recursively_and_stops_on_cycles() {
        temp_env::with_vars(
            [
                ("FOLIO_TEST_INNER", Some("core")),
                ("FOLIO_TEST_OUTER", Some("x-${FOLIO_TEST_INNER}")),
                ("FOLIO_TEST_A", Some("${FOLIO_TEST_B}")),
                ("FOLIO_TEST_B", Some("${FOLIO_TEST_A}")),
            ],
            || {
                let mut v = json!("${FOLIO_TEST_OUTER}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("x-core"));

                let mut cyc = json!("<${FOLIO_TEST_A}>");
                expand_env_in_value(&mut cyc);
                let s = cyc.as_str().unwrap();
                assert!(s.starts_with('<') && s.ends_with('>'));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("$ echo ${FOLIO_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("$ echo ${FOLIO_DOES_NOT_EXIST}"));
    }

    #[test]
    fn zero_tick_is_rejected() {
        let mut cfg = FolioConfig::default();
        cfg.terminal.tick_ms = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("terminal.tick_ms"));
    }

    #[test]
    fn empty_script_is_rejected() {
        let mut cfg = FolioConfig::default();
        cfg.terminal.script = Some(Vec::new());
        assert!(matches!(cfg.validate(), Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn reveal_threshold_must_be_a_fraction() {
        let mut cfg = FolioConfig::default();
        cfg.ui.reveal_threshold = 0.0;
        assert!(cfg.validate().is_err());
        cfg.ui.reveal_threshold = 1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn dumps_yaml_that_loads_back() {
        let mut cfg = FolioConfig::default();
        cfg.terminal.prompt = "me@box:~".into();
        let yaml = cfg.to_yaml().unwrap();
        let back = FolioConfigLoader::new().with_yaml_str(&yaml).load().unwrap();
        assert_eq!(back.terminal.prompt, "me@box:~");
        assert_eq!(back.ui, cfg.ui);
    }
}
