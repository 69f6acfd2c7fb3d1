//! Resolution of the command used to run camelot.
//!
//! The command defaults to `camelot` on `PATH`. Clients may override it via
//! the `camelot.path` setting, which the server fetches at startup and again
//! whenever the client reports a configuration change.

use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::Deserialize;

/// The command run when nothing overrides it.
pub const DEFAULT_ANALYZER_COMMAND: &str = "camelot";

/// The configuration section read from the client.
pub const SETTINGS_SECTION: &str = "camelot";

/// Client-side settings under the `camelot` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CamelotSettings {
    /// Path or command name of the analyzer.
    pub path: Option<String>,
}

impl CamelotSettings {
    /// Read settings from a raw configuration value.
    ///
    /// Anything that is not an object with the expected shape reads as
    /// "no settings".
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// The program used to invoke the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerCommand(String);

impl AnalyzerCommand {
    /// Create a command from a program name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self(program.into())
    }

    /// The program name or path.
    pub fn program(&self) -> &str {
        &self.0
    }

    /// Locate the program on `PATH` (or check it directly if it is a path).
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.0).ok()
    }
}

impl Default for AnalyzerCommand {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYZER_COMMAND)
    }
}

impl fmt::Display for AnalyzerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The analyzer override plus the fallback used when it is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    override_path: Option<String>,
    fallback: AnalyzerCommand,
}

impl AnalyzerConfig {
    /// Create a config whose fallback is `fallback` instead of `camelot`.
    pub fn with_fallback(fallback: AnalyzerCommand) -> Self {
        Self {
            override_path: None,
            fallback,
        }
    }

    /// The current override, if any.
    pub fn override_path(&self) -> Option<&str> {
        self.override_path.as_deref()
    }

    /// The command to run: the override if set, otherwise the fallback.
    pub fn resolve(&self) -> AnalyzerCommand {
        match &self.override_path {
            Some(path) => AnalyzerCommand::new(path.clone()),
            None => self.fallback.clone(),
        }
    }
}

/// Shared access to the analyzer configuration for one session.
///
/// Written when settings are fetched, read at the start of every validation
/// cycle.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    config: RwLock<AnalyzerConfig>,
}

impl ConfigProvider {
    /// Create a provider seeded with `config`.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// A snapshot of the current configuration.
    pub fn current(&self) -> AnalyzerConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The command to run right now.
    pub fn resolve(&self) -> AnalyzerCommand {
        self.current().resolve()
    }

    /// Apply freshly fetched settings. Blank paths count as unset.
    pub fn apply(&self, settings: CamelotSettings) {
        let override_path = settings
            .path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        tracing::debug!(?override_path, "applying analyzer settings");
        self.write(|config| config.override_path = override_path);
    }

    /// Drop any override so the fallback command applies.
    pub fn clear_override(&self) {
        self.write(|config| config.override_path = None);
    }

    fn write(&self, f: impl FnOnce(&mut AnalyzerConfig)) {
        match self.config.write() {
            Ok(mut config) => f(&mut config),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_camelot() {
        let provider = ConfigProvider::default();
        assert_eq!(provider.resolve().program(), "camelot");
        assert_eq!(provider.current().override_path(), None);
    }

    #[test]
    fn override_wins_until_cleared() {
        let provider = ConfigProvider::default();
        provider.apply(CamelotSettings {
            path: Some("/opt/camelot/bin/camelot".to_string()),
        });
        assert_eq!(provider.resolve().program(), "/opt/camelot/bin/camelot");

        provider.clear_override();
        assert_eq!(provider.resolve().program(), "camelot");
    }

    #[test]
    fn blank_override_is_ignored() {
        let provider = ConfigProvider::default();
        provider.apply(CamelotSettings {
            path: Some("   ".to_string()),
        });
        assert_eq!(provider.resolve().program(), "camelot");
    }

    #[test]
    fn fallback_can_be_replaced() {
        let provider =
            ConfigProvider::new(AnalyzerConfig::with_fallback(AnalyzerCommand::new("my-camelot")));
        assert_eq!(provider.resolve().program(), "my-camelot");

        provider.apply(CamelotSettings {
            path: Some("other".to_string()),
        });
        assert_eq!(provider.resolve().program(), "other");

        provider.apply(CamelotSettings::default());
        assert_eq!(provider.resolve().program(), "my-camelot");
    }

    #[test]
    fn settings_from_value() {
        let settings = CamelotSettings::from_value(serde_json::json!({ "path": "/usr/bin/camelot" }));
        assert_eq!(settings.path.as_deref(), Some("/usr/bin/camelot"));

        assert_eq!(
            CamelotSettings::from_value(serde_json::Value::Null),
            CamelotSettings::default()
        );
        assert_eq!(
            CamelotSettings::from_value(serde_json::json!({ "path": 42 })),
            CamelotSettings::default()
        );
        assert_eq!(
            CamelotSettings::from_value(serde_json::json!({})),
            CamelotSettings::default()
        );
    }
}
