//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pt_core::PairingConfig;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Header of the column naming the operator.
    pub person_column: String,

    /// Header of the column holding the record timestamp.
    pub timestamp_column: String,

    /// Header of the column holding the action label.
    pub action_column: String,

    /// Field delimiter of the input file.
    pub delimiter: char,

    /// Action label meaning "clock in".
    pub clock_in_label: String,

    /// Action label meaning "clock out".
    pub clock_out_label: String,

    /// Timestamp formats tried in order (chrono `strftime` syntax).
    pub datetime_formats: Vec<String>,

    /// Date-only formats, read as midnight. Tried after `datetime_formats`.
    pub date_formats: Vec<String>,

    /// Entry/exit pairs longer than this are discarded.
    pub max_shift_hours: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            person_column: "Prénom et nom".to_string(),
            timestamp_column: "Date".to_string(),
            action_column: "Action".to_string(),
            delimiter: ',',
            clock_in_label: "Pointer entrée".to_string(),
            clock_out_label: "Pointer sortie".to_string(),
            datetime_formats: [
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%dT%H:%M:%S",
                "%d/%m/%Y %H:%M:%S",
                "%d/%m/%Y %H:%M",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            date_formats: ["%Y-%m-%d", "%d/%m/%Y"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_shift_hours: 24,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PT_*)
        figment = figment.merge(Env::prefixed("PT_"));

        figment.extract()
    }

    /// Pairing settings derived from this configuration.
    pub fn pairing(&self) -> PairingConfig {
        PairingConfig::with_max_hours(self.max_shift_hours)
    }
}

/// Returns the platform-specific config directory for pointage.
///
/// On Linux: `~/.config/pointage`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pointage"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use std::io::Write;

    #[test]
    fn test_dirs_config_path_ends_with_pointage() {
        if let Some(path) = dirs_config_path() {
            assert_eq!(path.file_name().unwrap(), "pointage");
        }
    }

    #[test]
    fn test_default_labels_match_export() {
        let config = Config::default();
        assert_eq!(config.clock_in_label, "Pointer entrée");
        assert_eq!(config.clock_out_label, "Pointer sortie");
        assert_eq!(config.person_column, "Prénom et nom");
    }

    #[test]
    fn test_default_pairing_cap_is_24h() {
        let config = Config::default();
        assert_eq!(config.pairing().max_shift, Duration::hours(24));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
person_column = "Operator"
delimiter = ";"
max_shift_hours = 12
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.person_column, "Operator");
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.max_shift_hours, 12);
        // Untouched fields keep their defaults
        assert_eq!(config.timestamp_column, "Date");
    }
}
