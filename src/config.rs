//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursecat/coursecat.toml`
//! 3. Local config: `<dir>/.coursecat.toml` (usually the working directory)
//! 4. Environment variables: `COURSECAT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::util::path::expand_path;

/// Course data file read when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "CS 300 ABCU_Advising_Program_Input.csv";

/// Field delimiter used when nothing else is configured.
pub const DEFAULT_DELIMITER: char = ',';

/// Unified configuration for coursecat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Course data file loaded by the menu and the listing commands
    pub data_file: PathBuf,
    /// Single character separating fields on a course line
    pub delimiter: char,
    /// Print elapsed time after each menu action
    pub show_timing: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            delimiter: DEFAULT_DELIMITER,
            show_timing: true,
        }
    }
}

/// Raw settings for intermediate parsing (every field optional so that an
/// unspecified key inherits from the layer below).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub show_timing: Option<bool>,
}

/// Get the XDG config directory for coursecat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursecat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursecat.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".coursecat.toml")
}

/// Parse a delimiter setting: exactly one character.
pub fn parse_delimiter(value: &str) -> Result<char, ApplicationError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ApplicationError::Config {
            message: format!("delimiter must be exactly one character, got {value:?}"),
        }),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in the data file path.
    fn expand_paths(&mut self) {
        self.data_file = expand_path(&self.data_file);
    }

    /// Apply an overlay: every field the overlay specifies wins.
    fn merge_with(&self, overlay: &RawSettings) -> Result<Self, ApplicationError> {
        Ok(Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            delimiter: overlay
                .delimiter
                .as_deref()
                .map(parse_delimiter)
                .transpose()?
                .unwrap_or(self.delimiter),
            show_timing: overlay.show_timing.unwrap_or(self.show_timing),
        })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.coursecat.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/coursecat/coursecat.toml`
    /// 3. Local config: `<local_dir>/.coursecat.toml`
    /// 4. Environment variables: `COURSECAT_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw)?;
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw)?;
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply COURSECAT_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("COURSECAT").try_parsing(true))
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            data_file: config.get_string("data_file").ok().map(PathBuf::from),
            delimiter: config.get_string("delimiter").ok(),
            show_timing: config.get_bool("show_timing").ok(),
        };
        settings.merge_with(&raw)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# coursecat configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/coursecat/coursecat.toml
#   Local:  ./.coursecat.toml
#   Env:    COURSECAT_* environment variables

# Course data file (~ and $VAR are expanded)
# data_file = "{DEFAULT_DATA_FILE}"

# Field delimiter, exactly one character
# delimiter = "{DEFAULT_DELIMITER}"

# Print elapsed time after each menu action
# show_timing = true
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_defaults_then_reads_advising_input_with_comma() {
        let settings = Settings::default();
        assert_eq!(settings.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(settings.delimiter, ',');
        assert!(settings.show_timing);
    }

    #[rstest]
    #[case(",", ',')]
    #[case("|", '|')]
    #[case("\t", '\t')]
    #[case(";", ';')]
    fn given_single_char_when_parsing_delimiter_then_ok(#[case] input: &str, #[case] expected: char) {
        assert_eq!(parse_delimiter(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(",,")]
    #[case("tab")]
    fn given_wrong_length_when_parsing_delimiter_then_config_error(#[case] input: &str) {
        assert!(matches!(
            parse_delimiter(input),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            data_file: Some(PathBuf::from("other.csv")),
            delimiter: None,
            show_timing: Some(false),
        };

        let merged = base.merge_with(&overlay).unwrap();

        assert_eq!(merged.data_file, PathBuf::from("other.csv"));
        assert_eq!(merged.delimiter, ',');
        assert!(!merged.show_timing);
    }

    #[test]
    fn given_bad_delimiter_in_overlay_when_merging_then_error() {
        let overlay = RawSettings {
            delimiter: Some("::".into()),
            ..RawSettings::default()
        };
        assert!(Settings::default().merge_with(&overlay).is_err());
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: PathBuf::from("~/courses.csv"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_file.starts_with(&home));
    }

    #[test]
    fn to_toml_round_trips_through_raw_settings() {
        let settings = Settings {
            data_file: PathBuf::from("data/courses.csv"),
            delimiter: '|',
            show_timing: false,
        };
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw).unwrap(), settings);
    }

    #[test]
    fn template_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.data_file.is_none());
    }
}
