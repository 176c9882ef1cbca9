use convert_case::{Case, Casing};
use precodec_schema::identity::TypeIdentity;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// File the `build!` macro looks for next to the consuming crate's manifest.
pub const CONFIG_FILE: &str = "precodec.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid precodec config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// BuildConfig
///
/// Emission settings. Every key is optional:
///
/// ```toml
/// file_suffix = "_codec"
/// index_file = "codecs.rs"
/// header = true
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Appended to the snake-cased model name to form a unit's file stem.
    pub file_suffix: String,

    /// Per-namespace file that `include!`s every unit of that namespace.
    pub index_file: String,

    /// Prefix each unit with an `@generated` marker comment.
    pub header: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            file_suffix: "_codec".to_string(),
            index_file: "codecs.rs".to_string(),
            header: true,
        }
    }
}

impl BuildConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, falling back to the defaults when the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// File name of the unit holding `identity`'s codec.
    #[must_use]
    pub fn file_name(&self, identity: &TypeIdentity) -> String {
        format!(
            "{}{}.rs",
            identity.name().to_case(Case::Snake),
            self.file_suffix
        )
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(BuildConfig::from_toml_str("").unwrap(), BuildConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = BuildConfig::from_toml_str("header = false").unwrap();

        assert!(!config.header);
        assert_eq!(config.index_file, "codecs.rs");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            BuildConfig::from_toml_str("sufix = \"_c\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_default() {
        let config = BuildConfig::load(Path::new("/nonexistent/precodec.toml")).unwrap();

        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn file_names_are_snake_case() {
        let config = BuildConfig::default();

        assert_eq!(
            config.file_name(&TypeIdentity::new("models", "OrderLine")),
            "order_line_codec.rs"
        );
    }
}
