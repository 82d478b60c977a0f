//! Configuration management for parameter filling runs.
//!
//! This module defines the `Config` struct that selects the document, the
//! operations to fill and where the result goes. The configuration can be
//! loaded from a YAML, JSON or TOML file (picked by extension), created
//! programmatically, or overridden from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use paramfill_core::config::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> paramfill_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::new("swagger.json");
//! config.include_optional = true;
//! config.operations = vec!["addPet".to_string()];
//!
//! // Or load from a config file
//! let config = Config::from_file("paramfill.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Deserializer, Serialize};
use serde_value::Value as SerdeValue;
use tokio::fs;

/// Configuration for a parameter filling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path or URL of the OpenAPI / Swagger document
    pub schema_path: String,

    /// Whether optional parameters are filled too
    #[serde(default)]
    pub include_optional: bool,

    /// Operation ids to fill (all operations when empty)
    #[serde(default, deserialize_with = "deserialize_operations")]
    pub operations: Vec<String>,

    /// Operation ids to skip
    #[serde(default, deserialize_with = "deserialize_operations")]
    pub exclude_operations: Vec<String>,

    /// File the filled operations are written to (stdout when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// On-disk encoding of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new(schema_path: impl Into<String>) -> Self {
        Self {
            schema_path: schema_path.into(),
            include_optional: false,
            operations: Vec::new(),
            exclude_operations: Vec::new(),
            output: None,
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;

        let config = match Format::of(path) {
            Format::Yaml => serde_yaml::from_str(&content)?,
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();

        let content = match Format::of(path) {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check that the configuration describes a runnable fill.
    ///
    /// Flags may override a loaded file, so this runs once every source has
    /// been merged rather than in [`Config::from_file`].
    pub fn validate(&self) -> crate::Result<()> {
        if self.schema_path.trim().is_empty() {
            return Err(Error::config("no OpenAPI schema path given"));
        }

        if let Some(id) = self
            .operations
            .iter()
            .find(|id| self.exclude_operations.contains(id))
        {
            return Err(Error::config(format!(
                "operation '{}' is both selected and excluded",
                id
            )));
        }

        Ok(())
    }

    /// Whether the operation `id` takes part in the run.
    pub fn selects(&self, id: &str) -> bool {
        let included = self.operations.is_empty() || self.operations.iter().any(|op| op == id);
        included && !self.exclude_operations.iter().any(|op| op == id)
    }
}

/// Accept either a single operation id or a list of them
fn deserialize_operations<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = SerdeValue::deserialize(deserializer)?;

    match value {
        SerdeValue::String(s) => Ok(vec![s]),
        SerdeValue::Seq(seq) => seq
            .into_iter()
            .map(|item| match item {
                SerdeValue::String(s) => Ok(s),
                _ => Err(serde::de::Error::custom(
                    "Expected operation id or array of operation ids",
                )),
            })
            .collect(),
        SerdeValue::Unit | SerdeValue::Option(None) => Ok(Vec::new()),
        _ => Err(serde::de::Error::custom(
            "Expected operation id or array of operation ids",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Config {
        let mut config = Config::new("swagger.json");
        config.include_optional = true;
        config.operations = vec!["addPet".to_string(), "getPetById".to_string()];
        config.exclude_operations = vec!["deletePet".to_string()];
        config.output = Some("filled.json".to_string());
        config
    }

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;

        for name in ["config.yaml", "config.json", "config.toml"] {
            let file_path = dir.path().join(name);
            let config = sample();
            config.save(&file_path).await?;

            let loaded = Config::from_file(&file_path).await?;
            assert_eq!(loaded, config, "{name}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("paramfill.yaml");
        tokio::fs::write(&file_path, "schema_path: openapi.yaml\n").await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded, Config::new("openapi.yaml"));
        Ok(())
    }

    #[tokio::test]
    async fn test_single_operation_string() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("paramfill.yml");
        tokio::fs::write(
            &file_path,
            "schema_path: swagger.json\noperations: addPet\nexclude_operations: [a, b]\n",
        )
        .await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.operations, vec!["addPet"]);
        assert_eq!(loaded.exclude_operations, vec!["a", "b"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_non_string_operations() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("paramfill.json");
        tokio::fs::write(&file_path, r#"{"schema_path": "s.json", "operations": [1, 2]}"#)
            .await?;

        assert!(matches!(
            Config::from_file(&file_path).await,
            Err(crate::Error::Json(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let missing_schema = Config::new("  ");
        assert!(matches!(missing_schema.validate(), Err(Error::Config(_))));

        let mut conflicting = sample();
        conflicting.exclude_operations.push("addPet".to_string());
        let err = conflicting.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("addPet"));
    }

    #[test]
    fn test_selects() {
        let config = sample();
        assert!(config.selects("addPet"));
        assert!(!config.selects("updatePet"));
        assert!(!config.selects("deletePet"));

        let mut everything = Config::new("swagger.json");
        assert!(everything.selects("updatePet"));
        everything.exclude_operations.push("updatePet".to_string());
        assert!(!everything.selects("updatePet"));
    }
}
