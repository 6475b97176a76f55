// src/config.rs
use crate::clean::{CleanOptions, MalformedFieldPolicy};
use crate::io::TableFormat;
use anyhow::{ensure, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "CLEAN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "clean.yaml";

/// Settings for one run of the binary.
///
/// Precedence, lowest first: defaults, the YAML file, `CLEAN_*` environment
/// variables, then command-line arguments (applied by the caller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Inferred from the output extension when unset.
    pub output_format: Option<TableFormat>,
    pub malformed_fields: MalformedFieldPolicy,
    pub csv_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            output_format: None,
            malformed_fields: MalformedFieldPolicy::default(),
            csv_batch_size: 8192,
        }
    }
}

impl Config {
    /// Read the YAML file named by `CLEAN_CONFIG` (or `clean.yaml` if it
    /// exists), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        debug!(?config, "loaded config");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        info!(path = %path.display(), "using config file");
        Self::from_yaml(&text).with_context(|| format!("invalid config in {:?}", path))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // an empty document is all defaults
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).context("parsing YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a run silently produce nothing.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.csv_batch_size > 0,
            "csv_batch_size must be at least 1, got {}",
            self.csv_batch_size
        );
        Ok(())
    }

    /// Override fields from `CLEAN_INPUT`, `CLEAN_OUTPUT`,
    /// `CLEAN_OUTPUT_FORMAT`, `CLEAN_MALFORMED_FIELDS` and
    /// `CLEAN_CSV_BATCH_SIZE`, looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("CLEAN_INPUT") {
            self.input = Some(v.into());
        }
        if let Some(v) = var("CLEAN_OUTPUT") {
            self.output = Some(v.into());
        }
        if let Some(v) = var("CLEAN_OUTPUT_FORMAT") {
            self.output_format = Some(parse_env("CLEAN_OUTPUT_FORMAT", &v)?);
        }
        if let Some(v) = var("CLEAN_MALFORMED_FIELDS") {
            self.malformed_fields = parse_env("CLEAN_MALFORMED_FIELDS", &v)?;
        }
        if let Some(v) = var("CLEAN_CSV_BATCH_SIZE") {
            self.csv_batch_size = v
                .trim()
                .parse()
                .with_context(|| format!("CLEAN_CSV_BATCH_SIZE={:?} is not a number", v))?;
        }
        self.validate()
    }

    pub fn options(&self) -> CleanOptions {
        CleanOptions {
            malformed_fields: self.malformed_fields,
        }
    }

    /// The configured output, or `<input stem>_clean.csv` beside the input.
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let input = self.input.as_ref()?;
        let stem = input.file_stem()?.to_string_lossy();
        Some(input.with_file_name(format!("{}_clean.csv", stem)))
    }

    pub fn output_format(&self, output: &Path) -> TableFormat {
        self.output_format
            .unwrap_or_else(|| TableFormat::from_path(output))
    }
}

fn parse_env<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    serde_yaml::from_str(value.trim().to_lowercase().as_str())
        .with_context(|| format!("{}={:?} is not a recognised value", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_fields_and_defaults() -> Result<()> {
        let config = Config::from_yaml(
            "input: data/customers.csv\noutput_format: parquet\nmalformed_fields: coerce\n",
        )?;
        assert_eq!(config.input, Some(PathBuf::from("data/customers.csv")));
        assert_eq!(config.output_format, Some(TableFormat::Parquet));
        assert_eq!(config.malformed_fields, MalformedFieldPolicy::Coerce);
        assert_eq!(config.csv_batch_size, 8192);

        assert_eq!(Config::from_yaml("")?, Config::default());
        assert!(Config::from_yaml("malformed_fields: shrug\n").is_err());
        Ok(())
    }

    #[test]
    fn test_env_overrides_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "input: a.csv\ncsv_batch_size: 10\n")?;
        let mut config = Config::from_file(file.path())?;

        let vars: HashMap<&str, &str> = HashMap::from([
            ("CLEAN_INPUT", "b.csv"),
            ("CLEAN_OUTPUT_FORMAT", "Parquet"),
            ("CLEAN_MALFORMED_FIELDS", "coerce"),
        ]);
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()))?;

        assert_eq!(config.input, Some(PathBuf::from("b.csv")));
        assert_eq!(config.output_format, Some(TableFormat::Parquet));
        assert_eq!(config.options().malformed_fields, MalformedFieldPolicy::Coerce);
        assert_eq!(config.csv_batch_size, 10);
        Ok(())
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = Config::default();
        assert!(config
            .apply_env(|k| (k == "CLEAN_CSV_BATCH_SIZE").then(|| "lots".to_string()))
            .is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(Config::from_yaml("csv_batch_size: 0\n").is_err());

        let mut config = Config::default();
        let err = config
            .apply_env(|k| (k == "CLEAN_CSV_BATCH_SIZE").then(|| "0".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("csv_batch_size"));
    }

    #[test]
    fn test_output_path() {
        let mut config = Config {
            input: Some(PathBuf::from("data/customers.csv")),
            ..Config::default()
        };
        let out = config.output_path().unwrap();
        assert_eq!(out, PathBuf::from("data/customers_clean.csv"));
        assert_eq!(config.output_format(&out), TableFormat::Csv);

        config.output = Some(PathBuf::from("out.parquet"));
        let out = config.output_path().unwrap();
        assert_eq!(config.output_format(&out), TableFormat::Parquet);

        assert_eq!(Config::default().output_path(), None);
    }
}
