//! Shootout configuration via `shootout.toml`
//!
//! Every key is optional; a missing file means the built-in defaults,
//! which reproduce the classic run: 3,000,000 keys down to 200,000 in
//! steps of 200,000, 64/16 code-point strings, all three suites.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shootout_core::{Error, Result};
use tracing::info;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "shootout.toml";

/// Environment variable that overrides the config file path.
pub const CONFIG_PATH_ENV: &str = "SHOOTOUT_CONFIG";

/// Which key-type suites to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteSelection {
    /// Long string keys
    pub large_strings: bool,
    /// Short string keys, truncated from the long ones
    pub small_strings: bool,
    /// 64-bit integer keys
    pub integers: bool,
}

impl Default for SuiteSelection {
    fn default() -> Self {
        Self {
            large_strings: true,
            small_strings: true,
            integers: true,
        }
    }
}

/// Shootout configuration loaded from `shootout.toml`.
///
/// # Example
///
/// ```toml
/// max_dataset_size = 1000000
/// size_step = 250000
/// seed = 42
/// implementations = ["HashMap", "FxHashMap"]
///
/// [suites]
/// small_strings = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootoutConfig {
    /// Largest dataset size; sizes count down from here
    pub max_dataset_size: usize,
    /// Distance between consecutive dataset sizes
    pub size_step: usize,
    /// Code points per large string key
    pub large_string_length: usize,
    /// Code points per small string key
    pub small_string_length: usize,
    /// Key generator seed; OS entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Result file
    pub output: PathBuf,
    /// Catalog names to benchmark; empty selects the default set
    pub implementations: Vec<String>,
    /// Suite toggles
    pub suites: SuiteSelection,
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self {
            max_dataset_size: 3_000_000,
            size_step: 200_000,
            large_string_length: 64,
            small_string_length: 16,
            seed: None,
            output: PathBuf::from("data.tsv"),
            implementations: Vec::new(),
            suites: SuiteSelection::default(),
        }
    }
}

impl ShootoutConfig {
    /// Dataset sizes, largest first, down to and excluding zero.
    pub fn dataset_sizes(&self) -> Vec<usize> {
        if self.size_step == 0 {
            return Vec::new();
        }
        let step = self.size_step;
        std::iter::successors(Some(self.max_dataset_size), move |size| {
            size.checked_sub(step)
        })
        .take_while(|size| *size > 0)
        .collect()
    }

    /// Check ranges and consistency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.max_dataset_size == 0 {
            return Err(Error::invalid_config("max_dataset_size must be positive"));
        }
        if self.size_step == 0 {
            return Err(Error::invalid_config("size_step must be positive"));
        }
        if self.small_string_length == 0 {
            return Err(Error::invalid_config("small_string_length must be positive"));
        }
        if self.small_string_length > self.large_string_length {
            return Err(Error::invalid_config(format!(
                "small_string_length ({}) exceeds large_string_length ({})",
                self.small_string_length, self.large_string_length
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Map shootout configuration
#
# Dataset sizes run from max_dataset_size down to size_step.
max_dataset_size = 3000000
size_step = 200000

# Code points per string key. Small keys are prefixes of large keys.
large_string_length = 64
small_string_length = 16

# Fix the key generator seed to reproduce a run (default: OS entropy).
# seed = 42

# Result file, one tab-separated row per case.
output = "data.tsv"

# Containers to benchmark. Empty selects HashMap, IndexMap and BTreeMap.
# Available: HashMap, IndexMap, BTreeMap, FxHashMap, DashMap
implementations = []

[suites]
large_strings = true
small_strings = true
integers = true
"#
    }

    /// Parse config from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ShootoutConfig =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::ConfigParse(msg) => Error::ConfigParse(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Load `path` if it exists, the defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            info!(path = %path.display(), "loading shootout config");
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// The config file path: `$SHOOTOUT_CONFIG` or `shootout.toml`.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}
