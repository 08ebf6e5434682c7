//! Analysis configuration
//!
//! Settings are resolved in layers, later layers winning:
//!
//! 1. built-in defaults (delta 0.20, alpha 0.05)
//! 2. a TOML file passed with `--config`
//! 3. `LEDGERBENCH_DELTA`, `LEDGERBENCH_ALPHA`, `LEDGERBENCH_RESULTS`
//! 4. command-line flags
//!
//! Validation runs once, after all layers are merged.
//!
//! # Example
//!
//! ```toml
//! delta = 0.25
//! alpha = 0.01
//! label_a = "N=1000000 rel_indexed"
//! label_b = "N=1000000 jsonb_indexed"
//! results = "exports/bench_results.csv"
//! p_value_method = "exact"
//! ```

use crate::distribution::PValueMethod;
use crate::superiority::SuperiorityConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DELTA: &str = "LEDGERBENCH_DELTA";
pub const ENV_ALPHA: &str = "LEDGERBENCH_ALPHA";
pub const ENV_RESULTS: &str = "LEDGERBENCH_RESULTS";

/// One layer of optional settings (config file or command line)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub delta: Option<f64>,
    pub alpha: Option<f64>,
    pub label_a: Option<String>,
    pub label_b: Option<String>,
    pub results: Option<PathBuf>,
    pub p_value_method: Option<PValueMethod>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Layer built from environment variables, read through `lookup`
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |name: &str| -> Result<Option<f64>> {
            match lookup(name) {
                Some(raw) if !raw.trim().is_empty() => raw
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .with_context(|| format!("{} is not a number: '{}'", name, raw)),
                _ => Ok(None),
            }
        };

        Ok(Self {
            delta: number(ENV_DELTA)?,
            alpha: number(ENV_ALPHA)?,
            results: lookup(ENV_RESULTS)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            ..Default::default()
        })
    }

    /// Layer built from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub superiority: SuperiorityConfig,
    pub label_a: Option<String>,
    pub label_b: Option<String>,
    pub results: Option<PathBuf>,
    /// `None` lets the build pick the best available method
    pub p_value_method: Option<PValueMethod>,
}

impl AnalysisConfig {
    /// Overlay every setting present in `layer`
    pub fn apply(&mut self, layer: &ConfigLayer) {
        if let Some(delta) = layer.delta {
            self.superiority.delta = delta;
        }
        if let Some(alpha) = layer.alpha {
            self.superiority.alpha = alpha;
        }
        if let Some(label) = &layer.label_a {
            self.label_a = Some(label.clone());
        }
        if let Some(label) = &layer.label_b {
            self.label_b = Some(label.clone());
        }
        if let Some(results) = &layer.results {
            self.results = Some(results.clone());
        }
        if let Some(method) = layer.p_value_method {
            self.p_value_method = Some(method);
        }
    }

    /// Merge defaults, file, environment and command line, then validate
    pub fn resolve(
        file: Option<&Path>,
        env: &ConfigLayer,
        cli: &ConfigLayer,
    ) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = file {
            config.apply(&ConfigLayer::from_file(path)?);
            tracing::debug!("Loaded configuration from {}", path.display());
        }
        config.apply(env);
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.superiority.validate()?;
        Ok(())
    }

    /// Results path, or an error naming every way to provide one
    pub fn results_path(&self) -> Result<&Path> {
        self.results.as_deref().with_context(|| {
            format!(
                "No results file given (use --results, {} or `results` in the config file)",
                ENV_RESULTS
            )
        })
    }
}
