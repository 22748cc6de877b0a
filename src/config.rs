// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Run configuration.
//!
//! The verifier reads a small JSON document (by default `config.json` in the
//! working directory) naming its input files:
//!
//! ```json
//! {
//!   "keyfile": "EP2024-public.pem",
//!   "prooffile": "EP2024-proof.json",
//!   "mixedfile": "EP2024-mixed.json",
//!   "threads": 8,
//!   "failure_policy": "isolate",
//!   "progress_interval": 10000
//! }
//! ```
//!
//! Relative paths are resolved against the directory of the config file.
//! Values given on the command line take precedence over the file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::batch::{BatchConfig, FailurePolicy};
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub keyfile: Option<PathBuf>,
    pub prooffile: Option<PathBuf>,
    pub mixedfile: Option<PathBuf>,
    pub threads: Option<usize>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keyfile: None,
            prooffile: None,
            mixedfile: None,
            threads: None,
            failure_policy: FailurePolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Values from the command line. `None` keeps what the file says.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub keyfile: Option<PathBuf>,
    pub prooffile: Option<PathBuf>,
    pub mixedfile: Option<PathBuf>,
    pub threads: Option<usize>,
    pub failure_policy: Option<FailurePolicy>,
}

impl Config {
    /// Parse a config document, resolving relative paths against `base_dir`.
    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Config = serde_json::from_str(json)
            .map_err(|err| Error::Config(format!("malformed config: {err}")))?;
        for path in [
            &mut config.keyfile,
            &mut config.prooffile,
            &mut config.mixedfile,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::from_json(&json, base_dir)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given. Otherwise use `config.json` from the working
    /// directory when there is one, and defaults when there is not.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(keyfile) = overrides.keyfile {
            self.keyfile = Some(keyfile);
        }
        if let Some(prooffile) = overrides.prooffile {
            self.prooffile = Some(prooffile);
        }
        if let Some(mixedfile) = overrides.mixedfile {
            self.mixedfile = Some(mixedfile);
        }
        if let Some(threads) = overrides.threads {
            self.threads = Some(threads);
        }
        if let Some(policy) = overrides.failure_policy {
            self.failure_policy = policy;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(Error::Config("threads must be at least 1".to_string()));
        }
        if self.progress_interval == 0 {
            return Err(Error::Config(
                "progress_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn keyfile(&self) -> Result<&Path> {
        required(&self.keyfile, "keyfile")
    }

    pub fn prooffile(&self) -> Result<&Path> {
        required(&self.prooffile, "prooffile")
    }

    pub fn mixedfile(&self) -> Result<&Path> {
        required(&self.mixedfile, "mixedfile")
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            threads: self.threads,
            failure_policy: self.failure_policy,
            progress_interval: self.progress_interval,
        }
    }
}

fn required<'a>(path: &'a Option<PathBuf>, name: &str) -> Result<&'a Path> {
    path.as_deref()
        .ok_or_else(|| Error::Config(format!("no {name} configured")))
}
