use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::{LEADERBOARD_FEATURES, LinearModel, PRIORITY_FEATURES};
use taskrank_ingest::MemberSource;

use crate::state::{ensure_taskrank_home, taskrank_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceSection,
    pub store: StoreSection,
    /// Weights follow `complexity, days_left, dependency_count, status_encoded, dependency_level`.
    pub priority_model: LinearModel,
    /// Weights follow `total_tasks, complexity_4, complexity_3, avg_completion_time, on_time_rate`.
    pub leaderboard_model: LinearModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    pub name: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Realtime database base URL. Takes precedence over `members_file`.
    pub rest_url: Option<String>,
    pub auth_token: Option<String>,
    /// Local JSON export with the tree under `members`.
    pub members_file: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceSection {
                name: "TaskManager".to_string(),
                port: 5000,
            },
            store: StoreSection {
                rest_url: None,
                auth_token: None,
                members_file: None,
                timeout_secs: default_timeout_secs(),
            },
            // Favor complex, near-deadline, blocking work.
            priority_model: LinearModel::new(vec![1.5, -0.2, -0.5, 2.0, 1.0], 0.0),
            leaderboard_model: LinearModel::new(vec![1.0, 2.0, 1.0, -0.5, 10.0], 0.0),
        }
    }
}

impl Config {
    /// Both models must match the feature vectors the rankers build.
    pub fn validate(&self) -> Result<()> {
        if self.priority_model.weights.len() != PRIORITY_FEATURES.len() {
            bail!(
                "priority_model needs {} weights ({}), got {}",
                PRIORITY_FEATURES.len(),
                PRIORITY_FEATURES.join(", "),
                self.priority_model.weights.len()
            );
        }
        if self.leaderboard_model.weights.len() != LEADERBOARD_FEATURES.len() {
            bail!(
                "leaderboard_model needs {} weights ({}), got {}",
                LEADERBOARD_FEATURES.len(),
                LEADERBOARD_FEATURES.join(", "),
                self.leaderboard_model.weights.len()
            );
        }
        Ok(())
    }

    pub fn member_source(&self) -> Result<MemberSource> {
        if let Some(url) = &self.store.rest_url {
            return Ok(MemberSource::Rest {
                base_url: url.clone(),
                auth_token: self.store.auth_token.clone(),
                timeout_secs: self.store.timeout_secs,
            });
        }
        if let Some(path) = &self.store.members_file {
            return Ok(MemberSource::File(path.clone()));
        }
        bail!("no member store configured (set store.rest_url or store.members_file, or pass --members-file / --url)")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskrank_home()?.join("config.toml"))
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn init_config() -> Result<()> {
    let p = ensure_taskrank_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}
