//! Configuration module

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use flowguard_core::constants::{
    get_model_dir, get_threshold_var, DEFAULT_AUDIT_MAX_ENTRIES, DEFAULT_AUDIT_QUEUE_CAPACITY,
};
use flowguard_core::logic::audit::AuditFormat;
use flowguard_core::ThresholdConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding scaler / classifier / label map artifacts
    pub model_dir: PathBuf,

    /// Binary-stage decision threshold
    pub threshold: ThresholdConfig,

    /// Audit log file
    pub audit_log_path: PathBuf,

    /// Audit log format (csv, jsonl)
    pub audit_format: AuditFormat,

    /// JSONL rotation size
    pub audit_max_entries: usize,

    /// Pending audit writes before new records are dropped
    pub audit_queue_capacity: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            model_dir: PathBuf::from(flowguard_core::constants::DEFAULT_MODEL_DIR),
            threshold: ThresholdConfig::default(),
            audit_log_path: PathBuf::from("logs/traffic_log.csv"),
            audit_format: AuditFormat::Csv,
            audit_max_entries: DEFAULT_AUDIT_MAX_ENTRIES,
            audit_queue_capacity: DEFAULT_AUDIT_QUEUE_CAPACITY,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(p) => p.parse::<u16>().with_context(|| format!("invalid PORT '{}'", p))?,
            Err(_) => defaults.port,
        };

        let threshold = match get_threshold_var() {
            Some(t) => ThresholdConfig::parse(&t).context("invalid DETECTION_THRESHOLD")?,
            None => defaults.threshold,
        };

        let audit_format = match env::var("AUDIT_FORMAT") {
            Ok(f) => f.parse::<AuditFormat>().map_err(|e: String| anyhow!(e))?,
            Err(_) => defaults.audit_format,
        };

        let audit_max_entries = match env::var("AUDIT_MAX_ENTRIES") {
            Ok(n) => n.parse::<usize>().with_context(|| format!("invalid AUDIT_MAX_ENTRIES '{}'", n))?,
            Err(_) => defaults.audit_max_entries,
        };

        let audit_queue_capacity = match env::var("AUDIT_QUEUE_CAPACITY") {
            Ok(n) => n
                .parse::<usize>()
                .with_context(|| format!("invalid AUDIT_QUEUE_CAPACITY '{}'", n))?,
            Err(_) => defaults.audit_queue_capacity,
        };

        Ok(Self {
            port,
            model_dir: PathBuf::from(get_model_dir()),
            threshold,
            audit_log_path: env::var("AUDIT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.audit_log_path),
            audit_format,
            audit_max_entries,
            audit_queue_capacity,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
