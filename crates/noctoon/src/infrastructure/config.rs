use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_sample_catalog")]
    pub sample_catalog: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            sample_catalog: default_sample_catalog(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_api_max_requests")]
    pub api_max_requests: u32,
    #[serde(default = "default_auth_max_requests")]
    pub auth_max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            api_max_requests: default_api_max_requests(),
            auth_max_requests: default_auth_max_requests(),
        }
    }
}

/// Credentials for signing direct browser uploads to the image host.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UploadConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_upload_folder")]
    pub folder: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub(crate) path: PathBuf,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_create_database")]
    pub create_database: bool,
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default)]
    pub enable_playground: bool,
    /// Empty means every origin is mirrored back.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    pub upload: Option<UploadConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: noctoon_home().join("config.yml"),
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            create_database: default_create_database(),
            secret: default_secret(),
            enable_playground: false,
            allowed_origins: vec![],
            seed: SeedConfig::default(),
            rate_limit: RateLimitConfig::default(),
            upload: None,
        }
    }
}

fn noctoon_home() -> PathBuf {
    match std::env::var("NOCTOON_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".noctoon"),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_secret() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

fn default_database_path() -> String {
    let path = noctoon_home();
    if !path.exists() {
        let _ = std::fs::create_dir_all(&path);
    }
    path.join("noctoon.db").display().to_string()
}

fn default_create_database() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_sample_catalog() -> bool {
    true
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_api_max_requests() -> u32 {
    100
}

fn default_auth_max_requests() -> u32 {
    10
}

fn default_upload_folder() -> String {
    "noctoon".to_string()
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => noctoon_home().join("config.yml"),
        };

        match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }
}
