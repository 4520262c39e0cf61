use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Runtime configuration.
///
/// Layered as: built-in defaults, then `config.toml` (optional), then raw
/// environment variables with the upper-cased field name (`PORT`, `DATABASE_URL`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub loglevel: String,

    pub detection_api_base: Url,
    pub detection_pat: String,
    pub detection_user_id: String,
    pub detection_app_id: String,
    pub detection_model_id: String,
    pub detection_model_version: Option<String>,

    pub proxy: Option<Url>,
    pub cors_origins: Vec<String>,
    pub body_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite:smart-brain.sqlite".to_string(),
            db_max_connections: 5,
            loglevel: "info".to_string(),
            detection_api_base: Url::parse("https://api.clarifai.com")
                .expect("default detection api base is a valid url"),
            detection_pat: String::new(),
            detection_user_id: "clarifai".to_string(),
            detection_app_id: "main".to_string(),
            detection_model_id: "face-detection".to_string(),
            detection_model_version: None,
            proxy: None,
            cors_origins: Vec::new(),
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::raw().only(&[
                "host",
                "port",
                "database_url",
                "db_max_connections",
                "loglevel",
                "detection_api_base",
                "detection_pat",
                "detection_user_id",
                "detection_app_id",
                "detection_model_id",
                "detection_model_version",
                "proxy",
                "cors_origins",
                "body_limit_bytes",
            ]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("FATAL: invalid configuration"));
