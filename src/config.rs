use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    DeepSeek,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::DeepSeek => "deepseek",
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "openai" => Ok(AiProvider::OpenAi),
            "deepseek" => Ok(AiProvider::DeepSeek),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub site_url: String,
    /// Scheme, host and port of `site_url`; the only origin CORS admits.
    pub site_origin: String,
    pub ai_provider: AiProvider,
    pub ai_api_key: String,
    pub render_secret: String,
    pub chrome_bin: String,
    pub uploads_dir: String,
    pub log_format: LogFormat,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let ai_provider: AiProvider = get_env_or("AI_PROVIDER", "openai")
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for AI_PROVIDER: {}", e)))?;
        let ai_api_key = match ai_provider {
            AiProvider::OpenAi => get_env("OPENAI_API_KEY")?,
            AiProvider::DeepSeek => get_env("DEEPSEEK_API_KEY")?,
        };
        let log_format = match get_env_or("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let (site_url, site_origin) = parse_site_url(&get_env("SITE_URL")?)?;

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret: get_env("JWT_SECRET")?,
            site_url,
            site_origin,
            ai_provider,
            ai_api_key,
            render_secret: get_env("RENDER_SECRET")?,
            chrome_bin: get_env_or("CHROME_BIN", "chromium"),
            uploads_dir: get_env_or("UPLOADS_DIR", "./uploads"),
            log_format,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn parse_site_url(raw: &str) -> Result<(String, String)> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid value for SITE_URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::Config(format!(
            "Invalid value for SITE_URL: '{}' is not an http(s) URL",
            raw
        )));
    }
    Ok((trimmed.to_string(), url.origin().ascii_serialization()))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
