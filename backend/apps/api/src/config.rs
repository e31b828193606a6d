//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;
use platform::config::{self, ConfigError};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 31113;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = config::parse_or("API_HOST", DEFAULT_HOST)?;
        let port = config::parse_or("API_PORT", DEFAULT_PORT)?;
        let origins = config::optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_owned());

        Ok(Self {
            database_url: config::required("DATABASE_URL")?,
            max_connections: config::parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            addr: SocketAddr::new(host, port),
            frontend_origins: parse_origins(&origins),
        })
    }
}

/// Origins that are not valid header values are skipped
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    config::split_list(raw)
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}
