use std::{env, net::SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;

use crate::jsonrpc::{DispatchOptions, MessageStyle, NotificationErrors};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub rpc_path: String,
    pub content_type: HeaderValue,
    pub debug: bool,
    pub message_style: MessageStyle,
    pub notification_errors: NotificationErrors,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("RPC_PATH must start with '/'")]
    InvalidPath,
    #[error("RPC_CONTENT_TYPE must be a valid header value")]
    InvalidContentType,
    #[error("RPC_DEBUG must be one of: 1, 0, true, false, yes, no, on, off")]
    InvalidDebugFlag,
    #[error("RPC_ERROR_MESSAGES must be 'legacy' or 'plain'")]
    InvalidMessageStyle,
    #[error("RPC_NOTIFICATION_ERRORS must be 'report' or 'suppress'")]
    InvalidNotificationErrors,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = read("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let rpc_path = read("RPC_PATH").unwrap_or_else(|| "/".to_string());
        if !rpc_path.starts_with('/') {
            return Err(ConfigError::InvalidPath);
        }

        let content_type = read("RPC_CONTENT_TYPE")
            .map(|value| {
                HeaderValue::from_str(&value).map_err(|_| ConfigError::InvalidContentType)
            })
            .transpose()?
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let debug = read("RPC_DEBUG")
            .map(|value| parse_flag(&value))
            .transpose()?
            .unwrap_or(false);

        let message_style = match read("RPC_ERROR_MESSAGES")
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("legacy") => MessageStyle::Legacy,
            Some("plain") => MessageStyle::Plain,
            Some(_) => return Err(ConfigError::InvalidMessageStyle),
        };

        let notification_errors = match read("RPC_NOTIFICATION_ERRORS")
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("report") => NotificationErrors::Report,
            Some("suppress") => NotificationErrors::Suppress,
            Some(_) => return Err(ConfigError::InvalidNotificationErrors),
        };

        let config = Self {
            bind_addr,
            bind_port,
            rpc_path,
            content_type,
            debug,
            message_style,
            notification_errors,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            debug: self.debug,
            message_style: self.message_style,
            notification_errors: self.notification_errors,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidDebugFlag),
    }
}
