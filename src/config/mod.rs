pub mod links;
pub mod responses;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file IO error for '{path}': {source}")] Io {
        path: String,
        #[source] source: std::io::Error,
    },
    #[error("Config JSON parsing error for '{path}': {source}")] Json {
        path: String,
        #[source] source: serde_json::Error,
    },
    #[error("Invalid base URL '{url}': {source}")] InvalidBaseUrl {
        url: String,
        #[source] source: url::ParseError,
    },
    #[error("Base URL '{0}' must use http or https")] UnsupportedScheme(String),
    #[error("Template '{template}' references unknown page '{{{placeholder}}}'")] UnknownPlaceholder {
        template: String,
        placeholder: String,
    },
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_string(),
        source,
    })
}
