use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no catalog sources configured: the `gwurl` map is missing or empty")]
    MissingSources,

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("invalid URL for catalog source '{name}' ({url}): {reason}")]
    InvalidSourceUrl {
        name: String,
        url: String,
        reason: String,
    },
}
