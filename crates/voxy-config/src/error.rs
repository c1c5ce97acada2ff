//! Errors raised while loading, validating, or persisting `config.ron`.

/// Failure modes of the [`Config`](crate::Config) file round trip.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config directory or file could not be written.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The in-memory config could not be rendered as RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A field holds a value the streaming tools cannot run with.
    #[error("invalid `{field}`: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field, e.g. `streaming.view_diameter`.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}
