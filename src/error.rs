use thiserror::Error;

/// Configuration-related errors with structured variants.
///
/// These are fatal: an invalid run setup is surfaced before any task
/// is dispatched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("empty input: {what}")]
    EmptyInput { what: &'static str },

    #[error("batch output supports exactly one model, got {count}")]
    MultiModelBatch { count: usize },

    #[error("system and user template counts differ: {system} vs {user}")]
    MismatchedTemplates { system: usize, user: usize },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Template rendering errors.
///
/// A template defect cannot be fixed by retrying, so these fail the
/// affected task immediately.
#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    #[error("template '{template}' references '{{{placeholder}}}' but the entity has no such field")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("failed to read template file '{path}': {reason}")]
    ReadFile { path: String, reason: String },
}

/// Provider transport errors: the request never produced usable text.
///
/// Distinct from [`ValidationError`], which means the provider answered
/// but the answer did not match the schema.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("missing environment variable: {var}")]
    MissingApiKey { var: &'static str },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no completion choices")]
    EmptyCompletion,
}

/// Schema validation errors over a raw provider response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("response contains more than one top-level JSON object")]
    AmbiguousJson,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("missing field: {field}")]
    MissingField { field: String },

    #[error("unrecognized value for {field}: '{value}'")]
    UnrecognizedValue { field: String, value: String },

    #[error("field {field} must be a single value")]
    ExpectedScalar { field: String },

    #[error("field {field} must be a non-empty list")]
    ExpectedList { field: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input error: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, Error>;
