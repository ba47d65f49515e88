use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejection of a listing-page URL submitted from the dashboard form.
///
/// The `Display` text is shown inline under the form, so it is phrased for
/// the person typing, not for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Please enter a Hot Pepper Beauty listing URL")]
    NotListingUrl,

    #[error("The URL could not be read: {0}")]
    MalformedUrl(String),
}
