use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("No element found for selector: {0}")]
    SelectorNotFound(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Selector {selector} did not appear after {attempts} polls")]
    DiscoveryTimeout { selector: String, attempts: u32 },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Page driver error: {0}")]
    Driver(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn navigation(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors that end the current attempt of a single candidate.
    pub fn is_candidate_level(&self) -> bool {
        matches!(
            self,
            Error::Navigation { .. }
                | Error::NavigationTimeout { .. }
                | Error::Persistence(_)
                | Error::Driver(_)
                | Error::Http(_)
        )
    }

    pub fn is_discovery(&self) -> bool {
        matches!(self, Error::Discovery(_) | Error::DiscoveryTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
