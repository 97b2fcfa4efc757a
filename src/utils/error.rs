use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrangleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP error response {status} {reason} for {url}")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Turtle parse error in {url}: {source}")]
    TurtleError {
        url: String,
        #[source]
        source: crate::rdf::turtle::ParseError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl WrangleError {
    /// Process exit status for this error. HTTP failures exit with 9,
    /// configuration problems with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            WrangleError::RequestError(_) | WrangleError::HttpStatus { .. } => 9,
            WrangleError::ConfigError { .. } | WrangleError::InvalidConfigValueError { .. } => 2,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WrangleError::RequestError(_) => {
                "Check network connectivity and that the analysis URL is reachable"
            }
            WrangleError::HttpStatus { .. } => {
                "Check that the URL points at a CALMA track or analysis document"
            }
            WrangleError::TurtleError { .. } => {
                "The document is not valid Turtle; check the URL serves text/turtle"
            }
            WrangleError::IoError(_) => {
                "Check that the collection directory exists and is writable"
            }
            WrangleError::SerializationError(_) => "Report this as a bug",
            WrangleError::ConfigError { .. } | WrangleError::InvalidConfigValueError { .. } => {
                "Review command line options and the site configuration file"
            }
            WrangleError::ProcessingError { .. } => {
                "Check that the document contains the expected CALMA analysis data"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, WrangleError>;
