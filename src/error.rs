//! Error types and handling for the weather survey

use thiserror::Error;

/// Main error type for the survey library
#[derive(Error, Debug)]
pub enum SurveyError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The weather API answered, but not with a usable result
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code, if the failure came from a non-success response
        status: Option<u16>,
    },

    /// Transport-level failures (connect, timeout, body read)
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// Response body could not be decoded or lacked a required field
    #[error("Invalid response: {message}")]
    Decode { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// CSV encoding errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// Chart rendering errors
    #[error("Plot error: {message}")]
    Plot { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SurveyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error without a status code
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
        }
    }

    /// Create a new API error carrying the HTTP status
    pub fn api_status<S: Into<String>>(message: S, status: u16) -> Self {
        Self::Api {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new plot error
    pub fn plot<S: Into<String>>(message: S) -> Self {
        Self::Plot {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SurveyError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file and API key.")
            }
            SurveyError::Api {
                status: Some(401), ..
            } => "The weather API rejected the API key. Please check your OpenWeatherMap key."
                .to_string(),
            SurveyError::Api { message, .. } => format!("Weather API error: {message}"),
            SurveyError::Network { .. } => {
                "Unable to connect to the weather API. Please check your internet connection."
                    .to_string()
            }
            SurveyError::Decode { message } => {
                format!("Unexpected response from the weather API: {message}")
            }
            SurveyError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SurveyError::Csv { .. } => {
                "Writing the CSV file failed. Please check the output path.".to_string()
            }
            SurveyError::Plot { message } => format!("Rendering a plot failed: {message}"),
            SurveyError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
