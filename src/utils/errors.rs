use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Canvas error: {message}")]
    Canvas { message: String },

    #[error("Translation error: {message}")]
    Translation { message: String },

    #[error("Launch tracking error: {message}")]
    Analytics { message: String },

    #[error("Interface error: {message}")]
    Interface { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GameError {
    pub fn canvas<S: Into<String>>(message: S) -> Self {
        Self::Canvas {
            message: message.into(),
        }
    }

    pub fn translation<S: Into<String>>(message: S) -> Self {
        Self::Translation {
            message: message.into(),
        }
    }

    pub fn analytics<S: Into<String>>(message: S) -> Self {
        Self::Analytics {
            message: message.into(),
        }
    }

    pub fn interface<S: Into<String>>(message: S) -> Self {
        Self::Interface {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = GameError::canvas("surface has zero width");
        assert!(matches!(error, GameError::Canvas { .. }));
        assert_eq!(error.to_string(), "Canvas error: surface has zero width");
    }

    #[test]
    fn test_translation_error() {
        let error = GameError::translation("missing file: de.json");
        assert!(matches!(error, GameError::Translation { .. }));
        assert_eq!(error.to_string(), "Translation error: missing file: de.json");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: GameError = io.into();
        assert!(matches!(error, GameError::Io(_)));
    }
}
