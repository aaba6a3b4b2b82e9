use thiserror::Error;

/// Top-level error type for the Luna widget system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for LunaError`
/// so that the `?` operator works seamlessly across crate boundaries.
///
/// Note that most failures in this system are absorbed by policy rather
/// than propagated: a chat turn that fails produces a canned answer, not
/// an `Err`. These variants cover the paths that are genuinely fatal to an
/// operation (bad config, malformed wire data) or internal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LunaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Embed error: {0}")]
    Embed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LunaError {
    fn from(err: toml::de::Error) -> Self {
        LunaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LunaError {
    fn from(err: toml::ser::Error) -> Self {
        LunaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LunaError {
    fn from(err: serde_json::Error) -> Self {
        LunaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Luna operations.
pub type Result<T> = std::result::Result<T, LunaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LunaError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = LunaError::Api("503 upstream".to_string());
        assert_eq!(err.to_string(), "API error: 503 upstream");

        let err = LunaError::Chat("empty turn".to_string());
        assert_eq!(err.to_string(), "Chat error: empty turn");

        let err = LunaError::Voice("no microphone".to_string());
        assert_eq!(err.to_string(), "Voice error: no microphone");

        let err = LunaError::Embed("already installed".to_string());
        assert_eq!(err.to_string(), "Embed error: already installed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let luna_err: LunaError = io_err.into();
        assert!(matches!(luna_err, LunaError::Io(_)));
        assert!(luna_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let err: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(err.is_err());
        let luna_err: LunaError = err.unwrap_err().into();
        assert!(matches!(luna_err, LunaError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(err.is_err());
        let luna_err: LunaError = err.unwrap_err().into();
        assert!(matches!(luna_err, LunaError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_error_debug_impl() {
        let err = LunaError::Config("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("test debug"));
    }
}
