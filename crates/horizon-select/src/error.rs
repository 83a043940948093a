//! Error types for the dropdown widget.
//!
//! Only usage errors are reported: a wrap call without targets or with
//! malformed options. Operations on controls, panels or triggers that no
//! longer exist are no-ops, not errors.

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Usage errors reported at construction time.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// A wrap call received no backing controls.
    #[error("You must provide at least one select source to wrap")]
    MissingTarget,

    /// Options were loaded from something other than an object.
    #[error("Options must be an object, got {found}")]
    OptionsNotObject { found: &'static str },

    /// An option has a value outside its accepted range or shape.
    #[error("Invalid value for option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    /// Options JSON could not be parsed or did not match the expected shape.
    #[error("Failed to parse options JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Options TOML could not be parsed or did not match the expected shape.
    #[error("Failed to parse options TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SelectError {
    /// Create an invalid option error.
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}
