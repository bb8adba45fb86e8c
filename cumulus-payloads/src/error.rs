use thiserror::Error;

/// Errors produced while decoding or encoding a payload
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
    #[error("Unknown value '{token}' for {field}")]
    UnknownEnumValue { field: String, token: String },
    #[error("Invalid value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },
    #[error("Codec error: {0}")]
    UnderlyingCodec(#[from] serde_yaml::Error),
}

impl PayloadError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(field: impl Into<String>, token: impl Into<String>) -> Self {
        Self::UnknownEnumValue {
            field: field.into(),
            token: token.into(),
        }
    }

    /// Stable error code reported to peers and in logs
    pub fn code(&self) -> &'static str {
        match self {
            PayloadError::MalformedEnvelope(_) => "MALFORMED_ENVELOPE",
            PayloadError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            PayloadError::UnknownEnumValue { .. } => "UNKNOWN_ENUM_VALUE",
            PayloadError::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
            PayloadError::UnderlyingCodec(_) => "CODEC_ERROR",
        }
    }

    /// Dotted path of the offending field, when the error concerns one
    pub fn field(&self) -> Option<&str> {
        match self {
            PayloadError::MissingRequiredField(field)
            | PayloadError::UnknownEnumValue { field, .. }
            | PayloadError::InvalidFieldValue { field, .. } => Some(field),
            PayloadError::MalformedEnvelope(_) | PayloadError::UnderlyingCodec(_) => None,
        }
    }
}

pub type PayloadResult<T> = std::result::Result<T, PayloadError>;
