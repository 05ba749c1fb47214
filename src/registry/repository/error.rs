//! Registry error types.
//!
//! Backend failures all map onto one shared error enum so the service layer
//! can classify them (retry, skip, abort) without knowing which backend ran
//! the call. Each error carries an [`ErrorContext`] naming the operation and
//! the record involved.

use std::fmt;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Where an error happened: the registry operation, the record kind and id, and
/// any backend detail worth keeping.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Registry operation that failed (e.g. "swap_bibs", "update_start_time")
    pub operation: Option<String>,
    /// Record kind involved (e.g. "contestant", "race", "start_entry")
    pub record: Option<String>,
    /// Identifier of the record, when one was in hand
    pub record_id: Option<String>,
    /// Backend detail, such as a response body fragment
    pub details: Option<String>,
}

impl ErrorContext {
    /// Context naming the failed operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    /// Name the record kind involved.
    pub fn with_record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }

    /// Attach the record identifier.
    pub fn with_record_id(mut self, id: impl ToString) -> Self {
        self.record_id = Some(id.to_string());
        self
    }

    /// Attach backend detail text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("operation", self.operation.as_deref()),
            ("record", self.record.as_deref()),
            ("id", self.record_id.as_deref()),
            ("details", self.details.as_deref()),
        ];
        write!(f, "[")?;
        let mut sep = "";
        for (name, value) in fields {
            if let Some(value) = value {
                write!(f, "{}{}={}", sep, name, value)?;
                sep = ", ";
            }
        }
        write!(f, "]")
    }
}

/// Error type for registry operations.
///
/// The service layer reacts to the variant, never to the backend: see
/// `is_retryable` and `is_unauthorized`.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A record service could not be reached. Transient, worth retrying.
    #[error("Record service unreachable: {message} {context}")]
    ConnectionError { message: String, context: ErrorContext },

    /// Requested record does not exist.
    #[error("Record not found: {message} {context}")]
    NotFound { message: String, context: ErrorContext },

    /// The bearer token was rejected by a record service.
    #[error("Unauthorized: {message} {context}")]
    Unauthorized { message: String, context: ErrorContext },

    /// The record service rejected the request payload.
    #[error("Validation failed: {message} {context}")]
    ValidationError { message: String, context: ErrorContext },

    /// The registry itself is misconfigured (bad URL, missing token).
    #[error("Registry configuration error: {message} {context}")]
    ConfigurationError { message: String, context: ErrorContext },

    /// Unexpected failure inside a backend.
    #[error("Internal registry error: {message} {context}")]
    InternalError { message: String, context: ErrorContext },

    /// A record service did not answer in time. Transient, worth retrying.
    #[error("Record service timeout: {message} {context}")]
    TimeoutError { message: String, context: ErrorContext },
}

impl RegistryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError { message: message.into(), context: ErrorContext::default() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into(), context: ErrorContext::default() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into(), context: ErrorContext::default() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError { message: message.into(), context: ErrorContext::default() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into(), context: ErrorContext::default() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError { message: message.into(), context: ErrorContext::default() }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError { message: message.into(), context: ErrorContext::default() }
    }

    /// Replace the error context, keeping the variant and message.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        *self.context_mut() = context;
        self
    }

    /// Add or update the operation name in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Transport failures are retryable; rejections are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError { .. } | Self::TimeoutError { .. }
        )
    }

    /// Check if this error means the caller's token was rejected.
    ///
    /// Batch operations abort on the first unauthorized response instead of
    /// continuing with doomed calls.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Unauthorized { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Unauthorized { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }
}

impl From<String> for RegistryError {
    fn from(s: String) -> Self {
        RegistryError::internal(s)
    }
}

impl From<&str> for RegistryError {
    fn from(s: &str) -> Self {
        RegistryError::internal(s.to_string())
    }
}

#[cfg(feature = "rest-client")]
impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return RegistryError::timeout(err.to_string());
        }
        if err.is_connect() {
            return RegistryError::connection(err.to_string());
        }
        if err.is_decode() {
            return RegistryError::internal(format!("Response decode error: {}", err));
        }
        RegistryError::connection(err.to_string())
    }
}
