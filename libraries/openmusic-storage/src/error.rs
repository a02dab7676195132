/// Storage-specific errors
use openmusic_core::Fault;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller may not touch this entity
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The request conflicts with stored state (duplicate, missing link, ...)
    #[error("Invalid operation: {0}")]
    Invalid(String),

    /// A stored value could not be interpreted
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

impl From<StorageError> for Fault {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, .. } => Fault::not_found(format!("{entity} not found")),
            StorageError::Forbidden(msg) => Fault::forbidden(msg),
            StorageError::Invalid(msg) => Fault::bad_request(msg),
            err @ (StorageError::Corrupt(_)
            | StorageError::Database(_)
            | StorageError::Migration(_)) => Fault::server(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_become_client_faults() {
        let fault = Fault::from(StorageError::not_found("Album", "album-1"));
        assert_eq!(fault, Fault::not_found("Album not found"));

        let fault = Fault::from(StorageError::forbidden("nope"));
        assert_eq!(fault.status_code(), 403);

        let fault = Fault::from(StorageError::invalid("Username already taken"));
        assert_eq!(fault, Fault::bad_request("Username already taken"));
    }

    #[test]
    fn database_errors_become_server_faults() {
        let fault = Fault::from(StorageError::Database(sqlx::Error::RowNotFound));
        assert!(!fault.is_client());
        assert_eq!(fault.status_code(), 500);

        let fault = Fault::from(StorageError::Corrupt("bad action".into()));
        assert!(!fault.is_client());
    }
}
