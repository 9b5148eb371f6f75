use thiserror::Error as ThisError;

/// Underlying store error carried by [`LiftlogError::Storage`].
pub use sqlx::Error as StorageError;

pub type Result<T, E = LiftlogError> = std::result::Result<T, E>;

/// Failure kinds surfaced by the query and command service.
///
/// Every store-layer failure is folded into one of these before it leaves
/// the service, so callers only ever branch on three cases.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum LiftlogError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The store failed; nothing from the unit of work was committed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LiftlogError {
    pub fn validation<D: std::fmt::Display>(d: D) -> Self {
        LiftlogError::Validation(d.to_string())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        LiftlogError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LiftlogError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LiftlogError::Validation(_))
    }
}
