use thiserror::Error;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies a sqlx failure for the given entity. Unique violations become
    /// `Conflict(on_conflict)`, missing rows and dangling foreign keys become `NotFound`.
    pub(crate) fn from_sqlx(e: sqlx::Error, entity: &'static str, on_conflict: &str) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound(entity),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(on_conflict.to_string())
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::NotFound(entity)
            }
            other => StoreError::Database(other),
        }
    }
}
