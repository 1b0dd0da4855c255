use models::errors::ModelError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required create field was absent or empty.
    #[error("'{0}' is required")]
    MissingField(&'static str),
    /// The largest stored id leaves no room for a successor.
    #[error("no id available after {0}")]
    IdExhausted(i64),
    #[error("seed data error: {0}")]
    Seed(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        ServiceError::Model(e.into())
    }
}
