use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Inconsistent role data: {0}")]
    Corrupt(String),

    #[error("Database error")]
    Db(sqlx::Error),

    #[error("ORM error")]
    Orm(sea_orm::DbErr),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

// Constraint violations surface as `Conflict` so the menu layer can branch
// on kind instead of inspecting driver message text.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return AppError::Conflict("record already exists".into());
                }
                Some("23503") => {
                    return AppError::Conflict("record is referenced elsewhere".into());
                }
                _ => {}
            }
        }
        AppError::Db(err)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("record already exists".into())
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::Conflict("record is referenced elsewhere".into())
            }
            _ => AppError::Orm(err),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl AppError {
    /// One-line message shown at the menu boundary; the session continues
    /// after every variant.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound => "No such record found.".into(),
            AppError::Validation(msg) => format!("Invalid input: {msg}"),
            AppError::PermissionDenied => "You do not have permission for that.".into(),
            AppError::Conflict(msg) => format!("Conflict: {msg}"),
            AppError::Corrupt(msg) => format!("Data inconsistency detected: {msg}"),
            AppError::Db(_) | AppError::Orm(_) | AppError::Internal(_) => {
                "An internal error occurred; the operation was aborted.".into()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
