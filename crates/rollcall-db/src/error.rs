use rollcall_core::AppError;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn unique(constraint: impl Into<String>) -> Self {
        StoreError::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        StoreError::ForeignKeyViolation {
            constraint: constraint.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
        }
        StoreError::Database(err)
    }
}

/// Store failures that reach a unit-of-work boundary unhandled.
///
/// Unique violations become `Conflict`; everything else is an `Integrity`
/// failure. Services that know which rule a unique violation stands for map
/// it themselves with a precise message.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => {
                AppError::conflict(anyhow::anyhow!("Duplicate value violates {}", constraint))
            }
            other => AppError::integrity(anyhow::Error::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::ErrorKind;

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err: AppError = StoreError::unique("users_username_key").into();
        assert!(err.is(ErrorKind::Conflict));
        assert!(err.error.to_string().contains("users_username_key"));
    }

    #[test]
    fn test_foreign_key_violation_maps_to_integrity() {
        let err: AppError = StoreError::foreign_key("enrollments_course_id_fkey").into();
        assert!(err.is(ErrorKind::Integrity));
    }

    #[test]
    fn test_plain_sqlx_error_is_database() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
        assert!(!err.is_unique_violation());
    }
}
