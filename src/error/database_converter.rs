use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.message(), operation)
            }
            DieselError::NotFound => AppError::not_found("resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(kind: DatabaseErrorKind, message: &str, operation: &str) -> AppError {
        match kind {
            DatabaseErrorKind::UniqueViolation => {
                match ConstraintParser::parse_unique_violation(message) {
                    // SQLite does not report the offending value
                    Some((entity, field)) => AppError::Duplicate {
                        entity,
                        field,
                        value: String::new(),
                    },
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::anyhow!("Unique constraint violation: {}", message),
                    },
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                match ConstraintParser::parse_not_null_violation(message) {
                    Some((entity, field)) => AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    },
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::anyhow!("Not null constraint violation: {}", message),
                    },
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => AppError::Validation {
                field: "reference".to_string(),
                reason: format!("Invalid reference: {}", message),
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("{}", message),
            },
        }
    }
}
