use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Constraint violations become the domain errors the service layer reasons
/// about: unique violations turn into `Duplicate`, foreign key violations into
/// `NotFound` for the referenced row, not-null and check violations into
/// `Validation`. Anything else is an opaque `Database` failure.
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
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    /// Maps a table name onto the entity name used in error messages.
    pub fn entity_for_table(table: &str) -> String {
        match table {
            "students" => "student",
            "subjects" => "subject",
            "teachers" => "teacher",
            "student_subjects" => "enrollment",
            other => other,
        }
        .to_string()
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let details = info.details();
        let constraint_name = info.constraint_name();

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(message, details, constraint_name).map(
                    |(table, field, value)| AppError::Duplicate {
                        entity: Self::entity_for_table(&table),
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(message, details, constraint_name)
                    .map(|(table, field, value)| {
                        AppError::not_found(&Self::entity_for_table(&table), &field, value)
                    })
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(message, constraint_name).map(
                    |(table, field)| {
                        AppError::validation(
                            &field,
                            format!("Field is required for {}", Self::entity_for_table(&table)),
                        )
                    },
                )
            }
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_check_violation(message, constraint_name).map(
                    |(table, field)| {
                        AppError::validation(
                            &field,
                            format!(
                                "Check constraint failed for {} field",
                                Self::entity_for_table(&table)
                            ),
                        )
                    },
                )
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
        })
    }
}
