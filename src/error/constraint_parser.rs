use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// PostgreSQL reports the offending key in the error detail
/// (`Key (registry)=(COMP-001) already exists.`) and names the constraint
/// `<table>_<column>_<suffix>` by default. The parser combines both to recover
/// the table, column and value involved.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing, cached for performance
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value) already exists" and its FK variants.
            // The value may itself contain parentheses.
            key_value: Regex::new(
                r"Key \((.+?)\)=\((.*?)\) (?:already exists|is not present|is still referenced|violates)",
            )
            .expect("valid key/value pattern"),
            // Matches column names in quotes
            column_name: Regex::new(r#"column "([^"]+)""#).expect("valid column pattern"),
            // Matches table names in quotes
            table_name: Regex::new(r#"table "([^"]+)""#).expect("valid table pattern"),
        }
    }
}

/// Global regex patterns cache
static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Suffixes PostgreSQL appends to generated constraint names
const CONSTRAINT_SUFFIXES: &[&str] = &["_pkey", "_fkey", "_key", "_check", "_idx"];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation into `(table, field, value)`.
    ///
    /// # Examples
    /// ```
    /// use college_rs::error::ConstraintParser;
    ///
    /// let parsed = ConstraintParser::parse_unique_violation(
    ///     "duplicate key value violates unique constraint \"teachers_registry_key\"",
    ///     Some("Key (registry)=(COMP-001) already exists."),
    ///     Some("teachers_registry_key"),
    /// );
    /// assert_eq!(
    ///     parsed,
    ///     Some(("teachers".to_string(), "registry".to_string(), "COMP-001".to_string()))
    /// );
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value(message, details);

        if let Some(constraint) = constraint_name {
            let field_hint = key_value.as_ref().map(|(field, _)| field.as_str());
            if let Some((entity, field)) = Self::parse_constraint_name(constraint, field_hint) {
                let value = key_value
                    .map(|(_, value)| value)
                    .unwrap_or_else(|| "duplicate_value".to_string());
                return Some((entity, field, value));
            }
        }

        let (field, value) = key_value?;
        let entity =
            Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a foreign key violation into `(referenced_table, field, value)`.
    ///
    /// The referenced table comes from the detail line
    /// (`... is not present in table "subjects".`); when it is missing the
    /// constraint's own table is used instead.
    pub fn parse_foreign_key_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = Self::extract_key_value(message, details)?;

        let referenced = details.and_then(Self::extract_table).or_else(|| {
            constraint_name
                .and_then(|c| Self::parse_constraint_name(c, Some(&field)))
                .map(|(entity, _)| entity)
        });

        Some((
            referenced.unwrap_or_else(|| "resource".to_string()),
            field,
            value,
        ))
    }

    /// Parses a not null violation into `(table, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column(message)?;
        let entity = Self::extract_table(message)
            .or_else(|| {
                constraint_name
                    .and_then(|c| Self::parse_constraint_name(c, Some(&field)))
                    .map(|(entity, _)| entity)
            })
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a check constraint violation into `(table, field)`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(|c| Self::parse_constraint_name(c, None)) {
            return Some(parsed);
        }

        let field = Self::extract_column(message)?;
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a generated constraint name into `(table, column)`.
    ///
    /// - `teachers_registry_key` with hint `registry` -> `("teachers", "registry")`
    /// - `student_subjects_subject_id_fkey` with hint `subject_id` -> `("student_subjects", "subject_id")`
    /// - `students_pkey` -> `("students", "id")`
    ///
    /// Without a hint the first underscore separates table and column, which is
    /// only correct for single-word table names.
    pub fn parse_constraint_name(
        constraint_name: &str,
        field_hint: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(table) = constraint_name.strip_suffix("_pkey") {
            if table.is_empty() {
                return None;
            }
            let field = field_hint.unwrap_or("id");
            return Some((table.to_string(), field.to_string()));
        }

        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        if let Some(field) = field_hint {
            if let Some(table) = stem.strip_suffix(&format!("_{field}")) {
                if !table.is_empty() {
                    return Some((table.to_string(), field.to_string()));
                }
            }
        }

        let (table, field) = stem.split_once('_')?;
        if table.is_empty() || field.is_empty() {
            return None;
        }
        Some((table.to_string(), field.to_string()))
    }

    /// Extracts `(field, value)` from the detail line, falling back to the message.
    fn extract_key_value(message: &str, details: Option<&str>) -> Option<(String, String)> {
        let patterns = Self::patterns();
        details
            .into_iter()
            .chain(std::iter::once(message))
            .find_map(|text| {
                patterns
                    .key_value
                    .captures(text)
                    .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            })
    }

    fn extract_column(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .map(|caps| caps[1].to_string())
    }

    fn extract_table(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures(message)
            .map(|caps| caps[1].to_string())
    }
}
