//! Extracts table and column names from SQLite constraint messages.
//!
//! SQLite reports violations as plain text, e.g.
//! `UNIQUE constraint failed: users.email` or
//! `NOT NULL constraint failed: users.username`. Composite constraints list
//! several `table.column` pairs separated by commas; only the first is used.

/// Parser for SQLite constraint violation messages.
pub struct ConstraintParser;

impl ConstraintParser {
    /// Parses `UNIQUE constraint failed: <table>.<column>`.
    ///
    /// Returns `(entity, field)` where entity is the singular table name.
    pub fn parse_unique_violation(message: &str) -> Option<(String, String)> {
        Self::parse_with_prefix(message, "UNIQUE constraint failed:")
    }

    /// Parses `NOT NULL constraint failed: <table>.<column>`.
    pub fn parse_not_null_violation(message: &str) -> Option<(String, String)> {
        Self::parse_with_prefix(message, "NOT NULL constraint failed:")
    }

    fn parse_with_prefix(message: &str, prefix: &str) -> Option<(String, String)> {
        let rest = message.trim().strip_prefix(prefix)?;
        let first = rest.split(',').next()?.trim();
        let (table, column) = first.split_once('.')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((Self::singularize(table), column.to_string()))
    }

    fn singularize(table: &str) -> String {
        table.strip_suffix('s').unwrap_or(table).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unique_violation() {
        let parsed = ConstraintParser::parse_unique_violation("UNIQUE constraint failed: users.email");
        assert_eq!(parsed, Some(("user".to_string(), "email".to_string())));
    }

    #[test]
    fn test_parse_unique_violation_role_name() {
        let parsed = ConstraintParser::parse_unique_violation("UNIQUE constraint failed: roles.name");
        assert_eq!(parsed, Some(("role".to_string(), "name".to_string())));
    }

    #[test]
    fn test_parse_composite_uses_first_column() {
        let parsed = ConstraintParser::parse_unique_violation(
            "UNIQUE constraint failed: users.email, users.username",
        );
        assert_eq!(parsed, Some(("user".to_string(), "email".to_string())));
    }

    #[test]
    fn test_parse_not_null_violation() {
        let parsed =
            ConstraintParser::parse_not_null_violation("NOT NULL constraint failed: users.username");
        assert_eq!(parsed, Some(("user".to_string(), "username".to_string())));
    }

    #[test]
    fn test_parse_unrelated_message() {
        assert_eq!(ConstraintParser::parse_unique_violation("database is locked"), None);
        assert_eq!(
            ConstraintParser::parse_unique_violation("UNIQUE constraint failed: nodot"),
            None
        );
    }
}
