#![forbid(unsafe_code)]

pub mod calendar;
pub mod model;
pub mod report;
pub mod schema;

pub mod ids {
    const MAX_IDENTIFIER_LEN: usize = 64;

    const RESERVED_WORDS: &[&str] = &[
        "ALTER", "AND", "AS", "BEGIN", "BY", "CHECK", "COMMIT", "CREATE", "DEFAULT", "DELETE",
        "DISTINCT", "DROP", "FROM", "GROUP", "INDEX", "INSERT", "INTO", "JOIN", "KEY", "NOT",
        "NULL", "ON", "OR", "ORDER", "PRAGMA", "PRIMARY", "REFERENCES", "ROLLBACK", "SELECT",
        "TABLE", "UNION", "UPDATE", "VALUES", "WHERE",
    ];

    /// A table or column name that is safe to interpolate into SQL text.
    ///
    /// Values are always bound as parameters; identifiers cannot be, so every
    /// identifier that reaches a statement goes through this type first.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct SqlIdentifier(String);

    impl SqlIdentifier {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn into_string(self) -> String {
            self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, SqlIdentifierError> {
            let value = value.into();
            validate_identifier(&value)?;
            Ok(Self(value))
        }

        /// SQLite compares identifiers case-insensitively.
        pub fn matches(&self, other: &str) -> bool {
            self.0.eq_ignore_ascii_case(other)
        }
    }

    impl std::fmt::Display for SqlIdentifier {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum SqlIdentifierError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
        ReservedWord,
    }

    impl SqlIdentifierError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "identifier must not be empty",
                Self::TooLong => "identifier is too long",
                Self::InvalidFirstChar => "identifier must start with an ASCII letter or '_'",
                Self::InvalidChar { .. } => "identifier may only contain ASCII letters, digits and '_'",
                Self::ReservedWord => "identifier is a reserved SQL keyword",
            }
        }
    }

    fn validate_identifier(value: &str) -> Result<(), SqlIdentifierError> {
        if value.is_empty() {
            return Err(SqlIdentifierError::Empty);
        }
        if value.len() > MAX_IDENTIFIER_LEN {
            return Err(SqlIdentifierError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(SqlIdentifierError::Empty);
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(SqlIdentifierError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate().skip(1) {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                continue;
            }
            return Err(SqlIdentifierError::InvalidChar { ch, index });
        }
        if RESERVED_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(value))
        {
            return Err(SqlIdentifierError::ReservedWord);
        }
        Ok(())
    }
}
