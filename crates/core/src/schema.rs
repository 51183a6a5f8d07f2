#![forbid(unsafe_code)]

use crate::ids::{SqlIdentifier, SqlIdentifierError};

pub const ID_COLUMN: &str = "Id";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Affinity {
    Integer,
    Text,
    Real,
    Blob,
    Numeric,
}

impl Affinity {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
            Self::Numeric => "NUMERIC",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            Self::Integer,
            Self::Text,
            Self::Real,
            Self::Blob,
            Self::Numeric,
        ]
        .into_iter()
        .find(|affinity| affinity.as_sql().eq_ignore_ascii_case(value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub affinity: Affinity,
}

const PROJECT_COLUMNS: &[ColumnSpec] = &[ColumnSpec {
    name: "Title",
    affinity: Affinity::Text,
}];

const TASK_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "Title",
        affinity: Affinity::Text,
    },
    ColumnSpec {
        name: "Responsible",
        affinity: Affinity::Text,
    },
    ColumnSpec {
        name: "Phone",
        affinity: Affinity::Text,
    },
    ColumnSpec {
        name: "StartDate",
        affinity: Affinity::Integer,
    },
    ColumnSpec {
        name: "Lasting",
        affinity: Affinity::Integer,
    },
    ColumnSpec {
        name: "IsDone",
        affinity: Affinity::Integer,
    },
    ColumnSpec {
        name: "ProjectId",
        affinity: Affinity::Integer,
    },
];

/// The two tables this store knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Projects,
    Tasks,
}

impl Table {
    /// Teardown order: projects first, then tasks.
    pub const ALL: [Table; 2] = [Table::Projects, Table::Tasks];

    pub fn name(self) -> &'static str {
        match self {
            Self::Projects => "Projects",
            Self::Tasks => "Tasks",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|table| table.name().eq_ignore_ascii_case(value))
    }

    /// Declared columns, excluding the implicit `Id` key.
    pub fn columns(self) -> &'static [ColumnSpec] {
        match self {
            Self::Projects => PROJECT_COLUMNS,
            Self::Tasks => TASK_COLUMNS,
        }
    }

    pub fn column_names(self) -> Vec<&'static str> {
        self.columns().iter().map(|column| column.name).collect()
    }

    /// `"Name TYPE"` fragments as accepted by `ColumnDef::parse`.
    pub fn column_defs(self) -> Vec<String> {
        self.columns()
            .iter()
            .map(|column| format!("{} {}", column.name, column.affinity.as_sql()))
            .collect()
    }

    pub fn has_column(self, name: &str) -> bool {
        name.eq_ignore_ascii_case(ID_COLUMN)
            || self
                .columns()
                .iter()
                .any(|column| column.name.eq_ignore_ascii_case(name))
    }
}

/// Which identifiers a statement builder may interpolate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Only `Projects`, `Tasks` and their declared columns.
    #[default]
    KnownSchema,
    /// Any identifier that passes `SqlIdentifier` validation.
    AnySyntacticallyValid,
}

impl IdentifierPolicy {
    pub fn allows_table(self, table: &SqlIdentifier) -> bool {
        match self {
            Self::KnownSchema => Table::from_name(table.as_str()).is_some(),
            Self::AnySyntacticallyValid => true,
        }
    }

    pub fn allows_column(self, table: &SqlIdentifier, column: &SqlIdentifier) -> bool {
        match self {
            Self::KnownSchema => Table::from_name(table.as_str())
                .is_some_and(|known| known.has_column(column.as_str())),
            Self::AnySyntacticallyValid => true,
        }
    }
}

/// One parsed `"name TYPE [NOT NULL]"` column fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    name: SqlIdentifier,
    affinity: Affinity,
    not_null: bool,
}

impl ColumnDef {
    pub fn new(name: SqlIdentifier, affinity: Affinity) -> Self {
        Self {
            name,
            affinity,
            not_null: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn name(&self) -> &SqlIdentifier {
        &self.name
    }

    pub fn affinity(&self) -> Affinity {
        self.affinity
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn parse(fragment: &str) -> Result<Self, ColumnDefError> {
        let mut tokens = fragment.split_whitespace();
        let Some(name) = tokens.next() else {
            return Err(ColumnDefError::Empty);
        };
        let name = SqlIdentifier::try_new(name).map_err(ColumnDefError::InvalidName)?;

        let Some(affinity) = tokens.next() else {
            return Err(ColumnDefError::MissingType);
        };
        let affinity = Affinity::parse(affinity).ok_or(ColumnDefError::UnknownType)?;

        let rest = tokens.collect::<Vec<_>>();
        let not_null = match rest.as_slice() {
            [] => false,
            [not, null] if not.eq_ignore_ascii_case("NOT") && null.eq_ignore_ascii_case("NULL") => {
                true
            }
            _ => return Err(ColumnDefError::UnsupportedConstraint),
        };

        Ok(Self {
            name,
            affinity,
            not_null,
        })
    }

    pub fn to_sql(&self) -> String {
        if self.not_null {
            format!("{} {} NOT NULL", self.name, self.affinity.as_sql())
        } else {
            format!("{} {}", self.name, self.affinity.as_sql())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnDefError {
    Empty,
    InvalidName(SqlIdentifierError),
    MissingType,
    UnknownType,
    UnsupportedConstraint,
}

impl ColumnDefError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "column definition must not be empty",
            Self::InvalidName(err) => err.message(),
            Self::MissingType => "column definition is missing a type",
            Self::UnknownType => "column type must be INTEGER, TEXT, REAL, BLOB or NUMERIC",
            Self::UnsupportedConstraint => "only NOT NULL may follow the column type",
        }
    }
}
