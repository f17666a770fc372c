//! Table declarations and DDL rendering.

/// Storage affinity of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        }
    }
}

/// One mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub required: bool,
    /// Store-generated primary key.
    pub identity: bool,
}

/// Single-column secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub column: &'static str,
}

/// Fluent builder collecting the mapping of one table.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    table: &'static str,
    columns: Vec<ColumnDef>,
    indexes: Vec<IndexDef>,
}

/// Handle returned by [`TableBuilder::property`] for column refinements.
pub struct PropertyBuilder<'b> {
    column: &'b mut ColumnDef,
}

impl PropertyBuilder<'_> {
    /// Marks the column `NOT NULL`.
    pub fn required(self) -> Self {
        self.column.required = true;
        self
    }

    /// Marks the column nullable again.
    pub fn optional(self) -> Self {
        self.column.required = false;
        self
    }
}

impl TableBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Declares the store-generated integer primary key.
    pub fn identity(&mut self, name: &'static str) -> &mut Self {
        let column = self.column_entry(name, SqlType::Integer);
        column.identity = true;
        column.required = true;
        self
    }

    /// Declares a column, or refines an already declared one with the same
    /// name. Columns start out nullable.
    pub fn property(&mut self, name: &'static str, sql_type: SqlType) -> PropertyBuilder<'_> {
        PropertyBuilder {
            column: self.column_entry(name, sql_type),
        }
    }

    /// Declares a secondary index named `ix_<table>_<column>`.
    pub fn has_index(&mut self, column: &'static str) -> &mut Self {
        if !self.indexes.iter().any(|index| index.column == column) {
            self.indexes.push(IndexDef {
                name: format!("ix_{}_{}", self.table, column),
                column,
            });
        }
        self
    }

    pub fn build(self) -> TableSchema {
        TableSchema {
            table: self.table,
            columns: self.columns,
            indexes: self.indexes,
        }
    }

    fn column_entry(&mut self, name: &'static str, sql_type: SqlType) -> &mut ColumnDef {
        let position = match self.columns.iter().position(|column| column.name == name) {
            Some(position) => {
                self.columns[position].sql_type = sql_type;
                position
            }
            None => {
                self.columns.push(ColumnDef {
                    name,
                    sql_type,
                    required: false,
                    identity: false,
                });
                self.columns.len() - 1
            }
        };
        &mut self.columns[position]
    }
}

/// Finished mapping of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: Vec<ColumnDef>,
    pub indexes: Vec<IndexDef>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn identity_column(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.identity)
    }

    /// Column names in declaration order, comma separated.
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(render_column)
            .collect::<Vec<_>>()
            .join(",\n    ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
            self.table, columns
        )
    }

    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({});",
                    index.name, self.table, index.column
                )
            })
            .collect()
    }
}

fn render_column(column: &ColumnDef) -> String {
    if column.identity {
        return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", column.name);
    }
    if column.required {
        format!("{} {} NOT NULL", column.name, column.sql_type.as_sql())
    } else {
        format!("{} {}", column.name, column.sql_type.as_sql())
    }
}
