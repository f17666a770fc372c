#![allow(dead_code)]

use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use soft_audit_core::{
    impl_auditable, open_db_in_memory, AuditInfo, EntityConfiguration, ModelRegistry, SqlType,
    TableBuilder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub audit: AuditInfo,
}

impl Customer {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: None,
            audit: AuditInfo::default(),
        }
    }

    pub fn with_id(id: i64, name: &str) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name)
        }
    }
}

impl_auditable!(Customer, i64);

impl EntityConfiguration for Customer {
    const TABLE: &'static str = "customers";

    fn configure(builder: &mut TableBuilder) {
        builder.property("name", SqlType::Text).required();
        builder.property("email", SqlType::Text);
    }

    fn write_columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.clone())),
            ("email", self.email.clone().map_or(Value::Null, Value::Text)),
        ]
    }

    fn read_columns(row: &Row<'_>, id: i64, audit: AuditInfo) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(id),
            name: row.get("name")?,
            email: row.get("email")?,
            audit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: Option<i32>,
    pub customer_id: i64,
    pub amount_cents: i64,
    pub audit: AuditInfo,
}

impl Invoice {
    pub fn new(customer_id: i64, amount_cents: i64) -> Self {
        Self {
            id: None,
            customer_id,
            amount_cents,
            audit: AuditInfo::default(),
        }
    }

    pub fn with_id(id: i32, customer_id: i64, amount_cents: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(customer_id, amount_cents)
        }
    }
}

impl_auditable!(Invoice, i32);

impl EntityConfiguration for Invoice {
    const TABLE: &'static str = "invoices";

    fn configure(builder: &mut TableBuilder) {
        builder
            .property("customer_id", SqlType::Integer)
            .required();
        builder
            .property("amount_cents", SqlType::Integer)
            .required();
        builder.has_index("customer_id");
    }

    fn write_columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("customer_id", Value::Integer(self.customer_id)),
            ("amount_cents", Value::Integer(self.amount_cents)),
        ]
    }

    fn read_columns(row: &Row<'_>, id: i32, audit: AuditInfo) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(id),
            customer_id: row.get("customer_id")?,
            amount_cents: row.get("amount_cents")?,
            audit,
        })
    }
}

pub fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.register::<Customer>().register::<Invoice>();
    registry
}

pub fn open_test_db() -> Connection {
    open_db_in_memory(&registry()).unwrap()
}
