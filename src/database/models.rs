use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_postgres::Row;
use tokio_postgres::types::Type;

// Database Models
//
// Row types returned by the store procedures of the asset-management schema.

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>
    where
        Self: Sized;
}

/// Login credentials as returned by `buscar_usuario_por_username`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
}

impl FromRow for CredentialRecord {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("contrasena")?,
            is_admin: row.try_get::<_, Option<bool>>("administrador")?.unwrap_or(false),
        })
    }
}

/// Render a row as a JSON object keyed by column name.
///
/// The asset and incident procedures return wide, schema-owned row sets that
/// are handed to HTTP callers unchanged, so the columns are mapped from their
/// PostgreSQL type instead of through a fixed struct. Unsupported types and
/// NULLs become `null`.
pub fn row_to_json(row: &Row) -> Value {
    let mut object = Map::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), column_value(row, idx, column.type_()));
    }
    Value::Object(object)
}

fn column_value(row: &Row, idx: usize, ty: &Type) -> Value {
    fn get<'a, T>(row: &'a Row, idx: usize) -> Option<T>
    where
        T: tokio_postgres::types::FromSql<'a>,
    {
        row.try_get::<_, Option<T>>(idx).ok().flatten()
    }

    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx).map(Value::from),
        Type::INT2 => get::<i16>(row, idx).map(Value::from),
        Type::INT4 => get::<i32>(row, idx).map(Value::from),
        Type::INT8 => get::<i64>(row, idx).map(Value::from),
        Type::FLOAT4 => get::<f32>(row, idx).map(|v| Value::from(v as f64)),
        Type::FLOAT8 => get::<f64>(row, idx).map(Value::from),
        // Numerics keep their exact decimal text, e.g. prices
        Type::NUMERIC => get::<Decimal>(row, idx).map(|v| Value::String(v.to_string())),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            get::<String>(row, idx).map(Value::String)
        }
        Type::DATE => get::<NaiveDate>(row, idx).map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        Type::TIME => get::<NaiveTime>(row, idx).map(|t| Value::String(t.to_string())),
        Type::TIMESTAMP => get::<NaiveDateTime>(row, idx)
            .map(|t| Value::String(t.format("%Y-%m-%dT%H:%M:%S").to_string())),
        Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, idx).map(|t| Value::String(t.to_rfc3339())),
        Type::JSON | Type::JSONB => get::<Value>(row, idx),
        _ => {
            tracing::debug!("Unsupported column type {} for column #{}", ty, idx);
            None
        }
    };
    value.unwrap_or(Value::Null)
}
