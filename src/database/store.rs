//! Store Procedures
//!
//! Trait seams over the store procedures of the asset-management schema and
//! their PostgreSQL implementation on [`DatabaseConnection`].

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tokio_postgres::types::ToSql;

use crate::database::connection::DatabaseConnection;
use crate::database::models::{CredentialRecord, FromRow, row_to_json};
use crate::services::activos::{ActivoRecord, ActivoUpdate, EstadoActivo};

/// Errors raised while talking to the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("unexpected result: {0}")]
    UnexpectedRow(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Looks up login credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// At most one record per username
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>>;
}

/// Asset procedures
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn insert_activo(&self, activo: &ActivoRecord) -> StoreResult<()>;
    async fn list_activos(&self) -> StoreResult<Vec<Value>>;
    async fn find_activo(&self, id: i32) -> StoreResult<Option<Value>>;
    async fn find_activo_by_item_code(&self, item_code: &str) -> StoreResult<Option<Value>>;
    async fn find_empleado_of_activo(&self, activo_id: i32) -> StoreResult<Option<Value>>;
    async fn find_activo_of_empleado(&self, empleado_id: i32) -> StoreResult<Option<Value>>;
    /// Expects an update already passed through [`ActivoUpdate::normalize`].
    /// Returns the number of affected rows
    async fn update_activo(&self, id: i32, update: &ActivoUpdate) -> StoreResult<u64>;
    /// Returns the number of affected rows
    async fn update_estado(&self, id: i32, estado: EstadoActivo) -> StoreResult<u64>;
    async fn assign_activo(&self, id: i32, empleado_id: i32, fecha_asignacion: NaiveDate) -> StoreResult<()>;
}

/// Incident procedures
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Returns the id of the new incident
    async fn create_incidencia(&self, incidencia: &NewIncidencia) -> StoreResult<i64>;
    async fn list_incidencias(&self) -> StoreResult<Vec<Value>>;
    async fn list_incidencias_historicas(&self) -> StoreResult<Vec<Value>>;
}

/// Liveness probe for the store behind the pool
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

/// Validated incident report
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncidencia {
    pub empleado_id: i32,
    pub descripcion: String,
    pub usuario_id: Option<i32>,
    pub activo_id: i32,
}

const HISTORICAL_INCIDENTS_QUERY: &str = "
    SELECT
        i.id AS id,
        i.descripcion,
        i.fecha_reporte::date AS fecha_reporte,
        i.estado_equipo,
        m.itemcode AS itemcode_popup,
        m.itemname AS nombre_activo,
        m.nombre_empleado,
        m.nombre_area,
        m.fin_mantenimiento
    FROM mantenimiento m
    JOIN incidencia i ON i.id = m.incidencia_id
    ORDER BY i.fecha_reporte DESC";

impl DatabaseConnection {
    async fn query_json(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<Vec<Value>> {
        let client = self.pool().get().await?;
        let rows = client.query(sql, params).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_first_json(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<Option<Value>> {
        Ok(self.query_json(sql, params).await?.into_iter().next())
    }

    /// Calls a procedure that reports its affected row count
    async fn query_count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<u64> {
        let client = self.pool().get().await?;
        let row = client.query_one(sql, params).await?;
        let count: Option<i32> = row.try_get(0)?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }
}

#[async_trait]
impl StoreHealth for DatabaseConnection {
    async fn ping(&self) -> StoreResult<()> {
        let client = self.pool().get().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for DatabaseConnection {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>> {
        let client = self.pool().get().await?;
        let row = client
            .query_opt(
                "SELECT id, username, contrasena, administrador FROM buscar_usuario_por_username($1) LIMIT 1",
                &[&username],
            )
            .await?;
        match row {
            Some(row) => Ok(Some(CredentialRecord::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AssetStore for DatabaseConnection {
    async fn insert_activo(&self, activo: &ActivoRecord) -> StoreResult<()> {
        let client = self.pool().get().await?;
        client
            .execute(
                "SELECT insertar_activo($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
                &[
                    &activo.item_code,
                    &activo.item_name,
                    &activo.brand,
                    &activo.model,
                    &activo.purchase_date,
                    &activo.price,
                    &activo.currency,
                    &activo.barcode,
                    &activo.quantity_on_stock,
                    &activo.items_group_code,
                    &activo.retirement_date,
                    &activo.retirement_reason,
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_activos(&self) -> StoreResult<Vec<Value>> {
        self.query_json("SELECT * FROM obtener_activos_con_empleado()", &[]).await
    }

    async fn find_activo(&self, id: i32) -> StoreResult<Option<Value>> {
        self.query_first_json("SELECT * FROM buscar_activo_por_id($1)", &[&id]).await
    }

    async fn find_activo_by_item_code(&self, item_code: &str) -> StoreResult<Option<Value>> {
        self.query_first_json("SELECT * FROM buscar_activo_por_item_code($1)", &[&item_code])
            .await
    }

    async fn find_empleado_of_activo(&self, activo_id: i32) -> StoreResult<Option<Value>> {
        self.query_first_json("SELECT * FROM obtener_empleado_de_activo($1)", &[&activo_id])
            .await
    }

    async fn find_activo_of_empleado(&self, empleado_id: i32) -> StoreResult<Option<Value>> {
        self.query_first_json("SELECT * FROM obtener_activo_por_empleado($1)", &[&empleado_id])
            .await
    }

    async fn update_activo(&self, id: i32, update: &ActivoUpdate) -> StoreResult<u64> {
        self.query_count(
            "SELECT actualizar_activo($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            &[
                &id,
                &update.item_code,
                &update.item_name,
                &update.marca,
                &update.modelo,
                &update.fecha_compra,
                &update.price,
                &update.currency,
                &update.barcode,
                &update.quantity_on_stock,
                &update.items_group_code,
                &update.fecha_baja,
                &update.motivo_baja,
            ],
        )
        .await
    }

    async fn update_estado(&self, id: i32, estado: EstadoActivo) -> StoreResult<u64> {
        self.query_count("SELECT actualizar_estado_activo($1, $2)", &[&id, &estado.as_str()])
            .await
    }

    async fn assign_activo(&self, id: i32, empleado_id: i32, fecha_asignacion: NaiveDate) -> StoreResult<()> {
        let client = self.pool().get().await?;
        client
            .execute("SELECT asignar_activo($1, $2, $3)", &[&id, &empleado_id, &fecha_asignacion])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl IncidentStore for DatabaseConnection {
    async fn create_incidencia(&self, incidencia: &NewIncidencia) -> StoreResult<i64> {
        let client = self.pool().get().await?;
        let row = client
            .query_one(
                "SELECT crear_incidencia($1, $2, $3, $4)",
                &[
                    &incidencia.empleado_id,
                    &incidencia.descripcion,
                    &incidencia.usuario_id,
                    &incidencia.activo_id,
                ],
            )
            .await?;
        let id: Option<i32> = row.try_get(0)?;
        id.map(i64::from)
            .ok_or_else(|| StoreError::UnexpectedRow("crear_incidencia returned no id".to_string()))
    }

    async fn list_incidencias(&self) -> StoreResult<Vec<Value>> {
        self.query_json("SELECT * FROM obtener_incidencias()", &[]).await
    }

    async fn list_incidencias_historicas(&self) -> StoreResult<Vec<Value>> {
        self.query_json(HISTORICAL_INCIDENTS_QUERY, &[]).await
    }
}
