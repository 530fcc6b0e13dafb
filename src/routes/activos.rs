//! # Asset Routes
//!
//! Registration (single or batch), lookup, update, state changes and
//! assignment of assets. Apart from batch registration every handler maps to
//! exactly one store procedure.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::ApiError;
use crate::server::AppState;
use crate::services::activos::{ActivoUpdate, EstadoActivo};
use crate::services::batch::BatchError;

const NOT_FOUND: &str = "Activo no encontrado";

/// Body of `POST /activos`: one asset or an array of them. Elements stay raw
/// JSON so each one is decoded on its own by the registrar.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstadoRequest {
    pub estado: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AsignarRequest {
    pub empleado_id: Option<i32>,
    pub fecha_asignacion: Option<NaiveDate>,
}

pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("Identificador inválido: {}", raw)))
}

/// `POST /activos`
pub async fn create_activos(
    State(state): State<AppState>,
    payload: Result<Json<OneOrMany<Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    let items = payload.into_vec();
    info!("Registering {} asset(s)", items.len());

    let outcome = state
        .registrar
        .register_batch(items)
        .await
        .map_err(|e| match e {
            BatchError::Empty => ApiError::InvalidRequest(e.to_string()),
        })?;

    if !outcome.is_success() {
        return Err(ApiError::PartialFailure(outcome));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!(
                "✅ Todos los activos ({}) registrados exitosamente.",
                outcome.succeeded_count
            )
        })),
    ))
}

/// `GET /activos`
pub async fn list_activos(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let activos = state
        .assets
        .list_activos()
        .await
        .map_err(ApiError::store("Error al obtener activos"))?;
    Ok(Json(activos))
}

/// `GET /activos/{id}`
pub async fn get_activo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state
        .assets
        .find_activo(id)
        .await
        .map_err(ApiError::store("Error al obtener el activo"))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// `GET /activos/numero-serie/{item_code}`
pub async fn get_activo_by_item_code(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .assets
        .find_activo_by_item_code(&item_code)
        .await
        .map_err(ApiError::store("Error al buscar el activo"))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// `GET /activos/{id}/empleado`
pub async fn get_empleado_of_activo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state
        .assets
        .find_empleado_of_activo(id)
        .await
        .map_err(ApiError::store("Error al obtener el empleado asignado"))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No hay empleado asignado a este activo".to_string()))
}

/// `GET /activos/por-empleado/{empleado_id}`
///
/// Never 404s: an employee without assets gets a placeholder name.
pub async fn get_activo_of_empleado(
    State(state): State<AppState>,
    Path(empleado_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let empleado_id = parse_id(&empleado_id)?;
    let activo = state
        .assets
        .find_activo_of_empleado(empleado_id)
        .await
        .map_err(ApiError::store("Error al buscar activo"))?;
    Ok(Json(activo.unwrap_or_else(|| json!({ "nombre_activo": "Desconocido" }))))
}

/// `PUT /activos/{id}`
pub async fn update_activo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ActivoUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;

    let affected = state
        .assets
        .update_activo(id, &update.normalize())
        .await
        .map_err(ApiError::store("Error al actualizar el activo"))?;
    if affected == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    Ok(Json(json!({ "message": "✅ Activo actualizado exitosamente" })))
}

/// `PUT /activos/{id}/estado`
pub async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EstadoRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let estado = request
        .estado
        .as_deref()
        .and_then(EstadoActivo::parse)
        .ok_or_else(|| {
            ApiError::InvalidRequest(
                "Estado inválido. Debe ser \"Disponible\" o \"Pérdida\".".to_string(),
            )
        })?;

    let affected = state
        .assets
        .update_estado(id, estado)
        .await
        .map_err(ApiError::store("Error al actualizar el estado del activo"))?;
    if affected == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    Ok(Json(json!({ "message": "✅ Estado del activo actualizado exitosamente" })))
}

/// `POST /activos/{id}/asignar`
pub async fn assign_activo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AsignarRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let (Some(empleado_id), Some(fecha_asignacion)) = (request.empleado_id, request.fecha_asignacion)
    else {
        return Err(ApiError::InvalidRequest(
            "empleado_id y fecha_asignacion son requeridos".to_string(),
        ));
    };

    state
        .assets
        .assign_activo(id, empleado_id, fecha_asignacion)
        .await
        .map_err(ApiError::store("Error al asignar activo"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "✅ Activo asignado exitosamente" })),
    ))
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/activos", post(create_activos).get(list_activos))
        .route("/activos/numero-serie/{item_code}", get(get_activo_by_item_code))
        .route("/activos/por-empleado/{empleado_id}", get(get_activo_of_empleado))
        .route("/activos/{id}", get(get_activo).put(update_activo))
        .route("/activos/{id}/empleado", get(get_empleado_of_activo))
        .route("/activos/{id}/estado", put(update_estado))
        .route("/activos/{id}/asignar", post(assign_activo))
}
