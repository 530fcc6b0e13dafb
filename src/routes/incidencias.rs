//! Incident report routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::database::store::NewIncidencia;
use crate::errors::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIncidenciaRequest {
    pub empleado_id: Option<i32>,
    pub descripcion: Option<String>,
    pub usuario_id: Option<i32>,
    pub activo_id: Option<i32>,
}

impl CreateIncidenciaRequest {
    fn validate(self) -> Result<NewIncidencia, ApiError> {
        match (self.empleado_id, self.descripcion, self.activo_id) {
            (Some(empleado_id), Some(descripcion), Some(activo_id))
                if !descripcion.trim().is_empty() =>
            {
                Ok(NewIncidencia {
                    empleado_id,
                    descripcion,
                    usuario_id: self.usuario_id,
                    activo_id,
                })
            }
            _ => Err(ApiError::InvalidRequest(
                "Faltan datos obligatorios (empleado, descripción o activo)".to_string(),
            )),
        }
    }
}

/// `POST /incidencias`
pub async fn create_incidencia(
    State(state): State<AppState>,
    payload: Result<Json<CreateIncidenciaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload?;
    let incidencia = request.validate()?;

    let id = state
        .incidents
        .create_incidencia(&incidencia)
        .await
        .map_err(ApiError::store("Error al crear la incidencia"))?;
    tracing::info!("Incidencia {} creada para activo {}", id, incidencia.activo_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "✅ Incidencia creada exitosamente", "id": id })),
    ))
}

/// `GET /incidencias`
pub async fn list_incidencias(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let incidencias = state
        .incidents
        .list_incidencias()
        .await
        .map_err(ApiError::store("Error al obtener incidencias"))?;
    Ok(Json(incidencias))
}

/// `GET /incidencias/historico`
pub async fn list_incidencias_historicas(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let historico = state
        .incidents
        .list_incidencias_historicas()
        .await
        .map_err(ApiError::store("Error al obtener los datos"))?;
    Ok(Json(historico))
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/incidencias", get(list_incidencias).post(create_incidencia))
        .route("/incidencias/historico", get(list_incidencias_historicas))
}
