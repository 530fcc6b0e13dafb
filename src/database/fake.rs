//! In-memory store used by unit tests

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::database::models::CredentialRecord;
use crate::database::store::{
    AssetStore, CredentialStore, IncidentStore, NewIncidencia, StoreError, StoreHealth,
    StoreResult,
};
use crate::services::activos::{ActivoRecord, ActivoUpdate, EstadoActivo};

#[derive(Default)]
pub struct FakeStore {
    users: Vec<CredentialRecord>,
    activos: Vec<Value>,
    failing_codes: HashSet<String>,
    unavailable: bool,
    inserted: Mutex<Vec<ActivoRecord>>,
    insert_attempts: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    updates: Mutex<Vec<(i32, ActivoUpdate)>>,
    estados: Mutex<Vec<(i32, EstadoActivo)>>,
    assignments: Mutex<Vec<(i32, i32, NaiveDate)>>,
    incidencias: Mutex<Vec<NewIncidencia>>,
}

impl FakeStore {
    pub fn with_user(mut self, user: CredentialRecord) -> Self {
        self.users.push(user);
        self
    }

    /// Seeds an asset row; it must carry an integer `id` and an `itemcode`.
    pub fn with_activo(mut self, activo: Value) -> Self {
        self.activos.push(activo);
        self
    }

    pub fn failing_item_codes(mut self, codes: &[&str]) -> Self {
        self.failing_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Every call fails as if the database were down
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn inserted(&self) -> Vec<ActivoRecord> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Highest number of inserts observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<(i32, ActivoUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn estados(&self) -> Vec<(i32, EstadoActivo)> {
        self.estados.lock().unwrap().clone()
    }

    pub fn assignments(&self) -> Vec<(i32, i32, NaiveDate)> {
        self.assignments.lock().unwrap().clone()
    }

    pub fn incidencias(&self) -> Vec<NewIncidencia> {
        self.incidencias.lock().unwrap().clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable {
            Err(StoreError::Pool(deadpool_postgres::PoolError::Closed))
        } else {
            Ok(())
        }
    }

    fn record_insert(&self, activo: &ActivoRecord) -> StoreResult<()> {
        self.check()?;
        let code = activo.item_code.clone().unwrap_or_default();
        if self.failing_codes.contains(&code) {
            return Err(StoreError::UnexpectedRow(format!("duplicate ItemCode {}", code)));
        }
        self.inserted.lock().unwrap().push(activo.clone());
        Ok(())
    }

    fn activo_by_id(&self, id: i32) -> Option<&Value> {
        self.activos.iter().find(|a| a["id"] == json!(id))
    }
}

#[async_trait]
impl StoreHealth for FakeStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}

#[async_trait]
impl CredentialStore for FakeStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>> {
        self.check()?;
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl AssetStore for FakeStore {
    async fn insert_activo(&self, activo: &ActivoRecord) -> StoreResult<()> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let result = self.record_insert(activo);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn list_activos(&self) -> StoreResult<Vec<Value>> {
        self.check()?;
        Ok(self.activos.clone())
    }

    async fn find_activo(&self, id: i32) -> StoreResult<Option<Value>> {
        self.check()?;
        Ok(self.activo_by_id(id).cloned())
    }

    async fn find_activo_by_item_code(&self, item_code: &str) -> StoreResult<Option<Value>> {
        self.check()?;
        Ok(self
            .activos
            .iter()
            .find(|a| a["itemcode"] == json!(item_code))
            .cloned())
    }

    async fn find_empleado_of_activo(&self, activo_id: i32) -> StoreResult<Option<Value>> {
        self.check()?;
        Ok(self
            .activo_by_id(activo_id)
            .and_then(|a| a.get("empleado"))
            .filter(|e| !e.is_null())
            .cloned())
    }

    async fn find_activo_of_empleado(&self, empleado_id: i32) -> StoreResult<Option<Value>> {
        self.check()?;
        Ok(self
            .activos
            .iter()
            .find(|a| a["empleado"]["id"] == json!(empleado_id))
            .cloned())
    }

    async fn update_activo(&self, id: i32, update: &ActivoUpdate) -> StoreResult<u64> {
        self.check()?;
        if self.activo_by_id(id).is_none() {
            return Ok(0);
        }
        self.updates.lock().unwrap().push((id, update.clone()));
        Ok(1)
    }

    async fn update_estado(&self, id: i32, estado: EstadoActivo) -> StoreResult<u64> {
        self.check()?;
        if self.activo_by_id(id).is_none() {
            return Ok(0);
        }
        self.estados.lock().unwrap().push((id, estado));
        Ok(1)
    }

    async fn assign_activo(&self, id: i32, empleado_id: i32, fecha_asignacion: NaiveDate) -> StoreResult<()> {
        self.check()?;
        self.assignments
            .lock()
            .unwrap()
            .push((id, empleado_id, fecha_asignacion));
        Ok(())
    }
}

#[async_trait]
impl IncidentStore for FakeStore {
    async fn create_incidencia(&self, incidencia: &NewIncidencia) -> StoreResult<i64> {
        self.check()?;
        let mut incidencias = self.incidencias.lock().unwrap();
        incidencias.push(incidencia.clone());
        Ok(incidencias.len() as i64)
    }

    async fn list_incidencias(&self) -> StoreResult<Vec<Value>> {
        self.check()?;
        Ok(self
            .incidencias
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, inc)| {
                json!({
                    "id": i + 1,
                    "descripcion": inc.descripcion,
                    "activo_id": inc.activo_id,
                    "empleado_id": inc.empleado_id,
                })
            })
            .collect())
    }

    async fn list_incidencias_historicas(&self) -> StoreResult<Vec<Value>> {
        self.check()?;
        Ok(Vec::new())
    }
}
