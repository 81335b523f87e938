use crate::model::ProgressSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("error de red contra el almacén de progreso: {0}")]
    Request(#[from] reqwest::Error),
    #[error("el almacén de progreso devolvió HTTP {status}")]
    Status { status: u16 },
}

/// Registro de progreso tal y como viaja por el cable.
///
/// El contrato de escritura lleva exactamente estos campos; la fecha de
/// última actividad es local y no se envía, aunque se acepta si algún
/// backend la devuelve en la lectura.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RemoteProgress {
    pub user_id: String,
    pub total_tests: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub xp: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<NaiveDate>,
}

impl RemoteProgress {
    pub fn from_snapshot(user_id: &str, snapshot: &ProgressSnapshot) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_tests: snapshot.total_tests,
            total_questions: snapshot.total_questions,
            total_correct: snapshot.total_correct,
            xp: snapshot.xp,
            streak: snapshot.streak,
            last_activity: None,
        }
    }

    pub fn into_snapshot(self) -> ProgressSnapshot {
        ProgressSnapshot {
            total_tests: self.total_tests,
            total_questions: self.total_questions,
            total_correct: self.total_correct,
            xp: self.xp,
            streak: self.streak,
            last_activity: self.last_activity,
        }
    }
}

/// Fila del leaderboard, ya ordenada por rango en la respuesta del
/// servidor. Solo lectura.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub xp: u32,
    pub streak: u32,
}

/// Acceso al almacén remoto de progreso. El trait existe para poder
/// sustituir el backend HTTP por uno en memoria en tests y desarrollo.
#[async_trait]
pub trait ProgressBackend: Send + Sync {
    /// Lee el registro del usuario; `None` si todavía no existe.
    async fn load(&self, user_id: &str) -> Result<Option<ProgressSnapshot>, SyncError>;

    async fn push(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), SyncError>;

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SyncError>;
}

/// Backend real contra los endpoints HTTP del almacén de progreso.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ProgressBackend for HttpBackend {
    async fn load(&self, user_id: &str) -> Result<Option<ProgressSnapshot>, SyncError> {
        let url = self.url(&format!("/progress/{user_id}"));
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            // Usuario sin registro todavía: no es un error.
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SyncError::Status {
                status: response.status().as_u16(),
            });
        }
        let record: RemoteProgress = response.json().await?;
        Ok(Some(record.into_snapshot()))
    }

    async fn push(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), SyncError> {
        let payload = RemoteProgress::from_snapshot(user_id, snapshot);
        let response = self
            .http
            .post(self.url("/update-progress"))
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SyncError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SyncError> {
        let response = self.http.get(self.url("/leaderboard")).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Backend en memoria para desarrollo y tests: mismo contrato que el
/// HTTP pero sin red.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<String, ProgressSnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Siembra un registro, como haría una migración o un fixture.
    pub fn seed(&self, user_id: impl Into<String>, snapshot: ProgressSnapshot) {
        self.records.lock().unwrap().insert(user_id.into(), snapshot);
    }
}

#[async_trait]
impl ProgressBackend for MemoryBackend {
    async fn load(&self, user_id: &str) -> Result<Option<ProgressSnapshot>, SyncError> {
        Ok(self.records.lock().unwrap().get(user_id).cloned())
    }

    async fn push(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), SyncError> {
        self.records
            .lock()
            .unwrap()
            .insert(user_id.to_string(), snapshot.clone());
        Ok(())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SyncError> {
        let records = self.records.lock().unwrap();
        let mut rows: Vec<LeaderboardEntry> = records
            .iter()
            .map(|(user_id, snapshot)| LeaderboardEntry {
                user_id: user_id.clone(),
                xp: snapshot.xp,
                streak: snapshot.streak,
            })
            .collect();
        rows.sort_by(|a, b| b.xp.cmp(&a.xp).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(rows)
    }
}

/// Reconciliación del snapshot local con el almacén remoto.
///
/// El protocolo es escribir-y-releer: tras cada quiz completado se hace
/// `push` del snapshot optimista y un `load` posterior recoge los campos
/// que el servidor calcula con autoridad (la racha, por ejemplo).
#[derive(Clone)]
pub struct SyncGateway {
    backend: Arc<dyn ProgressBackend>,
    user_id: String,
}

impl SyncGateway {
    pub fn new(backend: Arc<dyn ProgressBackend>, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend(&self) -> Arc<dyn ProgressBackend> {
        Arc::clone(&self.backend)
    }

    /// Snapshot remoto del usuario, o uno a cero si aún no tiene registro.
    pub async fn load(&self) -> Result<ProgressSnapshot, SyncError> {
        Ok(self.backend.load(&self.user_id).await?.unwrap_or_default())
    }

    pub async fn push(&self, snapshot: &ProgressSnapshot) -> Result<(), SyncError> {
        self.backend.push(&self.user_id, snapshot).await
    }

    /// Push seguido de load. Si el push falla no se hace el load: el
    /// snapshot optimista local debe seguir visible hasta que una
    /// lectura devuelva algo de verdad.
    pub async fn reconcile(&self, snapshot: &ProgressSnapshot) -> Result<ProgressSnapshot, SyncError> {
        self.push(snapshot).await?;
        self.load().await
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SyncError> {
        self.backend.leaderboard().await
    }
}
