use crate::ai::{AiClient, RevisionKind};
use crate::config::AppConfig;
use crate::leaderboard::LeaderboardPoller;
use crate::model::{AppState, ProgressSnapshot};
use crate::parser::parse_mcqs;
use crate::sync::{HttpBackend, LeaderboardEntry, ProgressBackend, SyncError, SyncGateway};
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

// Submódulos
pub mod progress;
pub mod queries;
pub mod resets;
pub mod session;

pub use progress::ProgressStore;
pub use session::{AnswerSession, SelectionOutcome};

/// Estado central del dashboard de estudio.
///
/// Sustituye a los singletons de módulo de la versión original: se crea
/// al iniciar sesión y se destruye al salir. Todas las mutaciones se
/// hacen desde el bucle de eventos de la vista; las tareas en segundo
/// plano solo hablan con él por canales que se recogen con los métodos
/// `poll_*`.
pub struct StudyApp {
    pub config: AppConfig,
    pub state: AppState,
    /// Aviso inline no bloqueante; cadena vacía si no hay nada que decir.
    pub message: String,
    pub progress: ProgressStore,
    session: Option<AnswerSession>,
    // Salidas crudas de la IA, conservadas para re-renderizar.
    pub exam_output: String,
    pub revision_output: String,
    pub probable_output: String,
    pub ask_output: String,
    pub leaderboard: Vec<LeaderboardEntry>,
    gateway: SyncGateway,
    ai: AiClient,
    sync_rx: Option<mpsc::Receiver<Result<ProgressSnapshot, SyncError>>>,
    leaderboard_rx: Option<mpsc::UnboundedReceiver<Vec<LeaderboardEntry>>>,
    leaderboard_poller: Option<LeaderboardPoller>,
}

impl StudyApp {
    pub fn new(config: AppConfig, backend: Arc<dyn ProgressBackend>) -> Self {
        let gateway = SyncGateway::new(backend, config.user_id.clone());
        let ai = AiClient::new(config.backend_url.clone());
        let progress = ProgressStore::new(config.bonus.clone(), config.progress_cache.clone());
        Self {
            config,
            state: AppState::Loading,
            message: String::new(),
            progress,
            session: None,
            exam_output: String::new(),
            revision_output: String::new(),
            probable_output: String::new(),
            ask_output: String::new(),
            leaderboard: Vec::new(),
            gateway,
            ai,
            sync_rx: None,
            leaderboard_rx: None,
            leaderboard_poller: None,
        }
    }

    /// Constructor habitual: backend HTTP contra la URL configurada.
    pub fn with_http_backend(config: AppConfig) -> Self {
        let backend = Arc::new(HttpBackend::new(config.backend_url.clone()));
        Self::new(config, backend)
    }

    /// Carga inicial: puebla el progreso desde el almacén remoto antes
    /// de permitir interacción (la vista se queda en `Loading` hasta
    /// entonces). Si la red falla se recurre a la caché local y se deja
    /// un aviso, nunca un error fatal.
    pub async fn inicializar(&mut self) {
        match self.gateway.load().await {
            Ok(snapshot) => {
                self.progress.adopt_remote(snapshot);
            }
            Err(err) => {
                log::warn!("carga inicial de progreso fallida: {err}");
                if !self.progress.load_cache() {
                    log::info!("sin caché local de progreso; se parte de cero");
                }
                self.message = "⚠ Sin conexión: mostrando el progreso guardado localmente.".into();
            }
        }
        self.state = AppState::Dashboard;
    }

    // ================= QUIZ =================

    /// Pide un quiz nuevo a la IA y monta la sesión de respuestas.
    pub async fn generar_quiz(&mut self) {
        match self
            .ai
            .generate_mcqs(&self.config.section_id, &self.config.difficulty)
            .await
        {
            Ok(answer) => self.cargar_transcripcion(&answer),
            Err(err) => {
                log::warn!("no se pudo generar el quiz: {err}");
                self.message = "❌ No se pudieron generar los MCQs.".into();
            }
        }
    }

    /// Monta una sesión a partir de una transcripción cruda. Pedir un
    /// quiz nuevo invalida la sesión anterior con toda su selección.
    pub fn cargar_transcripcion(&mut self, transcript: &str) {
        self.exam_output = transcript.to_string();
        self.probable_output.clear();

        let mcqs = parse_mcqs(transcript);
        if mcqs.is_empty() {
            // Formato inesperado: se degrada a "sin preguntas".
            self.message = "⚠ La IA no devolvió preguntas reconocibles.".into();
        } else {
            self.message.clear();
        }
        self.session = Some(AnswerSession::new(mcqs));
        self.state = AppState::Quiz;
    }

    /// Registra la selección de una opción. Si con ella se completa el
    /// quiz, aplica la puntuación al progreso de forma optimista y lanza
    /// la reconciliación con el servidor en segundo plano.
    pub fn procesar_seleccion(&mut self, index: usize, letter: char) -> SelectionOutcome {
        let Some(session) = self.session.as_mut() else {
            return SelectionOutcome::OutOfRange;
        };
        let outcome = session.select(index, letter);
        if let SelectionOutcome::Completed {
            correct_count,
            total,
            ..
        } = &outcome
        {
            self.finalizar_quiz(*correct_count, *total);
        }
        outcome
    }

    fn finalizar_quiz(&mut self, correct_count: u32, total: u32) {
        let today = Local::now().date_naive();
        let (snapshot, xp_earned) = self
            .progress
            .apply_completed_quiz(correct_count, total, today);
        self.message = format!("🎉 Quiz completado: {correct_count}/{total} (+{xp_earned} XP)");
        self.state = AppState::Summary;
        self.lanzar_reconciliacion(snapshot);
    }

    // ================= SINCRONIZACIÓN =================

    /// La UI nunca espera a la red: el resultado de la reconciliación
    /// vuelve por un canal y se recoge con `poll_sync_result`. Una
    /// reconciliación que quede obsoleta no se cancela; su resultado lo
    /// pisa la siguiente.
    fn lanzar_reconciliacion(&mut self, snapshot: ProgressSnapshot) {
        let (tx, rx) = mpsc::channel(1);
        self.sync_rx = Some(rx);
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let result = gateway.reconcile(&snapshot).await;
            let _ = tx.send(result).await;
        });
    }

    /// Recoge, si ya llegó, el resultado de la reconciliación en curso.
    /// Con éxito adopta el snapshot del servidor; con fallo conserva el
    /// snapshot optimista local y deja un aviso inline.
    pub fn poll_sync_result(&mut self) {
        let Some(rx) = self.sync_rx.as_mut() else { return };
        match rx.try_recv() {
            Ok(Ok(remote)) => {
                self.progress.adopt_remote(remote);
                self.sync_rx = None;
            }
            Ok(Err(err)) => {
                log::warn!("sincronización de progreso fallida: {err}");
                self.message =
                    "⚠ Progreso guardado localmente; el servidor no respondió.".into();
                self.sync_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.sync_rx = None,
        }
    }

    // ================= LEADERBOARD =================

    /// Arranca el refresco periódico del leaderboard. Idempotente.
    pub fn iniciar_leaderboard(&mut self) {
        if self.leaderboard_poller.is_some() {
            return;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = LeaderboardPoller::start(
            self.gateway.backend(),
            Duration::from_secs(self.config.leaderboard_refresh_secs),
            tx,
        );
        self.leaderboard_rx = Some(rx);
        self.leaderboard_poller = Some(poller);
    }

    /// Recoge la última tanda de filas, si el poller envió alguna.
    pub fn poll_leaderboard(&mut self) {
        let Some(rx) = self.leaderboard_rx.as_mut() else {
            return;
        };
        while let Ok(rows) = rx.try_recv() {
            self.leaderboard = rows;
        }
    }

    /// Para el refresco cuando la vista que lo consume deja de existir.
    pub fn detener_leaderboard(&mut self) {
        if let Some(poller) = self.leaderboard_poller.take() {
            poller.stop();
        }
        self.leaderboard_rx = None;
    }

    // ================= REPASO / IA =================

    pub async fn pedir_revision(&mut self, kind: RevisionKind) {
        match self
            .ai
            .revision(kind, &self.config.section_id, &self.config.difficulty)
            .await
        {
            Ok(answer) => self.revision_output = answer,
            Err(err) => {
                log::warn!("petición de repaso fallida: {err}");
                self.revision_output = "❌ No se pudo conectar con la IA.".into();
            }
        }
    }

    pub async fn generar_probables(&mut self) {
        match self
            .ai
            .probable_questions(&self.config.section_id, &self.config.difficulty)
            .await
        {
            Ok(answer) => self.probable_output = answer,
            Err(err) => {
                log::warn!("petición de probables fallida: {err}");
                self.probable_output = "❌ No se pudieron generar las preguntas.".into();
            }
        }
    }

    /// Pregunta libre a la IA. Con la entrada en blanco no se hace nada.
    pub async fn preguntar(&mut self, question: &str) {
        if question.trim().is_empty() {
            return;
        }
        match self
            .ai
            .ask_free(question, &self.config.section_id, &self.config.difficulty)
            .await
        {
            Ok(answer) => self.ask_output = answer,
            Err(err) => {
                log::warn!("pregunta libre fallida: {err}");
                self.ask_output = "❌ No se pudo conectar con la IA.".into();
            }
        }
    }
}
