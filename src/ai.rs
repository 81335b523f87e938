use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("error conectando con la IA: {0}")]
    Request(#[from] reqwest::Error),
    #[error("la IA devolvió HTTP {status}")]
    Status { status: u16 },
}

/// Modo de petición que reconoce el proveedor de contenido.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    Summary,
    Explain,
    Keypoints,
    Exam,
    Probable,
    Revision,
}

#[derive(Serialize, Debug, Clone)]
pub struct AiRequest {
    pub question: String,
    pub section_id: String,
    pub session_id: String,
    pub mode: AiMode,
    pub difficulty: String,
}

#[derive(Deserialize, Debug)]
struct AiResponse {
    #[serde(default)]
    answer: String,
}

/// Tipo de material de repaso que se puede pedir para una sección.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    Summary,
    Explain,
    KeyPoints,
}

/// Cliente del proveedor de contenido (`POST {base}/section-ai`).
///
/// El proveedor es un colaborador opaco: aquí solo se construyen las
/// peticiones y se devuelve el texto de `answer`. El formato del texto
/// de modo `exam` lo interpreta el parser, no este cliente.
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn ask(&self, request: &AiRequest) -> Result<String, AiError> {
        let url = format!("{}/section-ai", self.base_url.trim_end_matches('/'));
        let response = self.http.post(&url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(AiError::Status {
                status: response.status().as_u16(),
            });
        }
        let body: AiResponse = response.json().await?;
        Ok(body.answer)
    }

    /// MCQs de nivel examen. La transcripción devuelta es la única
    /// entrada del parser de quizzes.
    pub async fn generate_mcqs(&self, section_id: &str, difficulty: &str) -> Result<String, AiError> {
        self.ask(&Self::exam_request(section_id, difficulty)).await
    }

    pub async fn revision(
        &self,
        kind: RevisionKind,
        section_id: &str,
        difficulty: &str,
    ) -> Result<String, AiError> {
        self.ask(&Self::revision_request(kind, section_id, difficulty))
            .await
    }

    /// Preguntas "probables" de desarrollo (3 y 5 puntos).
    pub async fn probable_questions(
        &self,
        section_id: &str,
        difficulty: &str,
    ) -> Result<String, AiError> {
        self.ask(&Self::probable_request(section_id, difficulty))
            .await
    }

    /// Pregunta libre del estudiante sobre la sección activa.
    pub async fn ask_free(
        &self,
        question: &str,
        section_id: &str,
        difficulty: &str,
    ) -> Result<String, AiError> {
        self.ask(&Self::free_request(question, section_id, difficulty))
            .await
    }

    // Constructores de peticiones. Públicos para poder comprobar los
    // prompts sin levantar red.

    pub fn exam_request(section_id: &str, difficulty: &str) -> AiRequest {
        AiRequest {
            question: format!("Generate exam level MCQs of {section_id}"),
            section_id: section_id.to_string(),
            session_id: "exam-mcq-session".to_string(),
            mode: AiMode::Exam,
            difficulty: difficulty.to_string(),
        }
    }

    pub fn revision_request(kind: RevisionKind, section_id: &str, difficulty: &str) -> AiRequest {
        let (question, mode) = match kind {
            RevisionKind::Summary => (
                format!("Generate a smart summary of {section_id}"),
                AiMode::Summary,
            ),
            RevisionKind::Explain => (
                format!("Explain {section_id} clearly with examples"),
                AiMode::Explain,
            ),
            RevisionKind::KeyPoints => (
                format!("Give key revision bullet points of {section_id}"),
                AiMode::Keypoints,
            ),
        };
        AiRequest {
            question,
            section_id: section_id.to_string(),
            session_id: "revision-session".to_string(),
            mode,
            difficulty: difficulty.to_string(),
        }
    }

    pub fn probable_request(section_id: &str, difficulty: &str) -> AiRequest {
        AiRequest {
            question: format!(
                "Generate 2 questions of 3 marks and 2 questions of 5 marks from {section_id}"
            ),
            section_id: section_id.to_string(),
            session_id: "exam-theory-session".to_string(),
            mode: AiMode::Probable,
            difficulty: difficulty.to_string(),
        }
    }

    pub fn free_request(question: &str, section_id: &str, difficulty: &str) -> AiRequest {
        AiRequest {
            question: question.to_string(),
            section_id: section_id.to_string(),
            session_id: "ask-session".to_string(),
            mode: AiMode::Revision,
            difficulty: difficulty.to_string(),
        }
    }
}
