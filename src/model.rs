use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Una opción de respuesta tal y como aparece en la transcripción.
/// `text` conserva la línea completa, prefijo incluido, para que el
/// consumidor pueda recuperar la letra leyendo el primer carácter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct McqOption {
    pub letter: char,
    pub text: String,
}

/// Pregunta de opción múltiple extraída de una transcripción de IA.
/// Inmutable una vez parseada; se descarta al pedir un quiz nuevo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<McqOption>,
    /// Ausente si la transcripción no traía línea `Answer:`.
    pub correct: Option<char>,
    pub explanation: Option<String>,
}

impl Mcq {
    /// Un bloque sin opciones se muestra como texto informativo,
    /// nunca como pregunta seleccionable.
    pub fn is_answerable(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Registro acumulado de progreso del estudiante. La copia local es una
/// caché; la autoridad vive en el almacén remoto.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total_tests: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub xp: u32,
    pub streak: u32,
    #[serde(default)]
    pub last_activity: Option<NaiveDate>,
}

impl ProgressSnapshot {
    // Vistas derivadas: siempre recalculadas, nunca almacenadas.

    pub fn level(&self) -> u32 {
        self.xp / 100 + 1
    }

    pub fn xp_to_next_level(&self) -> u32 {
        100 - self.xp % 100
    }

    /// Precisión global en %. Vale 0 mientras no haya preguntas respondidas.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_questions == 0 {
            0
        } else {
            (100.0 * self.total_correct as f64 / self.total_questions as f64).round() as u32
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Loading,
    Dashboard,
    Quiz,
    Summary,
}

// El dashboard arranca bloqueado hasta que llega el primer load.
impl Default for AppState {
    fn default() -> Self {
        AppState::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_and_xp_to_next_follow_the_100_step() {
        let snap = ProgressSnapshot {
            xp: 125,
            ..Default::default()
        };
        assert_eq!(snap.level(), 2);
        assert_eq!(snap.xp_to_next_level(), 75);

        let zero = ProgressSnapshot::default();
        assert_eq!(zero.level(), 1);
        assert_eq!(zero.xp_to_next_level(), 100);
    }

    #[test]
    fn accuracy_is_zero_without_questions_and_rounds_otherwise() {
        let zero = ProgressSnapshot::default();
        assert_eq!(zero.accuracy_percent(), 0);

        let snap = ProgressSnapshot {
            total_questions: 3,
            total_correct: 1,
            ..Default::default()
        };
        assert_eq!(snap.accuracy_percent(), 33);

        let dos_tercios = ProgressSnapshot {
            total_questions: 3,
            total_correct: 2,
            ..Default::default()
        };
        assert_eq!(dos_tercios.accuracy_percent(), 67);
    }

    #[test]
    fn mcq_without_options_is_not_answerable() {
        let mcq = Mcq {
            question: "¿Qué es un alcano?".into(),
            options: vec![],
            correct: None,
            explanation: None,
        };
        assert!(!mcq.is_answerable());
    }
}
