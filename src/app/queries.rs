use super::*;
use crate::model::Mcq;
use crate::view_models::{LeaderboardRow, ProgressCard};

impl StudyApp {
    // Accesores de solo lectura para la capa de presentación.

    pub fn session(&self) -> Option<&AnswerSession> {
        self.session.as_ref()
    }

    pub fn mcqs(&self) -> &[Mcq] {
        self.session.as_ref().map(|s| s.mcqs()).unwrap_or(&[])
    }

    /// Letra ya elegida para una pregunta, si la hay.
    pub fn seleccion_de(&self, index: usize) -> Option<char> {
        self.session.as_ref().and_then(|s| s.selected(index))
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map(|s| s.score()).unwrap_or(0)
    }

    /// Hay una reconciliación en vuelo cuyo resultado aún no se recogió.
    pub fn is_sync_pending(&self) -> bool {
        self.sync_rx.is_some()
    }

    pub fn progress_card(&self) -> ProgressCard {
        ProgressCard::from_snapshot(self.progress.snapshot())
    }

    pub fn leaderboard_rows(&self) -> Vec<LeaderboardRow> {
        LeaderboardRow::from_entries(&self.leaderboard)
    }
}
