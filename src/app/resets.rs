use super::*;

impl StudyApp {
    /// Borra todo el progreso. Acción explícita del usuario, nunca un
    /// efecto colateral.
    pub fn reiniciar_progreso(&mut self) {
        self.progress.reset();
        self.message = "Progreso reiniciado.".into();
    }

    /// Cambiar de tema descarta la sesión en curso y sus salidas.
    pub fn cambiar_tema(&mut self, section_id: impl Into<String>) {
        self.config.section_id = section_id.into();
        self.descartar_sesion();
        self.revision_output.clear();
        self.ask_output.clear();
    }

    /// Abandona el quiz actual sin puntuar: no hay crédito parcial y la
    /// sesión abandonada no emite nada.
    pub fn descartar_sesion(&mut self) {
        self.session = None;
        self.exam_output.clear();
        self.probable_output.clear();
        self.state = AppState::Dashboard;
        self.message.clear();
    }

    pub fn limpiar_pregunta(&mut self) {
        self.ask_output.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MemoryBackend;
    use std::sync::Arc;

    const TRANSCRIPT: &str = "Q1. ¿Uno?\nA. sí\nB. no\nAnswer: A";

    fn app() -> StudyApp {
        StudyApp::new(AppConfig::new("student1", "alkanes"), Arc::new(MemoryBackend::new()))
    }

    #[tokio::test]
    async fn cambiar_de_tema_invalida_la_sesion() {
        let mut app = app();
        app.inicializar().await;
        app.cargar_transcripcion(TRANSCRIPT);
        assert!(app.session().is_some());

        app.cambiar_tema("alkenes");
        assert_eq!(app.config.section_id, "alkenes");
        assert!(app.session().is_none());
        assert!(app.exam_output.is_empty());
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[tokio::test]
    async fn reiniciar_progreso_deja_los_contadores_a_cero() {
        let mut app = app();
        app.inicializar().await;
        app.cargar_transcripcion(TRANSCRIPT);
        app.procesar_seleccion(0, 'A');
        assert_eq!(app.progress.snapshot().xp, 10);

        app.reiniciar_progreso();
        assert_eq!(app.progress.snapshot(), &ProgressSnapshot::default());
        assert_eq!(app.message, "Progreso reiniciado.");
    }
}
