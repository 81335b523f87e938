use crate::config::BonusXp;
use crate::model::ProgressSnapshot;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Dueño único del snapshot de progreso.
///
/// Toda mutación pasa por `apply_completed_quiz`, `adopt_remote` o
/// `reset`; cada una sustituye el snapshot entero en una sola
/// asignación, así que un lector nunca ve una actualización a medias.
pub struct ProgressStore {
    snapshot: ProgressSnapshot,
    bonus: Option<BonusXp>,
    cache_path: Option<PathBuf>,
}

impl ProgressStore {
    pub fn new(bonus: Option<BonusXp>, cache_path: Option<PathBuf>) -> Self {
        Self {
            snapshot: ProgressSnapshot::default(),
            bonus,
            cache_path,
        }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Aplica el resultado de un quiz completado y devuelve el snapshot
    /// nuevo junto con los XP ganados.
    pub fn apply_completed_quiz(
        &mut self,
        correct_count: u32,
        total_questions: u32,
        today: NaiveDate,
    ) -> (ProgressSnapshot, u32) {
        let xp_earned = self.xp_for(correct_count, total_questions);
        let prev = &self.snapshot;

        // Repetir el mismo día no infla la racha; cualquier otro día
        // suma exactamente 1, sin importar cuántos se saltaran.
        let streak = if prev.last_activity == Some(today) {
            prev.streak
        } else {
            prev.streak + 1
        };

        let next = ProgressSnapshot {
            total_tests: prev.total_tests + 1,
            total_questions: prev.total_questions + total_questions,
            total_correct: prev.total_correct + correct_count,
            xp: prev.xp + xp_earned,
            streak,
            last_activity: Some(today),
        };
        debug_assert!(next.total_correct <= next.total_questions);

        self.snapshot = next.clone();
        self.save_cache();
        (next, xp_earned)
    }

    fn xp_for(&self, correct_count: u32, total_questions: u32) -> u32 {
        let base = correct_count * 10;
        match &self.bonus {
            Some(bonus) if total_questions > 0 => {
                let accuracy =
                    (100.0 * correct_count as f64 / total_questions as f64).round() as u32;
                if accuracy >= bonus.threshold_percent {
                    base + bonus.amount
                } else {
                    base
                }
            }
            _ => base,
        }
    }

    /// Adopta el snapshot devuelto por el backend tras reconciliar. Los
    /// campos que calcula el servidor mandan, pero la fecha de última
    /// actividad local se conserva si el registro remoto no la trae:
    /// perderla rompería la regla de racha del mismo día.
    pub fn adopt_remote(&mut self, remote: ProgressSnapshot) {
        let last_activity = remote.last_activity.or(self.snapshot.last_activity);
        self.snapshot = ProgressSnapshot {
            last_activity,
            ..remote
        };
        self.save_cache();
    }

    /// Borra todo el progreso, caché incluida. Solo por acción explícita
    /// del usuario, nunca implícita.
    pub fn reset(&mut self) {
        self.snapshot = ProgressSnapshot::default();
        if let Some(path) = &self.cache_path {
            let _ = std::fs::remove_file(path);
        }
    }

    // Caché local en JSON, el sustituto del localStorage original. Un
    // fallo de E/S se anota y se sigue: la autoridad es el remoto.

    fn save_cache(&self) {
        let Some(path) = &self.cache_path else { return };
        match serde_json::to_string(&self.snapshot) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!(
                        "no se pudo guardar la caché de progreso en {}: {err}",
                        path.display()
                    );
                }
            }
            Err(err) => log::warn!("no se pudo serializar el progreso: {err}"),
        }
    }

    /// Puebla el snapshot desde la caché local. Devuelve `true` si había
    /// una caché válida.
    pub fn load_cache(&mut self) -> bool {
        let Some(path) = &self.cache_path else {
            return false;
        };
        let Ok(json) = std::fs::read_to_string(path) else {
            return false;
        };
        match serde_json::from_str(&json) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                true
            }
            Err(err) => {
                log::warn!("caché de progreso corrupta en {}: {err}", path.display());
                false
            }
        }
    }
}
