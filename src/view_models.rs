// src/view_models.rs

use crate::model::ProgressSnapshot;
use crate::sync::LeaderboardEntry;

/// Tarjeta de progreso del dashboard. Todo lo que contiene se deriva del
/// snapshot en el momento de construirla.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressCard {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub total_tests: u32,
    pub accuracy_percent: u32,
    pub streak: u32,
}

impl ProgressCard {
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        Self {
            level: snapshot.level(),
            xp: snapshot.xp,
            xp_to_next_level: snapshot.xp_to_next_level(),
            total_tests: snapshot.total_tests,
            accuracy_percent: snapshot.accuracy_percent(),
            streak: snapshot.streak,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "Nivel {} · {} XP · 🔥 racha de {} días",
            self.level, self.xp, self.streak
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: String,
    pub xp: u32,
    pub streak: u32,
}

impl LeaderboardRow {
    /// Numera las entradas tal y como llegan: el servidor ya las ordena
    /// por rango.
    pub fn from_entries(entries: &[LeaderboardEntry]) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| Self {
                rank: idx + 1,
                user_id: entry.user_id.clone(),
                xp: entry.xp,
                streak: entry.streak,
            })
            .collect()
    }

    pub fn label(&self) -> String {
        let medal = match self.rank {
            1 => "🥇",
            2 => "🥈",
            3 => "🥉",
            _ => "🏅",
        };
        format!("{medal} #{} {} · {} XP", self.rank, self.user_id, self.xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_tarjeta_deriva_todo_del_snapshot() {
        let snapshot = ProgressSnapshot {
            total_tests: 5,
            total_questions: 20,
            total_correct: 15,
            xp: 150,
            streak: 4,
            last_activity: None,
        };
        let card = ProgressCard::from_snapshot(&snapshot);
        assert_eq!(card.level, 2);
        assert_eq!(card.xp_to_next_level, 50);
        assert_eq!(card.accuracy_percent, 75);
        assert_eq!(card.total_tests, 5);
        assert!(card.label().contains("Nivel 2"));
    }

    #[test]
    fn las_filas_se_numeran_en_orden_de_llegada() {
        let entries = vec![
            LeaderboardEntry {
                user_id: "carla".into(),
                xp: 250,
                streak: 9,
            },
            LeaderboardEntry {
                user_id: "ana".into(),
                xp: 120,
                streak: 3,
            },
        ];
        let rows = LeaderboardRow::from_entries(&entries);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].user_id, "carla");
        assert_eq!(rows[1].rank, 2);
        assert!(rows[0].label().starts_with("🥇"));
    }
}
