use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que, si está definida y no vacía, manda sobre la
/// URL del backend configurada.
pub const BACKEND_URL_ENV: &str = "STUDY_DASHBOARD_BACKEND_URL";

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no se pudo leer el fichero de configuración: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuración YAML inválida: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Bono de XP cuando la precisión de la sesión alcanza el umbral.
/// Variante opcional: desactivada salvo que la configuración la active.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BonusXp {
    pub threshold_percent: u32,
    pub amount: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    pub user_id: String,
    /// Sección de estudio activa (por ejemplo "alkanes").
    pub section_id: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub bonus: Option<BonusXp>,
    #[serde(default = "default_leaderboard_refresh_secs")]
    pub leaderboard_refresh_secs: u64,
    /// Fichero JSON donde se cachea el snapshot local. `None` desactiva
    /// la caché (útil en tests).
    #[serde(default)]
    pub progress_cache: Option<PathBuf>,
}

fn default_backend_url() -> String {
    std::env::var(BACKEND_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_leaderboard_refresh_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn new(user_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            backend_url: default_backend_url(),
            user_id: user_id.into(),
            section_id: section_id.into(),
            difficulty: default_difficulty(),
            bonus: None,
            leaderboard_refresh_secs: default_leaderboard_refresh_secs(),
            progress_cache: None,
        }
    }

    /// Carga la configuración desde un fichero YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_minimo_aplica_valores_por_defecto() {
        let yaml = "user_id: student1\nsection_id: alkanes\n";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("yaml válido");
        assert_eq!(config.user_id, "student1");
        assert_eq!(config.section_id, "alkanes");
        assert_eq!(config.difficulty, "medium");
        assert_eq!(config.leaderboard_refresh_secs, 30);
        assert!(config.bonus.is_none());
        assert!(config.progress_cache.is_none());
    }

    #[test]
    fn yaml_completo_activa_el_bono() {
        let yaml = "\
backend_url: http://localhost:9999
user_id: student1
section_id: alkenes
difficulty: hard
bonus:
  threshold_percent: 80
  amount: 20
leaderboard_refresh_secs: 5
";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("yaml válido");
        assert_eq!(config.backend_url, "http://localhost:9999");
        assert_eq!(
            config.bonus,
            Some(BonusXp {
                threshold_percent: 80,
                amount: 20
            })
        );
        assert_eq!(config.leaderboard_refresh_secs, 5);
    }
}
