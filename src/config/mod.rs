pub mod instituciones;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use anyhow::Result;

pub use instituciones::{Institucion, InstitucionesConfig};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Horas mínimas para considerar válido un estudio MAPA.
    /// Por debajo de este umbral se usa la plantilla "FaltaInfo".
    pub horas_minimas_estudio: u32,
    pub servidor: ServidorConfig,
    pub plantillas: PlantillasConfig,
    pub instituciones: InstitucionesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServidorConfig {
    pub host: String,
    pub puerto: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlantillasConfig {
    pub directorio: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/settings.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn es_estudio_valido(&self, horas: u32) -> bool {
        horas >= self.horas_minimas_estudio
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            horas_minimas_estudio: 17,
            servidor: ServidorConfig {
                host: "127.0.0.1".to_string(),
                puerto: 3000,
            },
            plantillas: PlantillasConfig {
                directorio: "plantillas".to_string(),
            },
            instituciones: InstitucionesConfig::default(),
        }
    }
}
