pub mod logger;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapaError {
    #[error("Error de configuración: {0}")]
    Configuracion(String),

    #[error("Error al decodificar el PDF: {0}")]
    Decodificacion(String),

    #[error("Error al ensamblar los datos del paciente: {0}")]
    Ensamblado(String),

    #[error("Error de plantilla: {0}")]
    Plantilla(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de serialización: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type MapaResult<T> = Result<T, MapaError>;
