use std::collections::BTreeMap;
use std::path::Path;

use regex::{Captures, Regex};

use crate::utils::{MapaError, MapaResult};

/// Colaborador de renderizado: recibe la plantilla y el mapa plano de claves
/// y produce el documento final. El formato del contenedor queda detrás de
/// esta interfaz.
pub trait RenderizadorPlantilla: Send + Sync {
    fn renderizar(&self, ruta_plantilla: &Path, datos: &BTreeMap<String, String>)
        -> MapaResult<Vec<u8>>;

    fn extension(&self) -> &'static str;

    fn tipo_mime(&self) -> &'static str;
}

/// Renderizador de plantillas HTML con marcadores `{{CLAVE}}`.
pub struct RenderizadorHtml;

impl RenderizadorHtml {
    pub fn new() -> Self {
        Self
    }
}

impl RenderizadorPlantilla for RenderizadorHtml {
    fn renderizar(
        &self,
        ruta_plantilla: &Path,
        datos: &BTreeMap<String, String>,
    ) -> MapaResult<Vec<u8>> {
        if !ruta_plantilla.exists() {
            return Err(MapaError::Plantilla(format!(
                "no se encontró la plantilla: {}",
                ruta_plantilla.display()
            )));
        }

        let contenido = std::fs::read_to_string(ruta_plantilla)?;
        Ok(rellenar_plantilla(&contenido, datos).into_bytes())
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn tipo_mime(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

/// Sustituye cada marcador `{{CLAVE}}` por su valor; los marcadores sin valor
/// asociado se sustituyen por cadena vacía.
pub fn rellenar_plantilla(contenido: &str, datos: &BTreeMap<String, String>) -> String {
    let patron = Regex::new(r"\{\{([A-Z_]+)\}\}").unwrap();
    patron
        .replace_all(contenido, |caps: &Captures| {
            datos.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
