use lopdf::Document;
use tracing::{info, warn};

use crate::utils::{MapaError, MapaResult};

pub struct LectorPdf;

impl LectorPdf {
    pub fn new() -> Self {
        Self
    }

    /// Extrae el texto completo del PDF, con las páginas concatenadas en orden.
    /// Falla si los bytes no son una estructura PDF parseable.
    pub fn leer_texto(&self, bytes: &[u8]) -> MapaResult<String> {
        // Validación estructural previa; de paso informa el número de páginas
        let documento = Document::load_mem(bytes)
            .map_err(|e| MapaError::Decodificacion(format!("estructura PDF inválida: {}", e)))?;
        let paginas = documento.get_pages().len();
        info!("PDF válido, {} páginas", paginas);

        let texto = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| MapaError::Decodificacion(e.to_string()))?;

        if texto.trim().is_empty() {
            warn!("PDF sin texto extraíble");
        } else {
            info!("Texto extraído: {} caracteres", texto.len());
        }

        Ok(texto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_invalidos_producen_error_de_decodificacion() {
        let lector = LectorPdf::new();
        let resultado = lector.leer_texto(b"esto no es un PDF");
        assert!(matches!(resultado, Err(MapaError::Decodificacion(_))));
    }
}
