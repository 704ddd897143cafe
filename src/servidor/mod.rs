use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::extraccion::{actualizar_mediciones, Paciente, PipelineExtraccion};
use crate::informe::{generar_informe, RenderizadorHtml, RenderizadorPlantilla};

pub struct EstadoServidor {
    pub config: AppConfig,
    pub pipeline: PipelineExtraccion,
    pub renderizador: RenderizadorHtml,
}

#[derive(Serialize)]
struct RespuestaExito<T: Serialize> {
    success: bool,
    data: T,
    message: String,
}

#[derive(Serialize)]
struct RespuestaError {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn exito<T: Serialize>(data: T, message: &str) -> Json<RespuestaExito<T>> {
    Json(RespuestaExito {
        success: true,
        data,
        message: message.to_string(),
    })
}

fn fallo(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(RespuestaError {
            success: false,
            message: message.to_string(),
            error: None,
        }),
    )
        .into_response()
}

fn fallo_interno(message: &str, causa: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RespuestaError {
            success: false,
            message: message.to_string(),
            error: Some(causa.to_string()),
        }),
    )
        .into_response()
}

pub fn crear_router(estado: Arc<EstadoServidor>) -> Router {
    // El frontend necesita leer Content-Disposition para las descargas
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(raiz))
        .route("/test", get(prueba))
        .route("/api/upload-pdf", post(subir_pdf))
        .route("/api/actualizar-mediciones", post(actualizar_mediciones_api))
        .route("/api/generar-informe", post(generar_informe_api))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(cors)
        .with_state(estado)
}

/// Arranca el servidor HTTP y atiende hasta que el proceso termine.
pub async fn servir(config: AppConfig) -> anyhow::Result<()> {
    let direccion = format!("{}:{}", config.servidor.host, config.servidor.puerto);
    let estado = Arc::new(EstadoServidor {
        pipeline: PipelineExtraccion::new(),
        renderizador: RenderizadorHtml::new(),
        config,
    });

    let listener = tokio::net::TcpListener::bind(&direccion).await?;

    info!("🚀 Informatron API iniciado");
    info!("📡 Servidor escuchando en http://{}", direccion);
    info!("📋 Endpoints disponibles:");
    info!("   GET  / - Información de la API");
    info!("   GET  /test - Prueba de conectividad");
    info!("   POST /api/upload-pdf - Cargar PDF MAPA");
    info!("   POST /api/actualizar-mediciones - Actualizar mediciones");
    info!("   POST /api/generar-informe - Generar informe");

    axum::serve(listener, crear_router(estado)).await?;
    Ok(())
}

async fn raiz() -> Json<Value> {
    Json(json!({
        "message": "🩺 Informatron API - Generador de Informes MAPA",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "test": "/test",
            "uploadPDF": "POST /api/upload-pdf",
            "updateMediciones": "POST /api/actualizar-mediciones",
            "generarInforme": "POST /api/generar-informe"
        }
    }))
}

async fn prueba() -> &'static str {
    "✅ El servidor está corriendo correctamente."
}

/// POST /api/upload-pdf
/// Procesa un archivo PDF con datos MAPA y retorna el objeto paciente.
async fn subir_pdf(
    State(estado): State<Arc<EstadoServidor>>,
    mut multipart: Multipart,
) -> Response {
    let mut archivo: Option<(String, Vec<u8>)> = None;
    let mut tipo_es_pdf = true;

    while let Ok(Some(campo)) = multipart.next_field().await {
        if campo.name() != Some("pdfFile") {
            continue;
        }

        let nombre = campo.file_name().unwrap_or("documento.pdf").to_string();
        if campo.content_type() != Some("application/pdf") {
            tipo_es_pdf = false;
        }

        match campo.bytes().await {
            Ok(bytes) => archivo = Some((nombre, bytes.to_vec())),
            Err(e) => {
                error!("No se pudieron leer los bytes del archivo: {}", e);
                return fallo(StatusCode::BAD_REQUEST, "No se pudo leer el archivo PDF");
            }
        }
    }

    let Some((nombre, bytes)) = archivo else {
        return fallo(StatusCode::BAD_REQUEST, "No se recibió ningún archivo PDF");
    };

    if !tipo_es_pdf {
        return fallo(StatusCode::BAD_REQUEST, "El archivo debe ser un PDF");
    }

    info!("📄 Procesando PDF: {}", nombre);

    // La decodificación es trabajo de CPU: fuera del reactor
    let estado_tarea = estado.clone();
    let resultado =
        tokio::task::spawn_blocking(move || estado_tarea.pipeline.extraer_paciente(&bytes)).await;

    match resultado {
        Ok(Ok(paciente)) => {
            info!("✅ Paciente creado: {}", paciente.nombre);
            exito(
                paciente,
                "Carga exitosa. Por favor, ingrese las mediciones diurnas y nocturnas.",
            )
            .into_response()
        }
        Ok(Err(e)) => {
            error!("❌ Error al procesar PDF: {}", e);
            fallo_interno("Error al procesar el PDF", e)
        }
        Err(e) => {
            error!("❌ Tarea de extracción interrumpida: {}", e);
            fallo_interno("Error al procesar el PDF", e)
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeticionActualizar {
    paciente: Option<Paciente>,
    mediciones_diurnas: Option<Value>,
    mediciones_nocturnas: Option<Value>,
}

/// POST /api/actualizar-mediciones
/// Actualiza las mediciones diurnas y nocturnas del paciente.
async fn actualizar_mediciones_api(Json(peticion): Json<PeticionActualizar>) -> Response {
    let Some(paciente) = peticion.paciente else {
        return fallo(StatusCode::BAD_REQUEST, "No se recibió el objeto paciente");
    };

    let (Some(diurnas_valor), Some(nocturnas_valor)) =
        (peticion.mediciones_diurnas, peticion.mediciones_nocturnas)
    else {
        return fallo(
            StatusCode::BAD_REQUEST,
            "Faltan las mediciones diurnas o nocturnas",
        );
    };

    let (Some(diurnas), Some(nocturnas)) = (
        parsear_conteo(&diurnas_valor),
        parsear_conteo(&nocturnas_valor),
    ) else {
        return fallo(
            StatusCode::BAD_REQUEST,
            "Las mediciones deben ser números válidos",
        );
    };

    let actualizado = actualizar_mediciones(&paciente, diurnas, nocturnas);
    info!(
        "✅ Mediciones actualizadas: {} ({} diurnas, {} nocturnas)",
        actualizado.nombre, diurnas, nocturnas
    );

    exito(actualizado, "Mediciones actualizadas correctamente").into_response()
}

/// El asistente web puede enviar los conteos como número o como cadena.
fn parsear_conteo(valor: &Value) -> Option<u32> {
    match valor {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeticionInforme {
    paciente: Option<Paciente>,
    institucion_id: Option<String>,
}

/// POST /api/generar-informe
/// Genera el informe de la institución y lo retorna para descarga.
async fn generar_informe_api(
    State(estado): State<Arc<EstadoServidor>>,
    Json(peticion): Json<PeticionInforme>,
) -> Response {
    let Some(paciente) = peticion.paciente else {
        return fallo(StatusCode::BAD_REQUEST, "No se recibió el objeto paciente");
    };

    let Some(institucion_id) = peticion.institucion_id else {
        return fallo(
            StatusCode::BAD_REQUEST,
            "No se recibió el ID de la institución",
        );
    };

    if paciente.mediciones_diurnas == 0 || paciente.mediciones_nocturnas == 0 {
        return fallo(
            StatusCode::BAD_REQUEST,
            "El paciente no tiene mediciones diurnas y nocturnas",
        );
    }

    let Some(institucion) = estado.config.instituciones.obtener(&institucion_id) else {
        return fallo(
            StatusCode::BAD_REQUEST,
            &format!("Institución no válida: {}", institucion_id),
        );
    };

    info!("📄 Generando informe para: {}", paciente.nombre);
    info!("🏥 Institución: {}", institucion_id);

    match generar_informe(&paciente, institucion, &estado.config, &estado.renderizador) {
        Ok(informe) => {
            info!("✅ Informe generado exitosamente: {}", informe.nombre_archivo);
            (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        estado.renderizador.tipo_mime().to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", informe.nombre_archivo),
                    ),
                ],
                informe.contenido,
            )
                .into_response()
        }
        Err(e) => {
            error!("❌ Error al generar informe: {}", e);
            fallo_interno("Error al generar el informe", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsear_conteo_acepta_numeros_y_cadenas() {
        assert_eq!(parsear_conteo(&json!(42)), Some(42));
        assert_eq!(parsear_conteo(&json!("17")), Some(17));
        assert_eq!(parsear_conteo(&json!(" 8 ")), Some(8));
    }

    #[test]
    fn parsear_conteo_rechaza_valores_no_numericos() {
        assert_eq!(parsear_conteo(&json!("abc")), None);
        assert_eq!(parsear_conteo(&json!(-3)), None);
        assert_eq!(parsear_conteo(&json!(3.5)), None);
        assert_eq!(parsear_conteo(&json!(null)), None);
        assert_eq!(parsear_conteo(&json!({"valor": 1})), None);
    }
}
