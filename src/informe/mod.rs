pub mod plantilla;

pub use plantilla::{rellenar_plantilla, RenderizadorHtml, RenderizadorPlantilla};

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::config::{AppConfig, Institucion};
use crate::extraccion::Paciente;
use crate::utils::MapaResult;

/// Informe ya renderizado, listo para descarga o escritura a disco.
#[derive(Debug, Clone)]
pub struct InformeGenerado {
    pub nombre_archivo: String,
    pub contenido: Vec<u8>,
}

/// Mapea el registro del paciente al mapa plano de claves que consumen las
/// plantillas de las instituciones. El conjunto de claves es exhaustivo y
/// todo campo ausente se mapea a cadena vacía.
pub fn mapear_paciente(paciente: &Paciente) -> BTreeMap<String, String> {
    let mut datos = BTreeMap::new();

    // Datos básicos
    datos.insert("NOMBRE".to_string(), paciente.nombre.clone());
    datos.insert(
        "EDAD".to_string(),
        paciente.edad.map(|e| e.to_string()).unwrap_or_default(),
    );
    datos.insert("FECHA".to_string(), paciente.fecha_formateada.clone());
    datos.insert("HORAS".to_string(), numero_o_vacio(paciente.duracion_horas));

    // Mediciones
    datos.insert(
        "MEDICIONES_DIURNAS".to_string(),
        numero_o_vacio(paciente.mediciones_diurnas),
    );
    datos.insert(
        "MEDICIONES_NOCTURNAS".to_string(),
        numero_o_vacio(paciente.mediciones_nocturnas),
    );

    // Presiones arteriales
    datos.insert(
        "PRESION_PROMEDIO".to_string(),
        presion_con_unidad(&paciente.todas_las_medias_pa),
    );
    datos.insert(
        "PRESION_DIURNA".to_string(),
        presion_con_unidad(&paciente.medias_pa_dia),
    );
    datos.insert(
        "PRESION_NOCTURNA".to_string(),
        presion_con_unidad(&paciente.medias_pa_noche),
    );

    // Cargas de presión arterial (porcentajes)
    datos.insert(
        "PRESION_DIURNA_SISTOLICA".to_string(),
        paciente.valor_carga_pa_dia.sys.clone(),
    );
    datos.insert(
        "PRESION_DIURNA_DIASTOLICA".to_string(),
        paciente.valor_carga_pa_dia.dia.clone(),
    );
    datos.insert(
        "PRESION_NOCTURNA_SISTOLICA".to_string(),
        paciente.valor_carga_pa_noche.sys.clone(),
    );
    datos.insert(
        "PRESION_NOCTURNA_DIASTOLICA".to_string(),
        paciente.valor_carga_pa_noche.dia.clone(),
    );

    // Presión de pulso
    datos.insert("PRESION_PULSO_D".to_string(), paciente.presion_pulso_d.clone());
    datos.insert("PRESION_PULSO_C".to_string(), paciente.presion_pulso_c.clone());

    // Patrón Dipper
    datos.insert("PATRON_DIPPER_D".to_string(), paciente.dipper_d.clone());
    datos.insert("PATRON_DIPPER_C".to_string(), paciente.dipper_c.clone());

    // Clasificación de presión arterial
    datos.insert(
        "PRESION_ARTERIAL".to_string(),
        paciente.clasificacion_pa.clone(),
    );

    datos
}

/// Genera el informe de un paciente para una institución: selecciona la
/// plantilla según la duración del estudio, mapea los datos y renderiza.
pub fn generar_informe(
    paciente: &Paciente,
    institucion: &Institucion,
    config: &AppConfig,
    renderizador: &dyn RenderizadorPlantilla,
) -> MapaResult<InformeGenerado> {
    info!("📄 Generando informe para institución: {}", institucion.nombre);

    let plantilla = seleccionar_plantilla(paciente, institucion, config);
    info!("📋 Plantilla: {}", plantilla);

    let ruta = Path::new(&config.plantillas.directorio).join(plantilla);
    let datos = mapear_paciente(paciente);
    let contenido = renderizador.renderizar(&ruta, &datos)?;

    info!("✅ Documento generado exitosamente");

    Ok(InformeGenerado {
        nombre_archivo: format!(
            "{}_MAPA.{}",
            nombre_para_archivo(&paciente.nombre),
            renderizador.extension()
        ),
        contenido,
    })
}

/// Un estudio por debajo de las horas mínimas se informa con la plantilla
/// de información insuficiente de la institución.
fn seleccionar_plantilla<'a>(
    paciente: &Paciente,
    institucion: &'a Institucion,
    config: &AppConfig,
) -> &'a str {
    if config.es_estudio_valido(paciente.duracion_horas) {
        &institucion.plantilla
    } else {
        &institucion.plantilla_falta_info
    }
}

fn nombre_para_archivo(nombre: &str) -> String {
    let limpio = nombre.split_whitespace().collect::<Vec<_>>().join("_");
    if limpio.is_empty() {
        "informe".to_string()
    } else {
        limpio
    }
}

fn numero_o_vacio(valor: u32) -> String {
    if valor == 0 {
        String::new()
    } else {
        valor.to_string()
    }
}

fn presion_con_unidad(par: &str) -> String {
    if par.is_empty() {
        String::new()
    } else {
        format!("{}mmHg", par)
    }
}
