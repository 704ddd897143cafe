use serde::{Deserialize, Serialize};

/// Configuración de una institución médica: plantillas Word/HTML y logo asociados.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Institucion {
    pub id: String,
    pub nombre: String,
    pub nombre_completo: String,
    pub plantilla: String,
    pub plantilla_falta_info: String,
    pub logo: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstitucionesConfig {
    pub instituciones: Vec<Institucion>,
}

impl InstitucionesConfig {
    pub fn obtener(&self, institucion_id: &str) -> Option<&Institucion> {
        self.instituciones.iter().find(|i| i.id == institucion_id)
    }

    pub fn es_valida(&self, institucion_id: &str) -> bool {
        self.obtener(institucion_id).is_some()
    }

    pub fn todas(&self) -> &[Institucion] {
        &self.instituciones
    }
}

impl Default for InstitucionesConfig {
    fn default() -> Self {
        Self {
            instituciones: vec![
                Institucion {
                    id: "consultoriosMedicos".to_string(),
                    nombre: "Consultorios Médicos".to_string(),
                    nombre_completo: "Consultorios Médicos - Centro de Diagnóstico".to_string(),
                    plantilla: "PlantillaA.html".to_string(),
                    plantilla_falta_info: "plantillaFaltaInfo-cm.html".to_string(),
                    logo: "consultorios_medicos.png".to_string(),
                    descripcion: "Centro de diagnóstico médico especializado".to_string(),
                },
                Institucion {
                    id: "vitalNorte".to_string(),
                    nombre: "Vital Norte".to_string(),
                    nombre_completo: "Vital Norte - Instituto de Salud".to_string(),
                    plantilla: "PlantillaB.html".to_string(),
                    plantilla_falta_info: "plantillaFaltaInfo-VN.html".to_string(),
                    logo: "vital_norte.png".to_string(),
                    descripcion: "Instituto de salud integral".to_string(),
                },
            ],
        }
    }
}
