pub mod campos;
pub mod contador;
pub mod pdf;

pub use contador::{ContadorMediciones, ConteoMediciones};
pub use pdf::LectorPdf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculos;
use crate::utils::{MapaError, MapaResult};

/// Fechas y duración del estudio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fechas {
    pub inicio: String,
    pub fin: String,
    pub duracion: String,
}

/// Medias de presión arterial como pares "SYS/DIA" (vacío si no se encontró).
#[derive(Debug, Clone, Default)]
pub struct MediasPa {
    pub todas: String,
    pub dia: String,
    pub noche: String,
}

/// Carga de presión arterial de una franja (porcentajes con símbolo %).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CargaPa {
    #[serde(rename = "SYS")]
    pub sys: String,
    #[serde(rename = "DIA")]
    pub dia: String,
}

#[derive(Debug, Clone, Default)]
pub struct CargaEstudio {
    pub dia: CargaPa,
    pub noche: CargaPa,
}

/// Descensos nocturnos del ritmo circadiano (negativos si hay incremento).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RitmoCircadiano {
    #[serde(rename = "descensoSYS")]
    pub descenso_sys: f64,
    #[serde(rename = "descensoDIA")]
    pub descenso_dia: f64,
    #[serde(rename = "porcentajeSYS")]
    pub porcentaje_sys: String,
    #[serde(rename = "porcentajeDIA")]
    pub porcentaje_dia: String,
}

/// Registro completo del paciente ensamblado desde el PDF MAPA.
/// Inmutable: cualquier actualización produce una copia nueva.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paciente {
    // Datos personales
    pub nombre: String,
    pub edad: Option<u32>,

    // Fechas del estudio
    pub fecha_inicio: String,
    pub fecha_formateada: String,
    pub fecha_fin: String,
    pub duracion: String,
    pub duracion_horas: u32,

    // Medias de presión arterial
    #[serde(rename = "todasLasMediasPA")]
    pub todas_las_medias_pa: String,
    #[serde(rename = "mediasPADia")]
    pub medias_pa_dia: String,
    #[serde(rename = "mediasPANoche")]
    pub medias_pa_noche: String,

    // Valores de carga
    #[serde(rename = "valorCargaPADia")]
    pub valor_carga_pa_dia: CargaPa,
    #[serde(rename = "valorCargaPANoche")]
    pub valor_carga_pa_noche: CargaPa,

    // Ritmo circadiano y patrón Dipper
    pub ritmo_circadiano: RitmoCircadiano,
    pub dipper_patron: String,
    pub dipper_d: String,
    pub dipper_c: String,

    // Presión de pulso
    pub presion_pulso_valor: i32,
    pub presion_pulso_d: String,
    pub presion_pulso_c: String,

    // Clasificación y riesgo
    #[serde(rename = "clasificacionPA")]
    pub clasificacion_pa: String,
    pub riesgo_cardiovascular: String,

    // Mediciones (calculadas automáticamente del PDF)
    pub mediciones_diurnas: u32,
    pub mediciones_nocturnas: u32,
    pub total_mediciones: u32,
}

/// Pipeline de extracción completo: PDF → texto → campos → cálculos → Paciente.
pub struct PipelineExtraccion {
    lector: LectorPdf,
    contador: ContadorMediciones,
}

impl PipelineExtraccion {
    pub fn new() -> Self {
        Self {
            lector: LectorPdf::new(),
            contador: ContadorMediciones::new(),
        }
    }

    /// Procesa los bytes de un PDF MAPA y devuelve el paciente ensamblado.
    pub fn extraer_paciente(&self, bytes: &[u8]) -> MapaResult<Paciente> {
        let texto = self.lector.leer_texto(bytes)?;
        self.construir_paciente(&texto)
    }

    /// Ensambla el objeto Paciente a partir del texto ya extraído.
    pub fn construir_paciente(&self, texto: &str) -> MapaResult<Paciente> {
        // 1. Campos individuales, cada uno tolerante a su propia ausencia
        let nombre = campos::extraer_nombre(texto);
        let edad = campos::extraer_edad(texto);
        let fechas = campos::extraer_fechas(texto);
        let medias_pa = campos::extraer_medias_pa(texto);
        let carga_pa = campos::extraer_carga_pa(texto);
        let ritmo = campos::extraer_ritmo_circadiano(texto);

        // 2. Conteo automático de mediciones
        let conteo = self.contador.contar(texto);

        // 3. La media general es imprescindible para los cálculos clínicos
        let (sys_total, dia_total) = parsear_media(&medias_pa.todas).ok_or_else(|| {
            MapaError::Ensamblado(
                "no se encontró la media general de presión arterial en el PDF".to_string(),
            )
        })?;

        // 4. Cálculos médicos
        let dipper = calculos::calcular_patron_dipper(ritmo.descenso_sys, ritmo.descenso_dia);
        let presion_pulso = calculos::calcular_presion_pulso(sys_total, dia_total, edad);
        let clasificacion_pa =
            calculos::clasificar_presion_arterial(sys_total, dia_total).to_string();
        let riesgo = calculos::evaluar_riesgo_cardiovascular(
            dipper.patron,
            presion_pulso.valor,
            &clasificacion_pa,
        );

        // 5. El informe usa la fecha de FIN del estudio
        let fecha_formateada = calculos::formatear_fecha(&fechas.fin);
        let duracion_horas = calculos::ajustar_hora_duracion(&fechas.duracion);

        info!(
            "Paciente ensamblado: {} ({} mediciones, patrón {})",
            nombre, conteo.total, dipper.patron
        );

        Ok(Paciente {
            nombre,
            edad,
            fecha_inicio: fechas.inicio,
            fecha_formateada,
            fecha_fin: fechas.fin,
            duracion: fechas.duracion,
            duracion_horas,
            todas_las_medias_pa: medias_pa.todas,
            medias_pa_dia: medias_pa.dia,
            medias_pa_noche: medias_pa.noche,
            valor_carga_pa_dia: carga_pa.dia,
            valor_carga_pa_noche: carga_pa.noche,
            ritmo_circadiano: ritmo,
            dipper_patron: dipper.patron.to_string(),
            dipper_d: dipper.descripcion,
            dipper_c: dipper.conclusion,
            presion_pulso_valor: presion_pulso.valor,
            presion_pulso_d: presion_pulso.descripcion,
            presion_pulso_c: presion_pulso.conclusion,
            clasificacion_pa,
            riesgo_cardiovascular: riesgo,
            mediciones_diurnas: conteo.diurnas,
            mediciones_nocturnas: conteo.nocturnas,
            total_mediciones: conteo.total,
        })
    }
}

/// Actualización pura de las mediciones: devuelve una copia con los conteos
/// sobrescritos, sin tocar el registro original ni repetir la extracción.
pub fn actualizar_mediciones(paciente: &Paciente, diurnas: u32, nocturnas: u32) -> Paciente {
    Paciente {
        mediciones_diurnas: diurnas,
        mediciones_nocturnas: nocturnas,
        total_mediciones: diurnas + nocturnas,
        ..paciente.clone()
    }
}

fn parsear_media(par: &str) -> Option<(i32, i32)> {
    let (sys, dia) = par.split_once('/')?;
    Some((sys.trim().parse().ok()?, dia.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTO_MAPA: &str = "Informe de Monitoreo\n\
GARCIA LOPEZ\n\
MARIA\n\
ID paciente: \t000123\n\
Edad: \t53\n\
Inicio prueba: \t2025/11/15 09:34 \tDuración: \t24H37M\n\
Fin prueba:\n\
2025/11/16 10:11\n\
Todas las medias PA: \t161/99mmHg\n\
Medias PA dia: \t163/101mmHg\n\
Medias PA noche: \t155/94mmHg\n\
SYS(>135mmHg) 93.2% \tDIA(>85mmHg) 87.5%\n\
SYS(>120mmHg) 100.0% \tDIA(>70mmHg) 95.8%\n\
Ritmo circadiano de PA:DES SyS noche. -3.2% \tDes DIA noche 5.7%\n\
1 2025/11/15 09:40 158 97 72\n\
2 2025/11/15 14:10 164 102 75\n\
3+ 2025/11/15 23:05 150 92 68\n\
4 2025/11/16 03:30 148 90 66\n";

    #[test]
    fn ensambla_el_paciente_completo() {
        let pipeline = PipelineExtraccion::new();
        let paciente = pipeline.construir_paciente(TEXTO_MAPA).unwrap();

        assert_eq!(paciente.nombre, "GARCIA LOPEZ MARIA");
        assert_eq!(paciente.edad, Some(53));
        assert_eq!(paciente.fecha_inicio, "2025/11/15 09:34");
        assert_eq!(paciente.fecha_fin, "2025/11/16 10:11");
        assert_eq!(paciente.fecha_formateada, "16/11/2025");
        assert_eq!(paciente.duracion, "24H37M");
        assert_eq!(paciente.duracion_horas, 25);
        assert_eq!(paciente.todas_las_medias_pa, "161/99");
        assert_eq!(paciente.presion_pulso_valor, 62);
        assert_eq!(paciente.dipper_patron, "Non-Dipper");
        assert_eq!(paciente.clasificacion_pa, "Hipertensión Nivel 2");
        assert!(paciente
            .riesgo_cardiovascular
            .starts_with("Riesgo cardiovascular aumentado"));
        assert_eq!(paciente.mediciones_diurnas, 2);
        assert_eq!(paciente.mediciones_nocturnas, 2);
        assert_eq!(paciente.total_mediciones, 4);
    }

    #[test]
    fn sin_media_general_falla_con_error_de_ensamblado() {
        let pipeline = PipelineExtraccion::new();
        let texto = TEXTO_MAPA.replace("Todas las medias PA: \t161/99mmHg\n", "");
        let resultado = pipeline.construir_paciente(&texto);
        assert!(matches!(resultado, Err(MapaError::Ensamblado(_))));
    }

    #[test]
    fn sin_edad_el_ensamblado_sigue_funcionando() {
        let pipeline = PipelineExtraccion::new();
        let texto = TEXTO_MAPA.replace("Edad: \t53\n", "");
        let paciente = pipeline.construir_paciente(&texto).unwrap();
        assert_eq!(paciente.edad, None);
        assert_eq!(paciente.todas_las_medias_pa, "161/99");
    }

    #[test]
    fn actualizar_mediciones_no_muta_el_original() {
        let pipeline = PipelineExtraccion::new();
        let original = pipeline.construir_paciente(TEXTO_MAPA).unwrap();

        let actualizado = actualizar_mediciones(&original, 40, 12);

        assert_eq!(actualizado.mediciones_diurnas, 40);
        assert_eq!(actualizado.mediciones_nocturnas, 12);
        assert_eq!(actualizado.total_mediciones, 52);
        // El resto del registro se conserva
        assert_eq!(actualizado.nombre, original.nombre);
        assert_eq!(actualizado.clasificacion_pa, original.clasificacion_pa);
        // Y el original queda intacto
        assert_eq!(original.mediciones_diurnas, 2);
        assert_eq!(original.total_mediciones, 4);
    }

    #[test]
    fn el_registro_viaja_en_camel_case() {
        let pipeline = PipelineExtraccion::new();
        let paciente = pipeline.construir_paciente(TEXTO_MAPA).unwrap();
        let json = serde_json::to_value(&paciente).unwrap();

        assert!(json.get("todasLasMediasPA").is_some());
        assert!(json.get("medicionesDiurnas").is_some());
        assert!(json.get("clasificacionPA").is_some());
        assert!(json.get("ritmoCircadiano").unwrap().get("descensoSYS").is_some());
        assert_eq!(json["valorCargaPADia"]["SYS"], "93.2%");
    }
}
