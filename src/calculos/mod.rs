use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Patrón circadiano según el descenso nocturno de la presión arterial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatronDipper {
    Dipper,
    NonDipper,
    ExtremeDipper,
    Riser,
}

impl fmt::Display for PatronDipper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nombre = match self {
            PatronDipper::Dipper => "Dipper",
            PatronDipper::NonDipper => "Non-Dipper",
            PatronDipper::ExtremeDipper => "Extreme Dipper",
            PatronDipper::Riser => "Riser",
        };
        write!(f, "{}", nombre)
    }
}

#[derive(Debug, Clone)]
pub struct ResultadoDipper {
    pub patron: PatronDipper,
    pub descripcion: String,
    pub conclusion: String,
}

/// Clasificación de la presión de pulso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClasificacionPulso {
    Baja,
    Normal,
    Elevada,
}

impl fmt::Display for ClasificacionPulso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nombre = match self {
            ClasificacionPulso::Baja => "Baja",
            ClasificacionPulso::Normal => "Normal",
            ClasificacionPulso::Elevada => "Elevada",
        };
        write!(f, "{}", nombre)
    }
}

#[derive(Debug, Clone)]
pub struct ResultadoPresionPulso {
    pub valor: i32,
    pub clasificacion: ClasificacionPulso,
    pub descripcion: String,
    pub conclusion: String,
}

/// Clasificación de la presión arterial promedio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClasificacionPa {
    Normal,
    Elevada,
    Nivel1,
    Nivel2,
    SistolicaAislada,
}

impl fmt::Display for ClasificacionPa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nombre = match self {
            ClasificacionPa::Normal => "Normal",
            ClasificacionPa::Elevada => "Presión Arterial Elevada",
            ClasificacionPa::Nivel1 => "Hipertensión Nivel 1",
            ClasificacionPa::Nivel2 => "Hipertensión Nivel 2",
            ClasificacionPa::SistolicaAislada => "Hipertensión Sistólica Aislada",
        };
        write!(f, "{}", nombre)
    }
}

/// Calcula el patrón Dipper basado en el descenso nocturno de la presión arterial.
///
/// El patrón se decide por el descenso sistólico; el diastólico se informa pero
/// no es determinante:
/// - Dipper: descenso del 10-20%
/// - Non-Dipper: descenso < 10% hasta un incremento de -5%
/// - Extreme Dipper: descenso > 20%
/// - Riser: incremento nocturno > 5%
pub fn calcular_patron_dipper(descenso_sys: f64, descenso_dia: f64) -> ResultadoDipper {
    let descenso = descenso_sys;

    if descenso >= 10.0 && descenso <= 20.0 {
        ResultadoDipper {
            patron: PatronDipper::Dipper,
            descripcion: format!(
                "Ritmo circadiano con disminución adecuada de la presión arterial nocturna. \
                 Descenso SYS: {}%, DIA: {}% (Normal: 10-20%).",
                descenso_sys, descenso_dia
            ),
            conclusion: "Patrón Dipper. Ritmo circadiano normal.".to_string(),
        }
    } else if descenso < 10.0 && descenso >= -5.0 {
        // Incluye desde pequeños incrementos hasta < 10% de descenso
        ResultadoDipper {
            patron: PatronDipper::NonDipper,
            descripcion: format!(
                "Ritmo circadiano sin disminución significativa de la presión arterial nocturna. \
                 Descenso SYS: {}%, DIA: {}% (se esperaba 10-20%).",
                descenso_sys, descenso_dia
            ),
            conclusion: "Patrón Non-Dipper. Ausencia de descenso nocturno adecuado.".to_string(),
        }
    } else if descenso > 20.0 {
        ResultadoDipper {
            patron: PatronDipper::ExtremeDipper,
            descripcion: format!(
                "Ritmo circadiano con disminución exagerada de la presión arterial nocturna. \
                 Descenso SYS: {}%, DIA: {}% (superior al 20% esperado).",
                descenso_sys, descenso_dia
            ),
            conclusion: "Patrón Extreme Dipper (Super Dipper). Descenso nocturno exagerado."
                .to_string(),
        }
    } else {
        // Incremento nocturno significativo (< -5%)
        ResultadoDipper {
            patron: PatronDipper::Riser,
            descripcion: format!(
                "Ritmo circadiano invertido con incremento significativo de la presión arterial \
                 nocturna. Cambio SYS: {}%, DIA: {}% (se esperaba descenso de 10-20%).",
                descenso_sys, descenso_dia
            ),
            conclusion: "Patrón Riser. Incremento nocturno significativo de la presión arterial."
                .to_string(),
        }
    }
}

/// Calcula la presión de pulso (sistólica - diastólica) y la clasifica.
///
/// La edad no cambia el umbral, solo el texto de la conclusión cuando es elevada.
pub fn calcular_presion_pulso(
    sistolica: i32,
    diastolica: i32,
    edad: Option<u32>,
) -> ResultadoPresionPulso {
    let valor = sistolica - diastolica;
    let descripcion = format!("Promedio de la presión de pulso {} mmHg.", valor);

    let (clasificacion, conclusion) = if valor < 30 {
        (
            ClasificacionPulso::Baja,
            format!(
                "Presión de pulso Baja ({} mmHg). Se considera normal entre 30-50 mmHg.",
                valor
            ),
        )
    } else if valor <= 50 {
        (
            ClasificacionPulso::Normal,
            format!(
                "Presión de pulso Normal ({} mmHg). Rango adecuado: 30-50 mmHg.",
                valor
            ),
        )
    } else if edad.is_some_and(|e| e >= 60) {
        (
            ClasificacionPulso::Elevada,
            format!(
                "Presión de pulso Elevada ({} mmHg). Puede ser esperada en adultos mayores por \
                 rigidez arterial aumentada. Se sugiere evaluación cardiovascular.",
                valor
            ),
        )
    } else {
        (
            ClasificacionPulso::Elevada,
            format!(
                "Presión de pulso Elevada ({} mmHg). Se considera normal entre 30-50 mmHg. \
                 Se sugiere evaluación cardiovascular.",
                valor
            ),
        )
    };

    ResultadoPresionPulso {
        valor,
        clasificacion,
        descripcion,
        conclusion,
    }
}

/// Clasifica la presión arterial promedio.
///
/// Orden de precedencia: HTA sistólica aislada, Nivel 2, Nivel 1,
/// Presión Elevada, Normal.
pub fn clasificar_presion_arterial(sistolica: i32, diastolica: i32) -> ClasificacionPa {
    if sistolica >= 140 && diastolica < 90 {
        ClasificacionPa::SistolicaAislada
    } else if sistolica >= 140 || diastolica >= 90 {
        ClasificacionPa::Nivel2
    } else if sistolica >= 130 || diastolica >= 80 {
        ClasificacionPa::Nivel1
    } else if (120..=129).contains(&sistolica) && diastolica < 80 {
        ClasificacionPa::Elevada
    } else {
        ClasificacionPa::Normal
    }
}

/// Evalúa el riesgo cardiovascular combinando los factores identificados.
pub fn evaluar_riesgo_cardiovascular(
    patron: PatronDipper,
    presion_pulso: i32,
    clasificacion_pa: &str,
) -> String {
    let mut riesgos: Vec<String> = Vec::new();

    if matches!(patron, PatronDipper::NonDipper | PatronDipper::Riser) {
        riesgos.push("Patrón circadiano alterado".to_string());
    }

    if presion_pulso > 50 {
        riesgos.push("Presión de pulso elevada".to_string());
    }

    if clasificacion_pa.contains("Hipertensión") {
        riesgos.push(clasificacion_pa.to_string());
    }

    match riesgos.len() {
        0 => "Riesgo cardiovascular bajo. Parámetros dentro de rangos normales.".to_string(),
        1 => format!(
            "Riesgo cardiovascular moderado. Factor identificado: {}.",
            riesgos[0]
        ),
        _ => format!(
            "Riesgo cardiovascular aumentado. Factores identificados: {}.",
            riesgos.join(", ")
        ),
    }
}

/// Formatea una fecha de "YYYY/MM/DD HH:MM" a "DD/MM/YYYY".
/// Si la entrada no es parseable se devuelve tal cual.
pub fn formatear_fecha(fecha_original: &str) -> String {
    let fecha = fecha_original.trim();
    if fecha.is_empty() {
        return String::new();
    }

    let solo_fecha = fecha.split_whitespace().next().unwrap_or(fecha);
    match NaiveDate::parse_from_str(solo_fecha, "%Y/%m/%d") {
        Ok(parseada) => parseada.format("%d/%m/%Y").to_string(),
        Err(_) => fecha.to_string(),
    }
}

/// Convierte una duración "24H37M" en horas enteras, redondeando hacia
/// arriba cuando los minutos llegan a 30. Entrada no parseable devuelve 0.
pub fn ajustar_hora_duracion(duracion: &str) -> u32 {
    let patron = Regex::new(r"(\d+)H(\d+)M").unwrap();

    let Some(caps) = patron.captures(duracion) else {
        return 0;
    };

    let (Ok(horas), Ok(minutos)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return 0;
    };

    if minutos >= 30 {
        horas + 1
    } else {
        horas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patron_dipper_en_los_limites() {
        assert_eq!(calcular_patron_dipper(10.0, 8.0).patron, PatronDipper::Dipper);
        assert_eq!(calcular_patron_dipper(20.0, 8.0).patron, PatronDipper::Dipper);
        assert_eq!(calcular_patron_dipper(15.3, 12.1).patron, PatronDipper::Dipper);
    }

    #[test]
    fn patron_non_dipper_incluye_descensos_pequenos_e_incrementos_leves() {
        assert_eq!(calcular_patron_dipper(9.9, 8.0).patron, PatronDipper::NonDipper);
        assert_eq!(calcular_patron_dipper(0.0, 0.0).patron, PatronDipper::NonDipper);
        assert_eq!(calcular_patron_dipper(-5.0, 2.0).patron, PatronDipper::NonDipper);
    }

    #[test]
    fn patron_riser_por_debajo_de_menos_cinco() {
        assert_eq!(calcular_patron_dipper(-5.1, 3.0).patron, PatronDipper::Riser);
        assert_eq!(calcular_patron_dipper(-12.0, -8.0).patron, PatronDipper::Riser);
    }

    #[test]
    fn patron_extreme_dipper_por_encima_de_veinte() {
        assert_eq!(
            calcular_patron_dipper(20.1, 15.0).patron,
            PatronDipper::ExtremeDipper
        );
    }

    #[test]
    fn la_descripcion_incluye_ambos_descensos() {
        let resultado = calcular_patron_dipper(-3.2, 5.7);
        assert!(resultado.descripcion.contains("-3.2%"));
        assert!(resultado.descripcion.contains("5.7%"));
    }

    #[test]
    fn presion_pulso_es_la_resta_de_sistolica_y_diastolica() {
        assert_eq!(calcular_presion_pulso(150, 100, Some(50)).valor, 50);
        assert_eq!(calcular_presion_pulso(161, 99, None).valor, 62);
        assert_eq!(calcular_presion_pulso(110, 85, Some(30)).valor, 25);
    }

    #[test]
    fn presion_pulso_clasifica_solo_por_el_valor() {
        assert_eq!(
            calcular_presion_pulso(150, 100, Some(40)).clasificacion,
            ClasificacionPulso::Normal
        );
        assert_eq!(
            calcular_presion_pulso(150, 95, Some(40)).clasificacion,
            ClasificacionPulso::Elevada
        );
        assert_eq!(
            calcular_presion_pulso(110, 85, None).clasificacion,
            ClasificacionPulso::Baja
        );
    }

    #[test]
    fn presion_pulso_elevada_ajusta_el_texto_por_edad() {
        let mayor = calcular_presion_pulso(160, 90, Some(72));
        assert!(mayor.conclusion.contains("adultos mayores"));

        let joven = calcular_presion_pulso(160, 90, Some(45));
        assert!(!joven.conclusion.contains("adultos mayores"));
        assert!(joven.conclusion.contains("evaluación cardiovascular"));

        // Sin edad conocida se usa el texto general
        let sin_edad = calcular_presion_pulso(160, 90, None);
        assert!(!sin_edad.conclusion.contains("adultos mayores"));
    }

    #[test]
    fn clasificacion_pa_sistolica_aislada_tiene_precedencia() {
        assert_eq!(
            clasificar_presion_arterial(140, 89),
            ClasificacionPa::SistolicaAislada
        );
        assert_eq!(
            clasificar_presion_arterial(175, 85),
            ClasificacionPa::SistolicaAislada
        );
    }

    #[test]
    fn clasificacion_pa_niveles() {
        assert_eq!(clasificar_presion_arterial(140, 90), ClasificacionPa::Nivel2);
        assert_eq!(clasificar_presion_arterial(125, 95), ClasificacionPa::Nivel2);
        assert_eq!(clasificar_presion_arterial(130, 75), ClasificacionPa::Nivel1);
        assert_eq!(clasificar_presion_arterial(125, 85), ClasificacionPa::Nivel1);
        assert_eq!(clasificar_presion_arterial(125, 79), ClasificacionPa::Elevada);
        assert_eq!(clasificar_presion_arterial(119, 79), ClasificacionPa::Normal);
    }

    #[test]
    fn riesgo_sin_factores_es_bajo() {
        let riesgo = evaluar_riesgo_cardiovascular(PatronDipper::Dipper, 45, "Normal");
        assert!(riesgo.starts_with("Riesgo cardiovascular bajo"));
    }

    #[test]
    fn riesgo_con_un_factor_es_moderado() {
        let riesgo = evaluar_riesgo_cardiovascular(PatronDipper::NonDipper, 45, "Normal");
        assert!(riesgo.starts_with("Riesgo cardiovascular moderado"));
        assert!(riesgo.contains("Patrón circadiano alterado"));
    }

    #[test]
    fn riesgo_con_varios_factores_es_aumentado() {
        let riesgo =
            evaluar_riesgo_cardiovascular(PatronDipper::Riser, 62, "Hipertensión Nivel 2");
        assert!(riesgo.starts_with("Riesgo cardiovascular aumentado"));
        assert!(riesgo.contains("Patrón circadiano alterado"));
        assert!(riesgo.contains("Presión de pulso elevada"));
        assert!(riesgo.contains("Hipertensión Nivel 2"));
    }

    #[test]
    fn formatear_fecha_invierte_el_orden() {
        assert_eq!(formatear_fecha("2025/11/16 10:11"), "16/11/2025");
        assert_eq!(formatear_fecha("2025/01/05"), "05/01/2025");
    }

    #[test]
    fn formatear_fecha_tolera_entradas_invalidas() {
        assert_eq!(formatear_fecha(""), "");
        assert_eq!(formatear_fecha("sin fecha"), "sin fecha");
    }

    #[test]
    fn ajustar_hora_duracion_redondea_por_minutos() {
        assert_eq!(ajustar_hora_duracion("24H37M"), 25);
        assert_eq!(ajustar_hora_duracion("24H29M"), 24);
        assert_eq!(ajustar_hora_duracion("24H30M"), 25);
        assert_eq!(ajustar_hora_duracion("no es duración"), 0);
    }
}
