use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Conteo de mediciones clasificadas por franja horaria.
/// Invariante: `diurnas + nocturnas == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConteoMediciones {
    pub diurnas: u32,
    pub nocturnas: u32,
    pub total: u32,
}

pub struct ContadorMediciones {
    patron_fila: Regex,
}

impl ContadorMediciones {
    pub fn new() -> Self {
        // Fila de medición: número de secuencia (con posibles marcas "+" de
        // lectura errónea), fecha YYYY/M/D y hora H:MM, seguidas de las lecturas
        Self {
            patron_fila: Regex::new(
                r"(?m)^\s*\d+\+*\s+\d{4}/\d{1,2}/\d{1,2}\s+(\d{1,2}):(\d{2})\s+",
            )
            .unwrap(),
        }
    }

    /// Cuenta las mediciones diurnas y nocturnas del texto del PDF.
    ///
    /// Regla clínica de clasificación por hora:
    /// - Diurnas: 07:00 a 21:59
    /// - Nocturnas: 22:00 a 06:59
    pub fn contar(&self, texto: &str) -> ConteoMediciones {
        let mut diurnas = 0u32;
        let mut nocturnas = 0u32;

        for caps in self.patron_fila.captures_iter(texto) {
            let (Ok(hora), Ok(minuto)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
                continue;
            };

            // Hora o minuto fuera de rango: ruido de extracción, se descarta
            // sin abortar el escaneo
            if hora > 23 || minuto > 59 {
                debug!("Fila descartada por hora inválida: {}:{:02}", hora, minuto);
                continue;
            }

            if (7..=21).contains(&hora) {
                diurnas += 1;
            } else {
                nocturnas += 1;
            }
        }

        let total = diurnas + nocturnas;

        if total == 0 {
            warn!("⚠️ No se encontraron mediciones en el PDF");
            return ConteoMediciones::default();
        }

        info!("📊 Conteo de mediciones automático:");
        info!("   Clasificación: 07:00-21:59 diurnas | 22:00-06:59 nocturnas");
        info!("   Total: {}", total);
        info!(
            "   Diurnas: {} ({:.1}%)",
            diurnas,
            diurnas as f64 / total as f64 * 100.0
        );
        info!(
            "   Nocturnas: {} ({:.1}%)",
            nocturnas,
            nocturnas as f64 / total as f64 * 100.0
        );

        ConteoMediciones {
            diurnas,
            nocturnas,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clasifica_exactamente_en_los_limites_horarios() {
        let texto = "1 2025/12/4 06:59 100 80 60\n\
                     2 2025/12/4 07:00 120 80 60\n\
                     3 2025/12/4 21:59 120 80 60\n\
                     4 2025/12/4 22:00 100 80 60\n";
        let conteo = ContadorMediciones::new().contar(texto);
        assert_eq!(conteo.diurnas, 2);
        assert_eq!(conteo.nocturnas, 2);
        assert_eq!(conteo.total, 4);
    }

    #[test]
    fn las_marcas_de_error_no_afectan_la_clasificacion() {
        let contador = ContadorMediciones::new();
        let con_marca = contador.contar("5+ 2025/12/4 12:00 130 85 70\n");
        let sin_marca = contador.contar("5 2025/12/4 12:00 130 85 70\n");
        assert_eq!(con_marca, sin_marca);
        assert_eq!(con_marca.diurnas, 1);
        assert_eq!(con_marca.total, 1);

        let doble_marca = contador.contar("7++ 2025/12/4 23:15 110 70 65\n");
        assert_eq!(doble_marca.nocturnas, 1);
    }

    #[test]
    fn filas_con_hora_fuera_de_rango_se_descartan_en_silencio() {
        let texto = "1 2025/12/4 24:00 120 80 60\n\
                     2 2025/12/4 12:60 120 80 60\n\
                     3 2025/12/4 12:30 120 80 60\n";
        let conteo = ContadorMediciones::new().contar(texto);
        assert_eq!(conteo.diurnas, 1);
        assert_eq!(conteo.nocturnas, 0);
        assert_eq!(conteo.total, 1);
    }

    #[test]
    fn texto_vacio_devuelve_ceros_sin_fallar() {
        let conteo = ContadorMediciones::new().contar("");
        assert_eq!(conteo, ConteoMediciones::default());
    }

    #[test]
    fn texto_sin_tabla_de_mediciones_devuelve_ceros() {
        let conteo = ContadorMediciones::new().contar("Informe de Monitoreo\nEdad: 53\n");
        assert_eq!(conteo.total, 0);
    }

    #[test]
    fn toda_fila_valida_cae_en_exactamente_un_contador() {
        let texto = "  1 2025/12/4 00:15 110 70 60\n\
                     2+ 2025/12/4 6:59 100 80 58\n\
                     3 2025/12/4 7:00 120 80 62\n\
                     4 2025/12/4 13:45 125 82 70\n\
                     5 2025/12/4 21:59 118 79 64\n\
                     6 2025/12/4 22:00 105 72 59\n\
                     7 2025/12/5 3:30 98 65 55\n";
        let conteo = ContadorMediciones::new().contar(texto);
        assert_eq!(conteo.diurnas + conteo.nocturnas, conteo.total);
        assert_eq!(conteo.total, 7);
        assert_eq!(conteo.diurnas, 3);
        assert_eq!(conteo.nocturnas, 4);
    }

    #[test]
    fn acepta_mes_dia_y_hora_de_un_digito() {
        let conteo = ContadorMediciones::new().contar("12 2025/1/7 9:05 132 88 71\n");
        assert_eq!(conteo.diurnas, 1);
        assert_eq!(conteo.total, 1);
    }

    #[test]
    fn lineas_que_no_son_filas_de_medicion_se_ignoran() {
        let texto = "Medias PA dia: 163/101mmHg\n\
                     SYS(>135mmHg) 93.2%\n\
                     1 2025/12/4 10:00 120 80 60\n";
        let conteo = ContadorMediciones::new().contar(texto);
        assert_eq!(conteo.total, 1);
    }
}
