use regex::Regex;

use super::{CargaEstudio, CargaPa, Fechas, MediasPa, RitmoCircadiano};

/// Extrae el nombre completo del paciente.
///
/// En el PDF el apellido y el nombre aparecen como dos líneas seguidas
/// después del encabezado "Informe de Monitoreo", a veces intercaladas con
/// la línea de "ID paciente".
pub fn extraer_nombre(texto: &str) -> String {
    let lineas: Vec<&str> = texto.lines().collect();

    for (i, linea) in lineas.iter().enumerate() {
        if linea.contains("Informe de Monitoreo") {
            let apellido = linea_de_nombre(lineas.get(i + 1));
            let nombre = linea_de_nombre(lineas.get(i + 2));
            return format!("{} {}", apellido, nombre).trim().to_string();
        }
    }

    String::new()
}

fn linea_de_nombre<'a>(linea: Option<&&'a str>) -> &'a str {
    match linea {
        Some(l) if !l.trim().is_empty() && !l.contains("ID paciente") => l.trim(),
        _ => "",
    }
}

/// Extrae la edad del paciente. Formato: "Edad: \t53"
pub fn extraer_edad(texto: &str) -> Option<u32> {
    let patron = Regex::new(r"Edad:\s*\t?(\d+)").unwrap();
    patron.captures(texto).and_then(|caps| caps[1].parse().ok())
}

/// Extrae las fechas y la duración del estudio.
/// Formato: "Inicio prueba: \t2025/11/15 09:34 \tDuración: \t24H37M"
pub fn extraer_fechas(texto: &str) -> Fechas {
    let patron_inicio =
        Regex::new(r"Inicio prueba:\s*\t?(\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2})").unwrap();
    let inicio = patron_inicio
        .captures(texto)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let patron_duracion = Regex::new(r"Duración:\s*\t?(\d+H\d+M)").unwrap();
    let duracion = patron_duracion
        .captures(texto)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    // "Fin prueba:" aparece en su propia línea; la fecha correspondiente es la
    // primera marca de tiempo dentro de las cuatro líneas siguientes
    let patron_fecha = Regex::new(r"(\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2})").unwrap();
    let lineas: Vec<&str> = texto.lines().collect();
    let mut fin = String::new();
    for (i, linea) in lineas.iter().enumerate() {
        if linea.contains("Fin prueba:") {
            for siguiente in lineas.iter().skip(i + 1).take(4) {
                if let Some(caps) = patron_fecha.captures(siguiente) {
                    fin = caps[1].to_string();
                    break;
                }
            }
            break;
        }
    }

    Fechas { inicio, fin, duracion }
}

/// Extrae las medias de presión arterial.
/// Formato: "Todas las medias PA: \t161/99mmHg"
pub fn extraer_medias_pa(texto: &str) -> MediasPa {
    MediasPa {
        todas: extraer_par_presion(texto, r"Todas las medias PA:\s*\t?(\d+)/(\d+)mmHg"),
        dia: extraer_par_presion(texto, r"Medias PA dia:\s*\t?(\d+)/(\d+)mmHg"),
        noche: extraer_par_presion(texto, r"Medias PA noche:\s*\t?(\d+)/(\d+)mmHg"),
    }
}

fn extraer_par_presion(texto: &str, patron: &str) -> String {
    Regex::new(patron)
        .unwrap()
        .captures(texto)
        .map(|caps| format!("{}/{}", &caps[1], &caps[2]))
        .unwrap_or_default()
}

/// Extrae los porcentajes de carga de PA.
/// Formato: "SYS(>135mmHg) 93.2% \tSYS(>120mmHg) 100.0%"
/// Los umbrales de cada etiqueta son literales fijos del informe, no parámetros.
pub fn extraer_carga_pa(texto: &str) -> CargaEstudio {
    CargaEstudio {
        dia: CargaPa {
            sys: extraer_porcentaje(texto, r"SYS\(>135mmHg\)\s*(\d+\.?\d*)%"),
            dia: extraer_porcentaje(texto, r"DIA\(>85mmHg\)\s*(\d+\.?\d*)%"),
        },
        noche: CargaPa {
            sys: extraer_porcentaje(texto, r"SYS\(>120mmHg\)\s*(\d+\.?\d*)%"),
            dia: extraer_porcentaje(texto, r"DIA\(>70mmHg\)\s*(\d+\.?\d*)%"),
        },
    }
}

fn extraer_porcentaje(texto: &str, patron: &str) -> String {
    Regex::new(patron)
        .unwrap()
        .captures(texto)
        .map(|caps| format!("{}%", &caps[1]))
        .unwrap_or_default()
}

/// Extrae el ritmo circadiano (descensos nocturnos, pueden ser negativos).
/// Formato: "Ritmo circadiano de PA:DES SyS noche. -3.2% \tDes DIA noche 5.7%"
pub fn extraer_ritmo_circadiano(texto: &str) -> RitmoCircadiano {
    let patron = Regex::new(r"SyS noche\.\s*([-\d.]+)%\s*\t?Des DIA noche\s*([-\d.]+)%").unwrap();

    let Some(caps) = patron.captures(texto) else {
        return RitmoCircadiano::default();
    };

    // Una captura tipo "-" o "." no parsea como número: se trata como ausencia
    let (Ok(descenso_sys), Ok(descenso_dia)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>())
    else {
        return RitmoCircadiano::default();
    };

    RitmoCircadiano {
        descenso_sys,
        descenso_dia,
        porcentaje_sys: format!("{}%", &caps[1]),
        porcentaje_dia: format!("{}%", &caps[2]),
    }
}
