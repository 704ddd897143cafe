mod calculos;
mod config;
mod extraccion;
mod informe;
mod servidor;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use config::AppConfig;
use extraccion::PipelineExtraccion;
use informe::{generar_informe, RenderizadorHtml};
use utils::logger;

#[derive(Parser)]
#[command(name = "informatron")]
#[command(about = "Generador de informes MAPA a partir de PDFs de monitoreo ambulatorio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inicializar configuración y plantillas
    Init,
    /// Arrancar el servidor HTTP
    Servir {
        /// Puerto de escucha (sobrescribe la configuración)
        #[arg(short, long)]
        puerto: Option<u16>,
    },
    /// Procesar un PDF y mostrar el paciente extraído
    Procesar {
        /// Ruta del archivo PDF
        archivo: String,
    },
    /// Generar el informe de un PDF para una institución
    Informe {
        /// Ruta del archivo PDF
        archivo: String,
        /// ID de la institución (consultoriosMedicos, vitalNorte)
        #[arg(short, long)]
        institucion: String,
        /// Ruta de salida del informe
        #[arg(short, long)]
        salida: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger();
    info!("informatron iniciado");

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_command().await?;
        }
        Commands::Servir { puerto } => {
            servir_command(puerto).await?;
        }
        Commands::Procesar { archivo } => {
            procesar_command(&archivo).await?;
        }
        Commands::Informe {
            archivo,
            institucion,
            salida,
        } => {
            informe_command(&archivo, &institucion, salida).await?;
        }
    }

    Ok(())
}

async fn init_command() -> Result<()> {
    info!("Inicializando sistema...");

    tokio::fs::create_dir_all("config").await?;

    let config = AppConfig::default();
    tokio::fs::create_dir_all(&config.plantillas.directorio).await?;

    config.save("config/settings.toml")?;
    info!("Configuración generada: config/settings.toml");

    // Plantillas de arranque: se reemplazan por las reales de cada institución
    for institucion in config.instituciones.todas() {
        escribir_plantilla_si_falta(
            &config,
            &institucion.plantilla,
            &institucion.nombre_completo,
            PLANTILLA_BASE,
        )
        .await?;
        escribir_plantilla_si_falta(
            &config,
            &institucion.plantilla_falta_info,
            &institucion.nombre_completo,
            PLANTILLA_FALTA_INFO,
        )
        .await?;
    }

    info!("✅ Sistema inicializado");
    info!("Siguientes pasos:");
    info!("  1. Ajustar config/settings.toml si hace falta");
    info!("  2. Reemplazar las plantillas de {}/ por las definitivas", config.plantillas.directorio);
    info!("  3. Ejecutar 'informatron servir' para levantar la API");

    Ok(())
}

async fn escribir_plantilla_si_falta(
    config: &AppConfig,
    nombre: &str,
    institucion: &str,
    base: &str,
) -> Result<()> {
    let ruta = std::path::Path::new(&config.plantillas.directorio).join(nombre);
    if ruta.exists() {
        return Ok(());
    }

    let contenido = base.replace("__INSTITUCION__", institucion);
    tokio::fs::write(&ruta, contenido).await?;
    info!("Plantilla generada: {}", ruta.display());
    Ok(())
}

async fn servir_command(puerto: Option<u16>) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(puerto) = puerto {
        config.servidor.puerto = puerto;
    }

    servidor::servir(config).await
}

async fn procesar_command(archivo: &str) -> Result<()> {
    info!("📄 Procesando PDF: {}", archivo);
    let bytes = tokio::fs::read(archivo).await?;

    let pipeline = PipelineExtraccion::new();
    let paciente = pipeline.extraer_paciente(&bytes)?;

    info!("✅ Paciente creado: {}", paciente.nombre);
    println!("{}", serde_json::to_string_pretty(&paciente)?);

    Ok(())
}

async fn informe_command(archivo: &str, institucion_id: &str, salida: Option<String>) -> Result<()> {
    let config = AppConfig::load()?;

    let Some(institucion) = config.instituciones.obtener(institucion_id) else {
        return Err(
            utils::MapaError::Configuracion(format!("institución no válida: {}", institucion_id))
                .into(),
        );
    };

    info!("📄 Procesando PDF: {}", archivo);
    let bytes = tokio::fs::read(archivo).await?;

    let pipeline = PipelineExtraccion::new();
    let paciente = pipeline.extraer_paciente(&bytes)?;

    let renderizador = RenderizadorHtml::new();
    let resultado = generar_informe(&paciente, institucion, &config, &renderizador)?;

    let ruta_salida = salida.unwrap_or_else(|| resultado.nombre_archivo.clone());
    tokio::fs::write(&ruta_salida, &resultado.contenido).await?;

    info!("💾 Informe guardado en: {}", ruta_salida);
    Ok(())
}

const PLANTILLA_BASE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Informe MAPA - {{NOMBRE}}</title>
<style>
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; color: #333; line-height: 1.6; }
.container { max-width: 900px; margin: 0 auto; padding: 20px; }
header { background: linear-gradient(135deg, #1a237e 0%, #283593 100%); color: white; padding: 32px 28px; border-radius: 12px; margin-bottom: 24px; }
header h1 { font-size: 24px; margin-bottom: 6px; }
header .meta { opacity: 0.85; font-size: 14px; }
.informe { background: white; border-radius: 12px; padding: 28px; box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
h2 { font-size: 17px; color: #283593; margin: 20px 0 10px 0; padding-left: 12px; border-left: 4px solid #5c6bc0; }
table.data-table { width: 100%; border-collapse: collapse; margin-bottom: 12px; font-size: 14px; }
table.data-table th { background: #e8eaf6; padding: 8px 12px; text-align: left; border: 1px solid #c5cae9; width: 40%; }
table.data-table td { padding: 8px 12px; border: 1px solid #e0e0e0; }
.seccion { background: #fafafa; border-radius: 8px; padding: 14px 16px; margin-bottom: 12px; }
.seccion .titulo { font-weight: 600; color: #37474f; margin-bottom: 6px; }
.conclusion { background: #e8f5e9; border-left: 3px solid #4caf50; padding: 10px 14px; margin-top: 8px; border-radius: 0 8px 8px 0; font-size: 14px; color: #2e7d32; }
</style>
</head>
<body>
<div class="container">
<header>
  <h1>__INSTITUCION__</h1>
  <div class="meta">Informe de Monitoreo Ambulatorio de Presión Arterial (MAPA)</div>
</header>
<div class="informe">
  <h2>Datos del paciente</h2>
  <table class="data-table">
    <tr><th>Paciente</th><td>{{NOMBRE}}</td></tr>
    <tr><th>Edad</th><td>{{EDAD}}</td></tr>
    <tr><th>Fecha del estudio</th><td>{{FECHA}}</td></tr>
    <tr><th>Duración del registro</th><td>{{HORAS}} horas</td></tr>
    <tr><th>Mediciones diurnas</th><td>{{MEDICIONES_DIURNAS}}</td></tr>
    <tr><th>Mediciones nocturnas</th><td>{{MEDICIONES_NOCTURNAS}}</td></tr>
  </table>

  <h2>Presión arterial</h2>
  <table class="data-table">
    <tr><th>Promedio de 24 horas</th><td>{{PRESION_PROMEDIO}}</td></tr>
    <tr><th>Promedio diurno</th><td>{{PRESION_DIURNA}}</td></tr>
    <tr><th>Promedio nocturno</th><td>{{PRESION_NOCTURNA}}</td></tr>
    <tr><th>Carga diurna</th><td>SYS {{PRESION_DIURNA_SISTOLICA}} / DIA {{PRESION_DIURNA_DIASTOLICA}}</td></tr>
    <tr><th>Carga nocturna</th><td>SYS {{PRESION_NOCTURNA_SISTOLICA}} / DIA {{PRESION_NOCTURNA_DIASTOLICA}}</td></tr>
    <tr><th>Clasificación</th><td>{{PRESION_ARTERIAL}}</td></tr>
  </table>

  <h2>Análisis</h2>
  <div class="seccion">
    <div class="titulo">Patrón circadiano</div>
    <p>{{PATRON_DIPPER_D}}</p>
    <p class="conclusion">{{PATRON_DIPPER_C}}</p>
  </div>
  <div class="seccion">
    <div class="titulo">Presión de pulso</div>
    <p>{{PRESION_PULSO_D}}</p>
    <p class="conclusion">{{PRESION_PULSO_C}}</p>
  </div>
</div>
</div>
</body>
</html>
"#;

const PLANTILLA_FALTA_INFO: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<title>Informe MAPA - {{NOMBRE}}</title>
<style>
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; color: #333; line-height: 1.6; }
.container { max-width: 900px; margin: 0 auto; padding: 20px; }
header { background: #b71c1c; color: white; padding: 28px; border-radius: 12px; margin-bottom: 24px; }
.informe { background: white; border-radius: 12px; padding: 28px; }
.aviso { background: #fff3e0; border-left: 4px solid #ef6c00; padding: 14px 16px; border-radius: 0 8px 8px 0; }
</style>
</head>
<body>
<div class="container">
<header>
  <h1>__INSTITUCION__</h1>
</header>
<div class="informe">
  <p>Paciente: {{NOMBRE}} ({{EDAD}} años) — {{FECHA}}</p>
  <div class="aviso">
    El registro obtenido ({{HORAS}} horas) no alcanza la duración mínima
    requerida para un estudio MAPA concluyente. Se recomienda repetir el
    monitoreo.
  </div>
</div>
</div>
</body>
</html>
"#;
