//! Configuración central de la aplicación.
//! Carga variables de entorno (.env), resuelve el archivo de propiedades e
//! instala el subscriber de logging.
use std::env;
use std::path::{Path, PathBuf};

use stepcheck_adapters::properties::{DEFAULT_PROPERTIES_FILE, PROPERTIES_ENV};
use stepcheck_adapters::{ConfigError, PropertyStore};
use tracing_subscriber::EnvFilter;

/// Propiedad con la extensión por defecto de los archivos a validar.
pub const DEFAULT_EXTENSION_PROPERTY: &str = "defaultExtension";
/// Propiedad que activa el marcado de archivos procesados.
pub const MARK_PROCESSED_PROPERTY: &str = "markProcessed";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Ruta definida por `STEPCHECK_PROPERTIES`, si existe.
    pub properties_path: Option<PathBuf>,
    /// Filtro de logging (`RUST_LOG`, por defecto `info`).
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        stepcheck_persistence::init_dotenv();
        Self { properties_path: env::var_os(PROPERTIES_ENV).map(PathBuf::from),
               log_filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()) }
    }

    /// Las propiedades son opcionales: una ruta explícita (argumento o
    /// variable de entorno) debe existir; el archivo por defecto ausente
    /// produce un almacén vacío.
    pub fn load_properties(&self, explicit: Option<&Path>) -> Result<PropertyStore, ConfigError> {
        if let Some(path) = explicit {
            return PropertyStore::load(path);
        }
        if let Some(path) = &self.properties_path {
            if !path.is_file() {
                return Err(ConfigError::EnvPathNotFound { var: PROPERTIES_ENV,
                                                          path: path.clone() });
            }
            return PropertyStore::load(path);
        }
        let default = Path::new(DEFAULT_PROPERTIES_FILE);
        if default.is_file() {
            PropertyStore::load(default)
        } else {
            Ok(PropertyStore::new())
        }
    }
}

/// Instala `tracing-subscriber` (fmt + env-filter) hacia stderr. También
/// captura los registros del facade `log` de los crates de librería. Una
/// segunda llamada no tiene efecto.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(std::io::stderr)
                                     .try_init();
}
