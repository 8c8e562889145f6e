//! # Configuración
//!
//! Se lee de variables de entorno (y de un `.env` opcional cargado con dotenvy):
//!
//! ```env
//! # Servicio de invitados: base común para todas las rutas
//! SEATING_SERVICE_URL=http://localhost:3000/api
//!
//! # Tamaño inicial del plano hasta que la página informe el real
//! BOARD_WIDTH=1200
//! BOARD_HEIGHT=700
//!
//! # Logging
//! RUST_LOG=seating_board=debug,reqwest=info
//! ```

use std::env;

use crate::api::{AppError, AppResult, ResultExt};
use crate::board::coords::Container;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_BOARD_WIDTH: f64 = 1200.0;
pub const DEFAULT_BOARD_HEIGHT: f64 = 700.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL base del servicio de invitados
    pub service_url: String,
    pub board_width: f64,
    pub board_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
        }
    }
}

impl Config {
    /// Carga `.env` si existe y lee la configuración del entorno del proceso
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de consulta arbitraria
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup("SEATING_SERVICE_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        let board_width = parse_dimension(&lookup, "BOARD_WIDTH", DEFAULT_BOARD_WIDTH)?;
        let board_height = parse_dimension(&lookup, "BOARD_HEIGHT", DEFAULT_BOARD_HEIGHT)?;

        Ok(Self {
            service_url,
            board_width,
            board_height,
        })
    }

    /// Contenedor inicial del plano
    pub fn container(&self) -> Container {
        Container::new(self.board_width, self.board_height)
    }
}

fn parse_dimension<F>(lookup: &F, key: &str, default: f64) -> AppResult<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value = raw.trim().parse::<f64>().map_err_config(key)?;
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::config_field(key, "debe ser un número positivo"));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.container(), Container::new(1200.0, 700.0));
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("SEATING_SERVICE_URL", " https://invitados.example/api "),
            ("BOARD_WIDTH", "960"),
            ("BOARD_HEIGHT", "540.5"),
        ]))
        .unwrap();

        assert_eq!(config.service_url, "https://invitados.example/api");
        assert_eq!(config.board_width, 960.0);
        assert_eq!(config.board_height, 540.5);
    }

    #[test]
    fn rejects_invalid_dimensions() {
        let error = Config::from_lookup(lookup(&[("BOARD_HEIGHT", "-3")])).unwrap_err();
        assert!(matches!(error, AppError::ConfigWithField { ref field, .. } if field == "BOARD_HEIGHT"));

        let error = Config::from_lookup(lookup(&[("BOARD_WIDTH", "ancho")])).unwrap_err();
        assert!(matches!(error, AppError::ConfigWithField { ref field, .. } if field == "BOARD_WIDTH"));
    }
}
