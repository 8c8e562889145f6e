//! # Seating Board Host
//!
//! Host sin interfaz gráfica: recibe los eventos de la página como líneas JSON por
//! la entrada estándar y escribe las notificaciones y las vistas que cambian como
//! líneas JSON por la salida estándar. Los logs van a la salida de error.
//!
//! ## Ejecución
//!
//! ```bash
//! SEATING_SERVICE_URL=http://localhost:3000/api cargo run
//! {"type": "text", "value": "Ana"}
//! {"type": "submit"}
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use seating_board::{Config, Host, HttpGuestService, UiInput};

#[derive(Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
enum Output<'a> {
    Notification(&'a seating_board::Notification),
    View(&'a seating_board::HostView),
}

fn emit(output: &Output<'_>) {
    match serde_json::to_string(output) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!(error = %e, "Error serializando salida"),
    }
}

/// Función principal que arranca el host
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el sistema de logging con tracing
/// 3. Construye el cliente del servicio de invitados
/// 4. Lanza el host y reenvía la entrada estándar como eventos de la página
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida o falla la E/S estándar.
#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Configurar sistema de logging con tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seating_board=debug,reqwest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(service_url = %config.service_url, "Iniciando Seating Board host");

    let service = HttpGuestService::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let (host, mut handle) = Host::new(Arc::new(service), config.container());
    let mut host_task = tokio::spawn(host.run());

    let inputs = handle.inputs.clone();
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UiInput>(&line) {
                Ok(input) => {
                    if inputs.send(input).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, line = %line, "Evento de página inválido"),
            }
        }
        Ok::<(), std::io::Error>(())
    });
    // El host termina cuando se cierran todos los emisores de entrada
    drop(handle.inputs);

    emit(&Output::View(&handle.views.borrow_and_update()));
    loop {
        tokio::select! {
            Some(notification) = handle.notifications.recv() => {
                emit(&Output::Notification(&notification));
            }
            changed = handle.views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = handle.views.borrow_and_update().clone();
                emit(&Output::View(&view));
            }
            _ = &mut host_task => break,
        }
    }

    match reader.await {
        Ok(result) => result?,
        Err(e) => tracing::error!(error = %e, "Lector de entrada interrumpido"),
    }

    tracing::info!("Host detenido");
    Ok(())
}
