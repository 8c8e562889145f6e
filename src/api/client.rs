//! # Cliente del servicio de invitados
//!
//! El servicio externo expone mesas, búsqueda de invitados, sugerencias y
//! asistencia. Los controladores sólo conocen el trait [`GuestService`]; la
//! implementación HTTP real es [`HttpGuestService`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::{AppError, AppResult, ResultExt};
use crate::config::Config;
use crate::models::{
    AttendanceAck, AttendanceRequest, GuestId, GuestRecord, PositionUpdate, Suggestion,
    TableRecord,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Operaciones consumidas del servicio de invitados
#[async_trait]
pub trait GuestService: Send + Sync {
    /// `GET /tables`: todas las mesas con coordenadas normalizadas
    async fn tables(&self) -> AppResult<Vec<TableRecord>>;

    /// `GET /suggestions?name=<parcial>`
    async fn suggestions(&self, partial: &str) -> AppResult<Vec<Suggestion>>;

    /// `GET /search?name=<exacto>`; `Ok(None)` cuando no hay coincidencia
    async fn search(&self, name: &str) -> AppResult<Option<GuestRecord>>;

    /// `POST /attendance {id}`; idempotente en el servidor
    async fn mark_attendance(&self, guest_id: GuestId) -> AppResult<AttendanceAck>;

    /// `POST /position {id, x, y}`; el llamador ignora el resultado salvo para registrarlo
    async fn update_position(&self, update: &PositionUpdate) -> AppResult<()>;
}

/// Implementación HTTP/JSON de [`GuestService`]
#[derive(Debug, Clone)]
pub struct HttpGuestService {
    client: Client,
    base_url: Url,
}

impl HttpGuestService {
    /// Crea el cliente a partir de la configuración
    ///
    /// Todas las rutas, incluidas `/tables` y `/position`, cuelgan de la misma URL base.
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .build()
            .map_err_internal("Error construyendo cliente HTTP")?;

        Self::with_client(client, &config.service_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> AppResult<Self> {
        // Sin barra final, `Url::join` descartaría el último segmento de la base
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err_config("SEATING_SERVICE_URL")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Internal(format!("Ruta inválida '{}': {}", path, e)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<Option<T>> {
        let trace_id = Uuid::new_v4().to_string();
        let response = self
            .client
            .get(self.endpoint(path)?)
            .query(query)
            .header(REQUEST_ID_HEADER, &trace_id)
            .send()
            .await
            .map_err(|e| AppError::transport(operation, &trace_id, e))?;

        Self::handle_response(operation, &trace_id, response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> AppResult<Option<T>> {
        let trace_id = Uuid::new_v4().to_string();
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .header(REQUEST_ID_HEADER, &trace_id)
            .send()
            .await
            .map_err(|e| AppError::transport(operation, &trace_id, e))?;

        Self::handle_response(operation, &trace_id, response).await
    }

    /// Interpreta la respuesta: 404 o `null` se traducen en `None`
    async fn handle_response<T: DeserializeOwned>(
        operation: &str,
        trace_id: &str,
        response: reqwest::Response,
    ) -> AppResult<Option<T>> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::transport(operation, trace_id, e))?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(operation = %operation, trace_id = %trace_id, "Resource not found");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(AppError::unexpected_status(operation, status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Option<T>>(&text).map_err(|e| AppError::decode(operation, e))
    }
}

#[async_trait]
impl GuestService for HttpGuestService {
    async fn tables(&self) -> AppResult<Vec<TableRecord>> {
        self.get("tables", "tables", &[])
            .await?
            .ok_or_else(|| AppError::NotFound("listado de mesas".to_string()))
    }

    async fn suggestions(&self, partial: &str) -> AppResult<Vec<Suggestion>> {
        Ok(self
            .get("suggestions", "suggestions", &[("name", partial)])
            .await?
            .unwrap_or_default())
    }

    async fn search(&self, name: &str) -> AppResult<Option<GuestRecord>> {
        self.get("search", "search", &[("name", name)]).await
    }

    async fn mark_attendance(&self, guest_id: GuestId) -> AppResult<AttendanceAck> {
        let request = AttendanceRequest { id: guest_id };

        self.post::<_, AttendanceAck>("attendance", "attendance", &request)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("invitado con ID '{}'", guest_id)))
    }

    async fn update_position(&self, update: &PositionUpdate) -> AppResult<()> {
        // El acuse de recibo no tiene un formato fijo; sólo importa el estado HTTP
        self.post::<_, serde_json::Value>("update_position", "position", update)
            .await
            .map(|_| ())
    }
}
