use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::TarefaError;

/// Errors answer with `{mensagem, erros?}`; the panels show `mensagem` as is.
impl IntoResponse for TarefaError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = self.code.as_str(), erro = %self.message, "falha interna");
        }
        let mut body = json!({ "mensagem": self.message });
        if !self.erros.is_empty() {
            body["erros"] = json!(self.erros);
        }
        (status, Json(body)).into_response()
    }
}
