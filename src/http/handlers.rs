use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::TarefaError;
use crate::lifecycle;
use crate::models::{
    AtualizacaoTarefa, CancelarPresenca, ConfirmarConclusao, ConfirmarPresenca, FiltroTarefas,
    NovaTarefa, Reativacao,
};

use super::AppState;

type ApiResult = Result<(StatusCode, Json<Value>), TarefaError>;

pub async fn create_task(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let nova = NovaTarefa::from_json(&parse_body(&body)?)?;
    let id = state.with_conn(move |conn| lifecycle::create(conn, &nova)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "mensagem": "Tarefa cadastrada com sucesso", "id": id })),
    ))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let filtro = FiltroTarefas::from_query(&query);
    let tarefas = state.with_conn(move |conn| lifecycle::list(conn, &filtro)).await?;
    Ok((StatusCode::OK, Json(json!(tarefas))))
}

pub async fn open_pool(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let estado = query
        .get("estado")
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    let tarefas = state
        .with_conn(move |conn| lifecycle::open_pool(conn, estado.as_deref()))
        .await?;
    Ok((StatusCode::OK, Json(json!(tarefas))))
}

pub async fn list_completed(State(state): State<AppState>) -> ApiResult {
    let tarefas = state.with_conn(lifecycle::list_completed).await?;
    Ok((StatusCode::OK, Json(json!(tarefas))))
}

pub async fn show_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let id = task_id(&id)?;
    let tarefa = state.with_conn(move |conn| lifecycle::get(conn, id)).await?;
    Ok((StatusCode::OK, Json(json!(tarefa))))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let id = task_id(&id)?;
    let body = parse_body(&body)?;
    // A missing task answers 404 before any field is judged.
    state.with_conn(move |conn| lifecycle::get(conn, id)).await?;
    let req = AtualizacaoTarefa::from_json(&body)?;
    let t = state.with_conn(move |conn| lifecycle::update(conn, id, &req)).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "mensagem": "Tarefa atualizada com sucesso!", "tarefa": t.tarefa })),
    ))
}

pub async fn confirm_presence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let id = task_id(&id)?;
    let req = ConfirmarPresenca::from_json(&parse_body(&body)?)?;
    let t = state.with_conn(move |conn| lifecycle::confirm_presence(conn, id, &req)).await?;
    let mensagem = if t.alterada {
        "Presença confirmada com sucesso!"
    } else {
        "Presença já confirmada."
    };
    Ok((
        StatusCode::OK,
        Json(json!({ "mensagem": mensagem, "tarefaAtualizada": t.tarefa })),
    ))
}

pub async fn cancel_presence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let id = task_id(&id)?;
    let req = CancelarPresenca::from_json(&parse_body(&body)?)?;
    let t = state.with_conn(move |conn| lifecycle::cancel_presence(conn, id, &req)).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "mensagem": "Presença cancelada com sucesso.", "dados": t.tarefa })),
    ))
}

pub async fn reactivate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let id = task_id(&id)?;
    let req = Reativacao::from_json(&parse_body(&body)?)?;
    let t = state.with_conn(move |conn| lifecycle::reactivate(conn, id, &req)).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "mensagem": "Tarefa reativada com sucesso.", "tarefa": t.tarefa })),
    ))
}

pub async fn confirm_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let id = task_id(&id)?;
    let req = ConfirmarConclusao::from_json(&parse_body(&body)?)?;
    let t = state.with_conn(move |conn| lifecycle::confirm_completion(conn, id, &req)).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "mensagem": "Tarefa confirmada como concluída.", "tarefa": t.tarefa })),
    ))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Rota não encontrada" })),
    )
}

/// An empty body reads as `null`; malformed JSON is a validation error.
fn parse_body(body: &Bytes) -> Result<Value, TarefaError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| TarefaError::validation(format!("JSON inválido: {e}")))
}

/// Ids that cannot name a row are reported as a missing task.
fn task_id(raw: &str) -> Result<i64, TarefaError> {
    raw.parse::<i64>().map_err(|_| TarefaError::task_not_found())
}
