//! REST surface over the lifecycle engine.

pub mod error;
pub mod handlers;

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::routing::{get, post, put};
use axum::Router;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::connection;
use crate::error::TarefaError;

/// Shared handler state. One connection behind a mutex: the store sees a
/// single writer at a time.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool, so a busy
    /// database never stalls the async workers.
    pub async fn with_conn<T, F>(&self, f: F) -> Result<T, TarefaError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, TarefaError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| TarefaError::database("conexão com o banco indisponível"))?;
            f(&conn)
        })
        .await
        .map_err(|e| TarefaError::database(format!("tarefa de banco interrompida: {e}")))?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tarefas", post(handlers::create_task).get(handlers::list_tasks))
        .route("/tarefas/concluidas", get(handlers::list_completed))
        .route("/tarefas/abertas", get(handlers::open_pool))
        .route("/tarefas/:id", get(handlers::show_task).put(handlers::update_task))
        .route("/tarefas/:id/concluir", put(handlers::confirm_presence))
        .route("/tarefas/:id/cancelar", put(handlers::cancel_presence))
        .route("/tarefas/:id/reativar", put(handlers::reactivate))
        .route("/tarefas/:id/confirmar", put(handlers::confirm_completion))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Migrate the database, then serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let path = connection::init_db(&config.database)
        .with_context(|| format!("initialize database at {}", config.database.display()))?;
    let conn = connection::open_db(&path).context("open database")?;

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;
    info!(bind = %config.bind, database = %path.display(), "servidor iniciado");

    axum::serve(listener, router(AppState::new(conn)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    info!("servidor encerrado");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
}
