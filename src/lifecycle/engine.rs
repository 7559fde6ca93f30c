use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::task_repo;
use crate::error::TarefaError;
use crate::lifecycle::invariants;
use crate::models::{
    AtualizacaoTarefa, CancelarPresenca, ConfirmarConclusao, ConfirmarPresenca, FiltroTarefas,
    NovaTarefa, Reativacao, Tarefa, TarefaConcluida, TarefaListada,
};

/// Result of a transition: the task as persisted, and whether anything was
/// written (repeated confirmations are no-ops).
#[derive(Debug, Clone)]
pub struct Transicao {
    pub tarefa: Tarefa,
    pub alterada: bool,
}

pub fn create(conn: &Connection, nova: &NovaTarefa) -> Result<i64, TarefaError> {
    let id = task_repo::insert_task(conn, nova)?;
    info!(tarefa_id = id, criador_id = nova.criador_id, estado = %nova.estado, "tarefa cadastrada");
    Ok(id)
}

pub fn get(conn: &Connection, id: i64) -> Result<Tarefa, TarefaError> {
    task_repo::get_task(conn, id)
}

pub fn list(conn: &Connection, filtro: &FiltroTarefas) -> Result<Vec<TarefaListada>, TarefaError> {
    task_repo::list_tasks(conn, filtro)
}

pub fn open_pool(conn: &Connection, estado: Option<&str>) -> Result<Vec<TarefaListada>, TarefaError> {
    task_repo::open_pool(conn, estado)
}

pub fn list_completed(conn: &Connection) -> Result<Vec<TarefaConcluida>, TarefaError> {
    task_repo::list_completed(conn)
}

/// Edit the free-text fields of a task that is not yet completed.
pub fn update(conn: &Connection, id: i64, req: &AtualizacaoTarefa) -> Result<Transicao, TarefaError> {
    in_transaction(conn, |conn| {
        let atual = task_repo::get_task(conn, id)?;
        if let Some(criador_id) = req.criador_id {
            if criador_id != atual.criador_id {
                warn!(tarefa_id = id, criador_id, "edição recusada: não é o criador");
                return Err(TarefaError::permission(
                    "Somente a empresa criadora pode editar esta tarefa.",
                ));
            }
        }
        if atual.ciclo().is_terminal() {
            warn!(tarefa_id = id, "edição recusada: tarefa concluída");
            return Err(TarefaError::conflict(
                "Tarefa já concluída não pode ser editada.",
            ));
        }

        let mut nova = atual.clone();
        if let Some(ref titulo) = req.titulo {
            nova.titulo = titulo.clone();
        }
        if let Some(ref descricao) = req.descricao {
            nova.descricao = descricao.clone();
        }
        if let Some(ref data) = req.data {
            nova.data = data.clone();
        }
        if let Some(ref estado) = req.estado {
            nova.estado = estado.clone();
        }
        commit(conn, atual, nova, "tarefa atualizada")
    })
}

/// An operator claims a task and declares presence.
pub fn confirm_presence(
    conn: &Connection,
    id: i64,
    req: &ConfirmarPresenca,
) -> Result<Transicao, TarefaError> {
    in_transaction(conn, |conn| {
        let atual = task_repo::get_task(conn, id)?;
        if let Some(outro) = atual.operador_id.filter(|op| *op != req.operador_id) {
            warn!(tarefa_id = id, operador_id = req.operador_id, atual = outro, "tarefa já reivindicada");
            return Err(TarefaError::already_claimed());
        }
        if atual.operador_id == Some(req.operador_id) && atual.operador_presente {
            return Ok(Transicao { tarefa: atual, alterada: false });
        }
        if atual.ciclo().is_terminal() {
            warn!(tarefa_id = id, operador_id = req.operador_id, "presença recusada: tarefa concluída");
            return Err(TarefaError::conflict("Tarefa já concluída."));
        }
        if !atual.ativa {
            warn!(tarefa_id = id, operador_id = req.operador_id, "presença recusada: tarefa inativa");
            return Err(TarefaError::conflict(
                "Tarefa inativa. Ela precisa ser reativada antes de receber presença.",
            ));
        }

        let mut nova = atual.clone();
        nova.operador_id = Some(req.operador_id);
        nova.operador_presente = true;
        nova.justificativa_cancelamento = None;
        commit(conn, atual, nova, "presença confirmada")
    })
}

/// The claiming operator withdraws; the task leaves the open pool until
/// the company reactivates it.
pub fn cancel_presence(
    conn: &Connection,
    id: i64,
    req: &CancelarPresenca,
) -> Result<Transicao, TarefaError> {
    in_transaction(conn, |conn| {
        let atual = task_repo::get_task(conn, id)?;
        if atual.operador_id != Some(req.operador_id) {
            warn!(tarefa_id = id, operador_id = req.operador_id, "cancelamento recusado: operador diferente");
            return Err(TarefaError::permission(
                "Você não pode cancelar presença de uma tarefa que não confirmou.",
            ));
        }
        if atual.ciclo().is_terminal() {
            warn!(tarefa_id = id, operador_id = req.operador_id, "cancelamento recusado: tarefa concluída");
            return Err(TarefaError::conflict(
                "Esta tarefa já foi concluída e não pode ser cancelada.",
            ));
        }

        let mut nova = atual.clone();
        nova.operador_presente = false;
        nova.operador_id = None;
        nova.ativa = false;
        nova.justificativa_cancelamento = Some(req.motivo.trim().to_string());
        commit(conn, atual, nova, "presença cancelada")
    })
}

/// Put a withdrawn task back in the open pool.
pub fn reactivate(conn: &Connection, id: i64, req: &Reativacao) -> Result<Transicao, TarefaError> {
    in_transaction(conn, |conn| {
        let atual = task_repo::get_task(conn, id)?;
        if let Some(criador_id) = req.criador_id {
            if criador_id != atual.criador_id {
                warn!(tarefa_id = id, criador_id, "reativação recusada: não é o criador");
                return Err(TarefaError::permission(
                    "Somente a empresa criadora pode reativar esta tarefa.",
                ));
            }
        }
        if atual.ciclo().is_terminal() {
            warn!(tarefa_id = id, "reativação recusada: tarefa concluída");
            return Err(TarefaError::conflict(
                "Tarefa já concluída não pode ser reativada.",
            ));
        }

        let mut nova = atual.clone();
        nova.ativa = true;
        nova.operador_presente = false;
        nova.justificativa_cancelamento = None;
        nova.operador_id = None;
        commit(conn, atual, nova, "tarefa reativada")
    })
}

/// The creator confirms the claiming operator actually did the work. Terminal.
pub fn confirm_completion(
    conn: &Connection,
    id: i64,
    req: &ConfirmarConclusao,
) -> Result<Transicao, TarefaError> {
    in_transaction(conn, |conn| {
        let atual = task_repo::get_task(conn, id)?;
        if atual.criador_id != req.criador_id {
            warn!(tarefa_id = id, criador_id = req.criador_id, "conclusão recusada: não é o criador");
            return Err(TarefaError::permission(
                "Somente a empresa criadora pode confirmar a conclusão.",
            ));
        }
        if atual.ciclo().is_terminal() {
            return Ok(Transicao { tarefa: atual, alterada: false });
        }
        if atual.operador_id.is_none() || !atual.operador_presente {
            warn!(tarefa_id = id, "conclusão recusada: sem operador presente");
            return Err(TarefaError::conflict(
                "A tarefa não possui operador com presença confirmada.",
            ));
        }

        let mut nova = atual.clone();
        nova.confirmado = true;
        commit(conn, atual, nova, "conclusão confirmada")
    })
}

/// Persist `nova` if it differs from `atual`, after re-checking invariants.
fn commit(
    conn: &Connection,
    atual: Tarefa,
    nova: Tarefa,
    evento: &'static str,
) -> Result<Transicao, TarefaError> {
    if nova == atual {
        return Ok(Transicao { tarefa: atual, alterada: false });
    }
    invariants::ensure(&nova)?;
    task_repo::write_task(conn, &nova)?;
    let tarefa = task_repo::get_task(conn, nova.id)?;
    info!(
        tarefa_id = tarefa.id,
        ciclo = tarefa.ciclo().as_str(),
        operador_id = ?tarefa.operador_id,
        versao = tarefa.versao,
        "{evento}"
    );
    Ok(Transicao { tarefa, alterada: true })
}

/// Run `f` under SQLite's write lock so the read-check-write of a
/// transition cannot interleave with another writer.
fn in_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T, TarefaError>,
) -> Result<T, TarefaError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
