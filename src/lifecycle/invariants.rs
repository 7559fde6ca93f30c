use crate::error::TarefaError;
use crate::models::Tarefa;

/// Every rule a persisted task must satisfy, as human-readable violations.
pub fn violations(task: &Tarefa) -> Vec<&'static str> {
    let mut found = Vec::new();
    if task.operador_id.is_none() && (task.operador_presente || task.confirmado) {
        found.push("sem operador, operador_presente e confirmado devem ser 0");
    }
    if task.confirmado && !(task.operador_presente && task.operador_id.is_some()) {
        found.push("confirmado exige operador presente");
    }
    if task.justificativa_cancelamento.is_some() && task.ativa {
        found.push("justificativa de cancelamento exige tarefa inativa");
    }
    found
}

/// Refuse to persist a row the transitions should never have produced.
pub fn ensure(task: &Tarefa) -> Result<(), TarefaError> {
    let found = violations(task);
    if found.is_empty() {
        return Ok(());
    }
    tracing::error!(tarefa_id = task.id, violacoes = ?found, "transição produziria estado inválido");
    Err(TarefaError::database(format!(
        "Estado inválido para a tarefa {}: {}",
        task.id,
        found.join("; ")
    )))
}
