use serde_json::{json, Value};

use crate::error::TarefaError;
use crate::lifecycle::Transicao;
use crate::models::{Tarefa, Usuario};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TarefaError) -> Value {
    let mut detail = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if !err.erros.is_empty() {
        detail["erros"] = json!(err.erros);
    }
    json!({
        "success": false,
        "error": detail
    })
}

/// Task fields plus the derived lifecycle state.
pub fn tarefa_json(t: &Tarefa) -> Value {
    let mut v = json!(t);
    v["ciclo"] = json!(t.ciclo().as_str());
    v
}

pub fn transicao_json(t: &Transicao) -> Value {
    json!({
        "tarefa": tarefa_json(&t.tarefa),
        "alterada": t.alterada
    })
}

pub fn usuario_json(u: &Usuario) -> Value {
    json!({
        "id": u.id,
        "nome": u.nome,
        "email": u.email,
        "cpf": u.cpf,
        "role": u.role.as_str()
    })
}
