//! Typed request schemas, one per lifecycle operation.
//!
//! Payloads arrive as loose JSON (form fields are often strings), so each
//! schema is built from a `serde_json::Value` and reports every violated
//! field at once instead of stopping at the first.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::TarefaError;
use crate::models::FiltroTarefas;

/// Fields a creator may still edit through the generic update.
pub const EDITABLE_FIELDS: [&str; 4] = ["titulo", "descricao", "data", "estado"];

#[derive(Debug, Clone, PartialEq)]
pub struct NovaTarefa {
    pub titulo: String,
    pub descricao: String,
    pub latitude: f64,
    pub longitude: f64,
    pub data: String,
    pub estado: String,
    pub criador_id: i64,
}

impl NovaTarefa {
    pub fn from_json(body: &Value) -> Result<Self, TarefaError> {
        let obj = as_object(body)?;
        let mut erros = Vec::new();

        let titulo = text(obj, "titulo");
        if titulo.is_none() {
            erros.push("Título é obrigatório".to_string());
        }
        let descricao = text(obj, "descricao");
        if descricao.is_none() {
            erros.push("Descrição é obrigatória".to_string());
        }
        let latitude = number(obj.get("latitude"));
        if latitude.is_none() {
            erros.push("Latitude inválida".to_string());
        }
        let longitude = number(obj.get("longitude"));
        if longitude.is_none() {
            erros.push("Longitude inválida".to_string());
        }
        let data = text(obj, "data");
        if data.is_none() {
            erros.push("Data é obrigatória".to_string());
        }
        let estado = text(obj, "estado");
        if estado.is_none() {
            erros.push("Estado é obrigatório".to_string());
        }
        let criador_id = id(obj.get("criador_id"));
        if criador_id.is_none() {
            erros.push("ID do criador é obrigatório".to_string());
        }

        match (titulo, descricao, latitude, longitude, data, estado, criador_id) {
            (Some(titulo), Some(descricao), Some(latitude), Some(longitude), Some(data), Some(estado), Some(criador_id))
                if erros.is_empty() =>
            {
                Ok(Self { titulo, descricao, latitude, longitude, data, estado, criador_id })
            }
            _ => Err(TarefaError::invalid_fields(erros)),
        }
    }
}

/// Generic edit. Only [`EDITABLE_FIELDS`] are accepted; lifecycle flags go
/// through the named transitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtualizacaoTarefa {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub data: Option<String>,
    pub estado: Option<String>,
    /// Acting creator, checked against the task owner when present.
    pub criador_id: Option<i64>,
}

impl AtualizacaoTarefa {
    pub fn from_json(body: &Value) -> Result<Self, TarefaError> {
        let obj = as_object(body)?;
        let mut erros = Vec::new();
        let mut update = Self::default();

        for (key, value) in obj {
            match key.as_str() {
                field if EDITABLE_FIELDS.contains(&field) => {
                    let Some(s) = non_blank(value) else {
                        erros.push(format!("Campo vazio ou inválido: {key}"));
                        continue;
                    };
                    match key.as_str() {
                        "titulo" => update.titulo = Some(s),
                        "descricao" => update.descricao = Some(s),
                        "data" => update.data = Some(s),
                        _ => update.estado = Some(s),
                    }
                }
                "criador_id" => match id(Some(value)) {
                    Some(v) => update.criador_id = Some(v),
                    None => erros.push("ID do criador inválido".to_string()),
                },
                other => erros.push(format!("Campo não pode ser alterado: {other}")),
            }
        }

        if erros.is_empty() {
            Ok(update)
        } else {
            Err(TarefaError::invalid_fields(erros))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmarPresenca {
    pub operador_id: i64,
}

impl ConfirmarPresenca {
    pub fn from_json(body: &Value) -> Result<Self, TarefaError> {
        let obj = as_object(body)?;
        match id(obj.get("operador_id")) {
            Some(operador_id) => Ok(Self { operador_id }),
            None => Err(field_errors(vec!["ID do operador é obrigatório.".into()])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelarPresenca {
    pub operador_id: i64,
    /// Already trimmed.
    pub motivo: String,
}

impl CancelarPresenca {
    pub fn from_json(body: &Value) -> Result<Self, TarefaError> {
        let obj = as_object(body)?;
        let mut erros = Vec::new();
        let operador_id = id(obj.get("operador_id"));
        if operador_id.is_none() {
            erros.push("ID do operador é obrigatório.".to_string());
        }
        let motivo = obj.get("motivo").and_then(non_blank).map(|m| m.trim().to_string());
        if motivo.is_none() {
            erros.push("Motivo do cancelamento é obrigatório.".to_string());
        }
        match (operador_id, motivo) {
            (Some(operador_id), Some(motivo)) => Ok(Self { operador_id, motivo }),
            _ => Err(field_errors(erros)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reativacao {
    pub criador_id: Option<i64>,
}

impl Reativacao {
    /// The body is optional here; `null` means no acting creator was given.
    pub fn from_json(body: &Value) -> Result<Self, TarefaError> {
        if body.is_null() {
            return Ok(Self::default());
        }
        let obj = as_object(body)?;
        match obj.get("criador_id") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(v) => match id(Some(v)) {
                Some(criador_id) => Ok(Self { criador_id: Some(criador_id) }),
                None => Err(field_errors(vec!["ID do criador inválido".into()])),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmarConclusao {
    pub criador_id: i64,
}

impl ConfirmarConclusao {
    pub fn from_json(body: &Value) -> Result<Self, TarefaError> {
        let obj = as_object(body)?;
        match id(obj.get("criador_id")) {
            Some(criador_id) => Ok(Self { criador_id }),
            None => Err(field_errors(vec!["ID do criador é obrigatório".into()])),
        }
    }
}

impl FiltroTarefas {
    /// Blank or unparsable query values are ignored, as the panels send
    /// whatever the filter inputs hold.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            estado: query_value(query, "estado").map(str::to_string),
            criador_id: query_id(query, "criador_id"),
            operador_id: query_id(query, "operador_id"),
        }
    }
}

fn query_value<'q>(query: &'q HashMap<String, String>, key: &str) -> Option<&'q str> {
    query.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn query_id(query: &HashMap<String, String>, key: &str) -> Option<i64> {
    query_value(query, key)?.parse::<i64>().ok()
}

fn field_errors(erros: Vec<String>) -> TarefaError {
    let mut err = TarefaError::validation(erros.join(" "));
    err.erros = erros;
    err
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, TarefaError> {
    body.as_object()
        .ok_or_else(|| TarefaError::validation("Corpo da requisição deve ser um objeto JSON"))
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(non_blank)
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Finite number, from a JSON number or a numeric string.
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite())
}

/// Positive integer identifier, from a JSON number or a numeric string.
fn id(value: Option<&Value>) -> Option<i64> {
    let n = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    n.filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "titulo": "Entrega",
            "descricao": "Levar caixas",
            "latitude": "-23.55",
            "longitude": -46.63,
            "data": "2026-10-20",
            "estado": "SP",
            "criador_id": "1"
        })
    }

    #[test]
    fn accepts_numeric_strings() {
        let t = NovaTarefa::from_json(&valid_body()).unwrap();
        assert_eq!(t.latitude, -23.55);
        assert_eq!(t.criador_id, 1);
    }

    #[test]
    fn accumulates_every_violation() {
        let err = NovaTarefa::from_json(&json!({ "latitude": "abc", "criador_id": 0 })).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Dados inválidos");
        assert_eq!(err.erros.len(), 7);
        assert!(err.erros.contains(&"Latitude inválida".to_string()));
        assert!(err.erros.contains(&"ID do criador é obrigatório".to_string()));
    }

    #[test]
    fn update_rejects_lifecycle_fields() {
        let err = AtualizacaoTarefa::from_json(&json!({ "titulo": "Novo", "confirmado": 1, "operador_id": 3 }))
            .unwrap_err();
        assert!(err.erros.contains(&"Campo não pode ser alterado: confirmado".to_string()));
        assert!(err.erros.contains(&"Campo não pode ser alterado: operador_id".to_string()));

        let ok = AtualizacaoTarefa::from_json(&json!({ "titulo": "Novo", "criador_id": 2 })).unwrap();
        assert_eq!(ok.titulo.as_deref(), Some("Novo"));
        assert_eq!(ok.criador_id, Some(2));
        assert_eq!(ok.descricao, None);
    }

    #[test]
    fn cancel_requires_trimmed_reason() {
        let err = CancelarPresenca::from_json(&json!({ "operador_id": 9, "motivo": "   " })).unwrap_err();
        assert_eq!(err.message, "Motivo do cancelamento é obrigatório.");

        let ok = CancelarPresenca::from_json(&json!({ "operador_id": "9", "motivo": "  Imprevisto " })).unwrap();
        assert_eq!(ok.motivo, "Imprevisto");
        assert_eq!(ok.operador_id, 9);
    }

    #[test]
    fn reactivation_body_is_optional() {
        assert_eq!(Reativacao::from_json(&Value::Null).unwrap(), Reativacao::default());
        assert_eq!(
            Reativacao::from_json(&json!({ "criador_id": 4 })).unwrap().criador_id,
            Some(4)
        );
        assert!(Reativacao::from_json(&json!({ "criador_id": "x" })).is_err());
    }

    #[test]
    fn query_filters_skip_blanks() {
        let mut q = HashMap::new();
        q.insert("estado".to_string(), "".to_string());
        q.insert("operador_id".to_string(), "9".to_string());
        let f = FiltroTarefas::from_query(&q);
        assert_eq!(f.estado, None);
        assert_eq!(f.operador_id, Some(9));

        q.insert("criador_id".to_string(), "abc".to_string());
        q.insert("operador_id".to_string(), " x ".to_string());
        assert_eq!(FiltroTarefas::from_query(&q), FiltroTarefas::default());
    }
}
