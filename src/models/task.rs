use serde::{Deserialize, Serialize};

/// Lifecycle position of a task, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoCiclo {
    Aberta,
    Reivindicada,
    Cancelada,
    Concluida,
}

impl EstadoCiclo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aberta => "aberta",
            Self::Reivindicada => "reivindicada",
            Self::Cancelada => "cancelada",
            Self::Concluida => "concluida",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Concluida)
    }
}

/// A row of the `tarefas` table. Flags serialize as 0/1, which is what the
/// panels compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tarefa {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    pub latitude: f64,
    pub longitude: f64,
    pub data: String,
    pub estado: String,
    pub criador_id: i64,
    pub operador_id: Option<i64>,
    #[serde(with = "flag")]
    pub operador_presente: bool,
    #[serde(with = "flag")]
    pub confirmado: bool,
    pub justificativa_cancelamento: Option<String>,
    #[serde(with = "flag")]
    pub ativa: bool,
    pub versao: i64,
    pub atualizado_em: String,
}

impl Tarefa {
    pub fn ciclo(&self) -> EstadoCiclo {
        if self.confirmado {
            EstadoCiclo::Concluida
        } else if self.operador_id.is_some() && self.operador_presente {
            EstadoCiclo::Reivindicada
        } else if !self.ativa {
            EstadoCiclo::Cancelada
        } else {
            EstadoCiclo::Aberta
        }
    }

    /// Eligible for claiming.
    pub fn in_open_pool(&self) -> bool {
        self.ativa && !self.confirmado && !self.operador_presente
    }
}

/// Listing row: the task plus the claiming operator's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarefaListada {
    #[serde(flatten)]
    pub tarefa: Tarefa,
    pub operador_nome: Option<String>,
    pub operador_cpf: Option<String>,
}

/// Completed task enriched with creator and operator identity, for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarefaConcluida {
    #[serde(flatten)]
    pub tarefa: Tarefa,
    pub criador_email: Option<String>,
    pub criador_cpf: Option<String>,
    pub operador_nome: Option<String>,
    pub operador_cpf: Option<String>,
}

/// Filters for `List`. `operador_id` matches unclaimed tasks or tasks held
/// by that operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltroTarefas {
    pub estado: Option<String>,
    pub criador_id: Option<i64>,
    pub operador_id: Option<i64>,
}

mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Int(i) => i != 0,
        })
    }
}
