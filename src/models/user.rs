use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    Empresa,
    Operador,
    Admin,
}

impl Papel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empresa => "empresa",
            Self::Operador => "operador",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "empresa" => Some(Self::Empresa),
            "operador" => Some(Self::Operador),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Actor record. Owned by the authentication side; tasks only look it up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub role: Papel,
}
