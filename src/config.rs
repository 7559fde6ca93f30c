use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TarefaError;

pub const DEFAULT_DATABASE: &str = "tarefas.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Runtime settings. Precedence: CLI flag / environment, then the JSON
/// config file, then defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: PathBuf,
    pub bind: String,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            bind: DEFAULT_BIND.to_string(),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, TarefaError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TarefaError::validation(format!("Não foi possível ler {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            TarefaError::validation(format!("Configuração inválida em {}: {e}", path.display()))
        })
    }

    pub fn load(
        file: Option<&Path>,
        database: Option<PathBuf>,
        bind: Option<String>,
        log_json: bool,
    ) -> Result<Self, TarefaError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(database) = database {
            config.database = database;
        }
        if let Some(bind) = bind {
            config.bind = bind;
        }
        config.log_json |= log_json;
        Ok(config)
    }
}
