use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::Papel;

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "tarefas",
    version = VERSION,
    about = "Marketplace de tarefas de campo: empresas publicam, operadores reivindicam",
    after_help = "\
NOTE:
  Database defaults to ./tarefas.db (override with --db or TAREFAS_DB).
  Run `tarefas init` before any other command; `serve` migrates on start.

EXIT CODES:
  0  Success
  1  Error (validation, not found, permission, conflict, database)

LIFECYCLE:
  aberta --presenca--> reivindicada --cancelar--> cancelada --reativar--> aberta
  reivindicada --confirmar--> concluida (terminal, no further edits)
  A cancelled task leaves the open pool until its creator reactivates it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// SQLite database path
    #[arg(long, global = true, env = "TAREFAS_DB")]
    pub db: Option<PathBuf>,

    /// JSON config file (database, bind, log_json)
    #[arg(long, global = true, env = "TAREFAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and run migrations
    Init,

    /// Serve the REST API
    Serve {
        /// Listen address, e.g. 0.0.0.0:3000
        #[arg(long, env = "TAREFAS_BIND")]
        bind: Option<String>,
    },

    /// Task operations
    #[command(subcommand)]
    Tarefa(TarefaCommands),

    /// Actor records (seed data for joins)
    #[command(subcommand)]
    Usuario(UsuarioCommands),
}

#[derive(Subcommand)]
pub enum TarefaCommands {
    /// Publish a new task (company)
    #[command(after_help = "\
NOTE:
  Every field is required; all violations are reported together.")]
    Criar {
        #[arg(long)]
        titulo: Option<String>,
        #[arg(long)]
        descricao: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<String>,
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        estado: Option<String>,
        /// Creator (company) id
        #[arg(long)]
        criador: Option<String>,
    },
    /// List tasks
    Listar {
        #[arg(long)]
        estado: Option<String>,
        #[arg(long)]
        criador: Option<i64>,
        /// Unclaimed tasks plus those held by this operator
        #[arg(long)]
        operador: Option<i64>,
    },
    /// Show one task
    Mostrar { id: i64 },
    /// Tasks open for claiming
    Abertas {
        #[arg(long)]
        estado: Option<String>,
    },
    /// Edit title, description, date or location tag
    Atualizar {
        id: i64,
        #[arg(long)]
        titulo: Option<String>,
        #[arg(long)]
        descricao: Option<String>,
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        estado: Option<String>,
        /// Acting creator id, checked against the owner
        #[arg(long)]
        criador: Option<i64>,
    },
    /// Claim a task and confirm presence (operator)
    Presenca {
        id: i64,
        #[arg(long)]
        operador: i64,
    },
    /// Cancel own presence (operator)
    Cancelar {
        id: i64,
        #[arg(long)]
        operador: i64,
        #[arg(long)]
        motivo: String,
    },
    /// Return a cancelled task to the open pool (company)
    Reativar {
        id: i64,
        #[arg(long)]
        criador: Option<i64>,
    },
    /// Confirm the claiming operator completed the work (company)
    Confirmar {
        id: i64,
        #[arg(long)]
        criador: i64,
    },
    /// Completed tasks with creator and operator identity
    Concluidas,
}

#[derive(Subcommand)]
pub enum UsuarioCommands {
    /// Register an actor
    Add {
        nome: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        cpf: Option<String>,
        #[arg(long, value_enum, default_value = "operador")]
        role: PapelArg,
    },
    /// List actors
    List,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PapelArg {
    Empresa,
    Operador,
    Admin,
}

impl From<PapelArg> for Papel {
    fn from(p: PapelArg) -> Self {
        match p {
            PapelArg::Empresa => Papel::Empresa,
            PapelArg::Operador => Papel::Operador,
            PapelArg::Admin => Papel::Admin,
        }
    }
}
