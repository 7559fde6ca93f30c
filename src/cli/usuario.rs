use serde_json::json;

use crate::cli::commands::UsuarioCommands;
use crate::cli::{finish, print_json};
use crate::config::Config;
use crate::db::{connection, user_repo};
use crate::error::TarefaError;
use crate::output;

pub fn run(cmd: UsuarioCommands, config: &Config, json_output: bool) -> i32 {
    let result = match cmd {
        UsuarioCommands::Add { nome, email, cpf, role } => {
            run_add(&nome, email.as_deref(), cpf.as_deref(), role.into(), config, json_output)
        }
        UsuarioCommands::List => run_list(config, json_output),
    };
    finish(result, json_output)
}

fn run_add(
    nome: &str,
    email: Option<&str>,
    cpf: Option<&str>,
    role: crate::models::Papel,
    config: &Config,
    json_output: bool,
) -> Result<i32, TarefaError> {
    if nome.trim().is_empty() {
        return Err(TarefaError::validation("Nome é obrigatório"));
    }
    let conn = connection::open_db(&config.database)?;
    let usuario = user_repo::create_user(&conn, nome, email, cpf, role)?;

    if json_output {
        print_json(&output::json::success(output::json::usuario_json(&usuario)));
    } else {
        println!("Usuário cadastrado: {} (#{})", usuario.nome, usuario.id);
    }
    Ok(0)
}

fn run_list(config: &Config, json_output: bool) -> Result<i32, TarefaError> {
    let conn = connection::open_db(&config.database)?;
    let usuarios = user_repo::list_users(&conn)?;

    if json_output {
        let items: Vec<_> = usuarios.iter().map(output::json::usuario_json).collect();
        print_json(&output::json::success(json!({ "usuarios": items })));
    } else {
        output::text::print_usuario_list(&usuarios);
    }
    Ok(0)
}
