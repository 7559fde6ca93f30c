use serde_json::{json, Map, Value};

use crate::cli::commands::TarefaCommands;
use crate::cli::{finish, print_json};
use crate::config::Config;
use crate::db::connection;
use crate::error::TarefaError;
use crate::lifecycle::{self, Transicao};
use crate::models::{
    AtualizacaoTarefa, CancelarPresenca, ConfirmarConclusao, ConfirmarPresenca, FiltroTarefas,
    NovaTarefa, Reativacao,
};
use crate::output;

pub fn run(cmd: TarefaCommands, config: &Config, json_output: bool) -> i32 {
    let result = match cmd {
        TarefaCommands::Criar { titulo, descricao, latitude, longitude, data, estado, criador } => {
            let mut body = Map::new();
            let fields = [
                ("titulo", titulo),
                ("descricao", descricao),
                ("latitude", latitude),
                ("longitude", longitude),
                ("data", data),
                ("estado", estado),
                ("criador_id", criador),
            ];
            for (key, value) in fields {
                if let Some(v) = value {
                    body.insert(key.to_string(), Value::String(v));
                }
            }
            run_create(&Value::Object(body), config, json_output)
        }
        TarefaCommands::Listar { estado, criador, operador } => {
            let filtro = FiltroTarefas { estado, criador_id: criador, operador_id: operador };
            run_list(&filtro, config, json_output)
        }
        TarefaCommands::Mostrar { id } => run_show(id, config, json_output),
        TarefaCommands::Abertas { estado } => run_open_pool(estado.as_deref(), config, json_output),
        TarefaCommands::Atualizar { id, titulo, descricao, data, estado, criador } => {
            let mut body = Map::new();
            for (key, value) in [("titulo", titulo), ("descricao", descricao), ("data", data), ("estado", estado)] {
                if let Some(v) = value {
                    body.insert(key.to_string(), Value::String(v));
                }
            }
            if let Some(criador) = criador {
                body.insert("criador_id".to_string(), json!(criador));
            }
            AtualizacaoTarefa::from_json(&Value::Object(body)).and_then(|req| {
                run_transition(config, json_output, |conn| lifecycle::update(conn, id, &req))
            })
        }
        TarefaCommands::Presenca { id, operador } => {
            ConfirmarPresenca::from_json(&json!({ "operador_id": operador })).and_then(|req| {
                run_transition(config, json_output, |conn| lifecycle::confirm_presence(conn, id, &req))
            })
        }
        TarefaCommands::Cancelar { id, operador, motivo } => {
            CancelarPresenca::from_json(&json!({ "operador_id": operador, "motivo": motivo }))
                .and_then(|req| {
                    run_transition(config, json_output, |conn| lifecycle::cancel_presence(conn, id, &req))
                })
        }
        TarefaCommands::Reativar { id, criador } => {
            let req = Reativacao { criador_id: criador };
            run_transition(config, json_output, |conn| lifecycle::reactivate(conn, id, &req))
        }
        TarefaCommands::Confirmar { id, criador } => {
            ConfirmarConclusao::from_json(&json!({ "criador_id": criador })).and_then(|req| {
                run_transition(config, json_output, |conn| lifecycle::confirm_completion(conn, id, &req))
            })
        }
        TarefaCommands::Concluidas => run_completed(config, json_output),
    };
    finish(result, json_output)
}

fn run_create(body: &Value, config: &Config, json_output: bool) -> Result<i32, TarefaError> {
    let nova = NovaTarefa::from_json(body)?;
    let conn = connection::open_db(&config.database)?;
    let id = lifecycle::create(&conn, &nova)?;

    if json_output {
        print_json(&output::json::success(json!({ "id": id })));
    } else {
        println!("Tarefa cadastrada com sucesso: #{id}");
    }
    Ok(0)
}

fn run_list(filtro: &FiltroTarefas, config: &Config, json_output: bool) -> Result<i32, TarefaError> {
    let conn = connection::open_db(&config.database)?;
    let tarefas = lifecycle::list(&conn, filtro)?;

    if json_output {
        print_json(&output::json::success(json!({ "tarefas": tarefas })));
    } else {
        output::text::print_tarefa_list(&tarefas);
    }
    Ok(0)
}

fn run_show(id: i64, config: &Config, json_output: bool) -> Result<i32, TarefaError> {
    let conn = connection::open_db(&config.database)?;
    let tarefa = lifecycle::get(&conn, id)?;

    if json_output {
        print_json(&output::json::success(json!({
            "tarefa": output::json::tarefa_json(&tarefa)
        })));
    } else {
        output::text::print_tarefa(&tarefa);
    }
    Ok(0)
}

fn run_open_pool(estado: Option<&str>, config: &Config, json_output: bool) -> Result<i32, TarefaError> {
    let conn = connection::open_db(&config.database)?;
    let tarefas = lifecycle::open_pool(&conn, estado)?;

    if json_output {
        print_json(&output::json::success(json!({ "tarefas": tarefas })));
    } else {
        output::text::print_tarefa_list(&tarefas);
    }
    Ok(0)
}

fn run_completed(config: &Config, json_output: bool) -> Result<i32, TarefaError> {
    let conn = connection::open_db(&config.database)?;
    let tarefas = lifecycle::list_completed(&conn)?;

    if json_output {
        print_json(&output::json::success(json!({ "tarefas": tarefas })));
    } else {
        output::text::print_concluidas(&tarefas);
    }
    Ok(0)
}

fn run_transition(
    config: &Config,
    json_output: bool,
    transition: impl FnOnce(&rusqlite::Connection) -> Result<Transicao, TarefaError>,
) -> Result<i32, TarefaError> {
    let conn = connection::open_db(&config.database)?;
    let result = transition(&conn)?;

    if json_output {
        print_json(&output::json::success(output::json::transicao_json(&result)));
    } else {
        let t = &result.tarefa;
        if result.alterada {
            println!("Tarefa #{} → {}", t.id, t.ciclo().as_str());
        } else {
            println!("Tarefa #{} sem alterações ({})", t.id, t.ciclo().as_str());
        }
    }
    Ok(0)
}
