pub mod commands;
pub mod init;
pub mod serve;
pub mod tarefa;
pub mod usuario;

pub use commands::*;

use serde_json::Value;

use crate::error::TarefaError;
use crate::output;

/// Print the outcome of a command and turn it into an exit code.
pub fn finish(result: Result<i32, TarefaError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                print_json(&output::json::error(&e));
            } else {
                eprintln!("Erro: {}", e.message);
                for erro in &e.erros {
                    eprintln!("  - {erro}");
                }
            }
            1
        }
    }
}

pub fn print_json(value: &Value) {
    println!("{value:#}");
}
