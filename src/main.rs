use clap::Parser;
use std::process;

use tarefas::cli::commands::{Cli, Commands};
use tarefas::cli::{self, finish};
use tarefas::config::Config;
use tarefas::telemetry;

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let bind_flag = match &cli_args.command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    };
    let config = match Config::load(
        cli_args.config.as_deref(),
        cli_args.db.clone(),
        bind_flag,
        cli_args.log_json,
    ) {
        Ok(config) => config,
        Err(e) => process::exit(finish(Err(e), json_output)),
    };

    let default_level = match cli_args.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    if let Err(err) = telemetry::init_tracing(default_level, config.log_json) {
        eprintln!("Erro: {err:#}");
        process::exit(1);
    }

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&config, json_output),
        Commands::Serve { .. } => cli::serve::run(&config),
        Commands::Tarefa(cmd) => cli::tarefa::run(cmd, &config, json_output),
        Commands::Usuario(cmd) => cli::usuario::run(cmd, &config, json_output),
    };

    process::exit(exit_code);
}
