use anyhow::Context;

use crate::config::Config;
use crate::http;

pub fn run(config: &Config) -> i32 {
    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")
        .and_then(|runtime| runtime.block_on(http::serve(config)));

    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "servidor falhou");
            eprintln!("Erro: {err:#}");
            1
        }
    }
}
