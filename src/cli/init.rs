use serde_json::json;

use crate::cli::{finish, print_json};
use crate::config::Config;
use crate::db::connection;
use crate::output;

pub fn run(config: &Config, json_output: bool) -> i32 {
    let result = connection::init_db(&config.database).map(|path| {
        if json_output {
            print_json(&output::json::success(json!({ "path": path.to_string_lossy() })));
        } else {
            println!("Banco inicializado em {}", path.display());
        }
        0
    });
    finish(result, json_output)
}
