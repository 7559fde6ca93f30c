#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("tarefas.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tarefas").expect("binary");
        cmd.current_dir(self.dir.path())
            .env_remove("TAREFAS_DB")
            .env_remove("TAREFAS_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(self.db_path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn create_task(&self, titulo: &str, estado: &str, criador: &str) -> i64 {
        let v = self.run_ok(&[
            "tarefa", "criar",
            "--titulo", titulo,
            "--descricao", "Levar caixas ao depósito",
            "--latitude", "-23.55",
            "--longitude", "-46.63",
            "--data", "2026-10-20",
            "--estado", estado,
            "--criador", criador,
        ]);
        v["data"]["id"].as_i64().expect("task id")
    }

    fn show(&self, id: i64) -> Value {
        let v = self.run_ok(&["tarefa", "mostrar", &id.to_string()]);
        v["data"]["tarefa"].clone()
    }
}

fn setup() -> TestEnv {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with("tarefas.db"));
    assert!(env.db_path().exists());
}

#[test]
fn test_init_idempotent() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1");
    env.run_ok(&["init"]);
    assert_eq!(env.show(id)["titulo"], "Entrega");
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["tarefa", "listar"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

// ─── 2. create / list ──────────────────────────────────────────────

#[test]
fn test_create_then_list_round_trip() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1");
    env.create_task("Vistoria", "RJ", "2");

    let v = env.run_ok(&["tarefa", "listar", "--estado", "SP"]);
    let tarefas = v["data"]["tarefas"].as_array().unwrap();
    assert_eq!(tarefas.len(), 1);
    let t = &tarefas[0];
    assert_eq!(t["id"], id);
    assert_eq!(t["titulo"], "Entrega");
    assert_eq!(t["descricao"], "Levar caixas ao depósito");
    assert_eq!(t["latitude"], -23.55);
    assert_eq!(t["longitude"], -46.63);
    assert_eq!(t["data"], "2026-10-20");
    assert_eq!(t["estado"], "SP");
    assert_eq!(t["criador_id"], 1);
    assert_eq!(t["ativa"], 1);
    assert_eq!(t["confirmado"], 0);
    assert_eq!(t["operador_presente"], 0);
    assert!(t["operador_id"].is_null());
}

#[test]
fn test_create_reports_every_invalid_field() {
    let env = setup();
    let v = env.run_err(&["tarefa", "criar", "--titulo", "X", "--latitude", "abc"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(v["error"]["message"], "Dados inválidos");
    let erros: Vec<&str> = v["error"]["erros"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(erros.contains(&"Latitude inválida"));
    assert!(erros.contains(&"Longitude inválida"));
    assert!(erros.contains(&"ID do criador é obrigatório"));
    assert!(!erros.contains(&"Título é obrigatório"));
}

#[test]
fn test_list_by_operator_includes_unclaimed() {
    let env = setup();
    let a = env.create_task("A", "SP", "1");
    let b = env.create_task("B", "SP", "1");
    let c = env.create_task("C", "SP", "1");
    env.run_ok(&["tarefa", "presenca", &b.to_string(), "--operador", "9"]);
    env.run_ok(&["tarefa", "presenca", &c.to_string(), "--operador", "7"]);

    let v = env.run_ok(&["tarefa", "listar", "--operador", "9"]);
    let ids: Vec<i64> = v["data"]["tarefas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![a, b]);
}

// ─── 3. lifecycle ──────────────────────────────────────────────────

#[test]
fn test_claim_cancel_reactivate_scenario() {
    let env = setup();
    for i in 0..4 {
        env.create_task(&format!("Filler {i}"), "MG", "2");
    }
    let id = env.create_task("Entrega", "SP", "1");
    assert_eq!(id, 5);

    env.run_ok(&["tarefa", "presenca", "5", "--operador", "9"]);
    let t = env.show(5);
    assert_eq!(t["operador_id"], 9);
    assert_eq!(t["operador_presente"], 1);
    assert_eq!(t["ciclo"], "reivindicada");

    env.run_ok(&["tarefa", "cancelar", "5", "--operador", "9", "--motivo", "Imprevisto"]);
    let t = env.show(5);
    assert!(t["operador_id"].is_null());
    assert_eq!(t["ativa"], 0);
    assert_eq!(t["justificativa_cancelamento"], "Imprevisto");
    assert_eq!(t["ciclo"], "cancelada");

    env.run_ok(&["tarefa", "reativar", "5"]);
    let t = env.show(5);
    assert_eq!(t["ativa"], 1);
    assert!(t["operador_id"].is_null());
    assert_eq!(t["operador_presente"], 0);
    assert!(t["justificativa_cancelamento"].is_null());
    assert_eq!(t["ciclo"], "aberta");
}

#[test]
fn test_presence_is_idempotent_for_same_operator() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1").to_string();
    let first = env.run_ok(&["tarefa", "presenca", &id, "--operador", "9"]);
    let second = env.run_ok(&["tarefa", "presenca", &id, "--operador", "9"]);
    assert_eq!(first["data"]["alterada"], true);
    assert_eq!(second["data"]["alterada"], false);
    assert_eq!(first["data"]["tarefa"], second["data"]["tarefa"]);
}

#[test]
fn test_second_operator_conflicts() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1").to_string();
    env.run_ok(&["tarefa", "presenca", &id, "--operador", "9"]);
    let v = env.run_err(&["tarefa", "presenca", &id, "--operador", "10"]);
    assert_eq!(v["error"]["code"], "CONFLICT");
    assert_eq!(v["error"]["message"], "Esta tarefa já possui operador confirmado.");
}

#[test]
fn test_presence_on_missing_task() {
    let env = setup();
    let v = env.run_err(&["tarefa", "presenca", "999", "--operador", "1"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn test_cancel_by_other_operator_is_forbidden() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1").to_string();
    env.run_ok(&["tarefa", "presenca", &id, "--operador", "9"]);
    let v = env.run_err(&["tarefa", "cancelar", &id, "--operador", "10", "--motivo", "x"]);
    assert_eq!(v["error"]["code"], "PERMISSION_DENIED");
}

#[test]
fn test_cancel_requires_reason() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1").to_string();
    env.run_ok(&["tarefa", "presenca", &id, "--operador", "9"]);
    let v = env.run_err(&["tarefa", "cancelar", &id, "--operador", "9", "--motivo", "  "]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(v["error"]["message"], "Motivo do cancelamento é obrigatório.");
}

#[test]
fn test_reactivate_checks_creator_when_given() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1").to_string();
    env.run_ok(&["tarefa", "presenca", &id, "--operador", "9"]);
    env.run_ok(&["tarefa", "cancelar", &id, "--operador", "9", "--motivo", "Chuva"]);

    let v = env.run_err(&["tarefa", "reativar", &id, "--criador", "2"]);
    assert_eq!(v["error"]["code"], "PERMISSION_DENIED");
    env.run_ok(&["tarefa", "reativar", &id, "--criador", "1"]);
}

// ─── 4. completion and export ──────────────────────────────────────

#[test]
fn test_completion_and_export() {
    let env = setup();
    let empresa = env.run_ok(&[
        "usuario", "add", "Transportes Ltda", "--email", "empresa@x.com", "--cpf", "111", "--role", "empresa",
    ]);
    let empresa_id = empresa["data"]["id"].as_i64().unwrap().to_string();
    let operador = env.run_ok(&["usuario", "add", "Ana", "--cpf", "222"]);
    let operador_id = operador["data"]["id"].as_i64().unwrap().to_string();
    assert_eq!(operador["data"]["role"], "operador");

    let id = env.create_task("Entrega", "SP", &empresa_id).to_string();

    let v = env.run_err(&["tarefa", "confirmar", &id, "--criador", &empresa_id]);
    assert_eq!(v["error"]["code"], "CONFLICT");

    env.run_ok(&["tarefa", "presenca", &id, "--operador", &operador_id]);
    let v = env.run_err(&["tarefa", "confirmar", &id, "--criador", "999"]);
    assert_eq!(v["error"]["code"], "PERMISSION_DENIED");

    let v = env.run_ok(&["tarefa", "confirmar", &id, "--criador", &empresa_id]);
    assert_eq!(v["data"]["tarefa"]["confirmado"], 1);
    assert_eq!(v["data"]["tarefa"]["ciclo"], "concluida");

    let v = env.run_ok(&["tarefa", "concluidas"]);
    let rows = v["data"]["tarefas"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["criador_email"], "empresa@x.com");
    assert_eq!(rows[0]["criador_cpf"], "111");
    assert_eq!(rows[0]["operador_nome"], "Ana");
    assert_eq!(rows[0]["operador_cpf"], "222");

    let v = env.run_err(&["tarefa", "atualizar", &id, "--titulo", "Outro"]);
    assert_eq!(v["error"]["code"], "CONFLICT");
    let v = env.run_err(&["tarefa", "cancelar", &id, "--operador", &operador_id, "--motivo", "x"]);
    assert_eq!(v["error"]["code"], "CONFLICT");
}

#[test]
fn test_update_edits_free_text_fields() {
    let env = setup();
    let id = env.create_task("Entrega", "SP", "1").to_string();
    let v = env.run_ok(&["tarefa", "atualizar", &id, "--titulo", "Entrega urgente", "--estado", "RJ"]);
    let t = &v["data"]["tarefa"];
    assert_eq!(t["titulo"], "Entrega urgente");
    assert_eq!(t["estado"], "RJ");
    assert_eq!(t["descricao"], "Levar caixas ao depósito");

    let v = env.run_err(&["tarefa", "atualizar", &id, "--titulo", "X", "--criador", "2"]);
    assert_eq!(v["error"]["code"], "PERMISSION_DENIED");
}

#[test]
fn test_open_pool() {
    let env = setup();
    let a = env.create_task("A", "SP", "1");
    let b = env.create_task("B", "RJ", "1");
    env.run_ok(&["tarefa", "presenca", &b.to_string(), "--operador", "9"]);

    let v = env.run_ok(&["tarefa", "abertas"]);
    let ids: Vec<i64> = v["data"]["tarefas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![a]);
}

// ─── 5. users and text output ──────────────────────────────────────

#[test]
fn test_duplicate_email_rejected() {
    let env = setup();
    env.run_ok(&["usuario", "add", "Ana", "--email", "ana@x.com"]);
    let v = env.run_err(&["usuario", "add", "Outra", "--email", "ana@x.com"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_ok(&["usuario", "list"]);
    assert_eq!(v["data"]["usuarios"].as_array().unwrap().len(), 1);
}

#[test]
fn test_text_output() {
    let env = setup();
    env.create_task("Entrega", "SP", "1");
    env.cmd()
        .args(["tarefa", "listar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entrega").and(predicate::str::contains("[aberta]")));

    env.cmd()
        .args(["tarefa", "mostrar", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tarefa não encontrada"));
}

#[test]
fn test_config_file_supplies_database() {
    let env = TestEnv::new();
    let config_path = env.dir.path().join("config.json");
    let db = env.dir.path().join("from-config.db");
    std::fs::write(
        &config_path,
        serde_json::json!({ "database": db }).to_string(),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("tarefas").expect("binary");
    cmd.current_dir(env.dir.path())
        .env_remove("TAREFAS_DB")
        .args(["--config", config_path.to_str().unwrap(), "init", "--json"])
        .assert()
        .success();
    assert!(db.exists());
}
