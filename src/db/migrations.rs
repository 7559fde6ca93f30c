use rusqlite::Connection;

use crate::error::TarefaError;

pub fn run_migrations(conn: &Connection) -> Result<(), TarefaError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS usuarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            email TEXT UNIQUE,
            cpf TEXT,
            role TEXT NOT NULL DEFAULT 'operador'
                CHECK (role IN ('empresa', 'operador', 'admin'))
        );

        CREATE TABLE IF NOT EXISTS tarefas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo TEXT NOT NULL,
            descricao TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            data TEXT NOT NULL,
            estado TEXT NOT NULL,
            criador_id INTEGER NOT NULL,
            operador_id INTEGER,
            operador_presente INTEGER NOT NULL DEFAULT 0 CHECK (operador_presente IN (0, 1)),
            confirmado INTEGER NOT NULL DEFAULT 0 CHECK (confirmado IN (0, 1)),
            justificativa_cancelamento TEXT,
            ativa INTEGER NOT NULL DEFAULT 1 CHECK (ativa IN (0, 1)),
            versao INTEGER NOT NULL DEFAULT 0,
            atualizado_em TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK (operador_id IS NOT NULL OR (operador_presente = 0 AND confirmado = 0)),
            CHECK (confirmado = 0 OR operador_presente = 1),
            CHECK (justificativa_cancelamento IS NULL OR ativa = 0)
        );

        CREATE INDEX IF NOT EXISTS idx_tarefas_criador ON tarefas(criador_id);
        CREATE INDEX IF NOT EXISTS idx_tarefas_operador ON tarefas(operador_id);
        CREATE INDEX IF NOT EXISTS idx_tarefas_estado ON tarefas(estado);
        CREATE INDEX IF NOT EXISTS idx_tarefas_abertas ON tarefas(estado)
            WHERE ativa = 1 AND confirmado = 0 AND operador_presente = 0;
        ",
    )?;
    Ok(())
}
