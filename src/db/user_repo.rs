use rusqlite::{params, Connection, OptionalExtension};

use crate::error::TarefaError;
use crate::models::{Papel, Usuario};

pub fn create_user(
    conn: &Connection,
    nome: &str,
    email: Option<&str>,
    cpf: Option<&str>,
    role: Papel,
) -> Result<Usuario, TarefaError> {
    conn.execute(
        "INSERT INTO usuarios (nome, email, cpf, role) VALUES (?1, ?2, ?3, ?4)",
        params![nome, email, cpf, role.as_str()],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(f, _) if f.code == rusqlite::ErrorCode::ConstraintViolation => {
            TarefaError::validation("E-mail já cadastrado")
        }
        _ => TarefaError::from(e),
    })?;
    let id = conn.last_insert_rowid();
    get_user(conn, id)?.ok_or_else(|| TarefaError::database("usuário inserido não encontrado"))
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<Usuario>, TarefaError> {
    let user = conn
        .query_row(
            "SELECT id, nome, email, cpf, role FROM usuarios WHERE id = ?1",
            params![id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> Result<Vec<Usuario>, TarefaError> {
    let mut stmt = conn.prepare("SELECT id, nome, email, cpf, role FROM usuarios ORDER BY id ASC")?;
    let users = stmt
        .query_map([], row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<Usuario> {
    Ok(Usuario {
        id: row.get(0)?,
        nome: row.get(1)?,
        email: row.get(2)?,
        cpf: row.get(3)?,
        role: Papel::from_str(&row.get::<_, String>(4)?).unwrap_or(Papel::Operador),
    })
}
