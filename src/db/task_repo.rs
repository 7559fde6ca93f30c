use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::TarefaError;
use crate::models::{FiltroTarefas, NovaTarefa, Tarefa, TarefaConcluida, TarefaListada};

const TASK_COLUMNS: &str = "t.id, t.titulo, t.descricao, t.latitude, t.longitude, t.data, t.estado,
     t.criador_id, t.operador_id, t.operador_presente, t.confirmado,
     t.justificativa_cancelamento, t.ativa, t.versao, t.atualizado_em";

const TASK_COLUMN_COUNT: usize = 15;

/// Insert a task in its initial open state. Returns the new id.
pub fn insert_task(conn: &Connection, nova: &NovaTarefa) -> Result<i64, TarefaError> {
    conn.execute(
        "INSERT INTO tarefas (titulo, descricao, latitude, longitude, data, estado, criador_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            nova.titulo,
            nova.descricao,
            nova.latitude,
            nova.longitude,
            nova.data,
            nova.estado,
            nova.criador_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_task(conn: &Connection, id: i64) -> Result<Option<Tarefa>, TarefaError> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tarefas t WHERE t.id = ?1"),
            params![id],
            row_to_task,
        )
        .optional()?;
    Ok(task)
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Tarefa, TarefaError> {
    find_task(conn, id)?.ok_or_else(TarefaError::task_not_found)
}

/// List tasks with the claiming operator's name and CPF joined in.
pub fn list_tasks(conn: &Connection, filtro: &FiltroTarefas) -> Result<Vec<TarefaListada>, TarefaError> {
    let mut sql = format!(
        "SELECT {TASK_COLUMNS}, u.nome, u.cpf
         FROM tarefas t
         LEFT JOIN usuarios u ON t.operador_id = u.id
         WHERE 1=1"
    );
    let mut args: Vec<SqlValue> = Vec::new();

    if let Some(ref estado) = filtro.estado {
        sql.push_str(" AND t.estado = ?");
        args.push(SqlValue::Text(estado.clone()));
    }
    if let Some(criador_id) = filtro.criador_id {
        sql.push_str(" AND t.criador_id = ?");
        args.push(SqlValue::Integer(criador_id));
    }
    if let Some(operador_id) = filtro.operador_id {
        sql.push_str(" AND (t.operador_id IS NULL OR t.operador_id = ?)");
        args.push(SqlValue::Integer(operador_id));
    }
    sql.push_str(" ORDER BY t.id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(params_from_iter(args), row_to_listed)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Tasks an operator may claim right now.
pub fn open_pool(conn: &Connection, estado: Option<&str>) -> Result<Vec<TarefaListada>, TarefaError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS}, NULL, NULL
         FROM tarefas t
         WHERE t.ativa = 1 AND t.confirmado = 0 AND t.operador_presente = 0
           AND (?1 IS NULL OR t.estado = ?1)
         ORDER BY t.data ASC, t.id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![estado], row_to_listed)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Completed tasks with creator and operator identity, for reporting.
pub fn list_completed(conn: &Connection) -> Result<Vec<TarefaConcluida>, TarefaError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS},
                criador.email, criador.cpf, operador.nome, operador.cpf
         FROM tarefas t
         LEFT JOIN usuarios criador ON t.criador_id = criador.id
         LEFT JOIN usuarios operador ON t.operador_id = operador.id
         WHERE t.confirmado = 1
         ORDER BY t.data ASC, t.id ASC"
    ))?;
    let tasks = stmt
        .query_map([], |row| {
            Ok(TarefaConcluida {
                tarefa: row_to_task(row)?,
                criador_email: row.get(TASK_COLUMN_COUNT)?,
                criador_cpf: row.get(TASK_COLUMN_COUNT + 1)?,
                operador_nome: row.get(TASK_COLUMN_COUNT + 2)?,
                operador_cpf: row.get(TASK_COLUMN_COUNT + 3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Write back every mutable field of `task` in one statement.
///
/// Compare-and-swap on `versao`: the write only lands if the row still has
/// the version that was read, otherwise a conflict is returned.
pub fn write_task(conn: &Connection, task: &Tarefa) -> Result<(), TarefaError> {
    let changed = conn.execute(
        "UPDATE tarefas SET
            titulo = ?1,
            descricao = ?2,
            data = ?3,
            estado = ?4,
            confirmado = ?5,
            operador_id = ?6,
            operador_presente = ?7,
            justificativa_cancelamento = ?8,
            ativa = ?9,
            versao = versao + 1,
            atualizado_em = datetime('now')
         WHERE id = ?10 AND versao = ?11",
        params![
            task.titulo,
            task.descricao,
            task.data,
            task.estado,
            task.confirmado,
            task.operador_id,
            task.operador_presente,
            task.justificativa_cancelamento,
            task.ativa,
            task.id,
            task.versao
        ],
    )?;
    if changed == 0 {
        return Err(TarefaError::conflict(
            "Tarefa modificada por outra requisição. Tente novamente.",
        ));
    }
    Ok(())
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Tarefa> {
    Ok(Tarefa {
        id: row.get(0)?,
        titulo: row.get(1)?,
        descricao: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        data: row.get(5)?,
        estado: row.get(6)?,
        criador_id: row.get(7)?,
        operador_id: row.get(8)?,
        operador_presente: row.get(9)?,
        confirmado: row.get(10)?,
        justificativa_cancelamento: row.get(11)?,
        ativa: row.get(12)?,
        versao: row.get(13)?,
        atualizado_em: row.get(14)?,
    })
}

fn row_to_listed(row: &rusqlite::Row) -> rusqlite::Result<TarefaListada> {
    Ok(TarefaListada {
        tarefa: row_to_task(row)?,
        operador_nome: row.get(TASK_COLUMN_COUNT)?,
        operador_cpf: row.get(TASK_COLUMN_COUNT + 1)?,
    })
}
