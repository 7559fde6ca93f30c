use crate::models::{Tarefa, TarefaConcluida, TarefaListada, Usuario};

pub fn print_tarefa(t: &Tarefa) {
    println!("Tarefa #{}: {}", t.id, t.titulo);
    println!("  Descrição: {}", t.descricao);
    println!("  Local: {} ({}, {})", t.estado, t.latitude, t.longitude);
    println!("  Data: {}", t.data);
    println!("  Criador: {}", t.criador_id);
    println!("  Situação: {}", t.ciclo().as_str());
    if let Some(operador) = t.operador_id {
        println!("  Operador: {operador}");
    }
    if let Some(ref motivo) = t.justificativa_cancelamento {
        println!("  Cancelamento: {motivo}");
    }
}

pub fn print_tarefa_list(tarefas: &[TarefaListada]) {
    if tarefas.is_empty() {
        println!("Nenhuma tarefa encontrada.");
        return;
    }
    for row in tarefas {
        let t = &row.tarefa;
        let operador = match (&row.operador_nome, t.operador_id) {
            (Some(nome), _) => format!(" @{nome}"),
            (None, Some(id)) => format!(" @{id}"),
            (None, None) => String::new(),
        };
        println!(
            "  #{} [{}] {} - {} {}{}",
            t.id,
            t.ciclo().as_str(),
            t.titulo,
            t.estado,
            t.data,
            operador
        );
    }
}

pub fn print_concluidas(tarefas: &[TarefaConcluida]) {
    if tarefas.is_empty() {
        println!("Nenhuma tarefa concluída.");
        return;
    }
    for row in tarefas {
        let t = &row.tarefa;
        println!(
            "  #{} {} - {} {} criador={} operador={}",
            t.id,
            t.titulo,
            t.estado,
            t.data,
            row.criador_email.as_deref().unwrap_or("?"),
            row.operador_nome.as_deref().unwrap_or("?")
        );
    }
}

pub fn print_usuario_list(usuarios: &[Usuario]) {
    if usuarios.is_empty() {
        println!("Nenhum usuário cadastrado.");
        return;
    }
    for u in usuarios {
        println!("  #{} {} [{}]", u.id, u.nome, u.role.as_str());
    }
}
