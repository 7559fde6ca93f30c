use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    ValidationError,
    TaskNotFound,
    PermissionDenied,
    Conflict,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Conflict => "CONFLICT",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// HTTP status the REST layer answers with. Conflicts stay 400: clients
    /// only read the message text.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationError | Self::Conflict => 400,
            Self::PermissionDenied => 403,
            Self::TaskNotFound => 404,
            Self::NotInitialized | Self::DatabaseError => 500,
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TarefaError {
    pub code: ErrorCode,
    pub message: String,
    /// Every violated field, for validation failures.
    pub erros: Vec<String>,
}

impl TarefaError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            erros: Vec::new(),
        }
    }

    pub fn not_initialized(path: &str) -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            format!("Banco de dados não inicializado em {path}. Execute `tarefas init` primeiro."),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Accumulated field errors, reported together.
    pub fn invalid_fields(erros: Vec<String>) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            message: "Dados inválidos".into(),
            erros,
        }
    }

    pub fn task_not_found() -> Self {
        Self::new(ErrorCode::TaskNotFound, "Tarefa não encontrada")
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn already_claimed() -> Self {
        Self::conflict("Esta tarefa já possui operador confirmado.")
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for TarefaError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
