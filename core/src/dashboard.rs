//! Class list and summary cards of the teacher and student dashboards.

use serde_json::json;
use tracing::{info, warn};

use crate::api::types::ClassSummary;
use crate::api::{endpoints, Gateway, Method};
use crate::error::ClientError;
use crate::session::{Role, Session, SessionAccessor};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardSummary {
    Teacher { classes: u32, activities: u32 },
    Student { pending: u32, attendance: f64 },
}

/// Classes visible to the session's user. An empty list is a success.
pub async fn load_classes<G: Gateway>(
    gateway: &G,
    session: &Session,
) -> Result<Vec<ClassSummary>, ClientError> {
    let (Some(user_id), Some(role)) = (session.user_id.as_deref(), session.role.as_str()) else {
        return Err(ClientError::InvalidInput(
            "Sessão expirada. Faça login novamente.".to_string(),
        ));
    };

    let response = gateway
        .call(&endpoints::class_list(user_id, role), Method::GET, None)
        .await;
    if !response.success {
        warn!("Failed to list classes: {:?}", response.message);
        return Err(ClientError::Rejected(
            response.message_or("Erro ao carregar turmas."),
        ));
    }

    let classes: Vec<ClassSummary> = response.field("turmas").unwrap_or_default();
    info!("Loaded {} classes for user {}", classes.len(), user_id);
    Ok(classes)
}

/// Summary cards; absent counters read as zero.
pub async fn load_summary<G: Gateway>(
    gateway: &G,
    role: Role,
) -> Result<DashboardSummary, ClientError> {
    let path = match role {
        Role::Teacher => endpoints::teacher_summary(),
        Role::Student => endpoints::student_summary(),
        Role::Absent => {
            return Err(ClientError::InvalidInput(
                "Sessão expirada. Faça login novamente.".to_string(),
            ))
        }
    };

    let response = gateway.call(&path, Method::GET, None).await;
    if !response.success {
        return Err(ClientError::Rejected(
            response.message_or("Erro ao carregar resumo."),
        ));
    }

    Ok(match role {
        Role::Student => DashboardSummary::Student {
            pending: response.field("pendentes").unwrap_or(0),
            attendance: response.field("frequencia").unwrap_or(0.0),
        },
        _ => DashboardSummary::Teacher {
            classes: response.field("turmas").unwrap_or(0),
            activities: response.field("atividades").unwrap_or(0),
        },
    })
}

/// Teacher-only delete from the class list. Forgets the last opened class
/// pointer when it names the deleted class. Returns the message to show.
pub async fn delete_class<G: Gateway>(
    gateway: &G,
    sessions: &SessionAccessor,
    session: &Session,
    class_id: &str,
) -> Result<String, ClientError> {
    if !session.role.is_teacher() {
        warn!("Class delete refused for role {:?}", session.role);
        return Err(ClientError::InvalidInput(
            "Apenas professores podem excluir turmas.".to_string(),
        ));
    }
    let class_id = class_id.trim();
    if class_id.is_empty() {
        return Err(ClientError::InvalidInput("Turma inválida.".to_string()));
    }

    let body = json!({ "userId": session.user_id, "role": session.role.as_str() });
    let response = gateway
        .call(&endpoints::class(class_id), Method::DELETE, Some(body))
        .await;
    if !response.success {
        return Err(ClientError::Rejected(
            response.message_or("Erro ao excluir turma."),
        ));
    }

    if sessions.last_class().as_deref() == Some(class_id) {
        sessions.clear_last_class()?;
    }
    info!("Deleted class {}", class_id);
    Ok("Turma excluída com sucesso!".to_string())
}

/// Remember `class_id` as the last opened class and return the detail view path.
pub fn open_class(sessions: &SessionAccessor, class_id: &str) -> Result<String, ClientError> {
    let class_id = class_id.trim();
    if class_id.is_empty() {
        return Err(ClientError::InvalidInput("ID da turma inválido.".to_string()));
    }
    sessions.set_last_class(class_id)?;
    Ok(class_path(class_id))
}

/// Path of the class detail view for `class_id`.
pub fn class_path(class_id: &str) -> String {
    format!("/turma?id={}", urlencoding::encode(class_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use std::rc::Rc;

    #[test]
    fn test_open_class_persists_pointer() {
        let sessions = SessionAccessor::new(Rc::new(MemoryStore::new()));
        assert_eq!(open_class(&sessions, " 12 ").unwrap(), "/turma?id=12");
        assert_eq!(sessions.last_class().as_deref(), Some("12"));
    }

    #[test]
    fn test_open_class_rejects_blank_id() {
        let sessions = SessionAccessor::new(Rc::new(MemoryStore::new()));
        assert!(matches!(
            open_class(&sessions, ""),
            Err(ClientError::InvalidInput(_))
        ));
        assert_eq!(sessions.last_class(), None);
    }
}
