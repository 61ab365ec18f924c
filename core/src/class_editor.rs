//! Create and edit a class from the class form.

use serde_json::json;
use tracing::{info, warn};

use crate::api::types::ClassRecord;
use crate::api::{endpoints, Gateway, Method};
use crate::error::ClientError;
use crate::session::Session;

pub const NAME_REQUIRED: &str = "Preencha o nome da turma.";
const TEACHER_ONLY: &str = "Apenas professores podem salvar turmas.";

/// What the form submits. `description` may be blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDraft {
    pub name: String,
    pub description: String,
}

impl ClassDraft {
    pub fn from_record(class: &ClassRecord) -> Self {
        Self {
            name: class.name.clone(),
            description: class.description.clone().unwrap_or_default(),
        }
    }
}

/// Fetch an existing class to prefill the edit form.
pub async fn load_for_edit<G: Gateway>(
    gateway: &G,
    class_id: &str,
) -> Result<ClassDraft, ClientError> {
    let response = gateway
        .call(&endpoints::class(class_id), Method::GET, None)
        .await;
    if !response.success {
        return Err(ClientError::Rejected(
            response.message_or("Erro ao carregar turma."),
        ));
    }
    response
        .field::<ClassRecord>("turma")
        .map(|c| ClassDraft::from_record(&c))
        .ok_or_else(|| ClientError::Rejected("Erro ao carregar turma.".to_string()))
}

/// `POST turmas` when `class_id` is `None`, `PUT turmas/{id}` otherwise.
/// Returns the success message to show. Nothing is sent for a blank name
/// or a non-teacher session.
pub async fn save_class<G: Gateway>(
    gateway: &G,
    session: &Session,
    class_id: Option<&str>,
    draft: &ClassDraft,
) -> Result<String, ClientError> {
    if !session.role.is_teacher() {
        warn!("Class save refused for role {:?}", session.role);
        return Err(ClientError::InvalidInput(TEACHER_ONLY.to_string()));
    }
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ClientError::InvalidInput(NAME_REQUIRED.to_string()));
    }

    let class_id = class_id.map(str::trim).filter(|id| !id.is_empty());
    let (path, method) = match class_id {
        Some(id) => (endpoints::class(id), Method::PUT),
        None => (endpoints::classes(), Method::POST),
    };
    let body = json!({ "nome": name, "descricao": draft.description.trim() });

    let response = gateway.call(&path, method, Some(body)).await;
    if !response.success {
        warn!("Failed to save class {:?}: {:?}", class_id, response.message);
        return Err(ClientError::Rejected(
            response.message_or("Erro ao salvar turma."),
        ));
    }

    info!("Saved class {:?} ({})", class_id, name);
    Ok(match class_id {
        Some(_) => "Turma atualizada com sucesso!",
        None => "Turma criada com sucesso!",
    }
    .to_string())
}
