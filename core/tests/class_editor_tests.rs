mod support;

use serde_json::json;

use support::*;
use turmaflow_core::api::Method;
use turmaflow_core::class_editor::{load_for_edit, save_class, ClassDraft, NAME_REQUIRED};
use turmaflow_core::{ClientError, Role};

fn draft(name: &str, description: &str) -> ClassDraft {
    ClassDraft {
        name: name.to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn test_new_class_is_posted() {
    let gateway = FakeGateway::default();
    gateway.respond(Method::POST, "turmas", json!({"success": true, "turma_id": 9}));

    let message = save_class(
        &gateway,
        &session(Role::Teacher),
        None,
        &draft(" Física 1B ", " Turma da tarde "),
    )
    .await
    .unwrap();

    assert_eq!(message, "Turma criada com sucesso!");
    let calls = gateway.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "turmas");
    assert_eq!(
        calls[0].body,
        Some(json!({"nome": "Física 1B", "descricao": "Turma da tarde"}))
    );
}

#[tokio::test]
async fn test_existing_class_is_put() {
    let gateway = FakeGateway::default();
    gateway.respond(Method::PUT, "turmas/5", json!({"success": true}));

    let message = save_class(&gateway, &session(Role::Teacher), Some("5"), &draft("Mat", ""))
        .await
        .unwrap();

    assert_eq!(message, "Turma atualizada com sucesso!");
    assert_eq!(gateway.calls_to(Method::PUT, "turmas/5"), 1);
    assert_eq!(gateway.calls_to(Method::POST, "turmas"), 0);
}

#[tokio::test]
async fn test_blank_name_sends_nothing() {
    let gateway = FakeGateway::default();

    let result = save_class(&gateway, &session(Role::Teacher), None, &draft("   ", "x")).await;

    assert_eq!(result, Err(ClientError::InvalidInput(NAME_REQUIRED.to_string())));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_student_cannot_save() {
    let gateway = FakeGateway::default();

    let result = save_class(&gateway, &session(Role::Student), Some("5"), &draft("Mat", "")).await;

    assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_server_rejection_is_surfaced() {
    let gateway = FakeGateway::default();
    gateway.respond(
        Method::PUT,
        "turmas/5",
        json!({"success": false, "message": "Acesso negado."}),
    );

    let result = save_class(&gateway, &session(Role::Teacher), Some("5"), &draft("Mat", "")).await;

    assert_eq!(result, Err(ClientError::Rejected("Acesso negado.".to_string())));
}

#[tokio::test]
async fn test_edit_form_prefilled_from_class() {
    let gateway = FakeGateway::default();
    gateway.respond(Method::GET, "turmas/5", class_json(5));

    let loaded = load_for_edit(&gateway, "5").await.unwrap();

    assert_eq!(loaded, draft("Matemática 9A", "Turma da manhã"));
}

#[tokio::test]
async fn test_edit_form_unknown_class() {
    let gateway = FakeGateway::default();

    let result = load_for_edit(&gateway, "5").await;

    assert_eq!(result, Err(ClientError::Rejected("Erro HTTP 404".to_string())));
}
