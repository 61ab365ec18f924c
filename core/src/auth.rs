//! Login, logout and the role-based page guard.

use serde_json::json;
use tracing::{info, warn};

use crate::api::{endpoints, Gateway, Method};
use crate::error::ClientError;
use crate::session::{Role, Session, SessionAccessor};

pub const LOGIN_PAGE: &str = "/";
pub const TEACHER_DASHBOARD: &str = "/dashboard/teacher";
pub const STUDENT_DASHBOARD: &str = "/dashboard/student";
pub const CLASS_FORM: &str = "/create_class";

const PUBLIC_PAGES: &[&str] = &["/", "/index.html"];

/// Where a user of `role` lands after login or when a view has nothing to show.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Student => STUDENT_DASHBOARD,
        _ => TEACHER_DASHBOARD,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

/// Advisory page guard; the server enforces the real rules.
pub fn check_access(path: &str, session: &Session) -> Access {
    if PUBLIC_PAGES.contains(&path) {
        return Access::Allow;
    }
    if !session.is_authenticated() {
        warn!("Access to {} without a session, redirecting to login", path);
        return Access::Redirect(LOGIN_PAGE);
    }
    let teacher_only = path.starts_with(TEACHER_DASHBOARD) || path.starts_with(CLASS_FORM);
    if teacher_only && session.role != Role::Teacher {
        warn!("Only teachers may open {}", path);
        return Access::Redirect(LOGIN_PAGE);
    }
    if path.starts_with(STUDENT_DASHBOARD) && session.role != Role::Student {
        warn!("Only students may open {}", path);
        return Access::Redirect(LOGIN_PAGE);
    }
    Access::Allow
}

/// Authenticate and persist the session. Nothing is sent unless all three
/// fields are filled in.
pub async fn login<G: Gateway>(
    gateway: &G,
    sessions: &SessionAccessor,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Session, ClientError> {
    let email = email.trim();
    let password = password.trim();
    let Some(role_str) = role.as_str() else {
        return Err(ClientError::InvalidInput("Preencha todos os campos.".to_string()));
    };
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::InvalidInput("Preencha todos os campos.".to_string()));
    }

    let response = gateway
        .call(
            &endpoints::login(),
            Method::POST,
            Some(json!({ "email": email, "password": password, "role": role_str })),
        )
        .await;

    if !response.success {
        return Err(ClientError::Rejected(
            response.message_or("Credenciais inválidas"),
        ));
    }

    let user_id = response
        .field::<serde_json::Value>("user_id")
        .and_then(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
    let session = Session {
        user_id,
        role: response
            .field::<String>("role")
            .map(|r| Role::parse(&r))
            .unwrap_or(role),
        name: response.field::<String>("name"),
    };
    if !session.is_authenticated() {
        return Err(ClientError::Rejected(
            "Resposta de login sem identificação do usuário.".to_string(),
        ));
    }

    sessions.save(&session)?;
    info!("Logged in user {:?} as {:?}", session.user_id, session.role);
    Ok(session)
}

pub fn logout(sessions: &SessionAccessor) {
    sessions.clear();
    info!("Logged out");
}
