//! Session accessor over client-local key/value storage.
//!
//! The storage keys are a public contract shared with every other view of
//! the application, so they are fixed here and nowhere else.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::ClientError;

pub const USER_ID_KEY: &str = "tf_user_id";
pub const ROLE_KEY: &str = "tf_role";
pub const NAME_KEY: &str = "tf_name";
pub const LAST_CLASS_KEY: &str = "last_turma_id";

/// String-keyed persistent storage (browser `localStorage` or an in-memory map).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// In-memory store used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Teacher,
    Student,
    #[default]
    Absent,
}

impl Role {
    /// Unknown or empty values read as `Absent`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "teacher" => Role::Teacher,
            "student" => Role::Student,
            _ => Role::Absent,
        }
    }

    /// Wire value; `None` for `Absent`.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Role::Teacher => Some("teacher"),
            Role::Student => Some("student"),
            Role::Absent => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Teacher => "Professor",
            Role::Student => "Aluno",
            Role::Absent => "Visitante",
        }
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::Teacher)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub user_id: Option<String>,
    pub role: Role,
    pub name: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Usuário")
    }
}

/// Reads and clears the persisted session fields.
#[derive(Clone)]
pub struct SessionAccessor {
    store: Rc<dyn KeyValueStore>,
}

impl SessionAccessor {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Rc<dyn KeyValueStore> {
        &self.store
    }

    /// Never fails: missing or blank fields surface as `None` / `Role::Absent`.
    pub fn read(&self) -> Session {
        let non_empty = |key: &str| self.store.get(key).filter(|v| !v.trim().is_empty());
        Session {
            user_id: non_empty(USER_ID_KEY),
            role: non_empty(ROLE_KEY)
                .map(|r| Role::parse(&r))
                .unwrap_or_default(),
            name: non_empty(NAME_KEY),
        }
    }

    /// Persist a session created by the login flow.
    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        match &session.user_id {
            Some(id) => self.store.set(USER_ID_KEY, id)?,
            None => self.store.remove(USER_ID_KEY)?,
        }
        match session.role.as_str() {
            Some(role) => self.store.set(ROLE_KEY, role)?,
            None => self.store.remove(ROLE_KEY)?,
        }
        match &session.name {
            Some(name) => self.store.set(NAME_KEY, name)?,
            None => self.store.remove(NAME_KEY)?,
        }
        debug!("Saved session for user {:?}", session.user_id);
        Ok(())
    }

    /// Idempotent; removal failures are logged and skipped so the remaining
    /// keys are still cleared.
    pub fn clear(&self) {
        for key in [USER_ID_KEY, ROLE_KEY, NAME_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear {}: {}", key, e);
            }
        }
    }

    pub fn last_class(&self) -> Option<String> {
        self.store
            .get(LAST_CLASS_KEY)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn set_last_class(&self, class_id: &str) -> Result<(), ClientError> {
        self.store.set(LAST_CLASS_KEY, class_id)
    }

    pub fn clear_last_class(&self) -> Result<(), ClientError> {
        self.store.remove(LAST_CLASS_KEY)
    }
}
