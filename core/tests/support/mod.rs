#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::oneshot;

use turmaflow_core::api::normalize_path;
use turmaflow_core::api::types::ClassRecord;
use turmaflow_core::api::Method;
use turmaflow_core::scheduler::{LocalFuture, Tick};
use turmaflow_core::{
    ApiResponse, ClassDetailController, ClassSink, ClientConfig, Gateway, Interaction, Level,
    MemoryStore, Role, RosterSink, RosterView, Session, SessionAccessor, Shell, TimerBackend,
    ViewContext, ViewPorts,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Scripted gateway. One response per `(method, path)`, answered until
/// replaced. Unscripted calls get an HTTP 404 failure.
#[derive(Default)]
pub struct FakeGateway {
    responses: RefCell<HashMap<(String, String), ApiResponse>>,
    gates: RefCell<VecDeque<oneshot::Receiver<ApiResponse>>>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeGateway {
    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.responses.borrow_mut().insert(
            (method.to_string(), normalize_path(path).to_string()),
            ApiResponse::from_body(&body.to_string()),
        );
    }

    /// The next unanswered call waits for the returned sender instead of the script.
    pub fn gate(&self) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }
}

impl Gateway for FakeGateway {
    async fn call(&self, path: &str, method: Method, body: Option<Value>) -> ApiResponse {
        let path = normalize_path(path).to_string();
        self.calls.borrow_mut().push(Call {
            method: method.clone(),
            path: path.clone(),
            body,
        });

        let gate = self.gates.borrow_mut().pop_front();
        if let Some(rx) = gate {
            return rx.await.unwrap_or_default();
        }

        self.responses
            .borrow()
            .get(&(method.to_string(), path))
            .cloned()
            .unwrap_or_else(|| ApiResponse::http_error(404))
    }
}

/// Records everything the controller shows or asks for.
pub struct RecordingUi {
    pub renders: RefCell<Vec<RosterView>>,
    pub classes: RefCell<Vec<ClassRecord>>,
    pub notices: RefCell<Vec<(Level, String)>>,
    pub confirm_answer: Cell<bool>,
    pub confirms: RefCell<Vec<String>>,
    pub prompt_answer: RefCell<Option<String>>,
    pub navigations: RefCell<Vec<String>>,
    pub redirects: RefCell<Vec<(String, Duration)>>,
    pub opened: RefCell<Vec<String>>,
    pub copied: RefCell<Vec<String>>,
    pub downloads: RefCell<Vec<(String, String, String)>>,
}

impl Default for RecordingUi {
    fn default() -> Self {
        Self {
            renders: RefCell::default(),
            classes: RefCell::default(),
            notices: RefCell::default(),
            confirm_answer: Cell::new(true),
            confirms: RefCell::default(),
            prompt_answer: RefCell::default(),
            navigations: RefCell::default(),
            redirects: RefCell::default(),
            opened: RefCell::default(),
            copied: RefCell::default(),
            downloads: RefCell::default(),
        }
    }
}

impl RecordingUi {
    pub fn last_render(&self) -> RosterView {
        self.renders
            .borrow()
            .last()
            .cloned()
            .expect("nothing rendered yet")
    }

    pub fn last_notice(&self) -> Option<(Level, String)> {
        self.notices.borrow().last().cloned()
    }

    pub fn notice_texts(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|(_, m)| m.clone()).collect()
    }
}

impl RosterSink for RecordingUi {
    fn render(&self, view: &RosterView) {
        self.renders.borrow_mut().push(view.clone());
    }
}

impl ClassSink for RecordingUi {
    fn show_class(&self, class: &ClassRecord) {
        self.classes.borrow_mut().push(class.clone());
    }
}

impl Interaction for RecordingUi {
    fn notify(&self, level: Level, message: &str) {
        self.notices.borrow_mut().push((level, message.to_string()));
    }

    fn confirm(&self, question: &str) -> bool {
        self.confirms.borrow_mut().push(question.to_string());
        self.confirm_answer.get()
    }

    fn prompt(&self, _question: &str) -> Option<String> {
        self.prompt_answer.borrow().clone()
    }
}

impl Shell for RecordingUi {
    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_string());
    }

    fn redirect_after(&self, path: &str, delay: Duration) {
        self.redirects.borrow_mut().push((path.to_string(), delay));
    }

    fn open_external(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }

    fn copy_text(&self, text: &str) {
        self.copied.borrow_mut().push(text.to_string());
    }

    fn download_text(&self, filename: &str, mime: &str, contents: &str) {
        self.downloads
            .borrow_mut()
            .push((filename.to_string(), mime.to_string(), contents.to_string()));
    }
}

/// Interval backend driven by the test through [`ManualTimers::fire`].
#[derive(Clone, Default)]
pub struct ManualTimers {
    slots: Rc<RefCell<Vec<Option<(Duration, Tick)>>>>,
}

impl ManualTimers {
    pub fn active(&self) -> usize {
        self.slots.borrow().iter().filter(|s| s.is_some()).count()
    }

    pub fn started(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn periods(&self) -> Vec<Duration> {
        self.slots.borrow().iter().flatten().map(|(p, _)| *p).collect()
    }

    /// Run one tick of every active interval to completion.
    pub async fn fire(&self) {
        let futures: Vec<LocalFuture> = self
            .slots
            .borrow_mut()
            .iter_mut()
            .flatten()
            .map(|(_, tick)| tick())
            .collect();
        for future in futures {
            future.await;
        }
    }
}

impl TimerBackend for ManualTimers {
    type Handle = usize;

    fn start_interval(&self, period: Duration, tick: Tick) -> usize {
        let mut slots = self.slots.borrow_mut();
        slots.push(Some((period, tick)));
        slots.len() - 1
    }

    fn cancel(&self, handle: usize) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(handle) {
            *slot = None;
        }
    }
}

pub fn session(role: Role) -> Session {
    Session {
        user_id: Some("10".to_string()),
        role,
        name: Some("Marta".to_string()),
    }
}

pub fn class_json(id: u32) -> Value {
    json!({
        "success": true,
        "turma": {
            "id": id,
            "nome": "Matemática 9A",
            "descricao": "Turma da manhã",
            "codigo_acesso": "MAT9A7",
            "total_alunos": 3,
            "media_geral": 6.2,
            "frequencia_media": 88.0,
            "professor_nome": "Marta"
        }
    })
}

pub fn student(id: u32, name: &str, attendance: f64, grade: Option<f64>) -> Value {
    json!({
        "id": id,
        "nome": name,
        "email": format!("{}@escola.br", name.to_lowercase()),
        "frequencia": attendance,
        "media": grade,
    })
}

pub fn roster_json(students: Vec<Value>) -> Value {
    json!({ "success": true, "alunos": students })
}

pub fn response(body: Value) -> ApiResponse {
    ApiResponse::from_body(&body.to_string())
}

pub fn default_roster() -> Value {
    roster_json(vec![
        student(1, "Ana", 80.0, Some(7.5)),
        student(2, "Bruno", 65.0, Some(5.0)),
        student(3, "Carla", 40.0, None),
    ])
}

pub type TestController = ClassDetailController<FakeGateway, ManualTimers>;

pub struct Harness {
    pub gateway: Rc<FakeGateway>,
    pub ui: Rc<RecordingUi>,
    pub timers: ManualTimers,
    pub store: Rc<MemoryStore>,
    pub sessions: SessionAccessor,
    pub controller: Rc<TestController>,
}

pub fn harness(role: Role) -> Harness {
    harness_with(role, ClientConfig::default())
}

pub fn harness_with(role: Role, config: ClientConfig) -> Harness {
    let gateway = Rc::new(FakeGateway::default());
    let ui = Rc::new(RecordingUi::default());
    let timers = ManualTimers::default();
    let store = Rc::new(MemoryStore::new());
    let sessions = SessionAccessor::new(store.clone());
    sessions.save(&session(role)).unwrap();

    let ports = ViewPorts {
        roster: ui.clone(),
        class: ui.clone(),
        interaction: ui.clone(),
        shell: ui.clone(),
    };
    let controller = ClassDetailController::new(
        ViewContext::new(sessions.clone()),
        config,
        gateway.clone(),
        ports,
        timers.clone(),
    );

    Harness {
        gateway,
        ui,
        timers,
        store,
        sessions,
        controller,
    }
}

impl Harness {
    /// Script a loadable class 5 with the default roster and mount it.
    pub async fn mount_ready(&self) {
        self.gateway.respond(Method::GET, "turmas/5", class_json(5));
        self.gateway
            .respond(Method::GET, "turmas/5/alunos", default_roster());
        self.controller.mount(Some("5")).await;
    }
}
