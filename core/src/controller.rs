//! Class Detail Controller.
//!
//! Owns one class-detail view from mount to unmount: resolves the class id,
//! loads class metadata, delegates the table to the [`RosterLoader`], arms
//! the [`RefreshScheduler`] and runs the role-gated actions. Role checks here
//! only hide affordances; the server re-validates every privileged call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::types::ClassRecord;
use crate::api::{endpoints, Gateway, Method};
use crate::auth::{dashboard_for, CLASS_FORM, TEACHER_DASHBOARD};
use crate::config::ClientConfig;
use crate::roster::table::{EXPORT_FILENAME, EXPORT_MIME};
use crate::roster::{LoadOutcome, RosterLoader, RosterSink, RosterView};
use crate::scheduler::{RefreshScheduler, Tick, TimerBackend};
use crate::session::{Session, SessionAccessor};
use crate::status::CohortCounts;

pub const CLASS_LOAD_ERROR: &str = "Erro ao carregar turma.";
pub const NO_CLASS_MESSAGE: &str = "Nenhuma turma encontrada. Redirecionando...";
pub const NO_ACTIVE_CLASS: &str = "Nenhuma turma ativa.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

/// Transient notifications and yes/no or free-text prompts.
pub trait Interaction {
    fn notify(&self, level: Level, message: &str);
    fn confirm(&self, question: &str) -> bool;
    fn prompt(&self, question: &str) -> Option<String>;
}

/// Page shell: navigation and browser facilities the view reaches for.
pub trait Shell {
    fn navigate(&self, path: &str);
    fn redirect_after(&self, path: &str, delay: Duration);
    fn open_external(&self, url: &str);
    fn copy_text(&self, text: &str);
    fn download_text(&self, filename: &str, mime: &str, contents: &str);
}

/// Displays class metadata (name, description, code, averages).
pub trait ClassSink {
    fn show_class(&self, class: &ClassRecord);
}

#[derive(Clone)]
pub struct ViewPorts {
    pub roster: Rc<dyn RosterSink>,
    pub class: Rc<dyn ClassSink>,
    pub interaction: Rc<dyn Interaction>,
    pub shell: Rc<dyn Shell>,
}

/// Explicit per-view context: the session snapshot and its backing store.
#[derive(Clone)]
pub struct ViewContext {
    pub session: Session,
    pub sessions: SessionAccessor,
}

impl ViewContext {
    pub fn new(sessions: SessionAccessor) -> Self {
        Self {
            session: sessions.read(),
            sessions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    /// No class id could be resolved; a redirect is pending.
    NoClass,
    Loading,
    /// Class metadata could not be loaded; the page stays.
    LoadFailed,
    Ready,
    /// The class was deleted; a redirect is pending.
    Deleted,
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Wrong role; a denial was shown and nothing else happened.
    Denied,
    /// The user dismissed the prompt or confirmation.
    Cancelled,
    /// No class is open, or the view is gone.
    Unavailable,
    /// The server refused; its message was shown.
    Failed,
}

pub struct ClassDetailController<G: Gateway, T: TimerBackend> {
    ctx: ViewContext,
    config: ClientConfig,
    gateway: Rc<G>,
    roster: RosterLoader<G>,
    ports: ViewPorts,
    scheduler: RefCell<RefreshScheduler<T>>,
    state: Cell<ViewState>,
    class_id: RefCell<Option<String>>,
    class: RefCell<Option<ClassRecord>>,
}

impl<G: Gateway + 'static, T: TimerBackend + 'static> ClassDetailController<G, T> {
    pub fn new(
        ctx: ViewContext,
        config: ClientConfig,
        gateway: Rc<G>,
        ports: ViewPorts,
        timers: T,
    ) -> Rc<Self> {
        let roster = RosterLoader::new(
            gateway.clone(),
            ports.roster.clone(),
            ctx.session.role,
            config.failed_roster_counts,
        );
        let scheduler = RefreshScheduler::new(timers, config.refresh_interval());
        Rc::new(Self {
            ctx,
            config,
            gateway,
            roster,
            ports,
            scheduler: RefCell::new(scheduler),
            state: Cell::new(ViewState::Uninitialized),
            class_id: RefCell::new(None),
            class: RefCell::new(None),
        })
    }

    /// Mount the view. `query_id` is the `id` navigation parameter; when
    /// absent the last opened class pointer is used. Mounting twice is a no-op.
    pub async fn mount(self: &Rc<Self>, query_id: Option<&str>) {
        if self.state.get() != ViewState::Uninitialized {
            debug!("Class view already mounted ({:?})", self.state.get());
            return;
        }

        let class_id = query_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| self.ctx.sessions.last_class());

        let Some(class_id) = class_id else {
            warn!("No class id in query or storage");
            self.state.set(ViewState::NoClass);
            self.notify(Level::Error, NO_CLASS_MESSAGE);
            self.ports.shell.redirect_after(
                dashboard_for(self.ctx.session.role),
                self.config.no_class_redirect_delay(),
            );
            return;
        };

        self.state.set(ViewState::Loading);
        info!("Loading class {}", class_id);
        let response = self
            .gateway
            .call(&endpoints::class(&class_id), Method::GET, None)
            .await;
        if self.is_unmounted() {
            return;
        }

        let class = if response.success {
            response.field::<ClassRecord>("turma")
        } else {
            None
        };
        let Some(class) = class else {
            warn!("Failed to load class {}: {:?}", class_id, response.message);
            self.state.set(ViewState::LoadFailed);
            self.notify(Level::Error, &response.message_or(CLASS_LOAD_ERROR));
            return;
        };

        if let Err(e) = self.ctx.sessions.set_last_class(&class_id) {
            warn!("Failed to persist last opened class {}: {}", class_id, e);
        }
        *self.class_id.borrow_mut() = Some(class_id.clone());
        self.ports.class.show_class(&class);
        *self.class.borrow_mut() = Some(class);

        // Ready and armed before the first roster load, so a hung roster
        // request is superseded by the next tick instead of blocking the view.
        self.state.set(ViewState::Ready);
        self.arm_refresh(&class_id);
        self.roster.load(&class_id).await;
    }

    fn arm_refresh(self: &Rc<Self>, class_id: &str) {
        let weak = Rc::downgrade(self);
        let tick: Tick = Box::new(move || {
            let weak = weak.clone();
            Box::pin(async move {
                if let Some(controller) = weak.upgrade() {
                    controller.refresh().await;
                }
            })
        });
        self.scheduler.borrow_mut().arm(class_id, tick);
    }

    /// Tear the view down: the timer is released and in-flight responses
    /// are discarded. Terminal.
    pub fn unmount(&self) {
        if self.is_unmounted() {
            return;
        }
        self.state.set(ViewState::Unmounted);
        self.scheduler.borrow_mut().disarm();
        self.roster.close();
        info!("Class view unmounted");
    }

    /// Scheduled reload; does nothing unless the view is ready.
    pub async fn refresh(&self) -> Option<LoadOutcome> {
        if self.state.get() != ViewState::Ready {
            return None;
        }
        let class_id = self.class_id.borrow().clone()?;
        Some(self.roster.load(&class_id).await)
    }

    pub async fn add_student(&self) -> ActionOutcome {
        if !self.require_teacher("Apenas professores podem adicionar alunos.") {
            return ActionOutcome::Denied;
        }
        let Some(class_id) = self.active_class() else {
            return ActionOutcome::Unavailable;
        };
        let student_id = self
            .ports
            .interaction
            .prompt("Digite o ID do aluno para adicionar:")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let Some(student_id) = student_id else {
            return ActionOutcome::Cancelled;
        };

        info!("Enrolling student {} in class {}", student_id, class_id);
        let response = self
            .gateway
            .call(
                &endpoints::enroll_student(&class_id),
                Method::POST,
                Some(json!({ "alunoId": student_id })),
            )
            .await;
        if self.is_unmounted() {
            return ActionOutcome::Unavailable;
        }

        if response.success {
            self.notify(Level::Success, &response.message_or("Aluno adicionado!"));
            self.roster.load(&class_id).await;
            ActionOutcome::Done
        } else {
            self.notify(Level::Error, &response.message_or("Erro ao adicionar aluno."));
            ActionOutcome::Failed
        }
    }

    pub async fn remove_student(&self, student_id: &str) -> ActionOutcome {
        if !self.require_teacher("Apenas professores podem remover alunos.") {
            return ActionOutcome::Denied;
        }
        let Some(class_id) = self.active_class() else {
            return ActionOutcome::Unavailable;
        };
        if !self
            .ports
            .interaction
            .confirm("Deseja remover este aluno da turma?")
        {
            return ActionOutcome::Cancelled;
        }

        info!("Removing student {} from class {}", student_id, class_id);
        let response = self
            .gateway
            .call(
                &endpoints::unenroll_student(&class_id, student_id),
                Method::DELETE,
                None,
            )
            .await;
        if self.is_unmounted() {
            return ActionOutcome::Unavailable;
        }

        if response.success {
            self.notify(Level::Success, &response.message_or("Aluno removido."));
            self.roster.load(&class_id).await;
            ActionOutcome::Done
        } else {
            self.notify(Level::Error, &response.message_or("Erro ao remover aluno."));
            ActionOutcome::Failed
        }
    }

    /// Navigate to the class edit view; no mutation happens here.
    pub fn edit_class(&self) -> ActionOutcome {
        if !self.require_teacher("Apenas professores podem editar turmas.") {
            return ActionOutcome::Denied;
        }
        let Some(class_id) = self.active_class() else {
            return ActionOutcome::Unavailable;
        };
        self.ports.shell.navigate(&format!(
            "{}?id={}",
            CLASS_FORM,
            urlencoding::encode(&class_id)
        ));
        ActionOutcome::Done
    }

    pub async fn delete_class(&self) -> ActionOutcome {
        if !self.require_teacher("Apenas professores podem excluir turmas.") {
            return ActionOutcome::Denied;
        }
        let Some(class_id) = self.active_class() else {
            return ActionOutcome::Unavailable;
        };
        if !self.ports.interaction.confirm(
            "Tem certeza que deseja excluir esta turma? Essa ação não pode ser desfeita.",
        ) {
            return ActionOutcome::Cancelled;
        }

        info!("Deleting class {}", class_id);
        let body = json!({
            "userId": self.ctx.session.user_id,
            "role": self.ctx.session.role.as_str(),
        });
        let response = self
            .gateway
            .call(&endpoints::class(&class_id), Method::DELETE, Some(body))
            .await;
        if self.is_unmounted() {
            return ActionOutcome::Unavailable;
        }

        if !response.success {
            warn!("Failed to delete class {}: {:?}", class_id, response.message);
            self.notify(Level::Error, &response.message_or("Erro ao excluir turma."));
            return ActionOutcome::Failed;
        }

        self.notify(Level::Success, "Turma excluída com sucesso!");
        if let Err(e) = self.ctx.sessions.clear_last_class() {
            warn!("Failed to clear last opened class: {}", e);
        }
        self.state.set(ViewState::Deleted);
        self.scheduler.borrow_mut().disarm();
        self.roster.close();
        self.ports
            .shell
            .redirect_after(TEACHER_DASHBOARD, self.config.delete_redirect_delay());
        ActionOutcome::Done
    }

    /// Request the server-rendered PDF report and open it.
    pub async fn generate_report(&self) -> ActionOutcome {
        if !self.require_teacher("Apenas professores podem gerar relatórios.") {
            return ActionOutcome::Denied;
        }
        let Some(class_id) = self.active_class() else {
            return ActionOutcome::Unavailable;
        };

        self.notify(Level::Info, "Gerando relatório...");
        let response = self
            .gateway
            .call(&endpoints::class_report(&class_id), Method::GET, None)
            .await;
        if self.is_unmounted() {
            return ActionOutcome::Unavailable;
        }

        match response.field::<String>("pdf_url").filter(|_| response.success) {
            Some(url) => {
                self.notify(Level::Success, "Relatório gerado com sucesso!");
                self.ports.shell.open_external(&url);
                ActionOutcome::Done
            }
            None => {
                self.notify(Level::Error, &response.message_or("Erro ao gerar relatório."));
                ActionOutcome::Failed
            }
        }
    }

    /// Export exactly the rows currently visible, without refetching.
    pub fn export_students(&self) -> ActionOutcome {
        if !self.require_teacher("Apenas professores podem exportar listas.") {
            return ActionOutcome::Denied;
        }
        if self.is_unmounted() {
            return ActionOutcome::Unavailable;
        }
        let csv = self.roster.export_csv();
        self.ports
            .shell
            .download_text(EXPORT_FILENAME, EXPORT_MIME, &csv);
        self.notify(Level::Success, "Lista exportada com sucesso!");
        ActionOutcome::Done
    }

    /// Client-side name filter; open to every role.
    pub fn filter(&self, query: &str) {
        self.roster.filter(query);
    }

    pub fn copy_access_code(&self) -> ActionOutcome {
        if self.is_unmounted() {
            return ActionOutcome::Unavailable;
        }
        let code = self
            .class
            .borrow()
            .as_ref()
            .and_then(|c| c.access_code().map(str::to_string));
        let Some(code) = code else {
            self.notify(Level::Error, "Nenhum código de acesso disponível.");
            return ActionOutcome::Unavailable;
        };
        self.ports.shell.copy_text(&code);
        self.notify(Level::Success, &format!("Código \"{}\" copiado!", code));
        ActionOutcome::Done
    }

    fn require_teacher(&self, denial: &str) -> bool {
        if self.ctx.session.role.is_teacher() {
            return true;
        }
        warn!(
            "Denied teacher-only action for role {:?}",
            self.ctx.session.role
        );
        self.notify(Level::Error, denial);
        false
    }

    fn active_class(&self) -> Option<String> {
        let class_id = match self.state.get() {
            ViewState::Ready => self.class_id.borrow().clone(),
            _ => None,
        };
        if class_id.is_none() {
            self.notify(Level::Error, NO_ACTIVE_CLASS);
        }
        class_id
    }

    fn notify(&self, level: Level, message: &str) {
        self.ports.interaction.notify(level, message);
    }

    fn is_unmounted(&self) -> bool {
        self.state.get() == ViewState::Unmounted
    }

    pub fn state(&self) -> ViewState {
        self.state.get()
    }

    pub fn session(&self) -> &Session {
        &self.ctx.session
    }

    pub fn class_id(&self) -> Option<String> {
        self.class_id.borrow().clone()
    }

    pub fn class(&self) -> Option<ClassRecord> {
        self.class.borrow().clone()
    }

    pub fn roster_view(&self) -> RosterView {
        self.roster.view()
    }

    pub fn counts(&self) -> CohortCounts {
        self.roster.counts()
    }

    pub fn is_refresh_armed(&self) -> bool {
        self.scheduler.borrow().is_armed()
    }
}
