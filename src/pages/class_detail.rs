use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use tracing::debug;
use wasm_bindgen_futures::spawn_local;

use turmaflow_core::api::types::ClassRecord;
use turmaflow_core::{
    ActionOutcome, ClassDetailController, ClassSink, HttpGateway, RosterSink, RosterView,
    ViewContext, ViewPorts,
};

use crate::browser::{self, BrowserTimers, BrowserUi};
use crate::components::class_header::ClassHeader;
use crate::components::stats::CohortStats;
use crate::components::student_table::StudentTable;
use crate::components::toast::Toasts;

type PageController = ClassDetailController<HttpGateway, BrowserTimers>;

struct SignalRoster(RwSignal<RosterView>);

impl RosterSink for SignalRoster {
    fn render(&self, view: &RosterView) {
        self.0.try_set(view.clone());
    }
}

struct SignalClass(RwSignal<Option<ClassRecord>>);

impl ClassSink for SignalClass {
    fn show_class(&self, class: &ClassRecord) {
        self.0.try_set(Some(class.clone()));
    }
}

/// Copyable access to the page's controller from event handlers.
#[derive(Clone, Copy)]
struct ControllerHandle(StoredValue<Rc<PageController>, LocalStorage>);

impl ControllerHandle {
    fn get(&self) -> Option<Rc<PageController>> {
        self.0.try_get_value()
    }

    fn run(&self, action: impl FnOnce(&PageController) -> ActionOutcome) {
        if let Some(controller) = self.get() {
            let outcome = action(&controller);
            debug!("Action finished: {:?}", outcome);
        }
    }

    fn spawn<F, Fut>(&self, action: F)
    where
        F: FnOnce(Rc<PageController>) -> Fut + 'static,
        Fut: Future<Output = ActionOutcome> + 'static,
    {
        if let Some(controller) = self.get() {
            spawn_local(async move {
                let outcome = action(controller).await;
                debug!("Action finished: {:?}", outcome);
            });
        }
    }
}

#[component]
pub fn ClassDetailPage() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let navigate = use_navigate();
    let query_id = use_query_map().with_untracked(|q| q.get("id"));

    let roster = RwSignal::new(RosterView::default());
    let class = RwSignal::new(None::<ClassRecord>);

    let ui = Rc::new(BrowserUi::new(toasts, move |path| {
        navigate(path, Default::default())
    }));
    let ports = ViewPorts {
        roster: Rc::new(SignalRoster(roster)),
        class: Rc::new(SignalClass(class)),
        interaction: ui.clone(),
        shell: ui,
    };
    let config = browser::config();
    let ctx = ViewContext::new(browser::sessions());
    let is_teacher = ctx.session.role.is_teacher();
    let gateway = Rc::new(browser::gateway(ctx.session.clone(), &config));
    let controller = ControllerHandle(StoredValue::new_local(ClassDetailController::new(
        ctx,
        config,
        gateway,
        ports,
        BrowserTimers,
    )));

    if let Some(c) = controller.get() {
        spawn_local(async move { c.mount(query_id.as_deref()).await });
    }
    // If the stored controller is already gone, dropping it has disarmed the timer.
    on_cleanup(move || {
        if let Some(c) = controller.get() {
            c.unmount();
        }
    });

    let on_copy = Callback::new(move |_: ()| controller.run(|c| c.copy_access_code()));
    let on_remove = Callback::new(move |student_id: String| {
        controller.spawn(move |c| async move { c.remove_student(&student_id).await })
    });
    let counts = Signal::derive(move || roster.with(|v| v.counts));

    view! {
        <div class="page class-detail-page">
            <ClassHeader class=class on_copy=on_copy />

            <Show when=move || is_teacher>
                <div class="toolbar">
                    <button class="btn btn-primary" on:click=move |_| controller.spawn(|c| async move { c.add_student().await })>
                        "Adicionar aluno"
                    </button>
                    <button class="btn" on:click=move |_| controller.run(|c| c.edit_class())>
                        "Editar turma"
                    </button>
                    <button class="btn" on:click=move |_| controller.spawn(|c| async move { c.generate_report().await })>
                        "Gerar relatório"
                    </button>
                    <button class="btn" on:click=move |_| controller.run(|c| c.export_students())>
                        "Exportar CSV"
                    </button>
                    <button class="btn btn-danger" on:click=move |_| controller.spawn(|c| async move { c.delete_class().await })>
                        "Excluir turma"
                    </button>
                </div>
                <CohortStats counts=counts />
            </Show>

            <div class="form-group">
                <input
                    type="search"
                    class="input"
                    placeholder="Buscar aluno..."
                    on:input=move |ev| {
                        let query = event_target_value(&ev);
                        if let Some(c) = controller.get() {
                            c.filter(&query);
                        }
                    }
                />
            </div>

            <StudentTable roster=roster on_remove=on_remove />
        </div>
    }
}
