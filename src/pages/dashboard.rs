use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use turmaflow_core::api::types::ClassSummary;
use turmaflow_core::auth::CLASS_FORM;
use turmaflow_core::dashboard::{self, DashboardSummary};
use turmaflow_core::Level;

use crate::browser;
use crate::components::toast::Toasts;

/// Class list and summary cards; serves both dashboards, keyed on the session role.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let session = browser::sessions().read();
    let is_teacher = session.role.is_teacher();

    let (classes, set_classes) = signal::<Vec<ClassSummary>>(vec![]);
    let (summary, set_summary) = signal::<Option<DashboardSummary>>(None);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);
    let (reload, set_reload) = signal(0u32);

    // Load classes and summary on mount and after every delete
    Effect::new(move |_| {
        reload.track();
        let session = session.clone();
        spawn_local(async move {
            let gateway = browser::gateway(session.clone(), &browser::config());
            match dashboard::load_classes(&gateway, &session).await {
                Ok(list) => set_classes.set(list),
                Err(e) => set_error.set(Some(e.into())),
            }
            set_loading.set(false);

            match dashboard::load_summary(&gateway, session.role).await {
                Ok(s) => set_summary.set(Some(s)),
                Err(e) => tracing::warn!("Dashboard summary unavailable: {}", e),
            }
        });
    });

    // The link itself navigates; the click only records the last opened class.
    let remember = move |class_id: &str| {
        if let Err(e) = dashboard::open_class(&browser::sessions(), class_id) {
            toasts.push(Level::Error, &String::from(e));
        }
    };

    let delete = move |class_id: String| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message("Tem certeza que deseja excluir esta turma?")
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            let sessions = browser::sessions();
            let session = sessions.read();
            let gateway = browser::gateway(session.clone(), &browser::config());
            match dashboard::delete_class(&gateway, &sessions, &session, &class_id).await {
                Ok(message) => {
                    toasts.push(Level::Success, &message);
                    set_reload.update(|n| *n += 1);
                }
                Err(e) => toasts.push(Level::Error, &String::from(e)),
            }
        });
    };

    view! {
        <div class="page dashboard-page">
            <h2>{if is_teacher { "Minhas turmas" } else { "Turmas matriculadas" }}</h2>
            <Show when=move || is_teacher>
                <a class="btn btn-primary" href=CLASS_FORM>"Nova turma"</a>
            </Show>

            {move || summary.get().map(|s| match s {
                DashboardSummary::Teacher { classes, activities } => view! {
                    <div class="summary-cards">
                        <div class="stat-card"><span class="stat-value">{classes}</span><span class="stat-label">"Turmas"</span></div>
                        <div class="stat-card"><span class="stat-value">{activities}</span><span class="stat-label">"Atividades"</span></div>
                    </div>
                }.into_any(),
                DashboardSummary::Student { pending, attendance } => view! {
                    <div class="summary-cards">
                        <div class="stat-card"><span class="stat-value">{pending}</span><span class="stat-label">"Pendentes"</span></div>
                        <div class="stat-card"><span class="stat-value">{format!("{}%", attendance)}</span><span class="stat-label">"Frequência"</span></div>
                    </div>
                }.into_any(),
            })}

            <Show when=move || loading.get()>
                <p class="status-text">"Carregando turmas..."</p>
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="status-text status-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() && error.get().is_none() && classes.get().is_empty()>
                <p class="status-text">"Nenhuma turma encontrada."</p>
            </Show>

            <div class="class-grid">
                {move || classes.get().into_iter().map(|c| {
                    let id = c.id.clone();
                    let delete_id = c.id.clone();
                    let href = dashboard::class_path(&c.id);
                    view! {
                        <div class="class-card">
                            <a class="class-card-link" href=href on:click=move |_| remember(&id)>
                                <h3 class="class-card-title">{c.name.clone()}</h3>
                                <p class="class-card-description">{c.description.clone().unwrap_or_else(|| "Sem descrição".to_string())}</p>
                                <div class="class-card-meta">
                                    <span>{format!("{} alunos", c.student_count)}</span>
                                    <span>{c.teacher_name.clone().unwrap_or_default()}</span>
                                </div>
                            </a>
                            <Show when=move || is_teacher>
                                <button
                                    class="btn-small btn-danger"
                                    on:click={
                                        let delete_id = delete_id.clone();
                                        move |_| delete(delete_id.clone())
                                    }
                                >
                                    "Excluir"
                                </button>
                            </Show>
                        </div>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}
