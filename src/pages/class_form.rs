use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use wasm_bindgen_futures::spawn_local;

use turmaflow_core::auth::TEACHER_DASHBOARD;
use turmaflow_core::class_editor::{self, ClassDraft};
use turmaflow_core::Level;

use crate::browser;
use crate::components::toast::Toasts;

/// Create a class, or edit the one named by `?id=`.
#[component]
pub fn ClassFormPage() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let navigate = use_navigate();
    let class_id = use_query_map()
        .with_untracked(|q| q.get("id"))
        .filter(|id| !id.trim().is_empty());
    let editing = class_id.is_some();

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (saving, set_saving) = signal(false);

    // Prefill when editing
    if let Some(id) = class_id.clone() {
        Effect::new(move |_| {
            let id = id.clone();
            spawn_local(async move {
                let gateway = browser::gateway(browser::sessions().read(), &browser::config());
                match class_editor::load_for_edit(&gateway, &id).await {
                    Ok(draft) => {
                        set_name.set(draft.name);
                        set_description.set(draft.description);
                    }
                    Err(e) => toasts.push(Level::Error, &String::from(e)),
                }
            });
        });
    }

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        set_saving.set(true);

        let draft = ClassDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
        };
        let class_id = class_id.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let config = browser::config();
            let session = browser::sessions().read();
            let gateway = browser::gateway(session.clone(), &config);
            match class_editor::save_class(&gateway, &session, class_id.as_deref(), &draft).await {
                Ok(message) => {
                    toasts.push(Level::Success, &message);
                    set_timeout(
                        move || navigate(TEACHER_DASHBOARD, Default::default()),
                        config.save_redirect_delay(),
                    );
                }
                Err(e) => {
                    toasts.push(Level::Error, &String::from(e));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <div class="page class-form-page">
            <h2>{if editing { "Editar turma" } else { "Nova turma" }}</h2>

            <form class="class-form" on:submit=submit>
                <div class="form-group">
                    <label for="className">"Nome"</label>
                    <input
                        id="className"
                        type="text"
                        class="input"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="classDesc">"Descrição"</label>
                    <input
                        id="classDesc"
                        type="text"
                        class="input"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    />
                </div>
                <div class="input-row">
                    <button class="btn btn-primary" type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Salvando..." } else { "Salvar" }}
                    </button>
                    <a class="btn" href=TEACHER_DASHBOARD>"Cancelar"</a>
                </div>
            </form>
        </div>
    }
}
