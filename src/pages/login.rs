use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use turmaflow_core::auth::{self, dashboard_for};
use turmaflow_core::{Level, Role, Session};

use crate::browser;
use crate::components::toast::Toasts;

#[component]
pub fn LoginPage() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (role, set_role) = signal(String::from("teacher"));
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_submitting.set(true);
        set_error.set(None);

        let email = email.get_untracked();
        let password = password.get_untracked();
        let role = Role::parse(&role.get_untracked());
        let navigate = navigate.clone();
        spawn_local(async move {
            let config = browser::config();
            let gateway = browser::gateway(Session::default(), &config);
            match auth::login(&gateway, &browser::sessions(), &email, &password, role).await {
                Ok(session) => {
                    toasts.push(Level::Success, "Login realizado com sucesso!");
                    let target = dashboard_for(session.role);
                    set_timeout(
                        move || navigate(target, Default::default()),
                        config.login_redirect_delay(),
                    );
                }
                Err(e) => {
                    set_error.set(Some(e.into()));
                    set_submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="page login-page">
            <h2>"TurmaFlow"</h2>
            <p class="page-description">"Entre com sua conta para acessar suas turmas."</p>

            <form class="login-form" on:submit=submit>
                <div class="form-group">
                    <label for="email">"E-mail"</label>
                    <input
                        id="email"
                        type="email"
                        class="input"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="password">"Senha"</label>
                    <input
                        id="password"
                        type="password"
                        class="input"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="role">"Perfil"</label>
                    <select
                        id="role"
                        class="input"
                        prop:value=move || role.get()
                        on:change=move |ev| set_role.set(event_target_value(&ev))
                    >
                        <option value="teacher">"Professor"</option>
                        <option value="student">"Aluno"</option>
                    </select>
                </div>

                <button class="btn btn-primary" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Entrando..." } else { "Entrar" }}
                </button>

                <Show when=move || error.get().is_some()>
                    <span class="status-text status-error">{move || error.get().unwrap_or_default()}</span>
                </Show>
            </form>
        </div>
    }
}
