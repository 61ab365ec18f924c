use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use turmaflow_core::auth::{self, dashboard_for};
use turmaflow_core::Session;

use crate::browser;

#[component]
pub fn Sidebar() -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();

    // Re-read on every navigation so login and logout show up immediately.
    let session = Memo::new(move |_| {
        location.pathname.track();
        browser::sessions().read()
    });

    let logout = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Deseja realmente sair?").ok())
            .unwrap_or(false);
        if confirmed {
            auth::logout(&browser::sessions());
            navigate(auth::LOGIN_PAGE, Default::default());
        }
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"TurmaFlow"</h1>
                <p class="sidebar-subtitle">{move || session.with(|s: &Session| s.role.label())}</p>
            </div>
            <p class="sidebar-welcome">
                {move || session.with(|s| format!("Olá, {}", s.display_name()))}
            </p>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href=move || session.with(|s| dashboard_for(s.role)) class="nav-link">
                        "Minhas turmas"
                    </a>
                </li>
                <li class="nav-item">
                    <button class="nav-link btn-logout" on:click=logout>"Sair"</button>
                </li>
            </ul>
        </nav>
    }
}
