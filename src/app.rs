use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::path;

use turmaflow_core::auth::{check_access, Access, LOGIN_PAGE};

use crate::browser;
use crate::components::sidebar::Sidebar;
use crate::components::toast::{ToastHost, Toasts};
use crate::pages::class_detail::ClassDetailPage;
use crate::pages::class_form::ClassFormPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;

#[component]
pub fn App() -> impl IntoView {
    provide_context(Toasts::new());

    view! {
        <Router>
            <AccessGuard />
            <div class="app-layout">
                <Shell />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Página não encontrada"</p> }>
                        <Route path=path!("/") view=LoginPage />
                        <Route path=path!("/index.html") view=LoginPage />
                        <Route path=path!("/dashboard/teacher") view=DashboardPage />
                        <Route path=path!("/dashboard/student") view=DashboardPage />
                        <Route path=path!("/turma") view=ClassDetailPage />
                        <Route path=path!("/create_class") view=ClassFormPage />
                    </Routes>
                </main>
            </div>
            <ToastHost />
        </Router>
    }
}

/// Sidebar everywhere except the login page.
#[component]
fn Shell() -> impl IntoView {
    let location = use_location();
    let on_login = move || location.pathname.with(|p| p == LOGIN_PAGE || p == "/index.html");

    view! {
        <Show when=move || !on_login()>
            <Sidebar />
        </Show>
    }
}

/// Sends visitors without the right session back to login on every navigation.
#[component]
fn AccessGuard() -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();

    Effect::new(move |_| {
        let path = location.pathname.get();
        if let Access::Redirect(target) = check_access(&path, &browser::sessions().read()) {
            navigate(target, Default::default());
        }
    });
}
