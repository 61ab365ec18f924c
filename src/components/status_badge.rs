use leptos::prelude::*;
use turmaflow_core::Status;

#[component]
pub fn StatusBadge(status: Status) -> impl IntoView {
    let class = format!("status-badge status-{}", status.bucket());

    view! { <span class=class>{status.label()}</span> }
}
