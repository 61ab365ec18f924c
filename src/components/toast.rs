use std::time::Duration;

use leptos::prelude::*;
use turmaflow_core::Level;

const TOAST_LIFETIME: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    level: Level,
    text: String,
}

/// App-wide notification queue, provided as context by `App`.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn push(&self, level: Level, text: &str) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.items.update(|items| {
            items.push(Toast {
                id,
                level,
                text: text.to_string(),
            })
        });

        let items = self.items;
        set_timeout(
            move || items.update(|items| items.retain(|t| t.id != id)),
            TOAST_LIFETIME,
        );
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<Toasts>();

    view! {
        <div class="toast-host">
            <For
                each=move || toasts.items.get()
                key=|toast| toast.id
                children=|toast| {
                    let class = match toast.level {
                        Level::Success => "toast toast-success",
                        Level::Error => "toast toast-error",
                        Level::Info => "toast toast-info",
                    };
                    view! { <div class=class>{toast.text}</div> }
                }
            />
        </div>
    }
}
