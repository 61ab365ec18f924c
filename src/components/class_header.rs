use leptos::prelude::*;
use turmaflow_core::api::types::ClassRecord;

/// Class name, description, access code and averages.
#[component]
pub fn ClassHeader(
    class: RwSignal<Option<ClassRecord>>,
    /// Copies the access code to the clipboard.
    on_copy: Callback<()>,
) -> impl IntoView {
    view! {
        {move || match class.get() {
            None => view! { <div class="class-header class-header-empty"><h2>"Turma"</h2></div> }.into_any(),
            Some(c) => view! {
                <div class="class-header">
                    <h2 class="class-name">{c.name.clone()}</h2>
                    <p class="class-description">{c.description_display()}</p>
                    <div class="class-meta">
                        <div class="access-code">
                            <span class="access-code-label">"Código de acesso"</span>
                            <span class="access-code-value">{c.access_code_display()}</span>
                            <button class="btn-small" on:click=move |_| on_copy.run(())>"Copiar"</button>
                        </div>
                        <div class="class-metric">
                            <span class="metric-label">"Alunos"</span>
                            <span class="metric-value">{c.total_students_display()}</span>
                        </div>
                        <div class="class-metric">
                            <span class="metric-label">"Média geral"</span>
                            <span class="metric-value">{c.average_grade_display()}</span>
                        </div>
                        <div class="class-metric">
                            <span class="metric-label">"Frequência média"</span>
                            <span class="metric-value">{c.average_attendance_display()}</span>
                        </div>
                    </div>
                </div>
            }.into_any(),
        }}
    }
}
