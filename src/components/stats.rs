use leptos::prelude::*;
use turmaflow_core::CohortCounts;

#[component]
pub fn CohortStats(counts: Signal<CohortCounts>) -> impl IntoView {
    view! {
        <div class="cohort-stats">
            <div class="stat-card stat-success">
                <span class="stat-value">{move || counts.get().approved}</span>
                <span class="stat-label">"Aprovados"</span>
            </div>
            <div class="stat-card stat-warning">
                <span class="stat-value">{move || counts.get().recovery}</span>
                <span class="stat-label">"Em recuperação"</span>
            </div>
            <div class="stat-card stat-danger">
                <span class="stat-value">{move || counts.get().failed}</span>
                <span class="stat-label">"Reprovados"</span>
            </div>
        </div>
    }
}
