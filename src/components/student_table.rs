use leptos::prelude::*;
use turmaflow_core::roster::table::{EMPTY_TEXT, EXPORT_HEADER, LOADING_TEXT};
use turmaflow_core::roster::{RenderedRow, TableBody};
use turmaflow_core::RosterView;

use crate::components::status_badge::StatusBadge;

const COLUMNS: usize = 6;

#[component]
pub fn StudentTable(
    roster: RwSignal<RosterView>,
    /// Called with the student id of the row whose remove button was clicked.
    on_remove: Callback<String>,
) -> impl IntoView {
    let placeholder = |class: &'static str, text: String| {
        view! {
            <tr class=class>
                <td colspan=COLUMNS.to_string()>{text}</td>
            </tr>
        }
        .into_any()
    };

    let body = move || match roster.with(|v| v.body.clone()) {
        TableBody::Loading => placeholder("row-loading", LOADING_TEXT.to_string()),
        TableBody::Error(message) => placeholder("row-error", message),
        TableBody::Empty => placeholder("row-empty", EMPTY_TEXT.to_string()),
        TableBody::Rows(rows) => rows
            .into_iter()
            .filter(|row| row.visible)
            .map(|row| student_row(row, on_remove))
            .collect_view()
            .into_any(),
    };

    view! {
        <table class="student-table">
            <thead>
                <tr>
                    {EXPORT_HEADER.iter().map(|h| view! { <th>{*h}</th> }).collect_view()}
                    <th>"Situação"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>{body}</tbody>
        </table>
    }
}

fn student_row(row: RenderedRow, on_remove: Callback<String>) -> impl IntoView {
    let [name, email, attendance, grade] = row.cells().map(str::to_string);
    let RenderedRow {
        student_id,
        status,
        removable,
        ..
    } = row;

    view! {
        <tr class="student-row">
            <td>{name}</td>
            <td>{email}</td>
            <td>{attendance}</td>
            <td>{grade}</td>
            <td><StatusBadge status=status /></td>
            <td>
                <Show when=move || removable>
                    <button
                        class="btn-small btn-danger"
                        on:click={
                            let student_id = student_id.clone();
                            move |_| on_remove.run(student_id.clone())
                        }
                    >
                        "Remover"
                    </button>
                </Show>
            </td>
        </tr>
    }
}
