use crate::{
    api::StudentApi,
    data::student::Student,
    maud_conveniences::{Email, subtitle},
    routes::{
        notice::{Notice, NoticeQuery, navigate_to},
        student_path,
        students::download_link,
    },
    state::RegistrarState,
    view_state::delete::DeleteOrigin,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

pub async fn get_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let student = match state.api().get(&id).await {
        Ok(student) => student,
        Err(e) => {
            warn!(?e, %id, "Unable to show student, returning to the list");
            return navigate_to(
                "/students",
                Notice::for_failure(&e, Notice::Unavailable),
                false,
            );
        }
    };

    state
        .render_with_toast(
            "/students",
            notice.notice().map(Notice::toast),
            student_in_detail(&student, &state),
        )
        .into_response()
}

fn detail_row(label: &str, value: Markup) -> Markup {
    html! {
        div class="py-2" {
            p class="text-sm text-gray-400" {(label)}
            p class="text-gray-200 font-medium" {(value)}
        }
    }
}

fn student_in_detail(student: &Student, state: &RegistrarState) -> Markup {
    let date_locale = state.config().date_locale();

    html! {
        div class="container mx-auto max-w-3xl w-full px-4 pb-8" {
            a href="/students" class="text-blue-400 hover:underline" {"← Back to Students"}

            div class="rounded-lg shadow-md overflow-hidden bg-gray-800 mt-4" {
                div class="p-6 flex flex-row items-center justify-between" {
                    div class="flex flex-row items-center space-x-4" {
                        div class="h-16 w-16 rounded-full bg-blue-600 flex items-center justify-center text-2xl font-bold" {
                            (student.initial())
                        }
                        div {
                            h1 class="text-2xl font-semibold" {(student.name)}
                            p class="text-gray-400" {"Student ID: " (student.student_id)}
                        }
                    }
                    div class="flex flex-row items-center space-x-3" {
                        (download_link(student, DeleteOrigin::Detail, state.downloads()))
                        a href={(student_path(&student.id)) "/edit"} class="bg-green-600 hover:bg-green-800 font-bold py-2 px-4 rounded" {"Edit"}
                        button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-get={"/internal" (student_path(&student.id)) "/confirm_delete"}
                            hx-vals=(serde_json::json!({"from": DeleteOrigin::Detail.as_str(), "name": student.name}).to_string())
                            hx-target="#modal" {
                            "Delete"
                        }
                    }
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-6 p-6 border-t border-gray-700" {
                    div {
                        (subtitle("Contact Information"))
                        (detail_row("Email", html! {(Email(&student.email))}))
                        (detail_row("Phone", html! {(student.phone)}))
                        (detail_row("Address", html! {(student.address)}))
                    }
                    div {
                        (subtitle("Academic Information"))
                        (detail_row("Student ID", html! {(student.student_id)}))
                        (detail_row("Course", html! {(student.course)}))
                        (detail_row("Enrollment Date", html! {(date_locale.calendar_date_or_iso(student.enrollment_date))}))
                        @if let Some(created_at) = student.created_at {
                            (detail_row("Created At", html! {(date_locale.timestamp_or_iso(created_at))}))
                        }
                    }
                }
            }
        }
    }
}
