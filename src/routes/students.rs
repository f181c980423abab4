use crate::{
    data::{
        query::{ListQuery, ListQueryForm},
        student::{COURSES, Student},
    },
    maud_conveniences::{INPUT_CLASSES, pagination, render_table, title},
    routes::{
        notice::{Notice, NoticeQuery},
        student_path, url_value,
    },
    state::RegistrarState,
    view_state::{
        delete::DeleteOrigin,
        downloads::DownloadTracker,
        list::{ListStatus, StudentListState},
    },
};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

pub const FILTER_FORM_ID: &str = "student_filters";
pub const TABLE_ID: &str = "student_table";
/// Fired on `body` whenever the collection changed underneath the list.
pub const STUDENTS_CHANGED: &str = "students-changed";

pub async fn get_students(
    State(state): State<RegistrarState>,
    Query(notice): Query<NoticeQuery>,
) -> Markup {
    let initial = ListQuery::first_page(state.page_size());

    state.render_with_toast(
        "/students",
        notice.notice().map(Notice::toast),
        html! {
            div class="container mx-auto max-w-6xl w-full px-4 pb-8" {
                div class="flex flex-row items-center justify-between" {
                    (title("Students"))
                    a href="/students/new" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" {
                        "Add Student"
                    }
                }

                form id=(FILTER_FORM_ID) hx-get="/internal/students" hx-target={"#" (TABLE_ID)}
                    hx-trigger={"load, input changed delay:300ms from:#search, change from:#course, submit, " (STUDENTS_CHANGED) " from:body"}
                    hx-sync="this:replace" class="flex flex-col md:flex-row gap-4 mb-4" {
                    input type="search" id="search" name="search" autocomplete="off" placeholder="Search by name, email, or student ID..." class=(INPUT_CLASSES) {}
                    select id="course" name="course" class=(INPUT_CLASSES) {
                        option value="" {"All Courses"}
                        @for course in COURSES {
                            option value=(course) {(course)}
                        }
                    }
                    (applied_inputs(&initial, 1, false))
                }

                div id=(TABLE_ID) {
                    p class="text-gray-400" {"Loading students..."}
                }
            }
        },
    )
}

pub async fn internal_get_students(
    State(state): State<RegistrarState>,
    Query(form): Query<ListQueryForm>,
) -> Response {
    let mut list = StudentListState::restore(&form, state.page_size(), state.downloads().clone());
    list.apply_form(&form);
    match list.fetch(state.api()).await {
        Ok(()) => student_table(&list, &state).into_response(),
        Err(e) => e.into_response_or("Failed to fetch students"),
    }
}

///the hidden half of the filter form: what the table on screen was built from
fn applied_inputs(query: &ListQuery, total_pages: u32, oob: bool) -> Markup {
    html! {
        div id="list_applied" hx-swap-oob=[oob.then_some("true")] {
            input type="hidden" name="applied_search" value=(query.search) {}
            input type="hidden" name="applied_course" value=(query.course) {}
            input type="hidden" name="current_page" value=(query.page) {}
            input type="hidden" name="total_pages" value=(total_pages) {}
        }
    }
}

fn student_table(list: &StudentListState, state: &RegistrarState) -> Markup {
    let date_locale = state.config().date_locale();

    let rows = list
        .students()
        .iter()
        .map(|student| {
            [
                html! {
                    div class="font-medium" {(student.name)}
                    div class="text-sm text-gray-400" {(student.student_id)}
                },
                html! {
                    div {(student.email)}
                    div class="text-sm text-gray-400" {(student.phone)}
                },
                html! {
                    span class="px-2 py-1 text-xs rounded-full bg-blue-900 text-blue-200" {(student.course)}
                },
                html! {(date_locale.calendar_date_or_iso(student.enrollment_date))},
                row_actions(student, list.downloads()),
            ]
        })
        .collect();

    html! {
        (applied_inputs(list.query(), list.total_pages(), true))

        @if list.status() == ListStatus::Empty {
            p class="text-center text-gray-400 py-8" {"No students found"}
        } @else {
            (render_table(["Student", "Contact", "Course", "Enrollment Date", "Actions"], rows))
        }

        (pagination(
            list.query().page,
            list.total_pages(),
            "/internal/students",
            FILTER_FORM_ID,
            &format!("#{TABLE_ID}"),
        ))
    }
}

pub fn row_actions(student: &Student, downloads: &DownloadTracker) -> Markup {
    html! {
        div class="flex flex-row space-x-3 text-sm" {
            a href=(student_path(&student.id)) class="text-blue-400 hover:underline" {"View"}
            a href={(student_path(&student.id)) "/edit"} class="text-green-400 hover:underline" {"Edit"}
            (download_link(student, DeleteOrigin::List, downloads))
            button class="text-red-400 hover:underline" hx-get={"/internal" (student_path(&student.id)) "/confirm_delete"}
                hx-vals=(serde_json::json!({"from": DeleteOrigin::List.as_str(), "name": student.name}).to_string())
                hx-target="#modal" {
                "Delete"
            }
        }
    }
}

/// A plain link, so the browser handles the attachment itself.
pub fn download_link(student: &Student, from: DeleteOrigin, downloads: &DownloadTracker) -> Markup {
    html! {
        @if downloads.is_downloading(&student.id) {
            span class="text-gray-400 italic" {"Generating..."}
        } @else {
            a href={(student_path(&student.id)) "/admission-form?from=" (from.as_str()) "&student_id=" (url_value(&student.student_id))}
                class="text-purple-400 hover:underline" {
                "Download Form"
            }
        }
    }
}
