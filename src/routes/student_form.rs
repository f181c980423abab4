use crate::{
    data::{
        student::{COURSES, StudentDraft},
        validation::DraftField,
    },
    error::ErrorKind,
    maud_conveniences::{
        form_element, form_submit_button, input_classes, simple_form_element, title, toast,
    },
    routes::{
        notice::{Notice, navigate_to},
        student_path,
    },
    state::RegistrarState,
    view_state::form::{FormMode, StudentFormState},
};
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const FORM_ID: &str = "student_form";

pub async fn get_new_student(State(state): State<RegistrarState>) -> Markup {
    let form = StudentFormState::create(state.config().date_locale().today());
    state.render("/students/new", form_page(&form))
}

pub async fn get_edit_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
) -> Response {
    let mut form = StudentFormState::edit(id);
    if let Err(e) = form.load_existing(state.api()).await {
        warn!(?e, "Unable to load student for editing, returning to the list");
        return navigate_to(
            "/students",
            Notice::for_failure(&e, Notice::Unavailable),
            false,
        );
    }

    state.render("/students", form_page(&form)).into_response()
}

pub async fn post_new_student(
    State(state): State<RegistrarState>,
    Form(draft): Form<StudentDraft>,
) -> Response {
    submit(&state, FormMode::Create, draft).await
}

pub async fn put_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
    Form(draft): Form<StudentDraft>,
) -> Response {
    submit(&state, FormMode::Edit { id }, draft).await
}

async fn submit(state: &RegistrarState, mode: FormMode, draft: StudentDraft) -> Response {
    let mut form = StudentFormState::resume(mode, draft);

    match form.submit(state.api()).await {
        Ok(student) => {
            let notice = if form.is_edit() {
                Notice::Updated
            } else {
                Notice::Created
            };
            info!(id = %student.id, ?notice, "Student saved");
            navigate_to("/students", notice, true)
        }
        Err(e) => {
            if e.kind() == ErrorKind::ValidationFailure {
                debug!(?e, "Student draft rejected before submitting");
            } else {
                error!(?e, "Unable to save student");
            }

            let markup = html! {
                (student_form(&form))
                div id="toasts" hx-swap-oob="innerHTML" {
                    (toast(&e.user_message_or("Failed to save student"), true))
                }
            };
            (e.status_code(), markup).into_response()
        }
    }
}

fn form_page(form: &StudentFormState) -> Markup {
    html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-2xl w-full mb-8" {
            @if form.is_edit() {
                (title("Edit Student"))
            } @else {
                (title("Add New Student"))
            }
            (student_form(form))
        }
    }
}

fn student_form(form: &StudentFormState) -> Markup {
    let draft = &form.draft;
    let errors = form.errors();

    let (post_to, put_to) = match form.mode() {
        FormMode::Create => (Some("/students".to_string()), None),
        FormMode::Edit { id } => (None, Some(student_path(id))),
    };

    let clear_error = |field: DraftField| {
        format!(
            "htmx.find('#{0}_error').textContent = ''; this.classList.remove('border-red-500')",
            field.form_name()
        )
    };

    html! {
        form id=(FORM_ID) hx-post=[post_to] hx-put=[put_to]
            hx-target="this" hx-swap="outerHTML" hx-disabled-elt="find button[type='submit']" novalidate {
            @if let Some(message) = form.server_message() {
                div class="mb-4 rounded bg-red-900 text-red-200 px-4 py-3" {(message)}
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-x-6" {
                (simple_form_element(DraftField::Name, "Full Name", None, draft, errors))
                (simple_form_element(DraftField::Email, "Email", Some("email"), draft, errors))
                (simple_form_element(DraftField::Phone, "Phone Number", Some("tel"), draft, errors))
                (form_element(DraftField::Course.form_name(), "Course", errors.get(DraftField::Course), html! {
                    select id=(DraftField::Course.form_name()) name=(DraftField::Course.form_name())
                        class=(input_classes(errors.contains(DraftField::Course)))
                        hx-on-change=(clear_error(DraftField::Course)) {
                        option value="" selected[draft.course.is_empty()] {"Select a course"}
                        @for course in COURSES {
                            option value=(course) selected[draft.course == course] {(course)}
                        }
                    }
                }))
                (simple_form_element(DraftField::EnrollmentDate, "Enrollment Date", Some("date"), draft, errors))
            }

            (form_element(DraftField::Address.form_name(), "Address", errors.get(DraftField::Address), html! {
                textarea id=(DraftField::Address.form_name()) name=(DraftField::Address.form_name()) rows="3"
                    class=(input_classes(errors.contains(DraftField::Address)))
                    hx-on-input=(clear_error(DraftField::Address)) {
                    (draft.address)
                }
            }))

            div class="flex items-center justify-end space-x-4" {
                a href="/students" class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" {"Cancel"}
                @if form.is_edit() {
                    (form_submit_button("Update Student"))
                } @else {
                    (form_submit_button("Create Student"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_harness::{app_with, body_text, get, send};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };

    fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const VALID: &str = "name=Ada+Lovelace&email=ada%40example.com&phone=0123456789&address=12+Analytical+Row&course=Arts&enrollmentDate=2024-09-01";

    #[tokio::test]
    async fn new_form_defaults_to_today() {
        let (app, _service, state) = app_with(0).await;

        let html = body_text(get(&app, "/students/new").await).await;
        let today = state.config().date_locale().today().to_string();
        assert!(html.contains("Add New Student"));
        assert!(html.contains(&format!(r#"value="{today}""#)));
        assert!(html.contains(r#"hx-post="/students""#));
    }

    #[tokio::test]
    async fn edit_form_is_seeded() {
        let (app, service, _) = app_with(1).await;
        let student = service.students()[0].clone();

        let html = body_text(get(&app, &format!("/students/{}/edit", student.id)).await).await;
        assert!(html.contains("Edit Student"));
        assert!(html.contains(&format!(r#"value="{}""#, student.name)));
        assert!(html.contains(r#"<option value="Arts" selected>"#));
    }

    #[tokio::test]
    async fn invalid_submissions_stay_on_the_form() {
        let (app, service, _) = app_with(0).await;

        let response = send(&app, form_request("POST", "/students", "name=A&email=nope")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Name must be at least 2 characters long"));
        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains("Please fix the errors below"));
        assert!(service.students().is_empty());
    }

    #[tokio::test]
    async fn created_students_navigate_back_to_the_list() {
        let (app, service, _) = app_with(0).await;

        let response = send(&app, form_request("POST", "/students", VALID)).await;
        assert_eq!(response.headers()["HX-Redirect"], "/students?notice=created");
        assert_eq!(service.students().len(), 1);
        assert_eq!(service.students()[0].name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn updates_keep_the_record() {
        let (app, service, _) = app_with(1).await;
        let id = service.students()[0].id.clone();

        let response = send(&app, form_request("PUT", &format!("/students/{id}"), VALID)).await;
        assert_eq!(response.headers()["HX-Redirect"], "/students?notice=updated");
        assert_eq!(service.students()[0].id, id);
        assert_eq!(service.students()[0].name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn server_rejections_show_their_message() {
        let (app, _service, _) = app_with(0).await;

        let body = VALID.replace("Ada+Lovelace", "reject+me");
        let response = send(&app, form_request("POST", "/students", &body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Email already exists"));
        assert!(html.contains(r#"value="reject me""#));
    }
}
