use crate::{
    routes::{
        admission_form::get_admission_form,
        delete_student::{delete_student, internal_get_confirm_delete},
        health::get_health,
        student_form::{get_edit_student, get_new_student, post_new_student, put_student},
        student_in_detail::get_student,
        students::{get_students, internal_get_students},
    },
    state::RegistrarState,
};
use axum::{Router, routing::get};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub mod admission_form;
pub mod delete_student;
pub mod health;
pub mod notice;
pub mod student_form;
pub mod student_in_detail;
pub mod students;

///everything but unreserved characters, so a value can't add segments or a query
const URL_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

pub fn url_value(value: &str) -> String {
    utf8_percent_encode(value, URL_VALUE).to_string()
}

/// `/students/{id}` with the id escaped as exactly one path segment.
pub fn student_path(id: &str) -> String {
    format!("/students/{}", url_value(id))
}

pub fn router(state: RegistrarState) -> Router {
    Router::new()
        .route("/", get(get_students))
        .route("/students", get(get_students).post(post_new_student))
        .route("/students/new", get(get_new_student))
        .route(
            "/students/{id}",
            get(get_student).put(put_student).delete(delete_student),
        )
        .route("/students/{id}/edit", get(get_edit_student))
        .route("/students/{id}/admission-form", get(get_admission_form))
        .route("/internal/students", get(internal_get_students))
        .route(
            "/internal/students/{id}/confirm_delete",
            get(internal_get_confirm_delete),
        )
        .route("/health", get(get_health))
        .with_state(state)
}

#[cfg(test)]
pub mod test_harness {
    use crate::{
        api::HttpStudentApi, config::RuntimeConfiguration, routes::router,
        state::RegistrarState, test_support::{FakeStudentService, RecordingObserver},
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, Response},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    pub async fn app_with(count: usize) -> (Router, FakeStudentService, RegistrarState) {
        let service = FakeStudentService::start_with(count).await;
        let base_url = service.base_url().to_string();
        let config = RuntimeConfiguration::from_lookup(move |name| match name {
            "STUDENTS_API_URL" => Some(base_url.clone()),
            "STUDENTS_API_TIMEOUT_MS" => Some("2000".to_string()),
            _ => None,
        })
        .unwrap();
        let api =
            HttpStudentApi::new(&config.api_config(), Arc::new(RecordingObserver::default()))
                .unwrap();
        let state = RegistrarState::with_api(api, config);

        (router(state.clone()), service, state)
    }

    pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
        app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(app: &Router, uri: &str) -> Response<Body> {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
