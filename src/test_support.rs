//! In-memory doubles of the student service shared by the unit tests.

use crate::{
    api::{
        AdmissionForm, HealthReport, ListPage, StudentApi,
        observer::{ApiObserver, FailureEvent, RequestEvent, ResponseEvent},
    },
    data::{
        query::ListQuery,
        student::{Student, StudentDraft, parse_calendar_date},
    },
    error::{RegistrarError, RegistrarResult},
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jiff::{Timestamp, civil::date};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

pub const REJECTED_NAME: &str = "reject me";
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%fake admission form\n";

pub fn sample_student(id: &str, name: &str) -> Student {
    Student {
        id: id.to_string(),
        student_id: format!("STU{id:0>4}"),
        name: name.to_string(),
        email: format!("student{id}@example.com"),
        phone: "0123456789".to_string(),
        address: "1 College Road".to_string(),
        course: "Arts".to_string(),
        enrollment_date: date(2024, 9, 1),
        created_at: None,
    }
}

pub fn sample_draft(name: &str) -> StudentDraft {
    StudentDraft {
        name: name.to_string(),
        email: "ada@example.com".to_string(),
        phone: "012 345 6789".to_string(),
        address: "12 Analytical Row".to_string(),
        course: "Computer Science".to_string(),
        enrollment_date: "2024-09-01".to_string(),
    }
}

#[derive(Debug)]
enum StoreError {
    Missing,
    Rejected(&'static str),
}

/// The collection both doubles serve from.
#[derive(Debug, Default)]
struct StudentStore {
    students: Vec<Student>,
    issued: u32,
}

impl StudentStore {
    fn with_students(students: Vec<Student>) -> Self {
        Self {
            issued: u32::try_from(students.len()).unwrap_or(u32::MAX),
            students,
        }
    }

    fn list(&self, query: &ListQuery) -> ListPage {
        let search = query.search.to_lowercase();
        let matching: Vec<_> = self
            .students
            .iter()
            .filter(|s| query.course.is_empty() || s.course == query.course)
            .filter(|s| {
                search.is_empty()
                    || s.name.to_lowercase().contains(&search)
                    || s.email.to_lowercase().contains(&search)
                    || s.student_id.to_lowercase().contains(&search)
            })
            .collect();

        let limit = query.limit.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * limit;
        ListPage {
            total_pages: u32::try_from(matching.len().div_ceil(limit)).unwrap_or(u32::MAX),
            students: matching.into_iter().skip(skip).take(limit).cloned().collect(),
        }
    }

    fn get(&self, id: &str) -> Result<Student, StoreError> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::Missing)
    }

    fn create(&mut self, draft: &StudentDraft) -> Result<Student, StoreError> {
        if draft.name == REJECTED_NAME {
            return Err(StoreError::Rejected("Email already exists"));
        }

        self.issued += 1;
        let student = Student {
            id: format!("{:024x}", self.issued),
            student_id: format!("STU{:04}", self.issued),
            created_at: Some(Timestamp::now()),
            ..apply_draft(sample_student("", ""), draft)
        };
        self.students.push(student.clone());
        Ok(student)
    }

    fn update(&mut self, id: &str, draft: &StudentDraft) -> Result<Student, StoreError> {
        let slot = self
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::Missing)?;
        *slot = apply_draft(slot.clone(), draft);
        Ok(slot.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        if self.students.len() == before {
            Err(StoreError::Missing)
        } else {
            Ok(())
        }
    }
}

fn apply_draft(mut student: Student, draft: &StudentDraft) -> Student {
    student.name.clone_from(&draft.name);
    student.email.clone_from(&draft.email);
    student.phone.clone_from(&draft.phone);
    student.address.clone_from(&draft.address);
    student.course.clone_from(&draft.course);
    if let Ok(enrolled) = parse_calendar_date(&draft.enrollment_date) {
        student.enrollment_date = enrolled;
    }
    student
}

fn into_api_error(error: StoreError, resource: &str) -> RegistrarError {
    match error {
        StoreError::Missing => RegistrarError::NotFound {
            resource: resource.to_string(),
        },
        StoreError::Rejected(message) => RegistrarError::Server {
            url: resource.to_string(),
            status: StatusCode::BAD_REQUEST,
            message: Some(message.to_string()),
        },
    }
}

/// A [`StudentApi`] that never leaves the process and records every call.
#[derive(Debug, Default)]
pub struct MockApi {
    store: Mutex<StudentStore>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            store: Mutex::new(StudentStore::with_students(students)),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl StudentApi for MockApi {
    async fn list(&self, query: &ListQuery) -> RegistrarResult<ListPage> {
        self.record(format!(
            "list page={} search={} course={}",
            query.page, query.search, query.course
        ));
        let mut page = self.store.lock().unwrap().list(query);
        page.total_pages = page.total_pages.max(1);
        Ok(page)
    }

    async fn get(&self, id: &str) -> RegistrarResult<Student> {
        self.record(format!("get {id}"));
        self.store
            .lock()
            .unwrap()
            .get(id)
            .map_err(|e| into_api_error(e, id))
    }

    async fn create(&self, draft: &StudentDraft) -> RegistrarResult<Student> {
        self.record(format!("create {}", draft.name));
        self.store
            .lock()
            .unwrap()
            .create(draft)
            .map_err(|e| into_api_error(e, "students"))
    }

    async fn update(&self, id: &str, draft: &StudentDraft) -> RegistrarResult<Student> {
        self.record(format!("update {id}"));
        self.store
            .lock()
            .unwrap()
            .update(id, draft)
            .map_err(|e| into_api_error(e, id))
    }

    async fn delete(&self, id: &str) -> RegistrarResult<()> {
        self.record(format!("delete {id}"));
        self.store
            .lock()
            .unwrap()
            .delete(id)
            .map_err(|e| into_api_error(e, id))
    }

    async fn generate_document(&self, id: &str) -> RegistrarResult<AdmissionForm> {
        self.record(format!("generate {id}"));
        self.store
            .lock()
            .unwrap()
            .get(id)
            .map_err(|e| into_api_error(e, id))?;
        Ok(AdmissionForm {
            bytes: Bytes::from_static(FAKE_PDF),
            content_type: "application/pdf".to_string(),
        })
    }

    async fn health(&self) -> RegistrarResult<HealthReport> {
        self.record("health".to_string());
        Ok(HealthReport {
            status: StatusCode::OK,
            body: r#"{"status":"ok"}"#.to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver(Mutex<Vec<String>>);

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ApiObserver for RecordingObserver {
    fn on_request(&self, event: RequestEvent<'_>) {
        self.0
            .lock()
            .unwrap()
            .push(format!("request {} {}", event.method, event.url));
    }

    fn on_response(&self, event: ResponseEvent<'_>) {
        self.0.lock().unwrap().push(format!(
            "response {} {} {}",
            event.method, event.url, event.status
        ));
    }

    fn on_failure(&self, event: FailureEvent<'_>) {
        self.0.lock().unwrap().push(format!(
            "failure {} {} {:?}",
            event.method,
            event.url,
            event.error.kind()
        ));
    }
}

#[derive(Clone, Default)]
struct FakeState {
    store: Arc<Mutex<StudentStore>>,
    last_list_query: Arc<Mutex<Option<HashMap<String, String>>>>,
}

/// A loopback HTTP server speaking the student service's REST contract.
///
/// `slow` never answers in time and `locked` is always unauthorised.
pub struct FakeStudentService {
    base_url: String,
    state: FakeState,
}

impl FakeStudentService {
    pub async fn start_with(count: usize) -> Self {
        let students = (1..=count)
            .map(|i| {
                let mut student = sample_student(&i.to_string(), &format!("Student {i}"));
                student.created_at = Some(Timestamp::UNIX_EPOCH);
                student
            })
            .collect();
        let state = FakeState {
            store: Arc::new(Mutex::new(StudentStore::with_students(students))),
            last_list_query: Arc::default(),
        };

        let app = Router::new()
            .route("/api/health", get(|| async { Json(serde_json::json!({"status": "ok"})) }))
            .route("/api/students", get(fake_list).post(fake_create))
            .route(
                "/api/students/{id}",
                get(fake_get).put(fake_update).delete(fake_delete),
            )
            .route(
                "/api/students/{id}/generate-admission-form",
                post(fake_generate),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn students(&self) -> Vec<Student> {
        self.state.store.lock().unwrap().students.clone()
    }

    pub fn last_list_query(&self) -> Option<HashMap<String, String>> {
        self.state.last_list_query.lock().unwrap().clone()
    }
}

fn fake_error(error: StoreError) -> Response {
    match error {
        StoreError::Missing => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"message": "Student not found"})),
        )
            .into_response(),
        StoreError::Rejected(message) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": message})),
        )
            .into_response(),
    }
}

async fn special_case(id: &str) -> Option<Response> {
    match id {
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            None
        }
        "locked" => Some(StatusCode::UNAUTHORIZED.into_response()),
        _ => None,
    }
}

async fn fake_list(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let number = |key: &str, default: u32| {
        params
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    let query = ListQuery {
        page: number("page", 1),
        limit: number("limit", 10),
        search: params.get("search").cloned().unwrap_or_default(),
        course: params.get("course").cloned().unwrap_or_default(),
    };
    *state.last_list_query.lock().unwrap() = Some(params);

    let page = state.store.lock().unwrap().list(&query);
    Json(serde_json::json!({
        "students": page.students,
        "totalPages": page.total_pages,
    }))
    .into_response()
}

async fn fake_get(State(state): State<FakeState>, Path(id): Path<String>) -> Response {
    if let Some(response) = special_case(&id).await {
        return response;
    }
    let found = state.store.lock().unwrap().get(&id);
    found.map_or_else(fake_error, |s| Json(s).into_response())
}

async fn fake_create(State(state): State<FakeState>, Json(draft): Json<StudentDraft>) -> Response {
    let created = state.store.lock().unwrap().create(&draft);
    created.map_or_else(fake_error, |s| (StatusCode::CREATED, Json(s)).into_response())
}

async fn fake_update(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    Json(draft): Json<StudentDraft>,
) -> Response {
    let updated = state.store.lock().unwrap().update(&id, &draft);
    updated.map_or_else(fake_error, |s| Json(s).into_response())
}

async fn fake_delete(State(state): State<FakeState>, Path(id): Path<String>) -> Response {
    if let Some(response) = special_case(&id).await {
        return response;
    }
    let deleted = state.store.lock().unwrap().delete(&id);
    deleted.map_or_else(fake_error, |()| StatusCode::NO_CONTENT.into_response())
}

async fn fake_generate(State(state): State<FakeState>, Path(id): Path<String>) -> Response {
    let found = state.store.lock().unwrap().get(&id);
    found.map_or_else(fake_error, |_| {
        ([(CONTENT_TYPE, "application/pdf")], Bytes::from_static(FAKE_PDF)).into_response()
    })
}
