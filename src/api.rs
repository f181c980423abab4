//! Client for the remote student service.

use crate::{
    api::observer::{ApiObserver, FailureEvent, RequestEvent, ResponseEvent},
    config::ApiConfig,
    data::{
        query::ListQuery,
        student::{Student, StudentDraft},
    },
    error::{
        BuildClientSnafu, InvalidBaseUrlSnafu, NotFoundSnafu, RegistrarError, RegistrarResult,
        ServerSnafu, TimeoutSnafu, UnauthorizedSnafu,
    },
};
use axum::body::Bytes;
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use snafu::ResultExt;
use std::{sync::Arc, time::Instant};

pub mod observer;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub students: Vec<Student>,
    #[serde(default)]
    pub total_pages: u32,
}

/// The generated admission form, passed through untouched.
#[derive(Debug, Clone)]
pub struct AdmissionForm {
    pub bytes: Bytes,
    pub content_type: String,
}

///only ascii letters, digits, `-`, `_` and `.` survive, so the name can sit in a quoted header
pub fn admission_form_filename(student_id: &str) -> String {
    let student_id: String = student_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("admission-form-{student_id}.pdf")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: StatusCode,
    pub body: String,
}

pub trait StudentApi {
    async fn list(&self, query: &ListQuery) -> RegistrarResult<ListPage>;
    async fn get(&self, id: &str) -> RegistrarResult<Student>;
    async fn create(&self, draft: &StudentDraft) -> RegistrarResult<Student>;
    async fn update(&self, id: &str, draft: &StudentDraft) -> RegistrarResult<Student>;
    async fn delete(&self, id: &str) -> RegistrarResult<()>;
    async fn generate_document(&self, id: &str) -> RegistrarResult<AdmissionForm>;
    async fn health(&self) -> RegistrarResult<HealthReport>;
}

#[derive(Clone, Debug)]
pub struct HttpStudentApi {
    http: Client,
    base_url: Url,
    observer: Arc<dyn ApiObserver>,
}

impl HttpStudentApi {
    pub fn new(config: &ApiConfig, observer: Arc<dyn ApiObserver>) -> RegistrarResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .context(BuildClientSnafu)?;

        let provided = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(provided).map_err(|e| {
            InvalidBaseUrlSnafu {
                provided,
                reason: e.to_string(),
            }
            .build()
        })?;
        if base_url.cannot_be_a_base() {
            return InvalidBaseUrlSnafu {
                provided,
                reason: "it cannot hold a path",
            }
            .fail();
        }

        Ok(Self {
            http,
            base_url,
            observer,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    ///each segment is percent-encoded on its own, so `/` or `?` in an id can't leave it
    fn url_for<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> RegistrarResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                InvalidBaseUrlSnafu {
                    provided: self.base_url.as_str(),
                    reason: "it cannot hold a path",
                }
                .build()
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn student_url(&self, id: &str, action: Option<&str>) -> RegistrarResult<Url> {
        //`url` strips tabs and newlines and drops dot segments, either of which would
        //address some other resource
        if matches!(id, "" | "." | "..") || id.chars().any(char::is_control) {
            return NotFoundSnafu {
                resource: format!("student {id:?}"),
            }
            .fail();
        }
        self.url_for(["students", id].into_iter().chain(action))
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> RegistrarResult<(Response, String)> {
        let request = self.http.request(method.clone(), url.clone());
        let url = String::from(url);
        self.observer.on_request(RequestEvent {
            method: &method,
            url: &url,
        });

        let started = Instant::now();
        let outcome = match prepare(request).send().await {
            Ok(response) => {
                self.observer.on_response(ResponseEvent {
                    method: &method,
                    url: &url,
                    status: response.status(),
                    elapsed: started.elapsed(),
                });
                check_status(response, &url).await
            }
            Err(source) => Err(transport_error(source, &url)),
        };

        match outcome {
            Ok(response) => Ok((response, url)),
            Err(error) => {
                self.observer.on_failure(FailureEvent {
                    method: &method,
                    url: &url,
                    error: &error,
                    elapsed: started.elapsed(),
                });
                Err(error)
            }
        }
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> RegistrarResult<T> {
        let (response, url) = self.execute(method, url, prepare).await?;
        response.json().await.map_err(|source| body_error(source, &url))
    }
}

impl StudentApi for HttpStudentApi {
    async fn list(&self, query: &ListQuery) -> RegistrarResult<ListPage> {
        let pairs = query.to_pairs();
        let mut page: ListPage = self
            .execute_json(Method::GET, self.url_for(["students"])?, |req| {
                req.query(&pairs)
            })
            .await?;
        page.total_pages = page.total_pages.max(1);
        Ok(page)
    }

    async fn get(&self, id: &str) -> RegistrarResult<Student> {
        self.execute_json(Method::GET, self.student_url(id, None)?, |req| req)
            .await
    }

    async fn create(&self, draft: &StudentDraft) -> RegistrarResult<Student> {
        self.execute_json(Method::POST, self.url_for(["students"])?, |req| {
            req.json(draft)
        })
        .await
    }

    async fn update(&self, id: &str, draft: &StudentDraft) -> RegistrarResult<Student> {
        self.execute_json(Method::PUT, self.student_url(id, None)?, |req| {
            req.json(draft)
        })
        .await
    }

    async fn delete(&self, id: &str) -> RegistrarResult<()> {
        self.execute(Method::DELETE, self.student_url(id, None)?, |req| req)
            .await?;
        Ok(())
    }

    async fn generate_document(&self, id: &str) -> RegistrarResult<AdmissionForm> {
        let (response, url) = self
            .execute(
                Method::POST,
                self.student_url(id, Some("generate-admission-form"))?,
                |req| {
                    req.header(ACCEPT, "application/pdf")
                        .json(&serde_json::json!({}))
                },
            )
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/pdf")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| body_error(source, &url))?;

        Ok(AdmissionForm {
            bytes,
            content_type,
        })
    }

    async fn health(&self) -> RegistrarResult<HealthReport> {
        let (response, url) = self
            .execute(Method::GET, self.url_for(["health"])?, |req| req)
            .await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| body_error(source, &url))?;
        Ok(HealthReport { status, body })
    }
}

fn transport_error(source: reqwest::Error, url: &str) -> RegistrarError {
    if source.is_timeout() {
        TimeoutSnafu { url }.build()
    } else {
        RegistrarError::Network {
            source,
            url: url.to_string(),
        }
    }
}

fn body_error(source: reqwest::Error, url: &str) -> RegistrarError {
    if source.is_timeout() {
        TimeoutSnafu { url }.build()
    } else {
        RegistrarError::DecodeBody {
            source,
            url: url.to_string(),
        }
    }
}

async fn check_status(response: Response, url: &str) -> RegistrarResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            ["message", "error"]
                .into_iter()
                .find_map(|key| body.get(key)?.as_str().map(ToString::to_string))
        });

    match status {
        StatusCode::NOT_FOUND => NotFoundSnafu { resource: url }.fail(),
        StatusCode::UNAUTHORIZED => UnauthorizedSnafu.fail(),
        _ => ServerSnafu {
            url,
            status,
            message,
        }
        .fail(),
    }
}
