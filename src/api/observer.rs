//! Hooks the API client reports its request lifecycle through.
//!
//! The client never logs on its own; whoever builds it decides where events go.

use crate::error::{ErrorKind, RegistrarError};
use reqwest::{Method, StatusCode};
use std::{fmt::Debug, time::Duration};

#[derive(Debug, Clone, Copy)]
pub struct RequestEvent<'a> {
    pub method: &'a Method,
    pub url: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseEvent<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    pub status: StatusCode,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct FailureEvent<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    pub error: &'a RegistrarError,
    pub elapsed: Duration,
}

pub trait ApiObserver: Debug + Send + Sync {
    fn on_request(&self, _event: RequestEvent<'_>) {}
    fn on_response(&self, _event: ResponseEvent<'_>) {}
    fn on_failure(&self, _event: FailureEvent<'_>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ApiObserver for TracingObserver {
    fn on_request(&self, RequestEvent { method, url }: RequestEvent<'_>) {
        debug!(%method, %url, "Making API request");
    }

    fn on_response(
        &self,
        ResponseEvent {
            method,
            url,
            status,
            elapsed,
        }: ResponseEvent<'_>,
    ) {
        info!(%method, %url, %status, ?elapsed, "API response received");
    }

    fn on_failure(
        &self,
        FailureEvent {
            method,
            url,
            error,
            elapsed,
        }: FailureEvent<'_>,
    ) {
        match error.kind() {
            ErrorKind::Timeout => {
                warn!(%method, %url, ?elapsed, "API request timed out, the student service may be cold starting");
            }
            ErrorKind::Unauthorized => {
                warn!(%method, %url, "API request was unauthorised");
            }
            _ => error!(%method, %url, ?error, "API error"),
        }
    }
}
