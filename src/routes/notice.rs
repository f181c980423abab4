//! One-shot notifications carried across a navigation as `?notice=`.

use crate::{
    error::{ErrorKind, RegistrarError},
    maud_conveniences::toast,
};
use axum::{
    http::HeaderValue,
    response::{IntoResponse, Redirect, Response},
};
use maud::Markup;
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Notice {
    Created,
    Updated,
    Deleted,
    Unavailable,
    ServiceStarting,
    DownloadFailed,
    AlreadyDownloading,
}

impl Notice {
    const ALL: [Self; 7] = [
        Self::Created,
        Self::Updated,
        Self::Deleted,
        Self::Unavailable,
        Self::ServiceStarting,
        Self::DownloadFailed,
        Self::AlreadyDownloading,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Unavailable => "unavailable",
            Self::ServiceStarting => "service_starting",
            Self::DownloadFailed => "download_failed",
            Self::AlreadyDownloading => "already_downloading",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Created => "Student created successfully",
            Self::Updated => "Student updated successfully",
            Self::Deleted => "Student deleted successfully",
            Self::Unavailable => "Failed to fetch student details",
            Self::ServiceStarting => {
                "The student service took too long to respond. It may be starting up, please try again in a moment."
            }
            Self::DownloadFailed => "Failed to generate admission form",
            Self::AlreadyDownloading => "That admission form is already being generated",
        }
    }

    pub const fn is_error(self) -> bool {
        !matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }

    ///timeouts keep their own wording, everything else gets `fallback`
    pub fn for_failure(error: &RegistrarError, fallback: Self) -> Self {
        match error {
            RegistrarError::DownloadInFlight { .. } => Self::AlreadyDownloading,
            e if e.kind() == ErrorKind::Timeout => Self::ServiceStarting,
            _ => fallback,
        }
    }

    pub fn toast(self) -> Markup {
        toast(self.message(), self.is_error())
    }
}

///unknown values are ignored rather than rejected
#[derive(Deserialize, Debug, Default)]
pub struct NoticeQuery {
    #[serde(default)]
    notice: Option<String>,
}

impl NoticeQuery {
    pub fn notice(&self) -> Option<Notice> {
        let provided = self.notice.as_deref()?;
        Notice::ALL.into_iter().find(|n| n.as_str() == provided)
    }
}

pub fn with_notice(path: &str, notice: Notice) -> String {
    format!("{path}?notice={}", notice.as_str())
}

/// Sends the browser to `path`, whether this was an htmx request or a plain navigation.
pub fn navigate_to(path: &str, notice: Notice, is_htmx: bool) -> Response {
    let location = with_notice(path, notice);
    if !is_htmx {
        return Redirect::to(&location).into_response();
    }

    let mut response = ().into_response();
    match HeaderValue::from_str(&location) {
        Ok(location) => {
            response.headers_mut().insert("HX-Redirect", location);
        }
        Err(e) => {
            error!(?e, %location, "Unable to build redirect header");
        }
    }
    response
}
