use crate::{data::validation::ValidationErrors, maud_conveniences::toast};
use axum::{
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

const GENERIC_FAILURE: &str = "Something went wrong, please try again";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistrarError {
    #[snafu(display("Unable to reach the student service at {}", url))]
    Network { source: reqwest::Error, url: String },
    #[snafu(display("The student service did not answer {} in time", url))]
    Timeout { url: String },
    #[snafu(display("The student service answered {} with {}", url, status))]
    Server {
        url: String,
        status: StatusCode,
        message: Option<String>,
    },
    #[snafu(display("Unable to find {}", resource))]
    NotFound { resource: String },
    #[snafu(display("The student service refused the request as unauthorised"))]
    Unauthorized,
    #[snafu(display("Unable to decode the response from {}", url))]
    DecodeBody { source: reqwest::Error, url: String },
    #[snafu(display("Unable to use {:?} as the student service URL: {}", provided, reason))]
    InvalidBaseUrl { provided: String, reason: String },
    #[snafu(display("Unable to build the HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("The student draft has {} invalid field(s)", errors.len()))]
    InvalidDraft { errors: ValidationErrors },
    #[snafu(display("An admission form for {} is already being generated", id))]
    DownloadInFlight { id: String },
    #[snafu(display("A deletion is already awaiting confirmation for {}", pending))]
    DeletePending { pending: String },
    #[snafu(display("Unable to parse env var `{}` from {:?}", name, provided))]
    ParseEnvNumber {
        source: ParseIntError,
        name: &'static str,
        provided: String,
    },
    #[snafu(display("Unknown deployment environment {:?}", provided))]
    UnknownEnvironment { provided: String },
    #[snafu(display("Unable to find timezone {:?}", tz))]
    InvalidTimezone { source: jiff::Error, tz: String },
    #[snafu(display("Unable to convert date to a zoned time"))]
    ZoneDate { source: jiff::Error },
    #[snafu(display("Unable to parse locale {:?}", provided))]
    InvalidLocale {
        source: icu::locale::ParseError,
        provided: String,
    },
    #[snafu(display("Unable to create date formatter"))]
    BadDateTimeFormatter {
        source: icu::datetime::DateTimeFormatterLoadError,
    },
}

/// The user-facing failure categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    Timeout,
    ServerError,
    NotFound,
    Unauthorized,
    ValidationFailure,
    Internal,
}

impl RegistrarError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::DecodeBody { .. } => ErrorKind::NetworkFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::InvalidDraft { .. } => ErrorKind::ValidationFailure,
            _ => ErrorKind::Internal,
        }
    }

    /// The server-supplied explanation, if the service sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text for the single notification shown when this error reaches a view.
    pub fn user_message(&self) -> String {
        self.user_message_or(GENERIC_FAILURE)
    }

    /// Like [`Self::user_message`], with `fallback` naming what the view was doing for the
    /// failures that have nothing more useful to say.
    pub fn user_message_or(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }

        match self.kind() {
            ErrorKind::Timeout => {
                "The student service took too long to respond. It may be starting up, please try again in a moment.".to_string()
            }
            ErrorKind::NetworkFailure => {
                "Unable to reach the student service. Check your connection and try again."
                    .to_string()
            }
            ErrorKind::NotFound => "Student not found".to_string(),
            ErrorKind::ValidationFailure => "Please fix the errors below".to_string(),
            ErrorKind::Unauthorized | ErrorKind::ServerError | ErrorKind::Internal => {
                fallback.to_string()
            }
        }
    }

    #[allow(clippy::match_same_arms)]
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream broke
        const GT: StatusCode = StatusCode::GATEWAY_TIMEOUT; //upstream too slow
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::UNPROCESSABLE_ENTITY; //bad input

        match self {
            Self::Network { .. } | Self::DecodeBody { .. } => BG,
            Self::Timeout { .. } => GT,
            Self::Server { status, .. } if status.is_client_error() => BI,
            Self::Server { .. } => BG,
            Self::NotFound { .. } => NF,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidDraft { .. } => BI,
            Self::DownloadInFlight { .. } | Self::DeletePending { .. } => StatusCode::CONFLICT,
            Self::BuildClient { .. } | Self::InvalidBaseUrl { .. } => ISE,
            Self::ParseEnvNumber { .. } | Self::UnknownEnvironment { .. } => ISE,
            Self::InvalidTimezone { .. } | Self::ZoneDate { .. } => ISE,
            Self::InvalidLocale { .. } | Self::BadDateTimeFormatter { .. } => ISE,
        }
    }
}

impl RegistrarError {
    /// The error as a toast, worded with `fallback` where the error itself can't say more.
    pub fn into_response_or(self, fallback: &str) -> Response {
        error!(?self, "Error!");

        let mut response = (
            self.status_code(),
            Html(toast(&self.user_message_or(fallback), true).into_string()),
        )
            .into_response();
        // htmx swaps these into the toast region instead of the request's own target
        let headers = response.headers_mut();
        headers.insert("HX-Retarget", HeaderValue::from_static("#toasts"));
        headers.insert("HX-Reswap", HeaderValue::from_static("innerHTML"));
        response
    }
}

impl IntoResponse for RegistrarError {
    fn into_response(self) -> Response {
        self.into_response_or(GENERIC_FAILURE)
    }
}
