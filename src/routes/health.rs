use crate::{api::StudentApi, error::RegistrarResult, state::RegistrarState};
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

///passes the student service's own health answer straight through
pub async fn get_health(State(state): State<RegistrarState>) -> RegistrarResult<Response> {
    let report = state.api().health().await?;
    Ok((
        report.status,
        [(CONTENT_TYPE, "application/json")],
        report.body,
    )
        .into_response())
}
