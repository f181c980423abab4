use crate::{
    api::{AdmissionForm, StudentApi, admission_form_filename},
    error::RegistrarResult,
    routes::{
        notice::{Notice, navigate_to},
        student_path,
    },
    state::RegistrarState,
    view_state::delete::DeleteOrigin,
};
use axum::{
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct DownloadQuery {
    #[serde(default)]
    from: DeleteOrigin,
    #[serde(default)]
    student_id: Option<String>,
}

/// Streams the generated form back as an attachment, or returns to where the link was.
pub async fn get_admission_form(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
    Query(DownloadQuery { from, student_id }): Query<DownloadQuery>,
) -> Response {
    match generate(&state, &id, student_id).await {
        Ok((student_id, AdmissionForm { bytes, content_type })) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                admission_form_filename(&student_id)
            );
            ([(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)], bytes)
                .into_response()
        }
        Err(e) => {
            error!(?e, %id, "Unable to generate admission form");
            let back_to = match from {
                DeleteOrigin::List => "/students".to_string(),
                DeleteOrigin::Detail => student_path(&id),
            };
            navigate_to(
                &back_to,
                Notice::for_failure(&e, Notice::DownloadFailed),
                false,
            )
        }
    }
}

async fn generate(
    state: &RegistrarState,
    id: &str,
    student_id: Option<String>,
) -> RegistrarResult<(String, AdmissionForm)> {
    let _guard = state.downloads().begin(id)?;

    let student_id = match student_id.filter(|s| !s.trim().is_empty()) {
        Some(student_id) => student_id,
        None => state.api().get(id).await?.student_id,
    };
    let form = state.api().generate_document(id).await?;

    Ok((student_id, form))
}
