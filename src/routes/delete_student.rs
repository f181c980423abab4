use crate::{
    api::StudentApi,
    error::RegistrarResult,
    maud_conveniences::toast,
    routes::{
        notice::{Notice, navigate_to},
        students::STUDENTS_CHANGED,
    },
    state::RegistrarState,
    view_state::delete::{DeleteConfirmation, DeleteOrigin, DeleteTarget},
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use maud::{Render, html};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct DeleteQuery {
    #[serde(default)]
    from: DeleteOrigin,
    #[serde(default)]
    name: Option<String>,
}

pub async fn internal_get_confirm_delete(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
    Query(DeleteQuery { from, name }): Query<DeleteQuery>,
) -> RegistrarResult<Response> {
    let target = match name {
        Some(name) => DeleteTarget { id, name },
        None => match state.api().get(&id).await {
            Ok(student) => student.into(),
            Err(e) => return Ok(e.into_response_or("Failed to fetch student details")),
        },
    };

    let mut confirmation = DeleteConfirmation::default();
    confirmation.open(target, from)?;
    Ok(confirmation.render().into_response())
}

pub async fn delete_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
    Query(DeleteQuery { from, name }): Query<DeleteQuery>,
) -> RegistrarResult<Response> {
    let mut confirmation = DeleteConfirmation::default();
    confirmation.open(
        DeleteTarget {
            id,
            name: name.unwrap_or_default(),
        },
        from,
    )?;

    let deleted = match confirmation.confirm(state.api()).await {
        Ok(Some(deleted)) => deleted,
        Ok(None) => return Ok(html! {}.into_response()),
        Err(e) => return Ok(e.into_response_or("Failed to delete student")),
    };
    info!(id = %deleted.id, ?from, "Deleted student");

    Ok(match from {
        DeleteOrigin::Detail => navigate_to("/students", Notice::Deleted, true),
        DeleteOrigin::List => {
            //closes the modal, refetches the current page and says so
            let mut response = html! {
                div id="toasts" hx-swap-oob="innerHTML" {
                    (toast(Notice::Deleted.message(), false))
                }
            }
            .into_response();
            response
                .headers_mut()
                .insert("HX-Trigger", HeaderValue::from_static(STUDENTS_CHANGED));
            response
        }
    })
}
