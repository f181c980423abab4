use crate::{
    api::StudentApi,
    data::student::Student,
    error::{DeletePendingSnafu, RegistrarResult},
    routes::student_path,
};
use maud::{Markup, Render, html};

/// Where the confirmation was opened from, which decides what happens after a delete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOrigin {
    #[default]
    List,
    Detail,
}

impl DeleteOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

/// Just enough of a record to confirm and carry out its deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub name: String,
}

impl From<&Student> for DeleteTarget {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
        }
    }
}

impl From<Student> for DeleteTarget {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
        }
    }
}

/// At most one record awaiting delete confirmation.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmation {
    target: Option<DeleteTarget>,
    origin: DeleteOrigin,
}

impl DeleteConfirmation {
    pub fn open(
        &mut self,
        student: impl Into<DeleteTarget>,
        origin: DeleteOrigin,
    ) -> RegistrarResult<()> {
        let student = student.into();
        if let Some(pending) = &self.target {
            snafu::ensure!(
                pending.id == student.id,
                DeletePendingSnafu {
                    pending: pending.name.clone()
                }
            );
        }

        self.target = Some(student);
        self.origin = origin;
        Ok(())
    }

    ///deletes the target and closes; on failure the confirmation stays open
    pub async fn confirm<A: StudentApi>(
        &mut self,
        api: &A,
    ) -> RegistrarResult<Option<DeleteTarget>> {
        let Some(target) = self.target.take() else {
            return Ok(None);
        };

        match api.delete(&target.id).await {
            Ok(()) => Ok(Some(target)),
            Err(e) => {
                self.target = Some(target);
                Err(e)
            }
        }
    }
}

impl Render for DeleteConfirmation {
    fn render(&self) -> Markup {
        let Some(student) = &self.target else {
            return html! {};
        };

        html! {
            div class="fixed inset-0 bg-black/60 overflow-y-auto h-full w-full z-50 flex items-start justify-center" {
                div class="relative top-20 mx-auto p-6 w-96 shadow-lg rounded-md bg-gray-800 text-center" {
                    h3 class="text-lg font-semibold" {"Delete Student"}
                    p class="text-sm text-gray-300 mt-2 px-4 py-3" {
                        "Are you sure you want to delete "
                        strong {(student.name)}
                        "? This action cannot be undone."
                    }
                    div class="flex justify-center space-x-3 mt-4" {
                        //cancelling only closes the modal, nothing is sent
                        button class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" hx-on-click="htmx.find('#modal').innerHTML = ''" {
                            "Cancel"
                        }
                        button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-delete={(student_path(&student.id)) "?from=" (self.origin.as_str())} hx-vals=(serde_json::json!({"name": student.name}).to_string()) hx-target="#modal" hx-disabled-elt="this" {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}
