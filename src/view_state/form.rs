use crate::{
    api::StudentApi,
    data::{
        student::{Student, StudentDraft},
        validation::{ValidationErrors, validate},
    },
    error::{RegistrarError, RegistrarResult},
};
use jiff::civil::Date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormPhase {
    LoadingExisting,
    Editing,
    Submitting,
    Done,
}

#[derive(Debug, Clone)]
pub struct StudentFormState {
    mode: FormMode,
    phase: FormPhase,
    pub draft: StudentDraft,
    errors: ValidationErrors,
    server_message: Option<String>,
}

impl StudentFormState {
    pub fn create(today: Date) -> Self {
        Self {
            mode: FormMode::Create,
            phase: FormPhase::Editing,
            draft: StudentDraft::new_for(today),
            errors: ValidationErrors::default(),
            server_message: None,
        }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            mode: FormMode::Edit { id: id.into() },
            phase: FormPhase::LoadingExisting,
            draft: StudentDraft::default(),
            errors: ValidationErrors::default(),
            server_message: None,
        }
    }

    ///a draft the browser already holds, e.g. one being resubmitted
    pub fn resume(mode: FormMode, draft: StudentDraft) -> Self {
        Self {
            mode,
            phase: FormPhase::Editing,
            draft,
            errors: ValidationErrors::default(),
            server_message: None,
        }
    }

    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    pub const fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn seed(&mut self, student: &Student) {
        self.draft = StudentDraft::from(student);
        self.phase = FormPhase::Editing;
    }

    pub async fn load_existing<A: StudentApi>(&mut self, api: &A) -> RegistrarResult<()> {
        let FormMode::Edit { id } = &self.mode else {
            return Ok(());
        };
        if self.phase != FormPhase::LoadingExisting {
            return Ok(());
        }

        let student = api.get(id).await?;
        self.seed(&student);
        Ok(())
    }

    pub async fn submit<A: StudentApi>(&mut self, api: &A) -> RegistrarResult<Student> {
        self.phase = FormPhase::Submitting;
        self.server_message = None;

        self.errors = validate(&self.draft);
        if !self.errors.is_empty() {
            self.phase = FormPhase::Editing;
            return Err(RegistrarError::InvalidDraft {
                errors: self.errors.clone(),
            });
        }

        let result = match &self.mode {
            FormMode::Create => api.create(&self.draft).await,
            FormMode::Edit { id } => api.update(id, &self.draft).await,
        };

        match result {
            Ok(student) => {
                self.phase = FormPhase::Done;
                Ok(student)
            }
            Err(e) => {
                self.phase = FormPhase::Editing;
                self.server_message = Some(
                    e.server_message()
                        .unwrap_or("An error occurred")
                        .to_string(),
                );
                Err(e)
            }
        }
    }
}
