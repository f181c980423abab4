use crate::data::student::{StudentDraft, parse_calendar_date};
use email_address::{EmailAddress, Options};
use std::{collections::BTreeMap, fmt};

/// Editable fields of a [`StudentDraft`], ordered the way the form shows them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Name,
    Email,
    Phone,
    Address,
    Course,
    EnrollmentDate,
}

impl DraftField {
    #[cfg(test)]
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::Course,
        Self::EnrollmentDate,
    ];

    pub const fn form_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Course => "course",
            Self::EnrollmentDate => "enrollmentDate",
        }
    }

    pub fn value_in(self, draft: &StudentDraft) -> &str {
        match self {
            Self::Name => &draft.name,
            Self::Email => &draft.email,
            Self::Phone => &draft.phone,
            Self::Address => &draft.address,
            Self::Course => &draft.course,
            Self::EnrollmentDate => &draft.enrollment_date,
        }
    }

    #[cfg(test)]
    pub fn value_in_mut(self, draft: &mut StudentDraft) -> &mut String {
        match self {
            Self::Name => &mut draft.name,
            Self::Email => &mut draft.email,
            Self::Phone => &mut draft.phone,
            Self::Address => &mut draft.address,
            Self::Course => &mut draft.course,
            Self::EnrollmentDate => &mut draft.enrollment_date,
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// Field-level messages. Empty means the draft may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<DraftField, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = DraftField> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, field: DraftField, message: &'static str) {
        self.0.insert(field, message);
    }
}

pub fn validate(draft: &StudentDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.insert(DraftField::Name, "Name is required");
    } else if name.chars().count() < 2 {
        errors.insert(DraftField::Name, "Name must be at least 2 characters long");
    }

    let email = draft.email.trim();
    if email.is_empty() {
        errors.insert(DraftField::Email, "Email is required");
    } else if !is_plausible_email(email) {
        errors.insert(DraftField::Email, "Please enter a valid email address");
    }

    if draft.phone.trim().is_empty() {
        errors.insert(DraftField::Phone, "Phone number is required");
    } else if draft.phone.chars().filter(char::is_ascii_digit).count() != 10 {
        errors.insert(
            DraftField::Phone,
            "Please enter a valid 10-digit phone number",
        );
    }

    if draft.address.trim().is_empty() {
        errors.insert(DraftField::Address, "Address is required");
    }

    if draft.course.trim().is_empty() {
        errors.insert(DraftField::Course, "Course is required");
    }

    if draft.enrollment_date.trim().is_empty() {
        errors.insert(DraftField::EnrollmentDate, "Enrollment date is required");
    } else if parse_calendar_date(&draft.enrollment_date).is_err() {
        errors.insert(
            DraftField::EnrollmentDate,
            "Enrollment date must be a valid date",
        );
    }

    errors
}

///a bare `local@domain.tld`: no display text, quoted local parts or domain literals, and
///the domain has to end in a short top-level label like `.com` or `.co`
fn is_plausible_email(email: &str) -> bool {
    let options = Options::default()
        .without_display_text()
        .without_domain_literal()
        .with_required_tld();
    let Ok(parsed) = EmailAddress::parse_with_options(email, options) else {
        return false;
    };
    if parsed.as_str() != email {
        return false;
    }

    let local_is_plain = parsed.local_part().split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
    });
    if !local_is_plain {
        return false;
    }

    let Some((rest, tld)) = parsed.domain().rsplit_once('.') else {
        return false;
    };

    !rest.is_empty()
        && (2..=3).contains(&tld.len())
        && tld.chars().all(|c| c.is_ascii_alphanumeric())
        && rest
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
}
