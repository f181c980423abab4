use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

pub const COURSES: [&str; 8] = [
    "Computer Science",
    "Information Technology",
    "Electronics Engineering",
    "Mechanical Engineering",
    "Civil Engineering",
    "Business Administration",
    "Commerce",
    "Arts",
];

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub course: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub enrollment_date: Date,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Student {
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

///the editable part of a student, as sent on create and update
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub enrollment_date: String,
}

impl StudentDraft {
    pub fn new_for(today: Date) -> Self {
        Self {
            enrollment_date: today.to_string(),
            ..Self::default()
        }
    }
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            address: student.address.clone(),
            course: student.course.clone(),
            enrollment_date: student.enrollment_date.to_string(),
        }
    }
}

pub fn parse_calendar_date(raw: &str) -> Result<Date, jiff::Error> {
    let raw = raw.trim();
    match raw.parse::<Date>() {
        Ok(date) => Ok(date),
        //document stores tend to hand back midnight UTC timestamps
        Err(date_err) => raw
            .parse::<Timestamp>()
            .map(|ts| ts.to_zoned(TimeZone::UTC).date())
            .map_err(|_| date_err),
    }
}

fn deserialize_calendar_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}
