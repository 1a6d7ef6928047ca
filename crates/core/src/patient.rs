use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Administrative gender of a patient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Parse the exact wire literal (`"Male"`, `"Female"`, `"Other"`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated patient record.
///
/// `id` is `None` while the record is new and is assigned by the store on
/// the first save. It never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: String,
    pub email_address: String,
    pub gender: Gender,
}

impl Patient {
    /// Same record with the id replaced
    pub fn with_id(self, id: Option<String>) -> Self {
        Self { id, ..self }
    }
}

/// Unvalidated request body for create and update.
///
/// Every field is optional so that a missing value surfaces as a field
/// violation instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl From<Patient> for PatientPayload {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            first_name: Some(patient.first_name),
            last_name: Some(patient.last_name),
            date_of_birth: Some(patient.date_of_birth),
            contact_number: Some(patient.contact_number),
            email_address: Some(patient.email_address),
            gender: Some(patient.gender.to_string()),
        }
    }
}
