use chrono::NaiveDate;
use patient_core::{Gender, Patient};
use serde::{Deserialize, Serialize};

/// Storage representation of a patient.
///
/// The id lives in its own column, so the document only carries the
/// mutable fields under fixed storage keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientDocument {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
    #[serde(rename = "emailAddress")]
    pub email_address: String,
    #[serde(rename = "gender")]
    pub gender: Gender,
}

impl PatientDocument {
    pub fn into_patient(self, id: String) -> Patient {
        Patient {
            id: Some(id),
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            contact_number: self.contact_number,
            email_address: self.email_address,
            gender: self.gender,
        }
    }
}

impl From<&Patient> for PatientDocument {
    fn from(patient: &Patient) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth: patient.date_of_birth,
            contact_number: patient.contact_number.clone(),
            email_address: patient.email_address.clone(),
            gender: patient.gender,
        }
    }
}
