//! Field constraints for patient payloads.
//!
//! Every rule is evaluated; violations are reported in field declaration
//! order rather than stopping at the first failure.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{ValidationFailed, Violation};
use crate::patient::{Gender, Patient, PatientPayload};

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 50;

static CONTACT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]{10,15}$").expect("contact number pattern"));

pub const MAX_LOCAL_PART_LENGTH: usize = 64;
pub const MAX_DOMAIN_LABEL_LENGTH: usize = 63;
pub const MAX_DOMAIN_LENGTH: usize = 255;

static LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+)*$"#,
    )
    .expect("email local part pattern")
});

static DOMAIN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9\x{80}-\x{FFFF}](?:[a-z0-9\x{80}-\x{FFFF}-]*[a-z0-9\x{80}-\x{FFFF}])?$")
        .expect("email domain label pattern")
});

static IP_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[0-9]{1,3}(?:\.[0-9]{1,3}){3}\]$").expect("ip literal pattern"));

/// Validate a payload against the patient field constraints.
///
/// `today` is the reference date for the date-of-birth rule, which requires
/// a date strictly before it. On success the payload's id is carried over
/// unchanged.
pub fn validate(payload: &PatientPayload, today: NaiveDate) -> Result<Patient, ValidationFailed> {
    let mut violations = Vec::new();

    check_name(&mut violations, "firstName", "First name", payload.first_name.as_deref());
    check_name(&mut violations, "lastName", "Last name", payload.last_name.as_deref());

    match payload.date_of_birth {
        None => violations.push(Violation::new("dateOfBirth", "Date of birth is required")),
        Some(dob) if dob >= today => {
            violations.push(Violation::new("dateOfBirth", "Date of birth must be in the past"))
        }
        Some(_) => {}
    }

    let contact = payload.contact_number.as_deref();
    if is_blank(contact) {
        violations.push(Violation::new("contactNumber", "Contact number is required"));
    }
    if let Some(number) = contact {
        if !CONTACT_NUMBER.is_match(number) {
            violations.push(Violation::new(
                "contactNumber",
                "Contact number must be 10-15 digits",
            ));
        }
    }

    let email = payload.email_address.as_deref();
    if is_blank(email) {
        violations.push(Violation::new("emailAddress", "Email address is required"));
    }
    if let Some(address) = email.filter(|a| !a.is_empty()) {
        if !is_valid_email(address) {
            violations.push(Violation::new("emailAddress", "Email address must be valid"));
        }
    }

    let gender = payload.gender.as_deref();
    if is_blank(gender) {
        violations.push(Violation::new("gender", "Gender is required"));
    }
    let parsed_gender = gender.and_then(Gender::parse);
    if gender.is_some() && parsed_gender.is_none() {
        violations.push(Violation::new(
            "gender",
            "Gender must be Male, Female, or Other",
        ));
    }

    if !violations.is_empty() {
        return Err(ValidationFailed { violations });
    }

    // All required fields are present once no violation was recorded.
    match (
        &payload.first_name,
        &payload.last_name,
        payload.date_of_birth,
        &payload.contact_number,
        &payload.email_address,
        parsed_gender,
    ) {
        (
            Some(first_name),
            Some(last_name),
            Some(date_of_birth),
            Some(contact_number),
            Some(email_address),
            Some(gender),
        ) => Ok(Patient {
            id: payload.id.clone(),
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            date_of_birth,
            contact_number: contact_number.clone(),
            email_address: email_address.clone(),
            gender,
        }),
        _ => Err(ValidationFailed { violations }),
    }
}

fn check_name(violations: &mut Vec<Violation>, field: &str, label: &str, value: Option<&str>) {
    if is_blank(value) {
        violations.push(Violation::new(field, &format!("{label} is required")));
    }
    if let Some(name) = value {
        let len = name.chars().count();
        if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&len) {
            violations.push(Violation::new(
                field,
                &format!("{label} must be between {NAME_MIN_LENGTH} and {NAME_MAX_LENGTH} characters"),
            ));
        }
    }
}

/// Email syntax: dot-separated atoms (non-ASCII allowed), an `@`, then
/// hostname labels or a bracketed IPv4 literal.
fn is_valid_email(address: &str) -> bool {
    let Some((local, domain)) = address.rsplit_once('@') else {
        return false;
    };
    if local.chars().count() > MAX_LOCAL_PART_LENGTH || !LOCAL_PART.is_match(local) {
        return false;
    }
    if IP_LITERAL.is_match(domain) {
        return true;
    }
    domain.chars().count() <= MAX_DOMAIN_LENGTH
        && domain.split('.').all(|label| {
            label.chars().count() <= MAX_DOMAIN_LABEL_LENGTH && DOMAIN_LABEL.is_match(label)
        })
}

/// Blank after stripping control characters and ASCII spaces (U+0000..=U+0020)
fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim_matches(|c: char| c <= ' ').is_empty())
}
