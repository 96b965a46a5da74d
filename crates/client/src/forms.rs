//! Form state as typed by the user, and its conversion into request bodies.
//!
//! These checks are advisory; the server re-validates every payload.

use shared_types::{
    AccountFields, AppError, BloodGroup, NewBloodRequest, NewDonation, ProfileRef, Requester, Role,
    SignupRequest,
};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

const UNIT_MESSAGE: &str = "Units must be a positive whole number";
const GROUP_MESSAGE: &str = "Choose one of A+, A-, B+, B-, AB+, AB-, O+, O-";

#[derive(Default)]
struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    fn blood_group(&mut self, field: &str, raw: &str) -> Option<BloodGroup> {
        match raw.parse() {
            Ok(group) => Some(group),
            Err(_) => {
                self.add(field, GROUP_MESSAGE);
                None
            }
        }
    }

    fn positive(&mut self, field: &str, raw: &str, message: &str) -> Option<u32> {
        match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    fn required(&mut self, field: &str, raw: &str, message: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            self.add(field, message);
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Merge validator failures. A field keeps the first message it got.
    fn check(&mut self, outcome: Result<(), ValidationErrors>) {
        if let Err(errors) = outcome {
            for (field, message) in AppError::from(errors).field_errors {
                self.add(&field, &message);
            }
        }
    }

    fn finish<T: Validate>(mut self, built: Option<T>) -> Result<T, AppError> {
        if let Some(value) = &built {
            self.check(value.validate());
        }
        match built {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(AppError::validation("Please correct the highlighted fields", self.0)),
        }
    }
}

/// Donation form. Disease defaults to "Nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct DonationForm {
    pub disease: String,
    pub age: String,
    pub blood_group: String,
    pub unit: String,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            disease: "Nothing".to_string(),
            age: String::new(),
            blood_group: String::new(),
            unit: String::new(),
        }
    }
}

impl DonationForm {
    pub fn parse(&self, donor: ProfileRef) -> Result<NewDonation, AppError> {
        let mut errors = FieldErrors::default();
        let age = errors.positive("age", &self.age, "Age is required");
        let blood_group = errors.blood_group("bloodGroup", &self.blood_group);
        let unit = errors.positive("unit", &self.unit, UNIT_MESSAGE);
        let disease = match self.disease.trim() {
            "" => "Nothing".to_string(),
            d => d.to_string(),
        };

        let built = match (age, blood_group, unit) {
            (Some(age), Some(blood_group), Some(unit)) => Some(NewDonation {
                disease,
                age,
                blood_group,
                unit,
                donor,
            }),
            _ => None,
        };
        errors.finish(built)
    }
}

/// Blood request form, used by donors and patients alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestForm {
    pub patient_name: String,
    pub patient_age: String,
    pub reason: String,
    pub blood_group: String,
    pub unit: String,
}

impl RequestForm {
    pub fn parse(&self, requester: Requester) -> Result<NewBloodRequest, AppError> {
        let mut errors = FieldErrors::default();
        let name = errors.required("patientName", &self.patient_name, "Patient name is required");
        let age = errors.positive("patientAge", &self.patient_age, "Patient age is required");
        let reason = errors.required("reason", &self.reason, "Reason is required");
        let blood_group = errors.blood_group("bloodGroup", &self.blood_group);
        let unit = errors.positive("unit", &self.unit, UNIT_MESSAGE);

        let built = match (name, age, reason, blood_group, unit) {
            (Some(name), Some(age), Some(reason), Some(group), Some(unit)) => Some(
                NewBloodRequest::new(requester, name, age, reason, group, unit),
            ),
            _ => None,
        };
        errors.finish(built)
    }
}

/// Sign-up form. Which extra fields are required depends on `role`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupForm {
    pub role: Role,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub blood_group: String,
    pub address: String,
    pub mobile: String,
    pub age: String,
    pub disease: String,
    pub doctor_name: String,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            role: Role::Donor,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            blood_group: String::new(),
            address: String::new(),
            mobile: String::new(),
            age: String::new(),
            disease: String::new(),
            doctor_name: String::new(),
        }
    }
}

impl SignupForm {
    pub fn parse(&self) -> Result<SignupRequest, AppError> {
        let mut errors = FieldErrors::default();
        let account = AccountFields {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        };
        errors.check(SignupRequest::validate_account(&account));
        let blood_group = errors.blood_group("bloodGroup", &self.blood_group);
        let address = errors.required("address", &self.address, "Address is required");
        let mobile = errors.required("mobile", &self.mobile, "Mobile number is required");

        let built = match self.role {
            Role::Donor => match (blood_group, address, mobile) {
                (Some(group), Some(address), Some(mobile)) => {
                    Some(SignupRequest::donor(account, group, address, mobile))
                }
                _ => None,
            },
            Role::Patient => {
                let age = errors.positive("age", &self.age, "Age is required");
                let disease = errors.required("disease", &self.disease, "Disease is required");
                let doctor =
                    errors.required("doctorName", &self.doctor_name, "Doctor name is required");
                match (age, blood_group, disease, doctor, address, mobile) {
                    (Some(age), Some(group), Some(disease), Some(doctor), Some(address), Some(mobile)) => {
                        Some(SignupRequest::patient(
                            account, age, group, disease, doctor, address, mobile,
                        ))
                    }
                    _ => None,
                }
            }
            Role::Admin => {
                errors.add("role", "Administrator accounts cannot be self-registered");
                None
            }
        };
        errors.finish(built)
    }
}

/// Parse an absolute stock level. Zero is allowed.
pub fn parse_stock_unit(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| AppError::field("unit", "Stock must be a non-negative whole number"))
}
