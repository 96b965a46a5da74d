use serde::{Deserialize, Serialize};

use crate::{BloodGroup, Identity, Role, Session};

#[cfg(feature = "validation")]
use validator::Validate;

/// Sign-in request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct SignInRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Username is required"))
    )]
    pub username: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
}

/// Response returned after successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl SignInResponse {
    /// Split into the bearer credential and the identity to persist.
    ///
    /// Authorities outside the three known roles are dropped.
    pub fn into_session(self) -> Session {
        let roles = self
            .roles
            .iter()
            .filter_map(|r| Role::from_wire(r))
            .collect();
        Session::new(
            self.token,
            Identity {
                id: self.id,
                username: self.username,
                email: self.email,
                first_name: self.first_name,
                last_name: self.last_name,
                roles,
            },
        )
    }
}

/// Sign-up request. Role-specific fields are omitted from the body when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct SignupRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 3, max = 20, message = "Username must be 3 to 20 characters"))
    )]
    pub username: String,
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, message = "Password must be at least 6 characters"))
    )]
    pub password: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "First name is required"))
    )]
    pub first_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Last name is required"))
    )]
    pub last_name: String,
    pub role: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

/// Account fields common to every sign-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignupRequest {
    fn base(account: AccountFields, role: Role) -> Self {
        Self {
            username: account.username,
            email: account.email,
            password: account.password,
            first_name: account.first_name,
            last_name: account.last_name,
            role: vec![role.signup_name().to_string()],
            blood_group: None,
            address: None,
            mobile: None,
            age: None,
            disease: None,
            doctor_name: None,
        }
    }

    /// Check the account fields alone, before the role-specific ones parse.
    #[cfg(feature = "validation")]
    pub fn validate_account(account: &AccountFields) -> Result<(), validator::ValidationErrors> {
        Self::base(account.clone(), Role::Donor).validate()
    }

    pub fn donor(
        account: AccountFields,
        blood_group: BloodGroup,
        address: String,
        mobile: String,
    ) -> Self {
        Self {
            blood_group: Some(blood_group),
            address: Some(address),
            mobile: Some(mobile),
            ..Self::base(account, Role::Donor)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn patient(
        account: AccountFields,
        age: u32,
        blood_group: BloodGroup,
        disease: String,
        doctor_name: String,
        address: String,
        mobile: String,
    ) -> Self {
        Self {
            age: Some(age),
            blood_group: Some(blood_group),
            disease: Some(disease),
            doctor_name: Some(doctor_name),
            address: Some(address),
            mobile: Some(mobile),
            ..Self::base(account, Role::Patient)
        }
    }
}

/// Reference to a donor or patient profile by its record id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileRef {
    pub id: i64,
}

/// Body for `POST /api/donations`. The server assigns id, status and date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct NewDonation {
    pub disease: String,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Age is required"))
    )]
    pub age: u32,
    pub blood_group: BloodGroup,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Units must be a positive whole number"))
    )]
    pub unit: u32,
    pub donor: ProfileRef,
}

/// Which profile a blood request is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Donor(ProfileRef),
    Patient(ProfileRef),
}

/// Body for `POST /api/requests`. Exactly one of `donor` / `patient` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct NewBloodRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Patient name is required"))
    )]
    pub patient_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Patient age is required"))
    )]
    pub patient_age: u32,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Reason is required"))
    )]
    pub reason: String,
    pub blood_group: BloodGroup,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Units must be a positive whole number"))
    )]
    pub unit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor: Option<ProfileRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<ProfileRef>,
}

impl NewBloodRequest {
    pub fn new(
        requester: Requester,
        patient_name: String,
        patient_age: u32,
        reason: String,
        blood_group: BloodGroup,
        unit: u32,
    ) -> Self {
        let (donor, patient) = match requester {
            Requester::Donor(r) => (Some(r), None),
            Requester::Patient(r) => (None, Some(r)),
        };
        Self {
            patient_name,
            patient_age,
            reason,
            blood_group,
            unit,
            donor,
            patient,
        }
    }
}

/// Body for `PUT /api/stock/{bloodGroup}`: absolute unit count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateStockRequest {
    pub unit: u32,
}
