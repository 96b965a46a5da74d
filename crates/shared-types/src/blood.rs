use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight canonical ABO/Rh blood groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight canonical codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBloodGroup(pub String);

impl fmt::Display for UnknownBloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown blood group '{}'", self.0)
    }
}

impl std::error::Error for UnknownBloodGroup {}

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        BloodGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == code)
            .ok_or_else(|| UnknownBloodGroup(s.to_string()))
    }
}

/// Lifecycle shared by donations and blood requests.
///
/// Created `Pending`; an administrator moves it to `Approved` or `Rejected`,
/// after which it never changes again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RecordStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecordStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "PENDING",
            RecordStatus::Approved => "APPROVED",
            RecordStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units on hand for one blood group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BloodStock {
    #[serde(default)]
    pub id: Option<i64>,
    pub blood_group: BloodGroup,
    #[serde(default)]
    pub unit: u32,
}

/// Account fields nested inside donor and patient records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Donor profile attached to a donor account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    pub blood_group: BloodGroup,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mobile: String,
}

impl Donor {
    pub fn display_name(&self) -> String {
        self.user.as_ref().map(UserSummary::full_name).unwrap_or_default()
    }
}

/// Patient profile attached to a patient account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub age: u32,
    pub blood_group: BloodGroup,
    #[serde(default)]
    pub disease: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mobile: String,
}

impl Patient {
    pub fn display_name(&self) -> String {
        self.user.as_ref().map(UserSummary::full_name).unwrap_or_default()
    }
}

fn default_disease() -> String {
    "Nothing".to_string()
}

/// A donor's offer of blood units, pending administrator review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    #[serde(default)]
    pub donor: Option<Donor>,
    #[serde(default = "default_disease")]
    pub disease: String,
    #[serde(default)]
    pub age: u32,
    pub blood_group: BloodGroup,
    pub unit: u32,
    #[serde(default)]
    pub status: RecordStatus,
    pub date: NaiveDate,
}

impl Donation {
    pub fn donor_name(&self) -> String {
        self.donor.as_ref().map(Donor::display_name).unwrap_or_default()
    }
}

/// A request for blood units, filed by a donor or a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: i64,
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub donor: Option<Donor>,
    pub patient_name: String,
    pub patient_age: u32,
    pub reason: String,
    pub blood_group: BloodGroup,
    pub unit: u32,
    #[serde(default)]
    pub status: RecordStatus,
    pub date: NaiveDate,
}
