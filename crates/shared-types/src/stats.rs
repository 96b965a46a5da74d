use serde::{Deserialize, Serialize};

use crate::{BloodRequest, BloodStock, Donation, Donor, Patient, RecordStatus};

/// Counters shown on the dashboard overview cards.
///
/// Always recomputed from the most recent snapshot, never adjusted in place.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_donors: usize,
    pub total_patients: usize,
    pub total_donations: usize,
    pub approved_donations: usize,
    pub pending_donations: usize,
    pub rejected_donations: usize,
    pub total_requests: usize,
    pub approved_requests: usize,
    pub pending_requests: usize,
    pub rejected_requests: usize,
    pub total_blood_unit: u64,
}

fn count<T>(items: &[T], status: RecordStatus, of: impl Fn(&T) -> RecordStatus) -> usize {
    items.iter().filter(|item| of(item) == status).count()
}

impl DashboardStats {
    pub fn derive(
        stock: &[BloodStock],
        donors: &[Donor],
        patients: &[Patient],
        donations: &[Donation],
        requests: &[BloodRequest],
    ) -> Self {
        let donation_status = |d: &Donation| d.status;
        let request_status = |r: &BloodRequest| r.status;
        Self {
            total_donors: donors.len(),
            total_patients: patients.len(),
            total_donations: donations.len(),
            approved_donations: count(donations, RecordStatus::Approved, donation_status),
            pending_donations: count(donations, RecordStatus::Pending, donation_status),
            rejected_donations: count(donations, RecordStatus::Rejected, donation_status),
            total_requests: requests.len(),
            approved_requests: count(requests, RecordStatus::Approved, request_status),
            pending_requests: count(requests, RecordStatus::Pending, request_status),
            rejected_requests: count(requests, RecordStatus::Rejected, request_status),
            total_blood_unit: stock.iter().map(|s| u64::from(s.unit)).sum(),
        }
    }
}
