use crate::common::{TestBank, DONOR_PROFILE_ID, SEED_UNITS};
use client::{DashboardController, DashboardKind, DonationForm, HttpApi, Mutation, RequestForm};
use pretty_assertions::assert_eq;
use shared_types::{AppErrorKind, BloodGroup, ProfileRef, RecordStatus};
use std::time::Duration;

const ALL_GROUP_UNITS: u64 = SEED_UNITS as u64 * 8;

async fn dashboard(
    bank: &TestBank,
    kind: DashboardKind,
    username: &str,
) -> DashboardController<HttpApi> {
    let mut controller = DashboardController::new(kind, bank.api());
    controller.bootstrap(&bank.identity(username)).await.unwrap();
    controller
}

#[tokio::test]
async fn donor_submits_a_donation_and_sees_it_after_one_refetch() {
    let bank = TestBank::seeded().await;
    bank.with(|b| b.delay = Duration::from_millis(50));

    let mut controller = dashboard(&bank, DashboardKind::Donor, "dana").await;

    bank.with(|b| {
        assert_eq!(b.hit_count("GET /api/donors/user/7"), 1);
        assert_eq!(b.hit_count("GET /api/donations/donor/7"), 1);
        assert_eq!(b.hit_count("GET /api/requests/donor/7"), 1);
        assert_eq!(b.total_hits(), 3);
        assert_eq!(b.max_in_flight, 3);
    });
    let before = *controller.stats();
    assert_eq!(before.total_donations, 2);
    assert_eq!(before.approved_donations, 1);
    assert_eq!(
        controller.data().and_then(|d| d.donor_ref()),
        Some(ProfileRef { id: DONOR_PROFILE_ID })
    );

    let form = DonationForm {
        age: "30".into(),
        blood_group: "O+".into(),
        unit: "2".into(),
        ..DonationForm::default()
    };
    let donation = form.parse(ProfileRef { id: DONOR_PROFILE_ID }).unwrap();
    controller.mutate(Mutation::SubmitDonation(donation)).await.unwrap();

    bank.with(|b| {
        assert_eq!(b.hit_count("POST /api/donations"), 1);
        assert_eq!(b.hit_count("GET /api/donors/user/7"), 2);
        assert_eq!(b.hit_count("GET /api/donations/donor/7"), 2);
        assert_eq!(b.hit_count("GET /api/requests/donor/7"), 2);
        assert_eq!(b.total_hits(), 7);
    });
    let after = *controller.stats();
    assert_eq!(after.total_donations, before.total_donations + 1);
    assert_eq!(after.approved_donations, before.approved_donations);
    assert_eq!(after.pending_donations, before.pending_donations + 1);

    let newest = controller
        .data()
        .and_then(|d| d.donations.iter().max_by_key(|d| d.id))
        .cloned()
        .unwrap();
    assert_eq!(newest.status, RecordStatus::Pending);
    assert_eq!(newest.unit, 2);
    assert_eq!(newest.blood_group, BloodGroup::OPositive);
    assert_eq!(newest.disease, "Nothing");
    assert!(!controller.is_busy());
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn admin_bootstrap_reads_every_collection_once() {
    let bank = TestBank::seeded().await;

    let controller = dashboard(&bank, DashboardKind::Admin, "admin").await;

    bank.with(|b| {
        for route in [
            "GET /api/stock",
            "GET /api/donors",
            "GET /api/patients",
            "GET /api/requests",
            "GET /api/donations",
        ] {
            assert_eq!(b.hit_count(route), 1, "{route}");
        }
        assert_eq!(b.total_hits(), 5);
    });
    let stats = controller.stats();
    assert_eq!(stats.total_donors, 1);
    assert_eq!(stats.total_patients, 1);
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.approved_requests, 1);
    assert_eq!(stats.total_blood_unit, ALL_GROUP_UNITS);

    let pending: Vec<i64> = controller
        .data()
        .map(|d| d.pending_requests().iter().map(|r| r.id).collect())
        .unwrap_or_default();
    assert_eq!(pending, vec![100, 102]);
}

#[tokio::test]
async fn rejecting_an_already_decided_donation_keeps_the_stale_row() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Admin, "admin").await;

    // Another administrator approves donation 42 after our snapshot was taken.
    bank.with(|b| {
        if let Some(d) = b.donations.iter_mut().find(|d| d.id == 42) {
            d.status = RecordStatus::Approved;
        }
    });
    let hits_before = bank.with(|b| b.total_hits());

    let err = controller
        .mutate(Mutation::RejectDonation(42))
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::ValidationFailure);
    assert_eq!(err.message, "Donation has already been processed");
    assert_eq!(controller.last_error(), Some(&err));
    assert_eq!(bank.with(|b| b.total_hits()), hits_before + 1);
    let shown = controller
        .data()
        .and_then(|d| d.donations.iter().find(|d| d.id == 42))
        .map(|d| d.status);
    assert_eq!(shown, Some(RecordStatus::Pending));
    assert!(!controller.is_busy());

    controller.refresh().await.unwrap();
    let shown = controller
        .data()
        .and_then(|d| d.donations.iter().find(|d| d.id == 42))
        .map(|d| d.status);
    assert_eq!(shown, Some(RecordStatus::Approved));
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn stock_update_is_reflected_in_unit_and_total() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Admin, "admin").await;

    controller
        .mutate(Mutation::UpdateStock {
            group: BloodGroup::AbNegative,
            unit: 5,
        })
        .await
        .unwrap();

    let unit = controller
        .data()
        .and_then(|d| d.stock_for(BloodGroup::AbNegative))
        .map(|s| s.unit);
    assert_eq!(unit, Some(5));
    assert_eq!(
        controller.stats().total_blood_unit,
        ALL_GROUP_UNITS - u64::from(SEED_UNITS) + 5
    );
    bank.with(|b| {
        assert_eq!(b.hit_count("PUT /api/stock/AB-"), 1);
        assert_eq!(b.hit_count("GET /api/stock"), 2);
    });
}

#[tokio::test]
async fn approving_a_request_drops_it_from_pending_and_draws_stock() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Admin, "admin").await;
    let approved_before = controller.stats().approved_requests;

    controller.mutate(Mutation::ApproveRequest(100)).await.unwrap();

    let data = controller.data().unwrap();
    assert!(data.pending_requests().iter().all(|r| r.id != 100));
    assert_eq!(
        data.stock_for(BloodGroup::ANegative).map(|s| s.unit),
        Some(SEED_UNITS - 2)
    );
    assert_eq!(controller.stats().approved_requests, approved_before + 1);
}

#[tokio::test]
async fn failed_approval_triggers_no_refetch() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Admin, "admin").await;
    let snapshot = controller.data().cloned();
    let hits_before = bank.with(|b| b.total_hits());

    let err = controller
        .mutate(Mutation::ApproveRequest(102))
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::ValidationFailure);
    assert!(err.message.starts_with("Insufficient blood stock"));
    assert_eq!(bank.with(|b| b.total_hits()), hits_before + 1);
    assert_eq!(controller.data().cloned(), snapshot);
}

#[tokio::test]
async fn patient_files_a_request_under_their_profile() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Patient, "pat").await;
    assert_eq!(bank.with(|b| b.total_hits()), 2);
    assert_eq!(controller.stats().total_requests, 2);

    let requester = controller.data().and_then(|d| d.requester()).unwrap();
    let form = RequestForm {
        patient_name: "Pat Lee".into(),
        patient_age: "52".into(),
        reason: "Chemotherapy".into(),
        blood_group: "A-".into(),
        unit: "1".into(),
    };
    controller
        .mutate(Mutation::SubmitRequest(form.parse(requester).unwrap()))
        .await
        .unwrap();

    let stats = controller.stats();
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.pending_requests, 3);
    assert_eq!(bank.with(|b| b.hit_count("GET /api/requests/patient/9")), 2);
}

#[tokio::test]
async fn patient_dashboard_refuses_donations_without_a_call() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Patient, "pat").await;
    let hits_before = bank.with(|b| b.total_hits());
    let form = DonationForm {
        age: "52".into(),
        blood_group: "A-".into(),
        unit: "1".into(),
        ..DonationForm::default()
    };

    let err = controller
        .mutate(Mutation::SubmitDonation(
            form.parse(ProfileRef { id: 1 }).unwrap(),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::AuthorizationFailure);
    assert_eq!(bank.with(|b| b.total_hits()), hits_before);
}

#[tokio::test]
async fn second_write_waits_for_the_first_and_its_refetch() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Admin, "admin").await;

    let first = controller.begin_mutation(Mutation::RejectRequest(100)).unwrap();
    assert!(controller.begin_mutation(Mutation::RejectDonation(42)).is_err());

    let outcome = first.send().await;
    let refresh = controller.finish_mutation(outcome).unwrap().unwrap();
    assert!(controller.is_busy());
    assert!(controller.begin_mutation(Mutation::RejectDonation(42)).is_err());

    let fetched = refresh.fetch().await;
    assert!(controller.apply_refresh(fetched));
    assert!(!controller.is_busy());
    assert!(controller.begin_mutation(Mutation::RejectDonation(42)).is_ok());
}

#[tokio::test]
async fn results_arriving_after_teardown_are_dropped() {
    let bank = TestBank::seeded().await;
    let mut controller = DashboardController::new(DashboardKind::Donor, bank.api());

    let ticket = controller.activate(&bank.identity("dana")).unwrap();
    controller.teardown();
    let fetched = ticket.fetch().await;

    assert!(!controller.apply_refresh(fetched));
    assert!(controller.data().is_none());
    assert_eq!(bank.with(|b| b.total_hits()), 3);
}

#[tokio::test]
async fn abandoned_write_unblocks_the_dashboard_and_refetches_on_return() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Admin, "admin").await;
    let identity = bank.identity("admin");

    // The write lands but its refresh is never run, as when the view that
    // issued it goes away mid-flight.
    let ticket = controller.begin_mutation(Mutation::RejectRequest(100)).unwrap();
    let refresh = controller.finish_mutation(ticket.send().await).unwrap();
    drop(refresh);

    assert!(!controller.is_busy());
    let shown = controller
        .data()
        .and_then(|d| d.requests.iter().find(|r| r.id == 100))
        .map(|r| r.status);
    assert_eq!(shown, Some(RecordStatus::Pending));

    let recovery = controller.activate(&identity).unwrap();
    assert!(controller.apply_refresh(recovery.fetch().await));
    let shown = controller
        .data()
        .and_then(|d| d.requests.iter().find(|r| r.id == 100))
        .map(|r| r.status);
    assert_eq!(shown, Some(RecordStatus::Rejected));
    assert_eq!(bank.with(|b| b.hit_count("GET /api/requests")), 2);

    assert!(controller.activate(&identity).is_none());
    controller.mutate(Mutation::RejectDonation(42)).await.unwrap();
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn unsent_write_does_not_hold_the_dashboard() {
    let bank = TestBank::seeded().await;
    let mut controller = dashboard(&bank, DashboardKind::Donor, "dana").await;
    let form = DonationForm {
        age: "30".into(),
        blood_group: "O+".into(),
        unit: "1".into(),
        ..DonationForm::default()
    };
    let donor = ProfileRef { id: DONOR_PROFILE_ID };

    let ticket = controller
        .begin_mutation(Mutation::SubmitDonation(form.parse(donor).unwrap()))
        .unwrap();
    assert!(controller.is_busy());
    drop(ticket);

    assert!(!controller.is_busy());
    assert_eq!(bank.with(|b| b.hit_count("POST /api/donations")), 0);
    controller
        .mutate(Mutation::SubmitDonation(form.parse(donor).unwrap()))
        .await
        .unwrap();
    assert_eq!(bank.with(|b| b.hit_count("POST /api/donations")), 1);
    assert_eq!(controller.stats().total_donations, 3);
}
