//! One dashboard controller shared by the admin, donor and patient views.
//!
//! Every successful write is followed by a full re-read of the kind's
//! collections; nothing is patched locally. The controller itself never holds
//! a borrow across an await: work is handed out as tickets
//! ([`RefreshTicket`], [`MutationTicket`]) whose results are fed back through
//! [`DashboardController::apply_refresh`] and
//! [`DashboardController::finish_mutation`].

use shared_types::{
    AppError, BloodGroup, BloodRequest, BloodStock, DashboardStats, Donation, Donor, Identity,
    NewBloodRequest, NewDonation, Patient, ProfileRef, RecordStatus, Requester, Role,
};

use std::sync::{Arc, Weak};

use crate::api::{BloodBankApi, Decision};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    Admin,
    Donor,
    Patient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Overview,
    Stock,
    Donors,
    Patients,
    Requests,
    Donations,
    Donate,
    Request,
    History,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Stock => "Blood Stock",
            Tab::Donors => "Donors",
            Tab::Patients => "Patients",
            Tab::Requests => "Blood Requests",
            Tab::Donations => "Donations",
            Tab::Donate => "Donate Blood",
            Tab::Request => "Request Blood",
            Tab::History => "History",
        }
    }
}

const ADMIN_TABS: &[Tab] = &[
    Tab::Overview,
    Tab::Stock,
    Tab::Donors,
    Tab::Patients,
    Tab::Requests,
    Tab::Donations,
];
const DONOR_TABS: &[Tab] = &[Tab::Overview, Tab::Donate, Tab::Request, Tab::History];
const PATIENT_TABS: &[Tab] = &[Tab::Overview, Tab::Request, Tab::History];

/// A single state-changing action.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SubmitDonation(NewDonation),
    SubmitRequest(NewBloodRequest),
    ApproveDonation(i64),
    RejectDonation(i64),
    ApproveRequest(i64),
    RejectRequest(i64),
    UpdateStock { group: BloodGroup, unit: u32 },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SubmitDonation(_) => "submit_donation",
            Mutation::SubmitRequest(_) => "submit_request",
            Mutation::ApproveDonation(_) => "approve_donation",
            Mutation::RejectDonation(_) => "reject_donation",
            Mutation::ApproveRequest(_) => "approve_request",
            Mutation::RejectRequest(_) => "reject_request",
            Mutation::UpdateStock { .. } => "update_stock",
        }
    }

    /// Issue exactly one write call.
    pub async fn send<A: BloodBankApi>(&self, api: &A) -> Result<(), AppError> {
        match self {
            Mutation::SubmitDonation(donation) => api.create_donation(donation).await,
            Mutation::SubmitRequest(request) => api.create_request(request).await,
            Mutation::ApproveDonation(id) => api.decide_donation(*id, Decision::Approve).await,
            Mutation::RejectDonation(id) => api.decide_donation(*id, Decision::Reject).await,
            Mutation::ApproveRequest(id) => api.decide_request(*id, Decision::Approve).await,
            Mutation::RejectRequest(id) => api.decide_request(*id, Decision::Reject).await,
            Mutation::UpdateStock { group, unit } => api.update_stock(*group, *unit).await,
        }
    }
}

impl DashboardKind {
    pub fn required_role(&self) -> Role {
        match self {
            DashboardKind::Admin => Role::Admin,
            DashboardKind::Donor => Role::Donor,
            DashboardKind::Patient => Role::Patient,
        }
    }

    pub fn tabs(&self) -> &'static [Tab] {
        match self {
            DashboardKind::Admin => ADMIN_TABS,
            DashboardKind::Donor => DONOR_TABS,
            DashboardKind::Patient => PATIENT_TABS,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DashboardKind::Admin => "Admin Dashboard",
            DashboardKind::Donor => "Donor Dashboard",
            DashboardKind::Patient => "Patient Dashboard",
        }
    }

    /// Whether this kind of dashboard offers the action at all.
    pub fn allows(&self, mutation: &Mutation) -> bool {
        match self {
            DashboardKind::Admin => !matches!(
                mutation,
                Mutation::SubmitDonation(_) | Mutation::SubmitRequest(_)
            ),
            DashboardKind::Donor => matches!(
                mutation,
                Mutation::SubmitDonation(_) | Mutation::SubmitRequest(_)
            ),
            DashboardKind::Patient => matches!(mutation, Mutation::SubmitRequest(_)),
        }
    }

    /// Fire every read for this kind concurrently, then join.
    ///
    /// The first failing read fails the whole fetch.
    pub async fn fetch<A: BloodBankApi>(
        &self,
        api: &A,
        identity: &Identity,
    ) -> Result<DashboardData, AppError> {
        let user_id = identity.id;
        match self {
            DashboardKind::Admin => {
                let (stock, donors, patients, requests, donations) = futures::join!(
                    api.list_stock(),
                    api.list_donors(),
                    api.list_patients(),
                    api.list_requests(),
                    api.list_donations(),
                );
                Ok(DashboardData {
                    stock: stock?,
                    donors: donors?,
                    patients: patients?,
                    requests: requests?,
                    donations: donations?,
                    ..DashboardData::default()
                })
            }
            DashboardKind::Donor => {
                let (profile, donations, requests) = futures::join!(
                    api.donor_by_user(user_id),
                    api.donations_by_donor(user_id),
                    api.requests_by_donor(user_id),
                );
                Ok(DashboardData {
                    donor_profile: Some(profile?),
                    donations: donations?,
                    requests: requests?,
                    ..DashboardData::default()
                })
            }
            DashboardKind::Patient => {
                let (profile, requests) = futures::join!(
                    api.patient_by_user(user_id),
                    api.requests_by_patient(user_id),
                );
                Ok(DashboardData {
                    patient_profile: Some(profile?),
                    requests: requests?,
                    ..DashboardData::default()
                })
            }
        }
    }
}

/// One consistent snapshot of everything a dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub stock: Vec<BloodStock>,
    pub donors: Vec<Donor>,
    pub patients: Vec<Patient>,
    pub donations: Vec<Donation>,
    pub requests: Vec<BloodRequest>,
    pub donor_profile: Option<Donor>,
    pub patient_profile: Option<Patient>,
}

impl DashboardData {
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::derive(
            &self.stock,
            &self.donors,
            &self.patients,
            &self.donations,
            &self.requests,
        )
    }

    /// Requests still awaiting an administrator decision.
    pub fn pending_requests(&self) -> Vec<&BloodRequest> {
        self.requests
            .iter()
            .filter(|r| r.status == RecordStatus::Pending)
            .collect()
    }

    pub fn stock_for(&self, group: BloodGroup) -> Option<&BloodStock> {
        self.stock.iter().find(|s| s.blood_group == group)
    }

    /// Profile reference for filing a donation.
    pub fn donor_ref(&self) -> Option<ProfileRef> {
        self.donor_profile.as_ref().map(|d| ProfileRef { id: d.id })
    }

    /// Profile under which a blood request is filed.
    pub fn requester(&self) -> Option<Requester> {
        match (&self.donor_profile, &self.patient_profile) {
            (Some(donor), _) => Some(Requester::Donor(ProfileRef { id: donor.id })),
            (None, Some(patient)) => Some(Requester::Patient(ProfileRef { id: patient.id })),
            (None, None) => None,
        }
    }
}

/// A refresh handed out by the controller, to be run without borrowing it.
#[derive(Debug, Clone)]
pub struct RefreshTicket<A> {
    api: A,
    kind: DashboardKind,
    identity: Identity,
    generation: u64,
    lease: Option<MutationLease>,
}

/// Result of a [`RefreshTicket`], tagged with the generation it was issued at.
#[derive(Debug)]
pub struct Fetched {
    generation: u64,
    result: Result<DashboardData, AppError>,
    lease: Option<MutationLease>,
}

impl<A: BloodBankApi> RefreshTicket<A> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn fetch(self) -> Fetched {
        let result = self.kind.fetch(&self.api, &self.identity).await;
        Fetched {
            generation: self.generation,
            result,
            lease: self.lease,
        }
    }
}

/// Keeps a mutation's busy state alive.
///
/// Travels from the [`MutationTicket`] through its outcome and follow-up
/// refresh. If every holder is dropped before the refresh is applied, the
/// controller stops reporting busy.
#[derive(Debug, Clone)]
struct MutationLease(Arc<()>);

/// A write handed out by the controller.
#[derive(Debug)]
pub struct MutationTicket<A> {
    api: A,
    mutation: Mutation,
    lease: MutationLease,
}

#[derive(Debug)]
pub struct MutationOutcome {
    mutation: Mutation,
    result: Result<(), AppError>,
    lease: MutationLease,
}

impl<A: BloodBankApi> MutationTicket<A> {
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub async fn send(self) -> MutationOutcome {
        let result = self.mutation.send(&self.api).await;
        MutationOutcome {
            mutation: self.mutation,
            result,
            lease: self.lease,
        }
    }
}

#[derive(Debug)]
pub struct DashboardController<A> {
    kind: DashboardKind,
    api: A,
    identity: Option<Identity>,
    active_tab: Tab,
    data: Option<DashboardData>,
    stats: DashboardStats,
    /// Generation of the most recently issued refresh.
    issued: u64,
    /// Results at or below this generation are stale.
    settled: u64,
    /// Generation of the refresh that ends the current mutation.
    mutation_refresh: Option<u64>,
    /// Set while a mutation is pending; dead once its tickets are all dropped.
    mutation_lease: Option<Weak<()>>,
    torn_down: bool,
    last_error: Option<AppError>,
}

impl<A: BloodBankApi> DashboardController<A> {
    pub fn new(kind: DashboardKind, api: A) -> Self {
        Self {
            kind,
            api,
            identity: None,
            active_tab: Tab::Overview,
            data: None,
            stats: DashboardStats::default(),
            issued: 0,
            settled: 0,
            mutation_refresh: None,
            mutation_lease: None,
            torn_down: false,
            last_error: None,
        }
    }

    pub fn kind(&self) -> DashboardKind {
        self.kind
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.issued > self.settled
    }

    pub fn is_busy(&self) -> bool {
        self.mutation_lease
            .as_ref()
            .is_some_and(|lease| lease.strong_count() > 0)
    }

    fn end_mutation(&mut self) {
        self.mutation_lease = None;
        self.mutation_refresh = None;
    }

    /// Reissue the refetch owed by a mutation whose tickets were dropped
    /// before its refresh was applied. The write may have landed either way.
    pub fn recover_abandoned(&mut self) -> Option<RefreshTicket<A>> {
        let abandoned = self
            .mutation_lease
            .as_ref()
            .is_some_and(|lease| lease.strong_count() == 0);
        if !abandoned {
            return None;
        }
        tracing::warn!(kind = ?self.kind, "mutation abandoned before its refresh; refetching");
        self.end_mutation();
        self.begin_refresh()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Bind to `identity`. Returns the bootstrap fetch on first activation
    /// or when the identity changed; `None` otherwise.
    pub fn activate(&mut self, identity: &Identity) -> Option<RefreshTicket<A>> {
        if self.torn_down {
            return None;
        }
        if self.identity.as_ref() == Some(identity) {
            return self.recover_abandoned();
        }
        if self.identity.is_some() {
            tracing::info!(kind = ?self.kind, user_id = identity.id, "identity changed; discarding dashboard state");
            self.settled = self.issued;
            self.data = None;
            self.stats = DashboardStats::default();
            self.last_error = None;
        }
        self.identity = Some(identity.clone());
        self.begin_refresh()
    }

    /// Switch tabs. Tabs outside the kind's set are ignored. No network effect.
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if self.kind.tabs().contains(&tab) {
            self.active_tab = tab;
            true
        } else {
            false
        }
    }

    pub fn begin_refresh(&mut self) -> Option<RefreshTicket<A>> {
        if self.torn_down {
            return None;
        }
        let identity = self.identity.clone()?;
        self.issued += 1;
        tracing::debug!(kind = ?self.kind, generation = self.issued, "refresh issued");
        Some(RefreshTicket {
            api: self.api.clone(),
            kind: self.kind,
            identity,
            generation: self.issued,
            lease: None,
        })
    }

    /// Apply a fetch result. Returns `false` if it was discarded as stale.
    ///
    /// On failure the previous snapshot stays displayed.
    pub fn apply_refresh(&mut self, fetched: Fetched) -> bool {
        if self.torn_down {
            tracing::debug!(generation = fetched.generation, "result after teardown discarded");
            return false;
        }
        if self
            .mutation_refresh
            .is_some_and(|g| fetched.generation >= g || self.settled >= g)
        {
            self.end_mutation();
        }
        if fetched.generation <= self.settled {
            tracing::debug!(
                generation = fetched.generation,
                settled = self.settled,
                "superseded refresh discarded"
            );
            return false;
        }
        self.settled = fetched.generation;
        match fetched.result {
            Ok(data) => {
                self.stats = data.stats();
                self.data = Some(data);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!(kind = ?self.kind, error = %e, "dashboard fetch failed");
                self.last_error = Some(e);
            }
        }
        true
    }

    /// Start a write. Rejected while another write (or its refresh) is pending.
    pub fn begin_mutation(&mut self, mutation: Mutation) -> Result<MutationTicket<A>, AppError> {
        if self.torn_down {
            return Err(AppError::transport("This dashboard is no longer active"));
        }
        if !self.kind.allows(&mutation) {
            return Err(AppError::authorization(format!(
                "{} is not available on the {}",
                mutation.name(),
                self.kind.title()
            )));
        }
        if self.is_busy() {
            return Err(AppError::validation(
                "Another action is still in progress",
                Default::default(),
            ));
        }
        let lease = Arc::new(());
        self.mutation_lease = Some(Arc::downgrade(&lease));
        self.mutation_refresh = None;
        self.last_error = None;
        tracing::info!(kind = ?self.kind, action = mutation.name(), "mutation started");
        Ok(MutationTicket {
            api: self.api.clone(),
            mutation,
            lease: MutationLease(lease),
        })
    }

    /// Record a write's outcome. On success returns the refresh that must
    /// follow; on failure nothing is refetched and the snapshot is untouched.
    pub fn finish_mutation(
        &mut self,
        outcome: MutationOutcome,
    ) -> Result<Option<RefreshTicket<A>>, AppError> {
        match outcome.result {
            Ok(()) => {
                tracing::info!(action = outcome.mutation.name(), "mutation succeeded");
                let mut ticket = self.begin_refresh();
                match ticket.as_mut() {
                    Some(t) => {
                        self.mutation_refresh = Some(t.generation);
                        t.lease = Some(outcome.lease);
                    }
                    None => self.end_mutation(),
                }
                Ok(ticket)
            }
            Err(e) => {
                tracing::warn!(action = outcome.mutation.name(), error = %e, "mutation failed");
                self.end_mutation();
                if !self.torn_down {
                    self.last_error = Some(e.clone());
                }
                Err(e)
            }
        }
    }

    /// Stop accepting results. In-flight responses are dropped on arrival.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.end_mutation();
    }

    /// Run a refresh to completion.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        match self.begin_refresh() {
            Some(ticket) => self.run(ticket).await,
            None => Ok(()),
        }
    }

    /// Activate and, if needed, wait for the bootstrap fetch.
    pub async fn bootstrap(&mut self, identity: &Identity) -> Result<(), AppError> {
        match self.activate(identity) {
            Some(ticket) => self.run(ticket).await,
            None => Ok(()),
        }
    }

    /// Perform one write and, on success, the full refresh after it.
    pub async fn mutate(&mut self, mutation: Mutation) -> Result<(), AppError> {
        let ticket = self.begin_mutation(mutation)?;
        let outcome = ticket.send().await;
        match self.finish_mutation(outcome)? {
            Some(refresh) => self.run(refresh).await,
            None => Ok(()),
        }
    }

    async fn run(&mut self, ticket: RefreshTicket<A>) -> Result<(), AppError> {
        let fetched = ticket.fetch().await;
        let error = fetched.result.as_ref().err().cloned();
        let applied = self.apply_refresh(fetched);
        match error {
            Some(e) if applied => Err(e),
            _ => Ok(()),
        }
    }
}
