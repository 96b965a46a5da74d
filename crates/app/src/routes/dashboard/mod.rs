pub mod admin;
pub mod member;

use crate::auth::use_auth;
use client::{
    DashboardController, DashboardKind, HttpApi, Mutation, MutationTicket, RefreshTicket, Tab,
};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdClock, LdFileText, LdLayoutDashboard, LdPackage, LdShield, LdUserCheck, LdUsers,
};
use dioxus_free_icons::Icon;
use futures::channel::oneshot;
use futures::StreamExt;
use shared_types::{AppError, DashboardStats, RecordStatus};

pub type Dashboard = Signal<DashboardController<HttpApi>>;

/// Run a refresh and apply it, unless the page was dropped meanwhile.
async fn run_refresh(mut dashboard: Dashboard, ticket: RefreshTicket<HttpApi>) {
    let fetched = ticket.fetch().await;
    if let Ok(mut controller) = dashboard.try_write() {
        controller.apply_refresh(fetched);
    }
}

/// A write queued on the page's worker, with an optional reply for the form
/// that issued it.
pub struct DashboardAction {
    ticket: MutationTicket<HttpApi>,
    reply: Option<oneshot::Sender<Result<(), AppError>>>,
}

pub type Actions = Coroutine<DashboardAction>;

/// Send a write, then run the full refresh that follows a success.
async fn complete(mut dashboard: Dashboard, ticket: MutationTicket<HttpApi>) -> Result<(), AppError> {
    let outcome = ticket.send().await;
    let next = match dashboard.try_write() {
        Ok(mut controller) => controller.finish_mutation(outcome)?,
        Err(_) => return Ok(()),
    };
    if let Some(refresh) = next {
        run_refresh(dashboard, refresh).await;
    }
    Ok(())
}

/// Queue a write without waiting for it. Failures land in the error banner.
pub fn dispatch(mut dashboard: Dashboard, actions: Actions, mutation: Mutation) {
    match dashboard.write().begin_mutation(mutation) {
        Ok(ticket) => actions.send(DashboardAction { ticket, reply: None }),
        Err(e) => tracing::warn!(error = %e, "dashboard action not started"),
    }
}

/// Queue a write and wait for it and its refresh to finish.
///
/// The work belongs to the page, so it completes even if the caller's tab
/// is closed while waiting.
pub async fn submit(
    mut dashboard: Dashboard,
    actions: Actions,
    mutation: Mutation,
) -> Result<(), AppError> {
    let ticket = dashboard.write().begin_mutation(mutation)?;
    let (reply, done) = oneshot::channel();
    actions.send(DashboardAction {
        ticket,
        reply: Some(reply),
    });
    done.await
        .unwrap_or_else(|_| Err(AppError::transport("The dashboard closed before the action finished")))
}

/// The one dashboard page, parameterised by role.
#[component]
pub fn DashboardPage(kind: DashboardKind) -> Element {
    let auth = use_auth();
    let mut dashboard: Dashboard = use_signal(|| DashboardController::new(kind, auth.api()));

    // Bootstrap on first render and whenever the signed-in identity changes.
    use_effect(move || {
        let Some(session) = auth.session.read().clone() else {
            return;
        };
        let ticket = dashboard.write().activate(&session.identity);
        if let Some(ticket) = ticket {
            spawn(run_refresh(dashboard, ticket));
        }
    });

    // Writes run here rather than in the tab that issued them, so switching
    // tabs cannot cancel a write or the refresh owed after it.
    use_coroutine(move |mut rx: UnboundedReceiver<DashboardAction>| async move {
        while let Some(action) = rx.next().await {
            let result = complete(dashboard, action.ticket).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "dashboard action not applied");
            }
            if let Some(reply) = action.reply {
                let _ = reply.send(result);
            }
        }
    });

    use_drop(move || {
        if let Ok(mut controller) = dashboard.try_write() {
            controller.teardown();
        }
    });

    let (active, loaded, loading, error) = {
        let controller = dashboard.read();
        (
            controller.active_tab(),
            controller.data().is_some(),
            controller.is_loading(),
            controller.last_error().filter(|e| e.is_user_visible()).map(|e| e.message.clone()),
        )
    };
    let name = auth
        .session
        .read()
        .as_ref()
        .map(|s| s.display_name())
        .unwrap_or_default();

    rsx! {
        div { class: "dashboard",
            header { class: "dashboard-header",
                h1 { "{kind.title()}" }
                p { class: "dashboard-welcome", "Welcome, {name}" }
            }

            div { class: "dashboard-tabs",
                for tab in kind.tabs().iter().copied() {
                    button {
                        key: "{tab:?}",
                        class: if tab == active { "tab tab-active" } else { "tab" },
                        onclick: move |_| {
                            dashboard.write().select_tab(tab);
                        },
                        TabIcon { tab }
                        "{tab.label()}"
                    }
                }
            }

            if let Some(message) = error {
                div { class: "dashboard-error",
                    span { "{message}" }
                    button {
                        class: "button-link",
                        onclick: move |_| dashboard.write().dismiss_error(),
                        "Dismiss"
                    }
                }
            }

            if !loaded && loading {
                div { class: "dashboard-loading", "Loading..." }
            } else if loaded {
                div { class: "dashboard-body",
                    match active {
                        Tab::Overview => rsx! { Overview { dashboard } },
                        Tab::Stock => rsx! { admin::StockTab { dashboard } },
                        Tab::Donors => rsx! { admin::DonorsTab { dashboard } },
                        Tab::Patients => rsx! { admin::PatientsTab { dashboard } },
                        Tab::Requests => rsx! { admin::RequestsTab { dashboard } },
                        Tab::Donations => rsx! { admin::DonationsTab { dashboard } },
                        Tab::Donate => rsx! { member::DonateTab { dashboard } },
                        Tab::Request => rsx! { member::RequestTab { dashboard } },
                        Tab::History => rsx! { member::HistoryTab { dashboard, kind } },
                    }
                }
            }
        }
    }
}

#[component]
fn TabIcon(tab: Tab) -> Element {
    match tab {
        Tab::Overview => rsx! { Icon::<LdLayoutDashboard> { icon: LdLayoutDashboard, width: 16, height: 16 } },
        Tab::Stock => rsx! { Icon::<LdPackage> { icon: LdPackage, width: 16, height: 16 } },
        Tab::Donors => rsx! { Icon::<LdUsers> { icon: LdUsers, width: 16, height: 16 } },
        Tab::Patients => rsx! { Icon::<LdUserCheck> { icon: LdUserCheck, width: 16, height: 16 } },
        Tab::Requests | Tab::Request => rsx! { Icon::<LdFileText> { icon: LdFileText, width: 16, height: 16 } },
        Tab::Donations | Tab::Donate => rsx! { Icon::<LdShield> { icon: LdShield, width: 16, height: 16 } },
        Tab::History => rsx! { Icon::<LdClock> { icon: LdClock, width: 16, height: 16 } },
    }
}

#[component]
fn StatCard(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-value", "{value}" }
            span { class: "stat-label", "{label}" }
        }
    }
}

/// Role-specific selection of the shared counters.
fn overview_cards(kind: DashboardKind, stats: &DashboardStats) -> Vec<(&'static str, String)> {
    match kind {
        DashboardKind::Admin => vec![
            ("Total Donors", stats.total_donors.to_string()),
            ("Total Patients", stats.total_patients.to_string()),
            ("Total Requests", stats.total_requests.to_string()),
            ("Approved Requests", stats.approved_requests.to_string()),
            ("Total Blood Units", stats.total_blood_unit.to_string()),
        ],
        DashboardKind::Donor => vec![
            ("Total Donations", stats.total_donations.to_string()),
            ("Approved Donations", stats.approved_donations.to_string()),
            ("Total Requests", stats.total_requests.to_string()),
            ("Approved Requests", stats.approved_requests.to_string()),
        ],
        DashboardKind::Patient => vec![
            ("Total Requests", stats.total_requests.to_string()),
            ("Approved", stats.approved_requests.to_string()),
            ("Pending", stats.pending_requests.to_string()),
            ("Rejected", stats.rejected_requests.to_string()),
        ],
    }
}

#[component]
fn Overview(dashboard: Dashboard) -> Element {
    let (kind, stats) = {
        let controller = dashboard.read();
        (controller.kind(), *controller.stats())
    };

    rsx! {
        div { class: "stat-grid",
            for (label, value) in overview_cards(kind, &stats) {
                StatCard { key: "{label}", label, value }
            }
        }
    }
}

#[component]
pub fn StatusBadge(status: RecordStatus) -> Element {
    let class = match status {
        RecordStatus::Pending => "badge badge-pending",
        RecordStatus::Approved => "badge badge-approved",
        RecordStatus::Rejected => "badge badge-rejected",
    };
    rsx! { span { class, "{status}" } }
}
