use super::{dispatch, Dashboard, DashboardAction, StatusBadge};
use client::{parse_stock_unit, Mutation};
use dioxus::prelude::*;
use shared_types::{BloodGroup, RecordStatus};

#[component]
pub fn StockTab(dashboard: Dashboard) -> Element {
    let actions = use_coroutine_handle::<DashboardAction>();
    let mut editing = use_signal(|| Option::<BloodGroup>::None);
    let mut draft = use_signal(String::new);
    let mut draft_error = use_signal(|| Option::<String>::None);

    let (stock, busy) = {
        let controller = dashboard.read();
        let data = controller.data();
        let rows: Vec<(BloodGroup, u32)> = BloodGroup::ALL
            .into_iter()
            .map(|g| {
                let unit = data.and_then(|d| d.stock_for(g)).map(|s| s.unit).unwrap_or(0);
                (g, unit)
            })
            .collect();
        (rows, controller.is_busy())
    };

    let mut save = move |group: BloodGroup| match parse_stock_unit(&draft()) {
        Ok(unit) => {
            draft_error.set(None);
            editing.set(None);
            dispatch(dashboard, actions, Mutation::UpdateStock { group, unit });
        }
        Err(e) => draft_error.set(Some(e.message)),
    };

    rsx! {
        div { class: "stock-grid",
            for (group, unit) in stock {
                div { key: "{group}", class: "stock-card",
                    span { class: "stock-group", "{group}" }
                    if editing() == Some(group) {
                        input {
                            r#type: "number",
                            min: "0",
                            value: draft(),
                            oninput: move |e| draft.set(e.value()),
                        }
                        if let Some(err) = draft_error() {
                            span { class: "field-error", "{err}" }
                        }
                        div { class: "stock-actions",
                            button {
                                class: "button",
                                disabled: busy,
                                onclick: move |_| save(group),
                                "Save"
                            }
                            button {
                                class: "button button-outline",
                                onclick: move |_| {
                                    editing.set(None);
                                    draft_error.set(None);
                                },
                                "Cancel"
                            }
                        }
                    } else {
                        span { class: "stock-unit", "{unit} units" }
                        button {
                            class: "button-link",
                            disabled: busy,
                            onclick: move |_| {
                                draft.set(unit.to_string());
                                editing.set(Some(group));
                            },
                            "Update"
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn DonorsTab(dashboard: Dashboard) -> Element {
    let donors = dashboard
        .read()
        .data()
        .map(|d| d.donors.clone())
        .unwrap_or_default();

    rsx! {
        table { class: "data-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Blood Group" }
                    th { "Address" }
                    th { "Mobile" }
                }
            }
            tbody {
                for donor in donors {
                    tr { key: "{donor.id}",
                        td { "{donor.display_name()}" }
                        td { "{donor.blood_group}" }
                        td { "{donor.address}" }
                        td { "{donor.mobile}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn PatientsTab(dashboard: Dashboard) -> Element {
    let patients = dashboard
        .read()
        .data()
        .map(|d| d.patients.clone())
        .unwrap_or_default();

    rsx! {
        table { class: "data-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Age" }
                    th { "Blood Group" }
                    th { "Disease" }
                    th { "Doctor" }
                    th { "Mobile" }
                }
            }
            tbody {
                for patient in patients {
                    tr { key: "{patient.id}",
                        td { "{patient.display_name()}" }
                        td { "{patient.age}" }
                        td { "{patient.blood_group}" }
                        td { "{patient.disease}" }
                        td { "{patient.doctor_name}" }
                        td { "{patient.mobile}" }
                    }
                }
            }
        }
    }
}

/// Pending requests only; decided ones drop out after the refresh.
#[component]
pub fn RequestsTab(dashboard: Dashboard) -> Element {
    let actions = use_coroutine_handle::<DashboardAction>();
    let (pending, busy) = {
        let controller = dashboard.read();
        let pending: Vec<_> = controller
            .data()
            .map(|d| d.pending_requests().into_iter().cloned().collect())
            .unwrap_or_default();
        (pending, controller.is_busy())
    };

    rsx! {
        if pending.is_empty() {
            p { class: "empty-state", "No pending blood requests." }
        } else {
            table { class: "data-table",
                thead {
                    tr {
                        th { "Patient" }
                        th { "Age" }
                        th { "Reason" }
                        th { "Blood Group" }
                        th { "Units" }
                        th { "Date" }
                        th { "Actions" }
                    }
                }
                tbody {
                    for request in pending {
                        tr { key: "{request.id}",
                            td { "{request.patient_name}" }
                            td { "{request.patient_age}" }
                            td { "{request.reason}" }
                            td { "{request.blood_group}" }
                            td { "{request.unit}" }
                            td { "{request.date}" }
                            td { class: "row-actions",
                                button {
                                    class: "button",
                                    disabled: busy,
                                    onclick: move |_| dispatch(dashboard, actions, Mutation::ApproveRequest(request.id)),
                                    "Approve"
                                }
                                button {
                                    class: "button button-danger",
                                    disabled: busy,
                                    onclick: move |_| dispatch(dashboard, actions, Mutation::RejectRequest(request.id)),
                                    "Reject"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// All donations; approve/reject only on pending rows.
#[component]
pub fn DonationsTab(dashboard: Dashboard) -> Element {
    let actions = use_coroutine_handle::<DashboardAction>();
    let (donations, busy) = {
        let controller = dashboard.read();
        let donations = controller
            .data()
            .map(|d| d.donations.clone())
            .unwrap_or_default();
        (donations, controller.is_busy())
    };

    rsx! {
        table { class: "data-table",
            thead {
                tr {
                    th { "Donor" }
                    th { "Age" }
                    th { "Disease" }
                    th { "Blood Group" }
                    th { "Units" }
                    th { "Date" }
                    th { "Status" }
                    th { "Actions" }
                }
            }
            tbody {
                for donation in donations {
                    tr { key: "{donation.id}",
                        td { "{donation.donor_name()}" }
                        td { "{donation.age}" }
                        td { "{donation.disease}" }
                        td { "{donation.blood_group}" }
                        td { "{donation.unit}" }
                        td { "{donation.date}" }
                        td { StatusBadge { status: donation.status } }
                        td { class: "row-actions",
                            if donation.status == RecordStatus::Pending {
                                button {
                                    class: "button",
                                    disabled: busy,
                                    onclick: move |_| dispatch(dashboard, actions, Mutation::ApproveDonation(donation.id)),
                                    "Approve"
                                }
                                button {
                                    class: "button button-danger",
                                    disabled: busy,
                                    onclick: move |_| dispatch(dashboard, actions, Mutation::RejectDonation(donation.id)),
                                    "Reject"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
