use super::{submit, Dashboard, DashboardAction, StatusBadge};
use client::{DashboardKind, DonationForm, Mutation, RequestForm};
use dioxus::prelude::*;
use shared_types::{AppError, BloodGroup};
use std::collections::HashMap;

#[component]
fn BloodGroupSelect(value: String, onchange: EventHandler<String>) -> Element {
    rsx! {
        select {
            value,
            onchange: move |e| onchange.call(e.value()),
            option { value: "", "Select blood group" }
            for group in BloodGroup::ALL {
                option { key: "{group}", value: group.as_str(), "{group}" }
            }
        }
    }
}

#[component]
fn FieldMessage(errors: HashMap<String, String>, field: &'static str) -> Element {
    match errors.get(field) {
        Some(msg) => rsx! { span { class: "field-error", "{msg}" } },
        None => rsx! {},
    }
}

/// Split an error into inline field messages or a form-level one.
fn report(e: AppError, fields: &mut Signal<HashMap<String, String>>, form_error: &mut Signal<Option<String>>) {
    if e.field_errors.is_empty() {
        form_error.set(Some(e.message));
    } else {
        fields.set(e.field_errors);
    }
}

#[component]
pub fn DonateTab(dashboard: Dashboard) -> Element {
    let actions = use_coroutine_handle::<DashboardAction>();
    let mut form = use_signal(DonationForm::default);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut submitted = use_signal(|| false);

    let (donor, busy) = {
        let controller = dashboard.read();
        (controller.data().and_then(|d| d.donor_ref()), controller.is_busy())
    };

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        field_errors.set(HashMap::new());
        form_error.set(None);
        submitted.set(false);

        let Some(donor) = donor else {
            form_error.set(Some("Your donor profile is not loaded yet.".to_string()));
            return;
        };
        let donation = match form.read().parse(donor) {
            Ok(donation) => donation,
            Err(e) => {
                report(e, &mut field_errors, &mut form_error);
                return;
            }
        };
        match submit(dashboard, actions, Mutation::SubmitDonation(donation)).await {
            Ok(()) => {
                form.set(DonationForm::default());
                submitted.set(true);
            }
            Err(e) => report(e, &mut field_errors, &mut form_error),
        }
    };

    let errors = field_errors();

    rsx! {
        form { class: "dashboard-form", onsubmit: handle_submit,
            h2 { "Donate Blood" }
            if submitted() {
                div { class: "auth-success", "Donation submitted. It will appear as pending until reviewed." }
            }
            if let Some(err) = form_error() {
                div { class: "auth-error", "{err}" }
            }
            div { class: "form-grid",
                div { class: "auth-field",
                    label { "Disease" }
                    input {
                        value: form.read().disease.clone(),
                        oninput: move |e| form.write().disease = e.value(),
                    }
                }
                div { class: "auth-field",
                    label { "Age" }
                    input {
                        r#type: "number",
                        min: "1",
                        value: form.read().age.clone(),
                        oninput: move |e| form.write().age = e.value(),
                    }
                    FieldMessage { errors: errors.clone(), field: "age" }
                }
                div { class: "auth-field",
                    label { "Blood group" }
                    BloodGroupSelect {
                        value: form.read().blood_group.clone(),
                        onchange: move |v| form.write().blood_group = v,
                    }
                    FieldMessage { errors: errors.clone(), field: "bloodGroup" }
                }
                div { class: "auth-field",
                    label { "Units" }
                    input {
                        r#type: "number",
                        min: "1",
                        value: form.read().unit.clone(),
                        oninput: move |e| form.write().unit = e.value(),
                    }
                    FieldMessage { errors: errors.clone(), field: "unit" }
                }
            }
            button { r#type: "submit", class: "button", disabled: busy,
                if busy { "Submitting..." } else { "Submit Donation" }
            }
        }
    }
}

#[component]
pub fn RequestTab(dashboard: Dashboard) -> Element {
    let actions = use_coroutine_handle::<DashboardAction>();
    let mut form = use_signal(RequestForm::default);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut submitted = use_signal(|| false);

    let (requester, busy) = {
        let controller = dashboard.read();
        (controller.data().and_then(|d| d.requester()), controller.is_busy())
    };

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        field_errors.set(HashMap::new());
        form_error.set(None);
        submitted.set(false);

        let Some(requester) = requester else {
            form_error.set(Some("Your profile is not loaded yet.".to_string()));
            return;
        };
        let request = match form.read().parse(requester) {
            Ok(request) => request,
            Err(e) => {
                report(e, &mut field_errors, &mut form_error);
                return;
            }
        };
        match submit(dashboard, actions, Mutation::SubmitRequest(request)).await {
            Ok(()) => {
                form.set(RequestForm::default());
                submitted.set(true);
            }
            Err(e) => report(e, &mut field_errors, &mut form_error),
        }
    };

    let errors = field_errors();

    rsx! {
        form { class: "dashboard-form", onsubmit: handle_submit,
            h2 { "Request Blood" }
            if submitted() {
                div { class: "auth-success", "Request submitted." }
            }
            if let Some(err) = form_error() {
                div { class: "auth-error", "{err}" }
            }
            div { class: "form-grid",
                div { class: "auth-field",
                    label { "Patient name" }
                    input {
                        value: form.read().patient_name.clone(),
                        oninput: move |e| form.write().patient_name = e.value(),
                    }
                    FieldMessage { errors: errors.clone(), field: "patientName" }
                }
                div { class: "auth-field",
                    label { "Patient age" }
                    input {
                        r#type: "number",
                        min: "1",
                        value: form.read().patient_age.clone(),
                        oninput: move |e| form.write().patient_age = e.value(),
                    }
                    FieldMessage { errors: errors.clone(), field: "patientAge" }
                }
                div { class: "auth-field",
                    label { "Reason" }
                    textarea {
                        value: form.read().reason.clone(),
                        oninput: move |e| form.write().reason = e.value(),
                    }
                    FieldMessage { errors: errors.clone(), field: "reason" }
                }
                div { class: "auth-field",
                    label { "Blood group" }
                    BloodGroupSelect {
                        value: form.read().blood_group.clone(),
                        onchange: move |v| form.write().blood_group = v,
                    }
                    FieldMessage { errors: errors.clone(), field: "bloodGroup" }
                }
                div { class: "auth-field",
                    label { "Units" }
                    input {
                        r#type: "number",
                        min: "1",
                        value: form.read().unit.clone(),
                        oninput: move |e| form.write().unit = e.value(),
                    }
                    FieldMessage { errors: errors.clone(), field: "unit" }
                }
            }
            button { r#type: "submit", class: "button", disabled: busy,
                if busy { "Submitting..." } else { "Submit Request" }
            }
        }
    }
}

#[component]
pub fn HistoryTab(dashboard: Dashboard, kind: DashboardKind) -> Element {
    let (donations, requests) = {
        let controller = dashboard.read();
        controller
            .data()
            .map(|d| (d.donations.clone(), d.requests.clone()))
            .unwrap_or_default()
    };

    rsx! {
        if kind == DashboardKind::Donor {
            h2 { "My Donations" }
            if donations.is_empty() {
                p { class: "empty-state", "No donations yet." }
            } else {
                table { class: "data-table",
                    thead {
                        tr {
                            th { "Blood Group" }
                            th { "Units" }
                            th { "Disease" }
                            th { "Date" }
                            th { "Status" }
                        }
                    }
                    tbody {
                        for donation in donations {
                            tr { key: "{donation.id}",
                                td { "{donation.blood_group}" }
                                td { "{donation.unit}" }
                                td { "{donation.disease}" }
                                td { "{donation.date}" }
                                td { StatusBadge { status: donation.status } }
                            }
                        }
                    }
                }
            }
        }

        h2 { "My Blood Requests" }
        if requests.is_empty() {
            p { class: "empty-state", "No blood requests yet." }
        } else {
            table { class: "data-table",
                thead {
                    tr {
                        th { "Patient" }
                        th { "Blood Group" }
                        th { "Units" }
                        th { "Reason" }
                        th { "Date" }
                        th { "Status" }
                    }
                }
                tbody {
                    for request in requests {
                        tr { key: "{request.id}",
                            td { "{request.patient_name}" }
                            td { "{request.blood_group}" }
                            td { "{request.unit}" }
                            td { "{request.reason}" }
                            td { "{request.date}" }
                            td { StatusBadge { status: request.status } }
                        }
                    }
                }
            }
        }
    }
}
