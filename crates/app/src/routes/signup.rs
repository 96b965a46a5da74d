use crate::auth::use_auth;
use crate::routes::Route;
use client::SignupForm;
use dioxus::prelude::*;
use shared_types::{BloodGroup, Role};
use std::collections::HashMap;

#[component]
fn FieldError(errors: HashMap<String, String>, field: String) -> Element {
    match errors.get(&field) {
        Some(msg) => rsx! { span { class: "field-error", "{msg}" } },
        None => rsx! {},
    }
}

/// Donor or patient registration.
#[component]
pub fn Signup() -> Element {
    let auth = use_auth();
    let mut form = use_signal(SignupForm::default);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_signup = move |evt: FormEvent| async move {
        evt.prevent_default();
        error_msg.set(None);

        let request = match form.read().parse() {
            Ok(request) => request,
            Err(e) => {
                field_errors.set(e.field_errors);
                return;
            }
        };
        field_errors.set(HashMap::new());
        loading.set(true);
        match client::sign_up(&auth.api(), &request).await {
            Ok(message) => {
                tracing::info!(%message, "registration accepted");
                form.set(SignupForm::default());
                navigator().push(Route::Login {});
            }
            Err(e) if !e.field_errors.is_empty() => field_errors.set(e.field_errors),
            Err(e) => error_msg.set(Some(e.message)),
        }
        loading.set(false);
    };

    let is_patient = form.read().role == Role::Patient;
    let errors = field_errors();

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card auth-card-wide",
                h2 { "Create an account" }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }

                form { onsubmit: handle_signup,
                    div { class: "role-switch",
                        for role in [Role::Donor, Role::Patient] {
                            button {
                                key: "{role.label()}",
                                r#type: "button",
                                class: if form.read().role == role { "button" } else { "button button-outline" },
                                onclick: move |_| form.write().role = role,
                                "Register as {role.label()}"
                            }
                        }
                    }

                    div { class: "form-grid",
                        div { class: "auth-field",
                            label { "First name" }
                            input {
                                value: form.read().first_name.clone(),
                                oninput: move |e| form.write().first_name = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "firstName" }
                        }
                        div { class: "auth-field",
                            label { "Last name" }
                            input {
                                value: form.read().last_name.clone(),
                                oninput: move |e| form.write().last_name = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "lastName" }
                        }
                        div { class: "auth-field",
                            label { "Username" }
                            input {
                                value: form.read().username.clone(),
                                oninput: move |e| form.write().username = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "username" }
                        }
                        div { class: "auth-field",
                            label { "Email" }
                            input {
                                r#type: "email",
                                value: form.read().email.clone(),
                                oninput: move |e| form.write().email = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "email" }
                        }
                        div { class: "auth-field",
                            label { "Password" }
                            input {
                                r#type: "password",
                                value: form.read().password.clone(),
                                oninput: move |e| form.write().password = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "password" }
                        }
                        div { class: "auth-field",
                            label { "Blood group" }
                            select {
                                value: form.read().blood_group.clone(),
                                onchange: move |e| form.write().blood_group = e.value(),
                                option { value: "", "Select blood group" }
                                for group in BloodGroup::ALL {
                                    option { key: "{group}", value: group.as_str(), "{group}" }
                                }
                            }
                            FieldError { errors: errors.clone(), field: "bloodGroup" }
                        }
                        div { class: "auth-field",
                            label { "Address" }
                            input {
                                value: form.read().address.clone(),
                                oninput: move |e| form.write().address = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "address" }
                        }
                        div { class: "auth-field",
                            label { "Mobile" }
                            input {
                                r#type: "tel",
                                value: form.read().mobile.clone(),
                                oninput: move |e| form.write().mobile = e.value(),
                            }
                            FieldError { errors: errors.clone(), field: "mobile" }
                        }
                        if is_patient {
                            div { class: "auth-field",
                                label { "Age" }
                                input {
                                    r#type: "number",
                                    min: "1",
                                    value: form.read().age.clone(),
                                    oninput: move |e| form.write().age = e.value(),
                                }
                                FieldError { errors: errors.clone(), field: "age" }
                            }
                            div { class: "auth-field",
                                label { "Disease" }
                                input {
                                    value: form.read().disease.clone(),
                                    oninput: move |e| form.write().disease = e.value(),
                                }
                                FieldError { errors: errors.clone(), field: "disease" }
                            }
                            div { class: "auth-field",
                                label { "Doctor name" }
                                input {
                                    value: form.read().doctor_name.clone(),
                                    oninput: move |e| form.write().doctor_name = e.value(),
                                }
                                FieldError { errors: errors.clone(), field: "doctorName" }
                            }
                        }
                    }

                    button {
                        r#type: "submit",
                        class: "button auth-submit",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Sign Up" }
                    }
                }

                p { class: "auth-footer",
                    "Already registered? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
