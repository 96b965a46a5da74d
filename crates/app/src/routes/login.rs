use crate::auth::use_auth;
use crate::routes::{landing, Route};
use dioxus::prelude::*;

/// Username/password sign-in. Lands on the dashboard for the user's role.
#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    if let Some(session) = auth.session.read().as_ref() {
        navigator().replace(landing(Some(session)));
    }

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);

        let api = auth.api();
        let controller = auth.controller();
        match client::sign_in(&api, &controller, &username(), &password()).await {
            Ok(session) => {
                let target = landing(Some(&session));
                auth.set_session(session);
                navigator().push(target);
            }
            Err(e) => error_msg.set(Some(e.message)),
        }
        loading.set(false);
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h2 { "Sign In" }
                p { class: "auth-description", "Enter your credentials to access your account" }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }

                form { onsubmit: handle_login,
                    div { class: "auth-field",
                        label { r#for: "username", "Username" }
                        input {
                            id: "username",
                            r#type: "text",
                            autocomplete: "username",
                            value: username(),
                            oninput: move |e| username.set(e.value()),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "password", "Password" }
                        input {
                            id: "password",
                            r#type: "password",
                            autocomplete: "current-password",
                            value: password(),
                            oninput: move |e| password.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "button auth-submit",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign In" }
                    }
                }

                p { class: "auth-footer",
                    "No account yet? "
                    Link { to: Route::Signup {}, "Sign up" }
                }
            }
        }
    }
}
