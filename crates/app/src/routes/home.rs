use crate::auth::use_auth;
use crate::routes::{landing, Route};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdBell, LdShield, LdUsers};
use dioxus_free_icons::Icon;

#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let session = auth.session.read().clone();

    rsx! {
        section { class: "hero",
            h1 { "Donate blood, save lives" }
            p { class: "hero-lead",
                "Register as a donor or patient, follow your donations and requests, and let the blood bank team keep stock where it is needed."
            }
            div { class: "hero-actions",
                match session {
                    Some(session) => rsx! {
                        Link { class: "button", to: landing(Some(&session)), "Go to dashboard" }
                    },
                    None => rsx! {
                        Link { class: "button", to: Route::Signup {}, "Become a donor" }
                        Link { class: "button button-outline", to: Route::Login {}, "Sign in" }
                    },
                }
            }
        }
        section { class: "features",
            div { class: "feature-card",
                Icon::<LdShield> { icon: LdShield, width: 24, height: 24 }
                h3 { "Safe donations" }
                p { "Every donation is reviewed by an administrator before it reaches the stock." }
            }
            div { class: "feature-card",
                Icon::<LdUsers> { icon: LdUsers, width: 24, height: 24 }
                h3 { "Donors and patients" }
                p { "Both donors and patients can request blood for someone in need." }
            }
            div { class: "feature-card",
                Icon::<LdBell> { icon: LdBell, width: 24, height: 24 }
                h3 { "Live status" }
                p { "Track each request from pending to approved or rejected." }
            }
        }
    }
}
