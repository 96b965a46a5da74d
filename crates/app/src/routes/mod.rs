pub mod dashboard;
pub mod home;
pub mod login;
pub mod signup;

use crate::auth::use_auth;
use client::{authorize, landing_route, Access, DashboardKind};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::LdLayoutDashboard;
use dioxus_free_icons::Icon;
use shared_types::Session;

use dashboard::DashboardPage;
use home::Home;
use login::Login;
use signup::Signup;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(AppLayout)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/signup")]
        Signup {},
        #[route("/admin/dashboard")]
        AdminDashboard {},
        #[route("/donor/dashboard")]
        DonorDashboard {},
        #[route("/patient/dashboard")]
        PatientDashboard {},
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Dashboard route for the session's highest-precedence role, if any.
pub fn landing(session: Option<&Session>) -> Route {
    landing_route(session)
        .parse::<Route>()
        .unwrap_or(Route::Home {})
}

/// Renders the dashboard for `kind` only while the session holds its role.
///
/// Re-evaluated on every render so a sign-out anywhere takes effect here.
#[component]
pub fn RoleGuard(kind: DashboardKind) -> Element {
    let auth = use_auth();
    let session = auth.session.read().clone();

    match authorize(&[kind.required_role()], session.as_ref()) {
        Access::Allow => rsx! {
            DashboardPage { kind }
        },
        Access::Redirect(_) => {
            navigator().replace(Route::Login {});
            rsx! {
                div { class: "auth-guard-loading",
                    p { "Redirecting to login..." }
                }
            }
        }
    }
}

#[component]
fn AdminDashboard() -> Element {
    rsx! { RoleGuard { kind: DashboardKind::Admin } }
}

#[component]
fn DonorDashboard() -> Element {
    rsx! { RoleGuard { kind: DashboardKind::Donor } }
}

#[component]
fn PatientDashboard() -> Element {
    rsx! { RoleGuard { kind: DashboardKind::Patient } }
}

/// Unknown paths go home.
#[component]
fn NotFound(route: Vec<String>) -> Element {
    tracing::debug!(path = %route.join("/"), "unknown route");
    navigator().replace(Route::Home {});
    rsx! {}
}

/// Top navigation bar shared by every page.
#[component]
pub fn Navbar() -> Element {
    let mut auth = use_auth();
    let session = auth.session.read().clone();

    rsx! {
        nav { class: "navbar",
            Link { class: "navbar-brand", to: Route::Home {}, "Blood Bank" }
            div { class: "navbar-links",
                match session {
                    Some(session) => {
                        let dashboard = landing(Some(&session));
                        let name = session.display_name();
                        rsx! {
                            Link { class: "navbar-link", to: dashboard,
                                Icon::<LdLayoutDashboard> { icon: LdLayoutDashboard, width: 16, height: 16 }
                                "Dashboard"
                            }
                            span { class: "navbar-user", "{name}" }
                            button {
                                class: "button button-outline",
                                onclick: move |_| {
                                    auth.sign_out();
                                    navigator().push(Route::Home {});
                                },
                                "Sign out"
                            }
                        }
                    }
                    None => rsx! {
                        Link { class: "navbar-link", to: Route::Login {}, "Login" }
                        Link { class: "button", to: Route::Signup {}, "Sign Up" }
                    },
                }
            }
        }
    }
}

#[component]
fn AppLayout() -> Element {
    rsx! {
        Navbar {}
        main { class: "page",
            Outlet::<Route> {}
        }
    }
}
