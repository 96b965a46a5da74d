//! Client core for the blood-bank service: HTTP API, session, route guard
//! and dashboard orchestration. Rendering lives in the `app` crate.

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod guard;
pub mod session;

pub use api::{BloodBankApi, Credential, Decision, HttpApi};
pub use auth::{sign_in, sign_out, sign_up};
pub use dashboard::{
    DashboardController, DashboardData, DashboardKind, Fetched, Mutation, MutationOutcome,
    MutationTicket, RefreshTicket, Tab,
};
pub use forms::{parse_stock_unit, DonationForm, RequestForm, SignupForm};
pub use guard::{authorize, dashboard_route, landing_route, Access, HOME_ROUTE, LOGIN_ROUTE};
pub use session::{FileStore, MemoryStore, SessionController, SessionKeys, SessionStore};
