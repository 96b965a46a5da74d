use client::{Credential, HttpApi, SessionController, SessionKeys};
use dioxus::prelude::*;
use shared_types::Session;

use crate::storage::{app_store, AppStore};

/// Global authentication state.
///
/// `session` mirrors the controller so components re-render on sign-in and
/// sign-out; the controller owns persistence and the outbound credential.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthState {
    pub session: Signal<Option<Session>>,
    controller: Signal<SessionController<AppStore>>,
    api: Signal<HttpApi>,
}

impl AuthState {
    pub fn new() -> Self {
        let config = client::config::config();
        let credential = Credential::default();
        let api = HttpApi::from_config(config, credential.clone());
        let controller = SessionController::new(
            app_store(config),
            credential,
            SessionKeys::from(&config.storage),
        );
        let restored = controller.restore();
        Self {
            session: Signal::new(restored),
            controller: Signal::new(controller),
            api: Signal::new(api),
        }
    }

    pub fn api(&self) -> HttpApi {
        self.api.read().clone()
    }

    pub fn controller(&self) -> SessionController<AppStore> {
        self.controller.read().clone()
    }

    pub fn set_session(&mut self, session: Session) {
        self.session.set(Some(session));
    }

    pub fn sign_out(&mut self) {
        client::sign_out(&*self.controller.read());
        self.session.set(None);
    }
}

/// Hook to access auth state.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}
