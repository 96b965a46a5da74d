use shared_types::{AppError, Session, SignInRequest, SignupRequest};
use validator::Validate;

use crate::api::BloodBankApi;
use crate::session::{SessionController, SessionStore};

/// Post credentials and establish the returned session.
///
/// The controller is only touched after the response arrives, so a failed
/// sign-in leaves any existing session in place.
#[tracing::instrument(skip(api, controller, password))]
pub async fn sign_in<A, S>(
    api: &A,
    controller: &SessionController<S>,
    username: &str,
    password: &str,
) -> Result<Session, AppError>
where
    A: BloodBankApi,
    S: SessionStore,
{
    let request = SignInRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    request
        .validate()
        .map_err(|e| AppError::authentication(first_message(&AppError::from(e))))?;

    let response = api.sign_in(&request).await?;
    let session = controller.establish_session(response.into_session());
    if session.roles().is_empty() {
        tracing::warn!(user_id = session.user_id(), "signed in without a known role");
    }
    Ok(session)
}

/// Register an account. Returns the server's confirmation text.
#[tracing::instrument(skip(api, request), fields(username = %request.username))]
pub async fn sign_up<A: BloodBankApi>(api: &A, request: &SignupRequest) -> Result<String, AppError> {
    request.validate()?;
    let message = api.sign_up(request).await?;
    tracing::info!("account registered");
    Ok(message)
}

pub fn sign_out<S: SessionStore>(controller: &SessionController<S>) {
    controller.clear();
}

fn first_message(error: &AppError) -> String {
    let mut fields: Vec<_> = error.field_errors.iter().collect();
    fields.sort();
    fields
        .first()
        .map(|(_, msg)| msg.to_string())
        .unwrap_or_else(|| error.message.clone())
}
