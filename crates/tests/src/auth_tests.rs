use crate::common::{self, TestBank, DONOR_USER_ID, PASSWORD, TOKEN};
use client::{
    authorize, landing_route, sign_in, sign_out, sign_up, Access, BloodBankApi, HttpApi,
    MemoryStore, SessionController, SessionKeys, SessionStore, LOGIN_ROUTE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{AccountFields, AppErrorKind, BloodGroup, Role, SignupRequest};

fn session_for(api: &HttpApi) -> (SessionController<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let controller =
        SessionController::new(store.clone(), api.credential().clone(), SessionKeys::default());
    (controller, store)
}

fn account(username: &str, email: &str) -> AccountFields {
    AccountFields {
        username: username.into(),
        email: email.into(),
        password: "hunter22".into(),
        first_name: "Robin".into(),
        last_name: "Cole".into(),
    }
}

#[tokio::test]
async fn sign_in_persists_session_and_lands_on_role_dashboard() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let (controller, store) = session_for(&api);

    let session = sign_in(&api, &controller, "dana", PASSWORD).await.unwrap();

    assert_eq!(session.token, TOKEN);
    assert_eq!(session.user_id(), DONOR_USER_ID);
    assert!(session.has_role(Role::Donor));
    assert_eq!(controller.session(), Some(session.clone()));
    assert_eq!(api.credential().bearer().as_deref(), Some(TOKEN));
    assert_eq!(store.get("token").as_deref(), Some(TOKEN));
    assert!(store.get("user").unwrap().contains(r#""username":"dana""#));
    assert_eq!(landing_route(Some(&session)), "/donor/dashboard");
}

#[tokio::test]
async fn admin_lands_on_admin_dashboard() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let (controller, _) = session_for(&api);

    let session = sign_in(&api, &controller, "admin", PASSWORD).await.unwrap();

    assert_eq!(landing_route(Some(&session)), "/admin/dashboard");
    assert_eq!(authorize(&[Role::Admin], Some(&session)), Access::Allow);
    assert_eq!(
        authorize(&[Role::Patient], Some(&session)),
        Access::Redirect(LOGIN_ROUTE)
    );
}

#[tokio::test]
async fn bad_password_is_an_authentication_failure_and_keeps_prior_session() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let (controller, store) = session_for(&api);
    let existing = sign_in(&api, &controller, "dana", PASSWORD).await.unwrap();

    let err = sign_in(&api, &controller, "admin", "wrong-password")
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::AuthenticationFailure);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "Login failed. Please check your credentials.");
    assert_eq!(controller.session(), Some(existing));
    assert_eq!(store.get("token").as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn blank_username_never_reaches_the_server() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let (controller, _) = session_for(&api);

    let err = sign_in(&api, &controller, "   ", PASSWORD).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::AuthenticationFailure);
    assert_eq!(err.message, "Username is required");
    assert_eq!(bank.with(|b| b.hit_count("POST /api/auth/signin")), 0);
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn reads_without_a_credential_are_refused() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();

    let err = api.list_stock().await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::TransportFailure);
    assert_eq!(err.status, Some(401));
    assert_eq!(bank.with(|b| b.unauthorized), 1);
}

#[tokio::test]
async fn sign_out_clears_credential_storage_and_access() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let (controller, store) = session_for(&api);
    sign_in(&api, &controller, "pat", PASSWORD).await.unwrap();
    assert!(api.list_stock().await.is_ok());

    sign_out(&controller);

    assert!(controller.session().is_none());
    assert!(store.get("token").is_none());
    assert!(store.get("user").is_none());
    assert_eq!(
        authorize(&[Role::Patient], controller.session().as_ref()),
        Access::Redirect(LOGIN_ROUTE)
    );
    let err = api.list_stock().await.unwrap_err();
    assert_eq!(err.status, Some(401));
}

#[tokio::test]
async fn donor_sign_up_sends_only_donor_fields() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let request = SignupRequest::donor(
        account("robin", "robin@bank.test"),
        BloodGroup::OPositive,
        "4 Oak Ave".into(),
        "5550003".into(),
    );

    let message = sign_up(&api, &request).await.unwrap();

    assert_eq!(message, "User registered successfully!");
    let body = bank.with(|b| b.signups[0].clone());
    assert_eq!(body["role"], json!(["donor"]));
    assert_eq!(body["bloodGroup"], json!("O+"));
    assert_eq!(body["firstName"], json!("Robin"));
    assert!(body.get("age").is_none());
    assert!(body.get("doctorName").is_none());

    let (controller, _) = session_for(&api);
    let session = sign_in(&api, &controller, "robin", "hunter22").await.unwrap();
    assert!(session.has_role(Role::Donor));
}

#[tokio::test]
async fn duplicate_username_is_reported_on_the_username_field() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let request = SignupRequest::patient(
        account("dana", "other@bank.test"),
        40,
        BloodGroup::BNegative,
        "Thalassemia".into(),
        "Dr. Ng".into(),
        "2 Pine Rd".into(),
        "5550004".into(),
    );

    let err = sign_up(&api, &request).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::ValidationFailure);
    assert_eq!(err.message, "Username is already taken!");
    assert_eq!(
        err.field_errors.get("username").map(String::as_str),
        Some("Username is already taken!")
    );
    assert!(bank.with(|b| b.signups.is_empty()));
}

#[tokio::test]
async fn duplicate_email_is_reported_on_the_email_field() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let request = SignupRequest::donor(
        account("newbie", "dana@bank.test"),
        BloodGroup::ANegative,
        "5 Birch Ln".into(),
        "5550005".into(),
    );

    let err = sign_up(&api, &request).await.unwrap_err();

    assert!(err.field_errors.contains_key("email"));
}

#[tokio::test]
async fn invalid_sign_up_is_rejected_locally() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let mut fields = account("robin", "robin@bank.test");
    fields.password = "123".into();
    let request = SignupRequest::donor(fields, BloodGroup::APositive, "x".into(), "1".into());

    let err = sign_up(&api, &request).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::ValidationFailure);
    assert!(err.field_errors.contains_key("password"));
    assert_eq!(bank.with(|b| b.hit_count("POST /api/auth/signup")), 0);
}

#[tokio::test]
async fn seeded_identity_matches_sign_in() {
    let bank = TestBank::seeded().await;
    let api = bank.anonymous_api();
    let (controller, _) = session_for(&api);

    let session = sign_in(&api, &controller, "pat", PASSWORD).await.unwrap();

    assert_eq!(session.identity, bank.identity("pat"));
    assert_eq!(session.display_name(), "Pat Lee");
    assert_eq!(common::PATIENT_USER_ID, session.user_id());
}
