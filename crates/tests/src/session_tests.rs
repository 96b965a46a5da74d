use crate::common::{TestBank, TOKEN};
use client::{
    authorize, sign_out, Access, BloodBankApi, Credential, FileStore, HttpApi, SessionController,
    SessionKeys, SessionStore, LOGIN_ROUTE,
};
use pretty_assertions::assert_eq;
use shared_types::{Role, StorageConfig};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("bloodbank-{name}-{}-{nanos}", std::process::id()))
}

fn controller(dir: &Path, api: &HttpApi) -> SessionController<FileStore> {
    SessionController::new(
        FileStore::new(dir.to_path_buf()),
        api.credential().clone(),
        SessionKeys::default(),
    )
}

#[tokio::test]
async fn established_session_survives_a_restart() {
    let bank = TestBank::seeded().await;
    let dir = scratch_dir("restart");
    let identity = bank.identity("dana");

    let first_api = bank.anonymous_api();
    controller(&dir, &first_api).establish(TOKEN, identity.clone());

    // A fresh process: new credential, new controller, same directory.
    let api = HttpApi::new(bank.url.clone(), Credential::default());
    let restored = controller(&dir, &api).restore().unwrap();

    assert_eq!(restored.token, TOKEN);
    assert_eq!(restored.identity, identity);
    assert_eq!(authorize(&[Role::Donor], Some(&restored)), Access::Allow);
    assert_eq!(api.credential().bearer().as_deref(), Some(TOKEN));
    assert!(api.list_stock().await.is_ok());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn signed_out_session_does_not_come_back() {
    let bank = TestBank::seeded().await;
    let dir = scratch_dir("signout");
    let api = bank.anonymous_api();
    let session = controller(&dir, &api);
    session.establish(TOKEN, bank.identity("admin"));

    sign_out(&session);

    let api = bank.anonymous_api();
    let restored = controller(&dir, &api).restore();
    assert!(restored.is_none());
    assert!(!api.credential().is_set());
    assert_eq!(
        authorize(&[Role::Admin], restored.as_ref()),
        Access::Redirect(LOGIN_ROUTE)
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn token_without_identity_starts_signed_out_and_keeps_the_file() {
    let bank = TestBank::seeded().await;
    let dir = scratch_dir("partial");
    let store = FileStore::new(dir.clone());
    store.set("token", TOKEN).unwrap();

    let api = bank.anonymous_api();
    let restored = controller(&dir, &api).restore();

    assert!(restored.is_none());
    assert!(!api.credential().is_set());
    assert_eq!(store.get("token").as_deref(), Some(TOKEN));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn configured_key_names_are_used() {
    let bank = TestBank::seeded().await;
    let dir = scratch_dir("keys");
    let storage = StorageConfig {
        token_key: "bb_token".into(),
        user_key: "bb_user".into(),
        dir: dir.display().to_string(),
    };
    let store = FileStore::new(dir.clone());
    let api = bank.anonymous_api();
    let session = SessionController::new(
        store.clone(),
        api.credential().clone(),
        SessionKeys::from(&storage),
    );

    session.establish(TOKEN, bank.identity("pat"));

    assert_eq!(store.get("bb_token").as_deref(), Some(TOKEN));
    assert!(store.get("bb_user").is_some());
    assert!(store.get("token").is_none());

    let _ = std::fs::remove_dir_all(&dir);
}
