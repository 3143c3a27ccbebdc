//! The credential-check sequence behind login: look up by email, verify the
//! password, mint a session token, and read the identity back out of it.

use tasknest_backend::utils::jwt::{issue_session_token, verify_session_token};
use tasknest_backend::utils::password::verify_password;

mod support;

#[tokio::test]
async fn registered_user_can_authenticate_and_roundtrip_a_session() {
    let store = support::InMemoryAuthStore::new();
    let state = support::test_state(store.clone());
    let user_id = store.add_user("user@example.com", "pw123 is fine");

    let credentials = state
        .store
        .login_credentials("user@example.com")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(credentials.user_id, user_id);

    let hash = credentials.password_hash.expect("hash present");
    assert!(verify_password("pw123 is fine", &hash));

    let token = issue_session_token(&state.keys, credentials.user_id, 1).expect("issue");
    let verified = verify_session_token(&state.keys, &token).expect("verify");
    assert_eq!(verified, user_id);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let store = support::InMemoryAuthStore::new();
    let state = support::test_state(store.clone());
    store.add_user("user@example.com", "pw123 is fine");

    let credentials = state
        .store
        .login_credentials("user@example.com")
        .await
        .expect("lookup")
        .expect("user exists");

    let hash = credentials.password_hash.expect("hash present");
    assert!(!verify_password("pw123 is wrong", &hash));
}

#[tokio::test]
async fn unknown_email_has_no_credentials() {
    let store = support::InMemoryAuthStore::new();
    let state = support::test_state(store);

    let credentials = state
        .store
        .login_credentials("ghost@example.com")
        .await
        .expect("lookup");
    assert!(credentials.is_none());
}

#[tokio::test]
async fn consumed_reset_blocks_login_until_a_new_password_is_set() {
    let store = support::InMemoryAuthStore::new();
    let state = support::test_state(store.clone());
    let user_id = store.add_user("user@example.com", "pw123 is fine");

    let token = state
        .password_reset
        .request_reset(user_id)
        .await
        .expect("request reset");
    state
        .password_reset
        .validate_and_consume(user_id, &token)
        .await
        .expect("consume");

    let credentials = state
        .store
        .login_credentials("user@example.com")
        .await
        .expect("lookup")
        .expect("user exists");
    assert!(credentials.password_hash.is_none());

    state
        .password_reset
        .set_new_password(user_id, "fresh pw 456")
        .await
        .expect("set new password");

    let credentials = state
        .store
        .login_credentials("user@example.com")
        .await
        .expect("lookup")
        .expect("user exists");
    let hash = credentials.password_hash.expect("hash restored");
    assert!(verify_password("fresh pw 456", &hash));
}
