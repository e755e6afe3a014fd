use account_standing::{CoordinationError, get_user_from_headers, prepare_logout_response};
use http::header::SET_COOKIE;
use serial_test::serial;

use crate::common::{TEST_PASSWORD, create_account, init_test_environment, request_headers_from, session_user_for};

#[tokio::test]
#[serial]
async fn test_login_creates_session_for_user() {
    init_test_environment().await;
    let user = create_account("login-ok", false).await;

    let (headers, csrf_token) = account_standing::login_with_password(&user.username, TEST_PASSWORD)
        .await
        .expect("Login should succeed");

    assert!(!csrf_token.as_str().is_empty());
    let session_user = session_user_for(&headers).await;
    assert_eq!(session_user.id, user.id);
    assert_eq!(session_user.username, user.username);
    assert!(!session_user.is_staff);
}

#[tokio::test]
#[serial]
async fn test_login_rejects_bad_password() {
    init_test_environment().await;
    let user = create_account("login-bad", false).await;

    let result = account_standing::login_with_password(&user.username, "not the password").await;

    assert!(matches!(result, Err(CoordinationError::Authentication(_))));
}

#[tokio::test]
#[serial]
async fn test_logout_ends_session() {
    init_test_environment().await;
    let user = create_account("logout", false).await;
    let (login_headers, _) = account_standing::login_with_password(&user.username, TEST_PASSWORD)
        .await
        .unwrap();
    let request_headers = request_headers_from(&login_headers);

    let cookie: headers::Cookie = headers::HeaderMapExt::typed_get(&request_headers)
        .expect("Cookie header should parse");
    let logout_headers = prepare_logout_response(cookie)
        .await
        .expect("Logout should succeed");

    // The cookie is expired on the client and the session is gone on the server
    let set_cookie = logout_headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=-86400"));
    assert!(get_user_from_headers(&request_headers).await.unwrap().is_none());
}
