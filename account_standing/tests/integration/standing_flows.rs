use account_standing::{
    AccountStatus, CoordinationError, get_account_status, get_user_standing,
    list_disabled_accounts, login_with_password, update_account_standing,
};
use serial_test::serial;

use crate::common::{TEST_PASSWORD, create_account, init_test_environment, session_user_for};

#[tokio::test]
#[serial]
async fn test_disabled_user_cannot_log_in_until_reenabled() {
    init_test_environment().await;
    let staff = create_account("flow-staff", true).await;
    let user = create_account("flow-user", false).await;
    let (staff_headers, _) = login_with_password(&staff.username, TEST_PASSWORD)
        .await
        .unwrap();
    let staff_session = session_user_for(&staff_headers).await;

    // Given a freshly created user, there is no standing row and the user is enabled
    assert!(get_user_standing(&user.id).await.unwrap().is_none());
    assert_eq!(get_account_status(&user.id).await.unwrap(), AccountStatus::Enabled);

    // When staff disables the account
    update_account_standing(&staff_session, &user.username, "disable")
        .await
        .expect("Disable should succeed");

    // Then login is refused and the account is listed
    assert!(matches!(
        login_with_password(&user.username, TEST_PASSWORD).await,
        Err(CoordinationError::AccountDisabled(_))
    ));
    let listed = list_disabled_accounts(&staff_session).await.unwrap();
    assert!(listed.iter().any(|a| a.username == user.username && a.changed_by == staff.username));

    // When staff re-enables the account
    update_account_standing(&staff_session, &user.username, "reenable")
        .await
        .expect("Reenable should succeed");

    // Then login works again and the row is kept with the new status
    assert!(login_with_password(&user.username, TEST_PASSWORD).await.is_ok());
    let standing = get_user_standing(&user.id).await.unwrap().unwrap();
    assert_eq!(standing.account_status, AccountStatus::Enabled);
    assert_eq!(standing.changed_by, staff.id);
}

#[tokio::test]
#[serial]
async fn test_existing_session_reports_disabled_status() {
    init_test_environment().await;
    let staff = create_account("live-staff", true).await;
    let user = create_account("live-user", false).await;
    let (staff_headers, _) = login_with_password(&staff.username, TEST_PASSWORD)
        .await
        .unwrap();
    let (user_headers, _) = login_with_password(&user.username, TEST_PASSWORD)
        .await
        .unwrap();

    update_account_standing(&session_user_for(&staff_headers).await, &user.username, "disable")
        .await
        .unwrap();

    // The session is still valid; the standing check is what blocks the user
    let session_user = session_user_for(&user_headers).await;
    assert_eq!(
        get_account_status(&session_user.id).await.unwrap(),
        AccountStatus::Disabled
    );
}

#[tokio::test]
#[serial]
async fn test_regular_user_cannot_moderate() {
    init_test_environment().await;
    let user = create_account("mod-user", false).await;
    let other = create_account("mod-other", false).await;
    let (headers, _) = login_with_password(&user.username, TEST_PASSWORD)
        .await
        .unwrap();
    let session_user = session_user_for(&headers).await;

    assert!(matches!(
        update_account_standing(&session_user, &other.username, "disable").await,
        Err(CoordinationError::Unauthorized)
    ));
    assert!(get_user_standing(&other.id).await.unwrap().is_none());
}
