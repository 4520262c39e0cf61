mod common;

use common::{TempDb, account_service};
use smart_brain_api::ApiError;

#[tokio::test]
async fn register_then_sign_in_returns_same_profile() {
    let db = TempDb::new("svc-roundtrip");
    let accounts = account_service(&db).await;

    let created = accounts
        .register("a@x.com", "Ann", "pass1")
        .await
        .expect("register");
    assert_eq!(created.name, "Ann");
    assert_eq!(created.email, "a@x.com");
    assert_eq!(created.entries, 0);

    let signed_in = accounts.sign_in("a@x.com", "pass1").await.expect("sign in");
    assert_eq!(signed_in, created);

    assert_eq!(accounts.increment_entries(created.id).await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_email_leaves_no_extra_rows() {
    let db = TempDb::new("svc-dup");
    let accounts = account_service(&db).await;

    accounts
        .register("dup@x.com", "First", "pass1")
        .await
        .expect("first register");
    let err = accounts
        .register("dup@x.com", "Second", "other")
        .await
        .expect_err("duplicate must fail");
    assert!(matches!(err, ApiError::UnableToRegister));

    let pool = accounts.storage().pool();
    let (logins,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM login WHERE email = ?")
        .bind("dup@x.com")
        .fetch_one(pool)
        .await
        .unwrap();
    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind("dup@x.com")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!((logins, users), (1, 1));

    // the original password still works, the rejected one never landed
    assert!(accounts.sign_in("dup@x.com", "pass1").await.is_ok());
    assert!(matches!(
        accounts.sign_in("dup@x.com", "other").await,
        Err(ApiError::WrongCredentials)
    ));
}

#[tokio::test]
async fn failed_profile_insert_rolls_back_credential() {
    let db = TempDb::new("svc-rollback");
    let accounts = account_service(&db).await;
    let pool = accounts.storage().pool();

    // Force the second insert of the transaction to fail.
    sqlx::query(
        "CREATE TRIGGER reject_profiles BEFORE INSERT ON users \
         BEGIN SELECT RAISE(ABORT, 'profile insert rejected'); END",
    )
    .execute(pool)
    .await
    .unwrap();

    assert!(accounts.register("rb@x.com", "Rob", "pass1").await.is_err());

    let (logins,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM login")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(logins, 0);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_share_error() {
    let db = TempDb::new("svc-creds");
    let accounts = account_service(&db).await;
    accounts.register("e@x.com", "Eve", "pass1").await.unwrap();

    let wrong = accounts.sign_in("e@x.com", "pass2").await.unwrap_err();
    let missing = accounts.sign_in("ghost@x.com", "pass1").await.unwrap_err();
    assert!(matches!(wrong, ApiError::WrongCredentials));
    assert!(matches!(missing, ApiError::WrongCredentials));
    assert_eq!(wrong.to_string(), missing.to_string());
}

#[tokio::test]
async fn sequential_increments_add_exactly_n() {
    let db = TempDb::new("svc-seq");
    let accounts = account_service(&db).await;
    let profile = accounts.register("f@x.com", "Fay", "pass1").await.unwrap();

    for expected in 1..=5 {
        assert_eq!(accounts.increment_entries(profile.id).await.unwrap(), expected);
    }
    assert_eq!(accounts.profile(profile.id).await.unwrap().entries, 5);
}

#[tokio::test]
async fn concurrent_increments_are_not_lost() {
    let db = TempDb::new("svc-conc");
    let accounts = account_service(&db).await;
    let profile = accounts.register("g@x.com", "Gus", "pass1").await.unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let accounts = accounts.clone();
            let id = profile.id;
            tokio::spawn(async move { accounts.increment_entries(id).await })
        })
        .collect();

    let mut seen = Vec::new();
    for task in tasks {
        seen.push(task.await.unwrap().unwrap());
    }
    seen.sort_unstable();

    assert_eq!(seen, (1..=20).collect::<Vec<i64>>());
    assert_eq!(accounts.profile(profile.id).await.unwrap().entries, 20);
}

#[tokio::test]
async fn increment_unknown_profile_is_not_found() {
    let db = TempDb::new("svc-unknown");
    let accounts = account_service(&db).await;
    assert!(matches!(
        accounts.increment_entries(42).await,
        Err(ApiError::UserNotFound)
    ));
}

#[tokio::test]
async fn credential_without_profile_is_unable_to_get_user() {
    let db = TempDb::new("svc-orphan");
    let accounts = account_service(&db).await;

    let hash = smart_brain_api::service::password::hash_password("pass1").unwrap();
    sqlx::query("INSERT INTO login (email, hash) VALUES (?, ?)")
        .bind("orphan@x.com")
        .bind(hash)
        .execute(accounts.storage().pool())
        .await
        .unwrap();

    assert!(matches!(
        accounts.sign_in("orphan@x.com", "pass1").await,
        Err(ApiError::UnableToGetUser)
    ));
    // wrong password still never reaches the profile lookup
    assert!(matches!(
        accounts.sign_in("orphan@x.com", "pass2").await,
        Err(ApiError::WrongCredentials)
    ));
}
