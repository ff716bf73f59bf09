//! PostgreSQL user repository tests.

use sqlx::PgPool;
use std::sync::Arc;
use short_url::domain::entities::NewUser;
use short_url::domain::repositories::UserRepository;
use short_url::infrastructure::persistence::PgUserRepository;

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.create(new_user("ana@example.com")).await.unwrap();

    let by_email = repo.find_by_email("ana@example.com").await.unwrap().unwrap();
    let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();

    assert_eq!(by_email, user);
    assert_eq!(by_id, user);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("ana@example.com")).await.unwrap();

    let err = repo.create(new_user("ana@example.com")).await.unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.to_string(), "Email already in use");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_soft_delete(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo.create(new_user("ana@example.com")).await.unwrap();

    assert!(repo.soft_delete(user.id).await.unwrap());
    assert!(!repo.soft_delete(user.id).await.unwrap());

    assert!(
        repo.find_active_by_email("ana@example.com")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.find_by_id(user.id)
            .await
            .unwrap()
            .is_some_and(|u| u.is_deleted())
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_newest_first(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let a = repo.create(new_user("a@example.com")).await.unwrap();
    let b = repo.create(new_user("b@example.com")).await.unwrap();

    let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|u| u.id).collect();

    assert_eq!(ids, vec![b.id, a.id]);
}
