//! Admin seeding against real SQLite repositories.

use users_service::config::DatabaseConfig;
use users_service::db::{AsyncDbPool, establish_async_connection_pool, run_pending_migrations};
use users_service::error::AppError;
use users_service::models::{ADMIN_ROLE, NewRole, NewUser, UpdateUser};
use users_service::repositories::{Repositories, RoleStore, UserStore};
use users_service::services::{AdminAccount, SeedReport, ensure_admin};
use users_service::utils::password::{Argon2Hasher, PasswordHasher};

async fn migrated_pool() -> AsyncDbPool {
    let pool = establish_async_connection_pool(&DatabaseConfig::default())
        .await
        .expect("in-memory pool");
    run_pending_migrations(&pool).await.expect("migrations");
    pool
}

fn admin() -> AdminAccount {
    AdminAccount {
        email: "admin@example.com".to_string(),
        username: "admin".to_string(),
        password: "adminpass".to_string(),
    }
}

async fn seed(repos: &Repositories, hasher: &Argon2Hasher) -> SeedReport {
    ensure_admin(&repos.roles, &repos.users, hasher, &admin())
        .await
        .expect("seeding should succeed")
}

#[tokio::test]
async fn seeds_empty_database() {
    let repos = Repositories::new(migrated_pool().await);
    let hasher = Argon2Hasher::new();

    let report = seed(&repos, &hasher).await;
    assert!(report.role_created);
    assert!(report.user_created);
    assert!(!report.role_repaired);

    let role = repos.roles.find_by_name(ADMIN_ROLE).await.unwrap().unwrap();
    let user = repos.users.find_by_email("admin@example.com").await.unwrap().unwrap();
    assert_eq!(user.username, "admin");
    assert_eq!(user.role_id, Some(role.id));
    assert_ne!(user.hashed_password, "adminpass");
    assert!(hasher.verify("adminpass", &user.hashed_password).unwrap());
}

#[tokio::test]
async fn second_run_writes_nothing() {
    let repos = Repositories::new(migrated_pool().await);
    let hasher = Argon2Hasher::new();

    seed(&repos, &hasher).await;
    let before = repos.users.list_all().await.unwrap();

    let report = seed(&repos, &hasher).await;
    assert!(report.is_noop());

    let after = repos.users.list_all().await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].hashed_password, before[0].hashed_password);
    assert_eq!(after[0].updated_at, before[0].updated_at);
    assert_eq!(repos.roles.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn reuses_existing_role() {
    let repos = Repositories::new(migrated_pool().await);
    let existing = repos.roles.create(NewRole::new(ADMIN_ROLE)).await.unwrap();

    let report = seed(&repos, &Argon2Hasher::new()).await;
    assert!(!report.role_created);
    assert!(report.user_created);

    let user = repos.users.find_by_email("admin@example.com").await.unwrap().unwrap();
    assert_eq!(user.role_id, Some(existing.id));
}

#[tokio::test]
async fn relinks_user_without_touching_other_fields() {
    let repos = Repositories::new(migrated_pool().await);
    let hasher = Argon2Hasher::new();

    let other = repos.roles.create(NewRole::new("editor")).await.unwrap();
    let hashed = hasher.hash("kept-password").unwrap();
    let original = repos
        .users
        .create(NewUser::new("root", "admin@example.com", hashed.clone(), Some(other.id)))
        .await
        .unwrap();

    let report = seed(&repos, &hasher).await;
    assert!(report.role_created);
    assert!(!report.user_created);
    assert!(report.role_repaired);

    let admin_role = repos.roles.find_by_name(ADMIN_ROLE).await.unwrap().unwrap();
    let repaired = repos.users.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(repaired.role_id, Some(admin_role.id));
    assert_eq!(repaired.username, "root");
    assert_eq!(repaired.hashed_password, hashed);
    assert_eq!(repaired.created_at, original.created_at);

    // Repair converges too
    assert!(seed(&repos, &hasher).await.is_noop());
}

#[tokio::test]
async fn relinks_user_with_no_role() {
    let repos = Repositories::new(migrated_pool().await);
    repos
        .users
        .create(NewUser::new("admin", "admin@example.com", "irrelevant", None))
        .await
        .unwrap();

    let report = seed(&repos, &Argon2Hasher::new()).await;
    assert!(report.role_repaired);

    let user = repos.users.find_by_email("admin@example.com").await.unwrap().unwrap();
    assert!(user.role_id.is_some());
}

#[tokio::test]
async fn leaves_other_users_alone() {
    let repos = Repositories::new(migrated_pool().await);
    let bystander = repos
        .users
        .create(NewUser::new("alice", "alice@example.com", "hash", None))
        .await
        .unwrap();

    seed(&repos, &Argon2Hasher::new()).await;

    let after = repos.users.find_by_id(bystander.id).await.unwrap().unwrap();
    assert_eq!(after.role_id, None);
    assert_eq!(after.username, "alice");
    assert_eq!(repos.users.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn unique_constraints_reject_duplicate_seed_rows() {
    let repos = Repositories::new(migrated_pool().await);
    seed(&repos, &Argon2Hasher::new()).await;

    let role = repos.roles.create(NewRole::new(ADMIN_ROLE)).await;
    assert!(matches!(role, Err(AppError::Duplicate { .. })));

    let user = repos
        .users
        .create(NewUser::new("admin2", "admin@example.com", "hash", None))
        .await;
    assert!(matches!(user, Err(AppError::Duplicate { .. })));
}

#[tokio::test]
async fn file_database_keeps_seed_across_pools() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("users.db").to_string_lossy().into_owned(),
        ..DatabaseConfig::default()
    };
    let hasher = Argon2Hasher::new();

    {
        let pool = establish_async_connection_pool(&config).await.unwrap();
        run_pending_migrations(&pool).await.unwrap();
        assert!(!seed(&Repositories::new(pool), &hasher).await.is_noop());
    }

    // Simulated restart
    let pool = establish_async_connection_pool(&config).await.unwrap();
    assert!(run_pending_migrations(&pool).await.unwrap().is_empty());
    let repos = Repositories::new(pool);
    assert!(seed(&repos, &hasher).await.is_noop());

    // A later profile edit does not make the next restart re-seed
    let user = repos.users.find_by_email("admin@example.com").await.unwrap().unwrap();
    repos
        .users
        .update(
            user.id,
            UpdateUser {
                username: Some("chief".to_string()),
                ..UpdateUser::default()
            }
            .touched(),
        )
        .await
        .unwrap();
    assert!(seed(&repos, &hasher).await.is_noop());
}
