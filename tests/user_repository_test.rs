use lyceum::{
    auth,
    domain::{CreateUserRequest, UpdateUserRequest, UserRole},
    error::AppError,
    repository::{SqliteUserRepository, UserRepository},
};
use sqlx::SqlitePool;

#[tokio::test]
async fn test_user_crud() -> anyhow::Result<()> {
    // Create an in-memory SQLite database
    let pool = SqlitePool::connect(":memory:").await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    // Create repository
    let repo = SqliteUserRepository::new(pool.clone());

    let password_hash = auth::AuthService::hash_password("secure_password123").await?;

    // Test Create
    let create_request = CreateUserRequest {
        email: "test@example.com".to_string(),
        password: "secure_password123".to_string(),
        full_name: "Test User".to_string(),
    };

    let user = repo.create(create_request, &password_hash).await?;
    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.full_name, "Test User");
    assert_eq!(user.role, UserRole::Member);
    assert!(user.is_active);

    // Test Find by ID
    let found = repo.find_by_id(user.id).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().id, user.id);

    // Test Find by Email
    let found_by_email = repo.find_by_email("test@example.com").await?;
    assert!(found_by_email.is_some());
    assert_eq!(found_by_email.unwrap().email, "test@example.com");

    // Test List
    let users = repo.list(10, 0).await?;
    assert_eq!(users.len(), 1);
    assert_eq!(repo.count().await?, 1);

    // Test Update
    let update = UpdateUserRequest {
        full_name: Some("Renamed User".to_string()),
        city: Some("Lisbon".to_string()),
        ..Default::default()
    };

    let updated = repo.update(user.id, update).await?;
    assert_eq!(updated.full_name, "Renamed User");
    assert_eq!(updated.city.as_deref(), Some("Lisbon"));

    // Test role promotion
    let promoted = repo.set_role(user.id, UserRole::Moderator).await?;
    assert_eq!(promoted.role, UserRole::Moderator);

    // Test Delete
    repo.delete(user.id).await?;
    let deleted = repo.find_by_id(user.id).await?;
    assert!(deleted.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = SqliteUserRepository::new(pool.clone());
    let password_hash = auth::AuthService::hash_password("secure_password123").await?;

    let request = CreateUserRequest {
        email: "dup@example.com".to_string(),
        password: "secure_password123".to_string(),
        full_name: "First".to_string(),
    };
    repo.create(request.clone(), &password_hash).await?;

    let err = repo.create(request, &password_hash).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_password_hashing() -> anyhow::Result<()> {
    let password = "my_secure_password";
    let hash = auth::AuthService::hash_password(password).await?;

    // Verify the password
    assert!(auth::AuthService::verify_password(password, &hash).await?);
    assert!(!auth::AuthService::verify_password("wrong_password", &hash).await?);

    Ok(())
}
