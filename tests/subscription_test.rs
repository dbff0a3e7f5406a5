mod common;

use lyceum::{
    domain::{ToggleOutcome, UserRole},
    error::AppError,
};
use uuid::Uuid;

#[tokio::test]
async fn test_toggle_adds_then_removes() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let student = common::create_user(&context, "student@example.com", "Student").await?;
    let course = common::create_course(&context, &owner, "Intro to Databases").await?;

    // First call subscribes
    let outcome = context.subscription_repo.toggle(student.id, course.id).await?;
    assert_eq!(outcome, ToggleOutcome::Added);
    assert_eq!(outcome.message(), "Subscription added");
    assert!(context.subscription_repo.exists(student.id, course.id).await?);

    // Second call removes the same subscription
    let outcome = context.subscription_repo.toggle(student.id, course.id).await?;
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert_eq!(outcome.message(), "Subscription removed");
    assert!(!context.subscription_repo.exists(student.id, course.id).await?);

    // A third call starts a fresh subscription rather than erroring
    let outcome = context.subscription_repo.toggle(student.id, course.id).await?;
    assert_eq!(outcome, ToggleOutcome::Added);

    Ok(())
}

#[tokio::test]
async fn test_subscriber_emails_are_distinct_per_course() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let ada = common::create_user(&context, "ada@example.com", "Ada").await?;
    let grace = common::create_user(&context, "grace@example.com", "Grace").await?;

    let course = common::create_course(&context, &owner, "Compilers").await?;
    let other = common::create_course(&context, &owner, "Networks").await?;

    context.subscription_repo.toggle(ada.id, course.id).await?;
    context.subscription_repo.toggle(grace.id, course.id).await?;
    // Grace also follows the other course; it must not leak into this one
    context.subscription_repo.toggle(grace.id, other.id).await?;

    let emails = context.subscription_repo.subscriber_emails(course.id).await?;
    assert_eq!(emails, vec!["ada@example.com", "grace@example.com"]);

    let other_emails = context.subscription_repo.subscriber_emails(other.id).await?;
    assert_eq!(other_emails, vec!["grace@example.com"]);

    Ok(())
}

#[tokio::test]
async fn test_moderators_cannot_subscribe() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let course = common::create_course(&context, &owner, "Ethics").await?;

    let moderator = common::create_user(&context, "mod@example.com", "Mod").await?;
    let moderator = context.user_repo.set_role(moderator.id, UserRole::Moderator).await?;

    let err = context.subscription_service.toggle(&moderator, course.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Nothing was written
    assert!(!context.subscription_repo.exists(moderator.id, course.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_toggle_against_missing_course_is_not_found() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let student = common::create_user(&context, "student@example.com", "Student").await?;

    let err = context.subscription_service.toggle(&student, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}
