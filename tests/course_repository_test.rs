mod common;

use lyceum::domain::{
    CreateCourseRequest, CreateLessonRequest, Payment, PaymentMethod, PaymentTarget,
    UpdateCourseRequest, UpdateLessonRequest,
};

#[tokio::test]
async fn test_course_crud() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;

    // Test Create
    let course = context.course_repo.create(CreateCourseRequest {
        title: "Distributed Systems".to_string(),
        description: Some("Consensus, replication, failure.".to_string()),
    }, owner.id).await?;
    assert_eq!(course.title, "Distributed Systems");
    assert_eq!(course.owner_id, owner.id);

    // Test Find by ID
    let found = context.course_repo.find_by_id(course.id).await?;
    assert!(found.is_some());

    // Test List by owner
    let courses = context.course_repo.list_by_owner(owner.id, 10, 0).await?;
    assert_eq!(courses.len(), 1);
    assert_eq!(context.course_repo.count_by_owner(owner.id).await?, 1);

    // Another user's listing stays empty
    let other = common::create_user(&context, "other@example.com", "Other").await?;
    assert!(context.course_repo.list_by_owner(other.id, 10, 0).await?.is_empty());

    // Test Update
    let updated = context.course_repo.update(course.id, UpdateCourseRequest {
        title: Some("Distributed Systems II".to_string()),
        ..Default::default()
    }).await?;
    assert_eq!(updated.title, "Distributed Systems II");
    assert_eq!(updated.description.as_deref(), Some("Consensus, replication, failure."));

    // Test Delete
    context.course_repo.delete(course.id).await?;
    assert!(context.course_repo.find_by_id(course.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_lesson_crud_within_a_course() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let course = common::create_course(&context, &owner, "Algorithms").await?;

    let lesson = context.lesson_repo.create(CreateLessonRequest {
        course_id: course.id,
        title: "Sorting".to_string(),
        description: None,
        video_link: "https://www.youtube.com/watch?v=kPRA0W1kECg".to_string(),
    }, owner.id).await?;
    assert_eq!(lesson.course_id, course.id);
    assert_eq!(lesson.owner_id, owner.id);

    let second = context.lesson_repo.create(CreateLessonRequest {
        course_id: course.id,
        title: "Graphs".to_string(),
        description: None,
        video_link: "https://youtu.be/09_LlHjoEiY".to_string(),
    }, owner.id).await?;

    // Course-scoped listing is oldest first so lessons read in order
    let lessons = context.lesson_repo.list_for_course(course.id).await?;
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].id, lesson.id);
    assert_eq!(lessons[1].id, second.id);
    assert_eq!(context.lesson_repo.count_for_course(course.id).await?, 2);

    let updated = context.lesson_repo.update(lesson.id, UpdateLessonRequest {
        title: Some("Sorting and Order Statistics".to_string()),
        ..Default::default()
    }).await?;
    assert_eq!(updated.title, "Sorting and Order Statistics");
    assert_eq!(updated.video_link, lesson.video_link);

    context.lesson_repo.delete(lesson.id).await?;
    assert!(context.lesson_repo.find_by_id(lesson.id).await?.is_none());
    assert_eq!(context.lesson_repo.count_for_course(course.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_deleting_a_course_removes_its_dependents() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let student = common::create_user(&context, "student@example.com", "Student").await?;
    let course = common::create_course(&context, &owner, "Statistics").await?;

    let lesson = context.lesson_repo.create(CreateLessonRequest {
        course_id: course.id,
        title: "Bayes".to_string(),
        description: None,
        video_link: "https://www.youtube.com/watch?v=HZGCoVF3YvM".to_string(),
    }, owner.id).await?;

    context.subscription_repo.toggle(student.id, course.id).await?;

    let course_payment = context.payment_repo.create(Payment::new(
        student.id,
        PaymentTarget::Course(course.id),
        9900,
        PaymentMethod::Card,
    )).await?;
    let lesson_payment = context.payment_repo.create(Payment::new(
        student.id,
        PaymentTarget::Lesson(lesson.id),
        1900,
        PaymentMethod::Card,
    )).await?;

    context.course_repo.delete(course.id).await?;

    // The course and everything hanging off it is gone
    assert!(context.course_repo.find_by_id(course.id).await?.is_none());
    assert!(context.lesson_repo.find_by_id(lesson.id).await?.is_none());
    assert!(!context.subscription_repo.exists(student.id, course.id).await?);
    assert!(context.payment_repo.find_by_id(course_payment.id).await?.is_none());
    assert!(context.payment_repo.find_by_id(lesson_payment.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_deleting_a_lesson_spares_the_course() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let student = common::create_user(&context, "student@example.com", "Student").await?;
    let course = common::create_course(&context, &owner, "Statistics").await?;

    let lesson = context.lesson_repo.create(CreateLessonRequest {
        course_id: course.id,
        title: "Bayes".to_string(),
        description: None,
        video_link: "https://www.youtube.com/watch?v=HZGCoVF3YvM".to_string(),
    }, owner.id).await?;

    let lesson_payment = context.payment_repo.create(Payment::new(
        student.id,
        PaymentTarget::Lesson(lesson.id),
        1900,
        PaymentMethod::Card,
    )).await?;

    context.lesson_repo.delete(lesson.id).await?;

    assert!(context.lesson_repo.find_by_id(lesson.id).await?.is_none());
    assert!(context.payment_repo.find_by_id(lesson_payment.id).await?.is_none());
    // The course itself survives
    assert!(context.course_repo.find_by_id(course.id).await?.is_some());

    Ok(())
}
