use clap::Parser;
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use lyceum::{
    auth::AuthService,
    domain::{
        CreateCourseRequest, CreateLessonRequest, CreateUserRequest, UpdateUserRequest,
        Payment, PaymentMethod, PaymentStatus, PaymentTarget,
        UserRole,
    },
    repository::{
        UserRepository, SqliteUserRepository,
        CourseRepository, SqliteCourseRepository,
        LessonRepository, SqliteLessonRepository,
        SubscriptionRepository, SqliteSubscriptionRepository,
        PaymentRepository, SqlitePaymentRepository,
    },
};
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Parser)]
#[command(name = "seed", about = "Populate the database with demo users, courses and lessons")]
struct Args {
    /// Database to seed. Falls back to DATABASE_URL, then sqlite:lyceum.db.
    #[arg(long)]
    database_url: Option<String>,

    /// Extra generated users on top of the named fixtures.
    #[arg(long, default_value_t = 5)]
    extra_users: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    // Initialize database connection
    let database_url = args.database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:lyceum.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Initialize repositories
    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let course_repo = SqliteCourseRepository::new(db_pool.clone());
    let lesson_repo = SqliteLessonRepository::new(db_pool.clone());
    let subscription_repo = SqliteSubscriptionRepository::new(db_pool.clone());
    let payment_repo = SqlitePaymentRepository::new(db_pool.clone());

    // Seed users
    println!("👥 Creating users...");

    let password_hash = AuthService::hash_password("password123").await?;

    // Create moderator
    let moderator = user_repo.create(CreateUserRequest {
        email: "moderator@lyceum.local".to_string(),
        password: "password123".to_string(),
        full_name: "Maria Moderator".to_string(),
    }, &password_hash).await?;
    let moderator = user_repo.set_role(moderator.id, UserRole::Moderator).await?;

    println!("  ✅ Created moderator (moderator@lyceum.local / password123)");

    // Create regular users
    let alice = user_repo.create(CreateUserRequest {
        email: "alice@example.com".to_string(),
        password: "password123".to_string(),
        full_name: "Alice Johnson".to_string(),
    }, &password_hash).await?;

    user_repo.update(alice.id, UpdateUserRequest {
        phone: Some("+15550100".to_string()),
        city: Some("Portland".to_string()),
        ..Default::default()
    }).await?;

    let bob = user_repo.create(CreateUserRequest {
        email: "bob@example.com".to_string(),
        password: "password123".to_string(),
        full_name: "Bob Smith".to_string(),
    }, &password_hash).await?;

    let charlie = user_repo.create(CreateUserRequest {
        email: "charlie@example.com".to_string(),
        password: "password123".to_string(),
        full_name: "Charlie Brown".to_string(),
    }, &password_hash).await?;

    for _ in 0..args.extra_users {
        let email: String = SafeEmail().fake();
        let user = user_repo.create(CreateUserRequest {
            email,
            password: "password123".to_string(),
            full_name: Name().fake(),
        }, &password_hash).await?;

        user_repo.update(user.id, UpdateUserRequest {
            city: Some(CityName().fake()),
            ..Default::default()
        }).await?;
    }

    println!("  ✅ Created {} users", 4 + args.extra_users);

    // Seed courses with lessons
    println!("📚 Creating courses...");

    let rust_course = course_repo.create(CreateCourseRequest {
        title: "Rust for Backend Developers".to_string(),
        description: Some("Ownership, error handling and async from the ground up, aimed at people who already ship services in another language.".to_string()),
    }, alice.id).await?;

    let rust_lessons = [
        ("Ownership and Borrowing", "https://www.youtube.com/watch?v=VFIOSWy93H0"),
        ("Error Handling with Result", "https://youtu.be/wM6o70NAWUI"),
        ("Async with Tokio", "https://www.youtube.com/watch?v=ThjvMReOXYM"),
    ];
    for (title, link) in rust_lessons {
        lesson_repo.create(CreateLessonRequest {
            course_id: rust_course.id,
            title: title.to_string(),
            description: None,
            video_link: link.to_string(),
        }, alice.id).await?;
    }

    let sql_course = course_repo.create(CreateCourseRequest {
        title: "Practical SQL".to_string(),
        description: Some("Query design, indexing and transactions with worked examples.".to_string()),
    }, bob.id).await?;

    lesson_repo.create(CreateLessonRequest {
        course_id: sql_course.id,
        title: "Joins Explained".to_string(),
        description: Some("Inner, outer and lateral joins on a real schema.".to_string()),
        video_link: "https://www.youtube.com/watch?v=9yeOJ0ZMUYw".to_string(),
    }, bob.id).await?;

    println!("  ✅ Created 2 courses with lessons");

    // Seed subscriptions
    println!("🔔 Creating subscriptions...");

    subscription_repo.toggle(bob.id, rust_course.id).await?;
    subscription_repo.toggle(charlie.id, rust_course.id).await?;
    subscription_repo.toggle(alice.id, sql_course.id).await?;

    println!("  ✅ Created 3 subscriptions");

    // Seed payment records
    println!("💳 Creating payment records...");

    let bob_payment = payment_repo.create(Payment::new(
        bob.id,
        PaymentTarget::Course(rust_course.id),
        4900,
        PaymentMethod::Cash,
    )).await?;
    payment_repo.update_status(bob_payment.id, PaymentStatus::Paid).await?;

    let charlie_payment = payment_repo.create(Payment::new(
        charlie.id,
        PaymentTarget::Course(rust_course.id),
        4900,
        PaymentMethod::Transfer,
    )).await?;
    payment_repo.update_status(charlie_payment.id, PaymentStatus::Unpaid).await?;

    println!("  ✅ Created 2 payment records");

    println!("🎉 Seeding complete!");
    println!();
    println!("Moderator login: moderator@lyceum.local / password123 ({})", moderator.id);
    println!("User logins: alice@example.com, bob@example.com, charlie@example.com / password123");

    Ok(())
}
