//! Seed an administrator account. Reads ADMIN_USERNAME / ADMIN_EMAIL /
//! ADMIN_PASSWORD from the environment; refuses to overwrite an existing
//! username.
//!
//! `cargo run --bin create-admin`

use camera_catalog::model::user::{UserCreate, UserRole};
use camera_catalog::service::{user, validation};
use camera_catalog::{apply_migrations, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("camera_catalog=info")),
        )
        .init();

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("ADMIN_EMAIL").ok();
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if p.len() >= 6 => p,
        Ok(_) => {
            eprintln!("ADMIN_PASSWORD must be at least 6 characters");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("ADMIN_PASSWORD is required");
            std::process::exit(1);
        }
    };

    let config = AppConfig::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    apply_migrations(&pool).await?;

    if validation::username_exists(&pool, &username, None).await? {
        eprintln!("user '{username}' already exists");
        std::process::exit(1);
    }

    let admin = user::create_user(
        &pool,
        UserCreate {
            username,
            email,
            password,
            role: UserRole::Admin,
            is_active: true,
        },
    )
    .await?;
    println!("created admin user '{}' (id {})", admin.username, admin.meta.id);
    Ok(())
}
