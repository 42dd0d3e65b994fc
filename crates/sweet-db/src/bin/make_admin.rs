//! # Admin Promotion Tool
//!
//! Promotes an existing user to the admin role.
//!
//! ## Usage
//! ```bash
//! # SQLite (default path ./sweet_shop.db)
//! cargo run -p sweet-db --bin make-admin -- alice@example.com
//!
//! # Explicit database selection via environment
//! DATABASE_TYPE=postgresql DATABASE_URL=postgres://... \
//!     cargo run -p sweet-db --bin make-admin -- alice@example.com
//! ```
//!
//! Registration always creates regular users; delete and restock are
//! admin-only, so the first admin has to be promoted out of band.

use std::env;

use sweet_core::Role;
use sweet_db::{connect, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let email = match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") | None => {
            println!("Sweet Shop Admin Promotion Tool");
            println!();
            println!("Usage: make-admin <EMAIL>");
            println!();
            println!("Environment:");
            println!("  DATABASE_TYPE    'sqlite' or 'postgresql' (default: postgresql)");
            println!("  DATABASE_URL     PostgreSQL connection string");
            println!("  DATABASE_PATH    SQLite file path (default: ./sweet_shop.db)");
            return Ok(());
        }
        Some(email) => email.to_string(),
    };

    let config = match env::var("DATABASE_TYPE").as_deref() {
        Ok("sqlite") => StoreConfig::Sqlite {
            path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./sweet_shop.db".to_string())
                .into(),
        },
        _ => StoreConfig::Postgres {
            url: env::var("DATABASE_URL")
                .map_err(|_| "DATABASE_URL is required for PostgreSQL")?,
        },
    };

    let store = connect(&config).await?;

    if store.set_user_role(&email, Role::Admin).await? {
        println!("✓ {} is now an admin", email);
    } else {
        eprintln!("No user with email {}", email);
        std::process::exit(1);
    }

    store.close().await;
    Ok(())
}
