use clap::{Parser, Subcommand};
use std::sync::Arc;

use courseforge_catalog::{CatalogStore, CategoryRow, UserRow};
use courseforge_chat::{ChatOrchestrator, CourseGenerator};
use courseforge_core::RandomPicker;
use courseforge_http::{AppState, HttpConfig, router};
use courseforge_llm::{AnthropicGateway, GatewayConfig};
use courseforge_tools::CatalogToolRegistry;

#[derive(Parser, Debug)]
#[command(name = "courseforge", version)]
#[command(about = "CourseForge - AI-assisted course catalog pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:3005")]
        addr: String,
        /// SQLite database path
        #[arg(long, default_value = "courseforge.db")]
        db: String,
        /// Disable the permissive CORS layer
        #[arg(long)]
        no_cors: bool,
    },
    /// Seed the catalog with sample instructors and categories
    Seed {
        /// SQLite database path
        #[arg(long, default_value = "courseforge.db")]
        db: String,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { addr, db, no_cors } => serve(&addr, &db, !no_cors),
        Commands::Seed { db } => seed(&db),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

fn serve(addr: &str, db: &str, enable_cors: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogStore::open(db)?;
    let gateway = Arc::new(AnthropicGateway::new(GatewayConfig::from_env()?));
    let picker = Arc::new(RandomPicker);

    let chat_registry = Arc::new(CatalogToolRegistry::read_only(catalog.clone()));
    let creation_registry = Arc::new(CatalogToolRegistry::creation(catalog.clone(), picker));

    let state = AppState::new(
        Arc::new(ChatOrchestrator::new(gateway.clone(), chat_registry)),
        Arc::new(CourseGenerator::new(
            gateway,
            creation_registry,
            catalog.clone(),
        )),
        catalog,
    );
    let app = router(state, &HttpConfig { enable_cors });

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "courseforge API listening");
        axum::serve(listener, app).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn seed(db: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = CatalogStore::open(db)?;

    for (id, name) in [("i1", "Ada Lovelace"), ("i2", "Grace Hopper")] {
        store.insert_user(&UserRow {
            id: id.into(),
            name: name.into(),
            role: "instructor".into(),
        })?;
    }

    for (id, name, ord) in [
        ("cat-prog", "Programming", 1),
        ("cat-web", "Web Development", 2),
        ("cat-data", "Databases", 3),
        ("cat-design", "Design", 4),
    ] {
        store.insert_category(&CategoryRow {
            id: id.into(),
            name: name.into(),
            display_order: ord,
        })?;
    }

    println!("Seeded {db}: 2 instructors, 4 categories");
    Ok(())
}
