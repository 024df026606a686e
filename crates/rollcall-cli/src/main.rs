use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use dotenvy::dotenv;
use rollcall_cli::seeder::{self, SeedConfig};
use rollcall_config::{DatabaseConfig, StoreBackend};
use rollcall_core::{Clock, SystemClock};
use rollcall_db::{PgStore, Store};
use rollcall_models::{NewUser, Role};
use tracing_subscriber::EnvFilter;

const ROLES: [Role; 3] = [Role::Student, Role::Teacher, Role::Admin];

#[derive(Parser)]
#[command(name = "rollcall-cli")]
#[command(about = "Rollcall CLI - Administrative tools for Rollcall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a user, prompting for anything not given
    CreateUser {
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Student, Teacher or Admin
        #[arg(short = 'r', long)]
        role: Option<Role>,
    },
    /// Seed the database with fake teachers, students, courses and attendance
    Seed {
        #[arg(short = 't', long, default_value = "4")]
        teachers: usize,

        #[arg(short = 's', long, default_value = "40")]
        students: usize,

        #[arg(short = 'c', long, default_value = "6")]
        courses: usize,

        /// Courses each student is enrolled in
        #[arg(long, default_value = "3")]
        enrollments_per_student: usize,

        /// Days of attendance to record, ending today
        #[arg(long, default_value = "10")]
        days: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let store = connect().await?;

    match command {
        Commands::Migrate => {
            store.migrate().await.context("failed to run migrations")?;
            println!("✅ Migrations applied");
        }
        Commands::CreateUser { username, role } => {
            handle_create_user(&store, username, role).await?;
        }
        Commands::Seed {
            teachers,
            students,
            courses,
            enrollments_per_student,
            days,
        } => {
            let config = SeedConfig::new(teachers, students)
                .with_courses(courses)
                .with_enrollments(enrollments_per_student)
                .with_days(days);
            seeder::seed_all(&store, &config, SystemClock.today()).await?;
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<PgStore> {
    let config = DatabaseConfig::from_env()?;
    if config.backend == StoreBackend::Memory {
        bail!("the CLI needs a PostgreSQL database, unset STORE_BACKEND=memory");
    }

    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    PgStore::connect(url, config.max_connections)
        .await
        .context("failed to connect to database")
}

async fn handle_create_user(
    store: &dyn Store,
    username: Option<String>,
    role: Option<Role>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("username must not be blank");
    }

    let role = match role {
        Some(role) => role,
        None => {
            let labels: Vec<&str> = ROLES.iter().map(|r| r.as_str()).collect();
            let choice = Select::new()
                .with_prompt("Role")
                .items(&labels[..])
                .default(0)
                .interact()?;
            ROLES[choice]
        }
    };

    let mut uow = store.begin().await?;
    if uow.get_user_by_username(&username).await?.is_some() {
        bail!("a user named '{}' already exists", username);
    }
    let user = uow.create_user(NewUser { username, role }).await?;
    uow.commit().await?;

    println!("\n✅ User created successfully!");
    println!("   Username: {}", user.username);
    println!("   Role: {}", user.role);
    println!("   Id: {}", user.id);

    Ok(())
}
