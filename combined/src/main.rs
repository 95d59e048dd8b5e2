//! Registry back office command line.

mod commands;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "registry")]
#[command(about = "Real-estate registry back office")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Insert missing roles and interaction statuses
    Seed,
    /// Administrator user management
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// List assignable roles
    Roles,
    /// Self-service accounts
    Accounts {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Search active listings
    Search(SearchArgs),
    /// Active listings of one agent, newest first
    AgentListings {
        agent_id: i32,
    },
    /// Reference data used by search filters
    Lookups {
        #[command(subcommand)]
        kind: LookupKind,
    },
    /// Favorite listings of a browser session
    Favorites {
        /// Session to resume; a new one is opened when omitted
        #[arg(long)]
        session: Option<Uuid>,
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Client inquiries and their workflow
    Interactions {
        #[command(subcommand)]
        action: InteractionAction,
    },
    /// Agent listing editing
    Listings {
        #[command(subcommand)]
        action: ListingAction,
    },
    /// Activity counts by district, agent and status
    Report,
}

#[derive(Subcommand, Clone, Copy)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Every user, oldest first
    List,
    /// Move a user into another role
    SetRole {
        user_id: i32,
        role: String,
    },
    /// Create a user in the given role
    Create(UserArgs),
}

#[derive(Args)]
pub struct UserArgs {
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub middle_name: Option<String>,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, default_value = domain::ROLE_CLIENT)]
    pub role: String,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Register a client account
    Register {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check an email and password pair
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub district: Option<i32>,
    #[arg(long = "type")]
    pub type_id: Option<i32>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    #[arg(long)]
    pub min_area: Option<Decimal>,
    #[arg(long)]
    pub max_area: Option<Decimal>,
    #[arg(long)]
    pub rooms: Option<i32>,
    #[arg(long)]
    pub balcony: Option<bool>,
    #[arg(long)]
    pub parking: Option<bool>,
    #[arg(long)]
    pub elevator: Option<bool>,
    /// price, area, rooms or district
    #[arg(long, default_value = "price")]
    pub sort: String,
    #[arg(long)]
    pub desc: bool,
    #[arg(long, default_value_t = 1)]
    pub page: u64,
    #[arg(long, default_value_t = domain::DEFAULT_PAGE_SIZE)]
    pub page_size: u64,
}

#[derive(Subcommand, Clone, Copy)]
pub enum LookupKind {
    Districts,
    Types,
    Streets,
    Statuses,
    Agents,
}

#[derive(Subcommand)]
pub enum FavoriteAction {
    /// Favorite listings as summaries
    List,
    /// Flip one listing in or out of the set
    Toggle { listing_id: i32 },
    Add { listing_id: i32 },
    Remove { listing_id: i32 },
}

#[derive(Subcommand)]
pub enum InteractionAction {
    /// Record a client's inquiry about a listing
    Create {
        #[arg(long)]
        client: i32,
        #[arg(long)]
        agent: i32,
        #[arg(long)]
        listing: i32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Interactions assigned to an agent
    ForAgent { agent_id: i32 },
    /// Interactions opened by a client
    ForClient { client_id: i32 },
    /// Most recent interactions across all agents
    Recent,
    /// Change status as the given requester
    SetStatus {
        interaction_id: i32,
        status_id: i32,
        #[arg(long)]
        requester: i32,
        /// Skip the assigned-agent check
        #[arg(long)]
        any: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Administrator edit: status, agent and notes
    Reassign {
        interaction_id: i32,
        #[arg(long)]
        status: i32,
        #[arg(long)]
        agent: i32,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { interaction_id: i32 },
}

#[derive(Subcommand)]
pub enum ListingAction {
    /// Create a listing owned by an agent
    Create {
        #[arg(long)]
        agent: i32,
        #[command(flatten)]
        fields: ListingArgs,
    },
    /// Change the given fields of a listing
    Update {
        id: i32,
        #[arg(long)]
        requester: i32,
        /// Skip the owner check
        #[arg(long)]
        admin: bool,
        #[command(flatten)]
        fields: ListingArgs,
    },
    /// Full listing with house and photos
    Show { id: i32 },
    /// Find or add a street by name
    Street { name: String },
}

/// Listing fields; omitted ones keep their current or default value.
#[derive(Args)]
pub struct ListingArgs {
    #[arg(long)]
    pub district: Option<i32>,
    #[arg(long)]
    pub street: Option<i32>,
    /// Street to find or add when --street is not given
    #[arg(long)]
    pub new_street: Option<String>,
    #[arg(long)]
    pub house: Option<String>,
    #[arg(long)]
    pub total_floors: Option<i32>,
    #[arg(long)]
    pub parking: Option<bool>,
    #[arg(long)]
    pub elevator: Option<bool>,
    #[arg(long)]
    pub building_year: Option<i32>,
    #[arg(long)]
    pub latitude: Option<Decimal>,
    #[arg(long)]
    pub longitude: Option<Decimal>,
    #[arg(long = "type")]
    pub type_id: Option<i32>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub rooms: Option<i32>,
    #[arg(long)]
    pub area: Option<Decimal>,
    #[arg(long)]
    pub floor: Option<i32>,
    #[arg(long)]
    pub balcony: Option<bool>,
    #[arg(long)]
    pub description: Option<String>,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = commands::run(cli.command).await {
        tracing::error!(code = e.code(), "{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
