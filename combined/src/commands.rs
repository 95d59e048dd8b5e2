//! Command handlers. Each one opens what it needs and prints JSON to stdout.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use catalog_service::{
    CatalogModule, FavoritesCache, InteractionService, ListingEditor, ListingSearch,
    RedisClientStore, ReportService,
};
use common::{AppError, AppResult, RegistryConfig};
use domain::{
    AdminInteractionUpdate, BusinessClock, Clock, InteractionStatusUpdate, ListingFilter,
    ListingForm, SortKey,
};
use identity_service::dto::{AdminUserCreate, Registration};
use identity_service::service::{AccountService, AdminUserService};
use identity_service::IdentityModule;
use storage::seed::seed_reference_data;
use storage::{Database, Persistence};

use crate::{
    AccountAction, Commands, FavoriteAction, InteractionAction, ListingAction, ListingArgs,
    LookupKind, MigrateAction, SearchArgs, UserAction,
};

/// Services wired over one migrated database.
struct Registry {
    config: RegistryConfig,
    persistence: Persistence,
    identity: IdentityModule,
    catalog: CatalogModule,
}

impl Registry {
    async fn open(config: RegistryConfig) -> AppResult<Self> {
        let database = Database::connect(&config.database).await?;
        let clock: Arc<dyn Clock> = Arc::new(BusinessClock::from_offset_hours(
            config.business_utc_offset_hours,
        )?);
        let persistence = Persistence::new(database.get_connection());

        Ok(Self {
            identity: IdentityModule::new(persistence.clone(), clock.clone()),
            catalog: CatalogModule::new(persistence.clone(), clock),
            persistence,
            config,
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

pub async fn run(command: Commands) -> AppResult<()> {
    let config = RegistryConfig::from_env();
    tracing::debug!("Loaded configuration: {:?}", config);

    if let Commands::Migrate { action } = command {
        return migrate(&config, action).await;
    }

    let registry = Registry::open(config).await?;

    match command {
        Commands::Migrate { .. } => Ok(()),
        Commands::Seed => {
            let report = seed_reference_data(registry.persistence.connection()).await?;
            info!(
                "Seed complete: {} role(s), {} status(es) added",
                report.roles, report.statuses
            );
            Ok(())
        }
        Commands::Users { action } => users(&registry, action).await,
        Commands::Roles => print_json(&registry.identity.admin.list_roles().await?),
        Commands::Accounts { action } => accounts(&registry, action).await,
        Commands::Search(args) => {
            let page = registry.catalog.listings.search(&to_filter(args)).await?;
            print_json(&page)
        }
        Commands::AgentListings { agent_id } => {
            print_json(&registry.catalog.listings.by_agent(agent_id).await?)
        }
        Commands::Lookups { kind } => lookups(&registry, kind).await,
        Commands::Favorites { session, action } => favorites(&registry, session, action).await,
        Commands::Interactions { action } => interactions(&registry, action).await,
        Commands::Listings { action } => listings(&registry, action).await,
        Commands::Report => print_json(&registry.catalog.reports.build().await?),
    }
}

async fn migrate(config: &RegistryConfig, action: MigrateAction) -> AppResult<()> {
    let database = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            info!("Running pending migrations...");
            database.run_migrations().await?;
            info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            info!("Rolling back last migration...");
            database.rollback_migration().await?;
            info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for (name, applied) in database.migration_status().await? {
                let status = if applied { "applied" } else { "pending" };
                println!("{:<60} {}", name, status);
            }
        }
        MigrateAction::Fresh => {
            info!("Resetting database and running all migrations...");
            database.fresh_migrations().await?;
            info!("Database reset completed successfully");
        }
    }

    Ok(())
}

async fn users(registry: &Registry, action: UserAction) -> AppResult<()> {
    let admin = &registry.identity.admin;
    match action {
        UserAction::List => print_json(&admin.list_users().await?),
        UserAction::SetRole { user_id, role } => {
            admin.update_user_role(user_id, &role).await?;
            info!("User {} is now in role {}", user_id, role);
            Ok(())
        }
        UserAction::Create(args) => {
            let principal = admin
                .create_user(AdminUserCreate {
                    last_name: args.last_name,
                    first_name: args.first_name,
                    middle_name: args.middle_name,
                    email: args.email,
                    phone: args.phone,
                    password: args.password,
                    role_name: args.role,
                })
                .await?;
            print_json(&principal)
        }
    }
}

async fn accounts(registry: &Registry, action: AccountAction) -> AppResult<()> {
    let accounts = &registry.identity.accounts;
    match action {
        AccountAction::Register {
            last_name,
            first_name,
            middle_name,
            email,
            phone,
            password,
        } => {
            let principal = accounts
                .register(Registration {
                    last_name,
                    first_name,
                    middle_name,
                    email,
                    phone,
                    password,
                })
                .await?;
            print_json(&principal)
        }
        AccountAction::Verify { email, password } => {
            let principal = accounts.check_credentials(&email, &password).await?;
            print_json(&principal)
        }
    }
}

fn to_filter(args: SearchArgs) -> ListingFilter {
    ListingFilter {
        district_id: args.district,
        type_id: args.type_id,
        min_price: args.min_price,
        max_price: args.max_price,
        min_area: args.min_area,
        max_area: args.max_area,
        rooms: args.rooms,
        has_balcony: args.balcony,
        has_parking: args.parking,
        has_elevator: args.elevator,
        sort_by: SortKey::from(args.sort.as_str()),
        sort_descending: args.desc,
        page: args.page,
        page_size: args.page_size,
    }
}

async fn lookups(registry: &Registry, kind: LookupKind) -> AppResult<()> {
    let listings = &registry.catalog.listings;
    let items = match kind {
        LookupKind::Districts => listings.districts().await?,
        LookupKind::Types => listings.types().await?,
        LookupKind::Streets => listings.streets().await?,
        LookupKind::Statuses => registry.catalog.interactions.statuses().await?,
        LookupKind::Agents => listings.agents().await?,
    };
    print_json(&items)
}

async fn favorites(
    registry: &Registry,
    session: Option<uuid::Uuid>,
    action: FavoriteAction,
) -> AppResult<()> {
    let session = session.unwrap_or_else(uuid::Uuid::new_v4);
    let store = RedisClientStore::connect_session(&registry.config.cache, session).await?;
    info!("Favorites session {}", session);

    let mut favorites = FavoritesCache::new(store);
    match action {
        FavoriteAction::List => {}
        FavoriteAction::Toggle { listing_id } => {
            let present = favorites.toggle(listing_id).await?;
            info!(
                "Listing {} {} favorites",
                listing_id,
                if present { "added to" } else { "removed from" }
            );
        }
        FavoriteAction::Add { listing_id } => favorites.add(listing_id).await?,
        FavoriteAction::Remove { listing_id } => favorites.remove(listing_id).await?,
    }

    let ids = favorites.all().await;
    print_json(&registry.catalog.listings.summaries_by_ids(&ids).await?)
}

async fn interactions(registry: &Registry, action: InteractionAction) -> AppResult<()> {
    let service = &registry.catalog.interactions;
    match action {
        InteractionAction::Create {
            client,
            agent,
            listing,
            notes,
        } => {
            let id = service.create(client, agent, listing, notes).await?;
            println!("{}", id);
            Ok(())
        }
        InteractionAction::ForAgent { agent_id } => print_json(&service.for_agent(agent_id).await?),
        InteractionAction::ForClient { client_id } => {
            print_json(&service.for_client(client_id).await?)
        }
        InteractionAction::Recent => print_json(&service.all_recent().await?),
        InteractionAction::SetStatus {
            interaction_id,
            status_id,
            requester,
            any,
            notes,
        } => {
            service
                .update_status(
                    InteractionStatusUpdate {
                        interaction_id,
                        status_id,
                        notes,
                    },
                    requester,
                    any,
                )
                .await
        }
        InteractionAction::Reassign {
            interaction_id,
            status,
            agent,
            notes,
        } => {
            service
                .admin_update(AdminInteractionUpdate {
                    interaction_id,
                    status_id: status,
                    agent_id: agent,
                    notes,
                })
                .await
        }
        InteractionAction::Delete { interaction_id } => service.delete(interaction_id).await,
    }
}

/// Overwrite the fields given on the command line.
fn overlay(args: ListingArgs, form: &mut ListingForm) {
    if args.district.is_some() {
        form.district_id = args.district;
    }
    if args.street.is_some() || args.new_street.is_some() {
        form.street_id = args.street;
        form.new_street_name = args.new_street;
    }
    if let Some(house) = args.house {
        form.house_number = house;
    }
    if let Some(total_floors) = args.total_floors {
        form.total_floors = total_floors;
    }
    if let Some(parking) = args.parking {
        form.has_parking = parking;
    }
    if let Some(elevator) = args.elevator {
        form.has_elevator = elevator;
    }
    if args.building_year.is_some() {
        form.building_year = args.building_year;
    }
    if args.latitude.is_some() {
        form.latitude = args.latitude;
    }
    if args.longitude.is_some() {
        form.longitude = args.longitude;
    }
    if args.type_id.is_some() {
        form.type_id = args.type_id;
    }
    if let Some(price) = args.price {
        form.price = price;
    }
    if let Some(rooms) = args.rooms {
        form.rooms = rooms;
    }
    if let Some(area) = args.area {
        form.area = area;
    }
    if let Some(floor) = args.floor {
        form.floor = floor;
    }
    if let Some(balcony) = args.balcony {
        form.has_balcony = balcony;
    }
    if args.description.is_some() {
        form.description = args.description;
    }
}

async fn listings(registry: &Registry, action: ListingAction) -> AppResult<()> {
    let editor = &registry.catalog.editor;
    match action {
        ListingAction::Create { agent, fields } => {
            let mut form = ListingForm::default();
            overlay(fields, &mut form);
            let id = editor.create(form, agent).await?;
            println!("{}", id);
            Ok(())
        }
        ListingAction::Update {
            id,
            requester,
            admin,
            fields,
        } => {
            let details = editor.details(id).await?.ok_or(AppError::NotFound)?;
            let mut form = ListingForm::from(&details);
            overlay(fields, &mut form);
            editor.update(id, form, requester, admin).await
        }
        ListingAction::Show { id } => {
            let details = editor.details(id).await?.ok_or(AppError::NotFound)?;
            print_json(&details)
        }
        ListingAction::Street { name } => print_json(&editor.ensure_street(&name).await?),
    }
}
