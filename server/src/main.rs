mod config;
mod graphql;
mod http;

use std::{collections::BTreeSet, net::IpAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::{
    AnalyticsReport, BookmarkSelection, Department, DummyJsonSource, EmployeeId, EmployeeStore,
    FileStorage, HrModule,
};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    graphql::GraphqlData,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-dashboard", version, about = "HR performance dashboard backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Fetch the employee page and print the (optionally filtered) directory as JSON.
    Fetch(FetchCommand),
    /// Fetch the employee page and print the analytics report as JSON.
    Analytics,
    /// Inspect or edit the persisted bookmark set.
    #[command(subcommand)]
    Bookmarks(BookmarksCommand),
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Start without fetching the directory up front")]
    lazy: bool,
}

#[derive(Args, Debug)]
struct FetchCommand {
    /// Case-insensitive match on name, email or department.
    #[arg(long, default_value = "")]
    search: String,
    /// Restrict to these departments (repeatable).
    #[arg(long = "department")]
    departments: Vec<Department>,
    /// Restrict to these ratings (repeatable).
    #[arg(long = "rating", value_parser = clap::value_parser!(u8).range(1..=5))]
    ratings: Vec<u8>,
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum BookmarksCommand {
    /// Print the bookmarked ids.
    List,
    /// Add or remove one id.
    Toggle { id: EmployeeId },
    /// Remove the listed ids in one step.
    Remove {
        #[arg(required = true)]
        ids: Vec<EmployeeId>,
    },
    /// Remove every bookmark.
    Clear,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load()?);
    let result = match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Fetch(cmd) => run_fetch(cmd, &config).await,
        Command::Analytics => run_analytics(&config).await,
        Command::Bookmarks(cmd) => run_bookmarks(cmd, &config),
        Command::SchemaPrint { output } => schema_print(output),
    };
    shutdown_tracing();
    result
}

fn open_store(config: &AppConfig) -> EmployeeStore {
    EmployeeStore::hydrate(Arc::new(FileStorage::in_dir(&config.storage_dir)))
}

fn build_module(config: &AppConfig) -> HrModule {
    let source = DummyJsonSource::new(config.source_url.clone())
        .page_size(config.page_size)
        .with_seed(config.rng_seed);
    HrModule::new(open_store(config), Arc::new(source)).with_promote_delay(config.promote_delay)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let hr = Arc::new(build_module(&config));
    if !cmd.lazy {
        // A failed first load is reported through `loadError`, not fatal.
        if let Err(err) = hr.refresh().await {
            warn!(error = %err, "initial directory load failed");
        }
    }
    let schema = graphql::build_schema(GraphqlData { hr: hr.clone() });
    let state = AppState {
        schema,
        hr,
        config: config.clone(),
    };
    http::serve(cmd.into(), state).await
}

async fn run_fetch(cmd: FetchCommand, config: &AppConfig) -> Result<()> {
    let hr = build_module(config);
    hr.refresh().await.context("failed to fetch employees")?;
    let json = hr
        .with_store_mut(move |store| {
            store.set_search_query(cmd.search);
            store.set_selected_departments(cmd.departments.into_iter().collect::<BTreeSet<_>>());
            store.set_selected_ratings(cmd.ratings.into_iter().collect::<BTreeSet<_>>());
            let filtered = store.filtered_employees();
            if cmd.pretty {
                serde_json::to_string_pretty(&filtered)
            } else {
                serde_json::to_string(&filtered)
            }
        })
        .await??;
    println!("{json}");
    Ok(())
}

async fn run_analytics(config: &AppConfig) -> Result<()> {
    let hr = build_module(config);
    hr.refresh().await.context("failed to fetch employees")?;
    let report: AnalyticsReport = hr.analytics().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_bookmarks(cmd: BookmarksCommand, config: &AppConfig) -> Result<()> {
    let mut store = open_store(config);
    match cmd {
        BookmarksCommand::List => {}
        BookmarksCommand::Toggle { id } => {
            let now = store.toggle_bookmark(id);
            info!(id, bookmarked = now, "bookmark toggled");
        }
        BookmarksCommand::Remove { ids } => {
            let mut selection = BookmarkSelection::default();
            for id in ids {
                if !selection.ids().contains(&id) {
                    selection.toggle(id);
                }
            }
            let removed = store.remove_selected(&mut selection);
            info!(removed, "bookmarks removed");
        }
        BookmarksCommand::Clear => {
            let mut selection = BookmarkSelection::default();
            selection.toggle_all(store.bookmarked_ids());
            let removed = store.remove_selected(&mut selection);
            info!(removed, "bookmarks cleared");
        }
    }
    println!("{}", serde_json::to_string(store.bookmarked_ids())?);
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let sdl = graphql::schema_sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema snapshot written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}
