use clap::{Args, Parser, Subcommand};
use restaurant_directory::api::{self, AppState};
use restaurant_directory::CategoryMap;
use restaurant_directory::config::AppConfig;
use restaurant_directory::listing::{RawListingParams, fetch_listing, parse_listing};
use restaurant_directory::utils::logger;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "restaurant-directory", version, about = "Restaurant directory HTTP service", long_about = None)]
struct Cli {
    #[arg(long, help = "Path to a config file (TOML). If omitted, $RESTAURANTS_CONFIG or ./restaurant-directory.toml is used.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Restaurant data file (JSON array or NDJSON). Takes precedence over config/env.")]
    data: Option<PathBuf>,
    #[arg(long, help = "Category table (TOML). Takes precedence over config/env.")]
    categories: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Run the HTTP service")]
    Serve {
        #[arg(long, help = "Bind host, e.g. 127.0.0.1")]
        host: Option<String>,
        #[arg(long, help = "Bind port")]
        port: Option<u16>,
        #[arg(long, help = "Log level: error|warn|info|debug|trace")]
        log_level: Option<String>,
    },
    #[command(about = "Run one listing query and print the JSON response")]
    Query(QueryArgs),
    #[command(about = "Print the configured category names")]
    Categories,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long, help = "Comma-separated cuisines")]
    cuisine: Option<String>,
    #[arg(long, help = "Comma-separated boroughs")]
    borough: Option<String>,
    #[arg(long, help = "Comma-separated grade letters")]
    grade: Option<String>,
    #[arg(long, help = "Comma-separated category names; overrides --cuisine")]
    category: Option<String>,
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    limit: Option<String>,
    #[arg(long, help = "Sort field, or averageRating")]
    sort_by: Option<String>,
    #[arg(long, help = "asc|desc")]
    order: Option<String>,
}

impl From<QueryArgs> for RawListingParams {
    fn from(a: QueryArgs) -> Self {
        Self {
            name: a.name,
            cuisine: a.cuisine,
            borough: a.borough,
            grade: a.grade,
            category: a.category,
            page: a.page,
            limit: a.limit,
            sort_by: a.sort_by,
            order: a.order,
        }
    }
}

fn init_logging(cfg: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    match &cfg.log_config {
        Some(p) => logger::init_path(p),
        None => logger::configure_logging(
            cfg.log_dir.as_deref(),
            Some(&cfg.log_level),
            Some(cfg.log_retention),
        ),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Precedence: CLI > env > config file > defaults
    let mut cfg = AppConfig::load_from_process(cli.config.as_deref())?;
    if cli.data.is_some() {
        cfg.data_path = cli.data;
    }
    if cli.categories.is_some() {
        cfg.categories_path = cli.categories;
    }

    match cli.command {
        Commands::Serve { host, port, log_level } => {
            if let Some(h) = host {
                cfg.host = h;
            }
            if let Some(p) = port {
                cfg.port = p;
            }
            if let Some(l) = log_level {
                cfg.log_level = l;
            }
            init_logging(&cfg)?;
            api::start_server(&cfg).await?;
        }
        Commands::Query(args) => {
            let state = AppState::from_config(&cfg)?;
            let query = parse_listing(&args.into(), &state.categories, &state.limits)?;
            let page = fetch_listing(&state.store, &query).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Categories => {
            for name in CategoryMap::from_config(&cfg)?.names() {
                println!("{name}");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
