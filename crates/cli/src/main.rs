//! # shelfwise-cli
//!
//! Command-line interface for shelfwise: normalize placement rows, score
//! slotting fees, and manage shelves and products on disk.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use shelfwise_core::{Config, Product};
use shelfwise_http::{rows_from_document, RowSourceClient};
use shelfwise_normalize::{
    categories, recent_placements, MissingProduct, Normalizer, ProductFilter, ViewOptions,
};
use shelfwise_slotting::{evaluate, FeeTable};
use shelfwise_store::{JsonFileRepository, ShelfService};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// shelfwise - shelf placement tooling
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about = "Retail shelf placement tooling", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output format (json, table)
    #[arg(short = 'f', long = "format", default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Output format for results.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Aligned table output (default)
    #[default]
    Table,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch or read placement rows and print the derived views
    Normalize(NormalizeArgs),
    /// Check that the row source is reachable
    Status {
        /// Override the configured endpoint URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Score every grid cell for a product
    Slots(SlotsArgs),
    /// Manage shelves
    #[command(subcommand)]
    Shelf(ShelfCommand),
    /// Manage products
    #[command(subcommand)]
    Product(ProductCommand),
}

#[derive(Args)]
struct NormalizeArgs {
    /// Read rows from a JSON file (envelope or bare 2-D array) instead of
    /// the endpoint
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Override the configured endpoint URL
    #[arg(long)]
    url: Option<String>,

    /// Override the action name sent to the endpoint
    #[arg(long)]
    action: Option<String>,

    /// Only show placements by users of this store ("all" for every store)
    #[arg(long)]
    store: Option<String>,

    /// Show items whose product is missing from the catalog in both views
    #[arg(long)]
    placeholders: bool,

    /// Number of recent placements to list
    #[arg(long, default_value_t = 5)]
    recent: usize,

    /// Add the derived products and users to the local store
    #[arg(long)]
    save: bool,
}

#[derive(Args)]
struct SlotsArgs {
    /// Unit price of the product
    #[arg(long)]
    price: f64,

    /// Profit margin as a fraction (0.25 = 25%)
    #[arg(long)]
    margin: f64,

    /// Use the standard 5x5 fee schedule
    #[arg(long, conflicts_with = "fee")]
    standard: bool,

    /// Uniform fee per cell (defaults to the configured grid fee)
    #[arg(long)]
    fee: Option<f64>,

    /// Also list the N most profitable slots
    #[arg(long, default_value_t = 3)]
    top: usize,
}

#[derive(Subcommand)]
enum ShelfCommand {
    /// Create an empty shelf
    Create {
        name: String,
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        cols: Option<usize>,
    },
    /// List shelves
    List,
    /// Show one shelf and its placements
    Show { id: String },
    /// Delete a shelf
    Delete { id: String },
    /// Place a product in a free cell
    Place {
        shelf: String,
        product: String,
        position: String,
    },
    /// Clear a cell
    Clear { shelf: String, position: String },
}

#[derive(Subcommand)]
enum ProductCommand {
    /// Add or update a product
    Add(ProductArgs),
    /// List products
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        demand: Option<String>,
    },
    /// Delete a product and clear it from every shelf
    Delete { id: String },
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: String,
    /// Keep an existing id (a new one is generated otherwise)
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value_t = 0.0)]
    price: f64,
    #[arg(long, default_value_t = 0.0)]
    margin: f64,
    #[arg(long)]
    size: Option<String>,
    #[arg(long)]
    demand: Option<String>,
}

impl ProductArgs {
    fn into_product(self) -> Product {
        let defaults = Product::default();
        Product {
            id: self.id.unwrap_or_default(),
            name: self.name,
            category: self.category.unwrap_or(defaults.category),
            price: self.price,
            margin: self.margin,
            size: self.size.unwrap_or(defaults.size),
            demand: self.demand.unwrap_or(defaults.demand),
            ..defaults
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Normalize(args) => run_normalize(&config, args, cli.format).await,
        Command::Status { url } => run_status(&config, url).await,
        Command::Slots(args) => run_slots(&config, &args, cli.format),
        Command::Shelf(cmd) => run_shelf(&config, cmd, cli.format),
        Command::Product(cmd) => run_product(&config, cmd, cli.format),
    }
}

/// Load the explicit config file, or the user's one if it exists.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => match default_config_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    config.validate()?;
    tracing::debug!("columns: {:?}", config.columns);
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("shelfwise");
        p.push("config.yaml");
        p
    })
}

/// Directory for the JSON-file repository.
fn storage_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.storage.dir {
        return Ok(dir.clone());
    }
    dirs::data_local_dir()
        .map(|mut p| {
            p.push("shelfwise");
            p
        })
        .context("No local data directory; set storage.dir in the config")
}

fn open_store(config: &Config) -> Result<ShelfService<JsonFileRepository>> {
    let dir = storage_dir(config)?;
    let repo = JsonFileRepository::open(&dir)
        .with_context(|| format!("Failed to open store at {}", dir.display()))?;
    Ok(ShelfService::new(repo))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_normalize(config: &Config, args: NormalizeArgs, format: OutputFormat) -> Result<()> {
    let rows = match &args.input {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let document: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            rows_from_document(&document)?
        }
        None => {
            let mut api = config.api.clone();
            if args.url.is_some() {
                api.url.clone_from(&args.url);
            }
            if let Some(action) = &args.action {
                api.action.clone_from(action);
            }
            RowSourceClient::from_config(&api)?
                .fetch_rows_or_empty()
                .await
        }
    };

    let options = if args.placeholders {
        ViewOptions {
            by_position: MissingProduct::Placeholder,
            by_user: MissingProduct::Placeholder,
        }
    } else {
        ViewOptions::default()
    };
    let normalizer = Normalizer::new(config.columns.clone()).with_options(options);
    let out = normalizer.normalize_for_store(&rows, args.store.as_deref());

    if args.save {
        let mut store = open_store(config)?;
        let (products, users) = store.import(out.products.values(), out.users.values())?;
        eprintln!(
            "{} {products} products and {users} users",
            "Saved".green().bold()
        );
    }

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let recent = recent_placements(&out.items, &out.products, &out.users, args.recent);
            print!("{}", render::normalized(&out, &recent));
            Ok(())
        }
    }
}

async fn run_status(config: &Config, url: Option<String>) -> Result<()> {
    let mut api = config.api.clone();
    if url.is_some() {
        api.url = url;
    }
    let client = RowSourceClient::from_config(&api)?;
    let status = client.check_status().await?;

    if status.success {
        println!(
            "{} {} {}",
            "OK".green().bold(),
            status.message.unwrap_or_default(),
            status.version.map(|v| format!("(v{v})")).unwrap_or_default()
        );
        Ok(())
    } else {
        bail!(
            "Row source not ready: {}",
            status.message.unwrap_or_else(|| "no message".to_string())
        )
    }
}

fn fee_table(config: &Config, args: &SlotsArgs) -> Result<FeeTable> {
    if args.standard {
        return Ok(FeeTable::standard());
    }
    let fee = args.fee.unwrap_or(config.grid.default_fee);
    FeeTable::uniform(config.grid.rows, config.grid.cols, fee).context("Invalid fee grid")
}

fn run_slots(config: &Config, args: &SlotsArgs, format: OutputFormat) -> Result<()> {
    if !args.price.is_finite() || !args.margin.is_finite() {
        bail!("price and margin must be finite numbers");
    }
    let eval = evaluate(args.price, args.margin, &fee_table(config, args)?);

    match format {
        OutputFormat::Json => print_json(&eval),
        OutputFormat::Table => {
            print!("{}", render::evaluation(&eval, args.top));
            Ok(())
        }
    }
}

fn run_shelf(config: &Config, cmd: ShelfCommand, format: OutputFormat) -> Result<()> {
    let mut store = open_store(config)?;

    match cmd {
        ShelfCommand::Create { name, rows, cols } => {
            let shelf = store.create_shelf(
                &name,
                rows.unwrap_or(config.grid.rows),
                cols.unwrap_or(config.grid.cols),
            )?;
            match format {
                OutputFormat::Json => print_json(&shelf)?,
                OutputFormat::Table => println!("{} {}", "Created".green().bold(), shelf.id),
            }
        }
        ShelfCommand::List => {
            let shelves = store.shelves()?;
            match format {
                OutputFormat::Json => print_json(&shelves)?,
                OutputFormat::Table => print!("{}", render::shelves(&shelves)),
            }
        }
        ShelfCommand::Show { id } => {
            let shelf = store
                .shelf(&id)?
                .with_context(|| format!("No shelf '{id}'"))?;
            match format {
                OutputFormat::Json => print_json(&shelf)?,
                OutputFormat::Table => print!("{}", render::shelf(&shelf)),
            }
        }
        ShelfCommand::Delete { id } => {
            if !store.delete_shelf(&id)? {
                bail!("No shelf '{id}'");
            }
            println!("{} {id}", "Deleted".green().bold());
        }
        ShelfCommand::Place {
            shelf,
            product,
            position,
        } => {
            let updated = store.place_product(&shelf, &product, &position)?;
            match format {
                OutputFormat::Json => print_json(&updated)?,
                OutputFormat::Table => print!("{}", render::shelf(&updated)),
            }
        }
        ShelfCommand::Clear { shelf, position } => {
            if store.remove_placement(&shelf, &position)? {
                println!("{} {position}", "Cleared".green().bold());
            } else {
                println!("{} {position} was already empty", "Note:".yellow().bold());
            }
        }
    }
    Ok(())
}

fn run_product(config: &Config, cmd: ProductCommand, format: OutputFormat) -> Result<()> {
    let mut store = open_store(config)?;

    match cmd {
        ProductCommand::Add(args) => {
            let product = store.save_product(args.into_product())?;
            match format {
                OutputFormat::Json => print_json(&product)?,
                OutputFormat::Table => println!("{} {}", "Saved".green().bold(), product.id),
            }
        }
        ProductCommand::List {
            search,
            category,
            demand,
        } => {
            let products = store.products()?;
            let filter = ProductFilter {
                search,
                category,
                demand,
            };
            let matched = filter.apply(&products);
            match format {
                OutputFormat::Json => print_json(&matched)?,
                OutputFormat::Table => {
                    print!("{}", render::products(&matched));
                    let all = categories(&products);
                    if !all.is_empty() {
                        println!("\n{} {}", "Categories:".cyan().bold(), all.join(", "));
                    }
                }
            }
        }
        ProductCommand::Delete { id } => {
            if !store.delete_product(&id)? {
                bail!("No product '{id}'");
            }
            println!("{} {id}", "Deleted".green().bold());
        }
    }
    Ok(())
}
