use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pokedex_directory::config::ConfigLoader;
use pokedex_directory::directory::build_directory;
use pokedex_directory::domain::{FilterQuery, SortOrder};
use pokedex_directory::error::DexError;
use pokedex_directory::gateway::{CatalogClient, CatalogHttpClient};
use pokedex_directory::session::Session;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Browsable, filterable Pokédex directory backed by the PokeAPI catalog")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    limit: Option<u32>,

    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "List the directory, optionally filtered or sorted")]
    List(ListArgs),
    #[command(about = "Show one record with its evolutionary lineage")]
    Info(InfoArgs),
    #[command(about = "List the valid type filter values")]
    Types,
}

#[derive(Args)]
#[command(group(ArgGroup::new("filter").args(["type_name", "name", "sort"])))]
struct ListArgs {
    #[arg(long = "type", value_name = "TYPE")]
    type_name: Option<String>,

    #[arg(long, value_name = "SUBSTRING")]
    name: Option<String>,

    #[arg(long, value_name = "ORDER")]
    sort: Option<SortOrder>,
}

#[derive(Args)]
struct InfoArgs {
    name: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(dex) = report.downcast_ref::<DexError>() {
            return ExitCode::from(map_exit_code(dex));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DexError) -> u8 {
    match error {
        DexError::NotFound(_) => 2,
        DexError::Network(_) | DexError::Status { .. } | DexError::MalformedResponse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolved = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;
    let limit = cli.limit.unwrap_or(resolved.page_limit);
    let client = CatalogHttpClient::with_base_url(&resolved.base_url).into_diagnostic()?;

    match cli.command {
        Command::List(args) => run_list(args, &client, limit, cli.json),
        Command::Info(args) => run_info(args, &client, limit, cli.json),
        Command::Types => run_types(&client, cli.json),
    }
}

fn run_list(args: ListArgs, client: &CatalogHttpClient, limit: u32, json: bool) -> miette::Result<()> {
    let directory = build_directory(client, limit).into_diagnostic()?;
    let categories = client.fetch_category_list().into_diagnostic()?;
    let mut session = Session::new(directory, categories);
    session.set_query(build_query(&args));

    let visible = session.visible_items();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&visible).into_diagnostic()?
        );
        return Ok(());
    }
    if visible.is_empty() {
        println!("no records match the current filter");
        return Ok(());
    }
    for record in &visible {
        println!("{:<16} {}", record.name, record.types.join("/"));
    }
    Ok(())
}

fn run_info(args: InfoArgs, client: &CatalogHttpClient, limit: u32, json: bool) -> miette::Result<()> {
    let directory = build_directory(client, limit).into_diagnostic()?;
    let categories = client.fetch_category_list().into_diagnostic()?;
    let mut session = Session::new(directory, categories);
    session.select_and_resolve(client, &args.name).into_diagnostic()?;

    let state = session.selection_state();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(state).into_diagnostic()?
        );
        return Ok(());
    }

    let Some(record) = &state.selected else {
        return Ok(());
    };
    println!("name:      {}", record.name);
    if !record.sprite_uri.is_empty() {
        println!("sprite:    {}", record.sprite_uri);
    }
    println!("types:     {}", record.types.join(", "));
    println!("abilities: {}", record.abilities.join(", "));
    println!("stats:");
    for stat in &record.stats {
        println!("  {:<16} {}", stat.name, stat.base_value);
    }
    match &state.evolution {
        Some(sequence) => println!("lineage:   {}", sequence.join(" -> ")),
        None => println!("lineage:   no lineage found"),
    }
    Ok(())
}

fn run_types(client: &CatalogHttpClient, json: bool) -> miette::Result<()> {
    let categories = client.fetch_category_list().into_diagnostic()?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&categories).into_diagnostic()?
        );
        return Ok(());
    }
    for category in &categories {
        println!("{}", category.name);
    }
    Ok(())
}

fn build_query(args: &ListArgs) -> FilterQuery {
    if let Some(type_name) = &args.type_name {
        FilterQuery::ByType(type_name.clone())
    } else if let Some(name) = &args.name {
        FilterQuery::ByNameSubstring(name.clone())
    } else if let Some(order) = args.sort {
        FilterQuery::SortedByName(order)
    } else {
        FilterQuery::None
    }
}
