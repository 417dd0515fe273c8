use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scout_core::{BriefRequest, CityScope, JurisdictionRepository, PolicyBrief, PolicyError};
use scout_observability::init_tracing;
use scout_service::{build_service, BriefDraft, EngineSettings};
use scout_storage::{CatalogSource, JurisdictionCatalog, SqliteJurisdictionSource};

#[derive(Debug, Parser)]
#[command(name = "scout")]
#[command(about = "Location compliance briefs for production planning")]
struct Cli {
    #[arg(long, env = "SCOUT_JURISDICTIONS_PATH", default_value = "data/jurisdictions.json")]
    data: PathBuf,

    #[arg(long, env = "SCOUT_DATABASE_URL")]
    database_url: Option<String>,

    /// Reject cities that are unknown or belong to another country.
    #[arg(long)]
    strict_city: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Brief {
        #[arg(long)]
        country: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        drones: bool,
        #[arg(long)]
        minors: bool,
        #[arg(long)]
        foreign_crew: bool,
        #[arg(long)]
        shoot_date: Option<String>,
        /// Print only the summary line counts.
        #[arg(long)]
        summary: bool,
    },
    Jurisdictions,
    Interactive,
    /// Copy the JSON catalog into the SQLite database.
    Import {
        #[arg(long)]
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("scout_cli");
    let cli = Cli::parse();

    let settings = EngineSettings {
        city_scope: if cli.strict_city {
            CityScope::Strict
        } else {
            CityScope::Lenient
        },
        catalog_path: cli.data.clone(),
        database_url: cli.database_url.clone(),
    };

    match cli.command {
        Command::Brief {
            country,
            city,
            drones,
            minors,
            foreign_crew,
            shoot_date,
            summary,
        } => {
            let service = build_service(settings).await?;
            let brief = service.generate(&BriefRequest {
                country_code: country,
                city_name: city,
                has_drones: drones,
                has_minors: minors,
                has_foreign_crew: foreign_crew,
                shoot_date,
            })?;

            if summary {
                println!("{}", serde_json::to_string_pretty(&brief.summary())?);
            } else {
                println!("{}", serde_json::to_string_pretty(&brief)?);
            }
        }
        Command::Jurisdictions => {
            let service = build_service(settings).await?;
            println!("{}", serde_json::to_string_pretty(&service.jurisdictions())?);
        }
        Command::Interactive => {
            let service = build_service(settings).await?;
            run_interactive(service.draft())?;
        }
        Command::Import { target } => {
            let catalog = CatalogSource::json_file(cli.data.clone())
                .load()
                .await
                .with_context(|| format!("failed loading {}", cli.data.display()))?;
            import_catalog(&catalog, &target).await?;
        }
    }

    Ok(())
}

async fn import_catalog(catalog: &JurisdictionCatalog, database_url: &str) -> Result<()> {
    let target = SqliteJurisdictionSource::connect(database_url).await?;
    target.import_document(&catalog.to_document()).await?;

    let reloaded = target.load_catalog().await?;
    println!(
        "imported {} jurisdictions ({} listed after reload)",
        catalog.len(),
        reloaded.countries().len()
    );
    Ok(())
}

fn run_interactive<R: JurisdictionRepository>(mut draft: BriefDraft<R>) -> Result<()> {
    println!("Scout interactive mode. commands: country <code>, city <name|->, drones|minors|crew on|off, date <YYYY-MM-DD|->, show, exit");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let mut next = draft.request().clone();
        if input != "show" {
            if let Err(error) = apply_command(&mut next, input) {
                println!("{error}");
                continue;
            }
        }

        print_outcome(draft.update(next));
    }

    Ok(())
}

fn apply_command(request: &mut BriefRequest, input: &str) -> Result<()> {
    let (command, argument) = input
        .split_once(' ')
        .map(|(c, a)| (c, a.trim()))
        .unwrap_or((input, ""));

    match command.to_lowercase().as_str() {
        "country" => request.country_code = argument.to_string(),
        "city" => request.city_name = optional(argument),
        "date" => request.shoot_date = optional(argument),
        "drones" => request.has_drones = parse_switch(argument)?,
        "minors" => request.has_minors = parse_switch(argument)?,
        "crew" => request.has_foreign_crew = parse_switch(argument)?,
        other => bail!("unknown command '{other}'"),
    }

    Ok(())
}

fn optional(argument: &str) -> Option<String> {
    match argument {
        "" | "-" => None,
        value => Some(value.to_string()),
    }
}

fn parse_switch(argument: &str) -> Result<bool> {
    match argument.to_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        other => bail!("expected on/off, got '{other}'"),
    }
}

fn print_outcome(outcome: &Result<PolicyBrief, PolicyError>) {
    match outcome {
        Ok(brief) => {
            let summary = brief.summary();
            println!(
                "\n{}: {} documents ({} required), {} risk factors, overall {}",
                summary.location,
                summary.total_documents,
                summary.required_documents,
                summary.risk_factors,
                summary.overall_risk.as_code()
            );
            for item in &brief.checklist {
                let marker = if item.required { "*" } else { " " };
                println!(
                    " {marker} [{}] {} ({})",
                    item.category.as_code(),
                    item.document,
                    item.lead_time
                );
            }
            for factor in &brief.risk.factors {
                println!(" ! {} -> {}", factor.factor, factor.recommendation);
            }
            println!();
        }
        Err(error) => println!("\n{error}\n"),
    }
}
