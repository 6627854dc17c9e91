//! Medsafe command-line driver.
//!
//! Runs the decision support engine over the bundled catalog (or a catalog
//! file) without a UI.
//!
//! Usage:
//!   medsafe search brufen
//!   medsafe --liver check paracetamol combiflam
//!   medsafe --allergy Penicillin substitute amoxiclav
//!   medsafe brands Tylenol --from US --to IN
//!   medsafe merge "Rx: Dolo-650 1 tab TDS, Augmentin 625"
//!   medsafe report ibuprofen amoxiclav --csv

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use medsafe_core::{Catalog, EngineConfig, MedicineRecord, Session, SessionReport};
use medsafe_extract::{detect_medicines, parse_backend_response};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Medsafe: local medicine safety checks.
#[derive(Parser)]
#[command(
    name = "medsafe",
    about = "Local clinical decision support over a medicine catalog",
    long_about = "Searches a medicine catalog, checks a selection for interactions,\n\
                  scores per-dimension risk, and suggests cheaper substitutes."
)]
struct Cli {
    /// Catalog JSON file (overrides the config file and the bundled catalog).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Engine configuration TOML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    profile: ProfileArgs,

    #[command(subcommand)]
    command: Command,
}

/// Patient profile overrides, applied on top of the config file.
#[derive(Args)]
struct ProfileArgs {
    /// Patient has liver disease.
    #[arg(long, global = true)]
    liver: bool,

    /// Patient has peptic ulcer history.
    #[arg(long, global = true)]
    ulcer: bool,

    /// Known allergy (repeatable).
    #[arg(long = "allergy", global = true)]
    allergies: Vec<String>,

    /// Patient region code, e.g. IN or US.
    #[arg(long, global = true)]
    region: Option<String>,

    /// Patient age in years.
    #[arg(long, global = true)]
    age: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog by name, generic, brand, or ingredient.
    Search { query: String },
    /// Select medicines by id and print warnings and risk.
    Check {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show substitutes and the cheapest same-class option.
    Substitute { id: String },
    /// Map brand names between regions.
    Brands {
        query: String,
        #[arg(long, default_value = "IN")]
        from: String,
        #[arg(long, default_value = "US")]
        to: String,
    },
    /// Detect medicine names in free text and add them to the selection.
    Merge {
        text: String,
        /// Treat the text as a backend JSON reply.
        #[arg(long)]
        json: bool,
    },
    /// Export a session report for the given selection.
    Report {
        #[arg(required = true)]
        ids: Vec<String>,
        /// CSV instead of JSON.
        #[arg(long)]
        csv: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for rule firings and catalog loading details.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("medsafe error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut session = open_session(&cli)?;

    match cli.command {
        Command::Search { query } => run_search(&session, &query),
        Command::Check { ids } => {
            select_all(&mut session, &ids);
            print_assessment(&session);
            Ok(())
        }
        Command::Substitute { id } => run_substitute(&session, &id),
        Command::Brands { query, from, to } => run_brands(&session, &query, &from, &to),
        Command::Merge { text, json } => run_merge(&mut session, &text, json),
        Command::Report { ids, csv } => {
            select_all(&mut session, &ids);
            let report = SessionReport::from_session(&session);
            if csv {
                print!("{}", report.to_csv());
            } else {
                println!("{}", report.to_json()?);
            }
            Ok(())
        }
    }
}

// ── Session setup ─────────────────────────────────────────────────────────────

fn open_session(cli: &Cli) -> Result<Session> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => config.load_catalog(),
    };
    info!(medicines = catalog.len(), "catalog ready");

    let mut profile = config.profile.clone();
    let overrides = &cli.profile;
    profile.liver |= overrides.liver;
    profile.ulcer |= overrides.ulcer;
    for allergy in &overrides.allergies {
        profile.add_allergy(allergy.as_str());
    }
    if let Some(region) = &overrides.region {
        profile.region = region.clone();
    }
    if let Some(age) = overrides.age {
        profile.age = age;
    }

    Ok(Session::with_rules(catalog, config.rule_set()).with_profile(profile))
}

fn select_all(session: &mut Session, ids: &[String]) {
    for id in ids {
        if !session.add(id) && !session.selection().contains(id) {
            eprintln!("skipping unknown medicine id: {}", id);
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_search(session: &Session, query: &str) -> Result<()> {
    let hits = session.search(query);
    if hits.is_empty() {
        println!("No medicines match '{}'.", query);
        return Ok(());
    }
    for record in hits {
        print_medicine(record);
    }
    Ok(())
}

fn run_substitute(session: &Session, id: &str) -> Result<()> {
    let Some(result) = session.substitute(id) else {
        bail!("unknown medicine id: {}", id);
    };

    println!(
        "Cheapest option: {} (INR {:.2})",
        result.cheapest.name, result.cheapest.price_inr
    );
    if let Some(target) = session.catalog().get(id) {
        let saving = result.saving_over(target);
        if saving > 0.0 {
            println!("  saves INR {:.2} over {}", saving, target.name);
        }
    }

    println!("Exact generic equivalents:");
    print_list(result.exact_generic.iter().map(|r| r.name.as_str()));
    println!("Same-class alternatives:");
    print_list(result.same_class.iter().map(|r| r.name.as_str()));
    println!("Brands in {}:", session.profile().region);
    print_list(result.local_brands.iter().map(String::as_str));
    Ok(())
}

fn run_brands(session: &Session, query: &str, from: &str, to: &str) -> Result<()> {
    let mappings = session.map_brands(query, from, to);
    if mappings.is_empty() {
        println!("No catalog medicine matches '{}'.", query);
        return Ok(());
    }
    for mapping in mappings {
        println!("{} ({}) [{}]", mapping.name, mapping.generic, mapping.class_name);
        println!("  {}: {}", from, join_or_dash(&mapping.from));
        println!("  {}: {}", to, join_or_dash(&mapping.to));
    }
    Ok(())
}

fn run_merge(session: &mut Session, text: &str, json: bool) -> Result<()> {
    let names = if json {
        parse_backend_response(text)
            .context("parsing backend reply")?
            .medicine_names()
    } else {
        detect_medicines(text)
    };
    info!(candidates = names.len(), "detected candidate names");

    let added = session.merge_detected(&names);
    if added.is_empty() {
        println!("No new medicines recognised.");
    } else {
        println!("Added: {}", added.join(", "));
    }
    print_assessment(session);
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_medicine(record: &MedicineRecord) {
    println!(
        "{:<16} {:<24} {:<32} {:<14} INR {:>7.2}",
        record.id, record.name, record.generic, record.class_name, record.price_inr
    );
}

fn print_assessment(session: &Session) {
    let selected: Vec<&str> = session
        .selected_records()
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();
    println!("Selection: {}", if selected.is_empty() { "-".to_string() } else { selected.join(", ") });

    if session.warnings().is_empty() {
        println!("No interaction warnings.");
    } else {
        println!("Warnings:");
        for warning in session.warnings() {
            println!("  [{}] {}", warning.rule_id, warning.message);
        }
    }

    println!("Risk:");
    for (dimension, value) in session.risk().dimensions() {
        println!("  {:<13} {:>3}", dimension.as_str(), value);
    }
}

fn print_list<'a>(items: impl Iterator<Item = &'a str>) {
    let items: Vec<&str> = items.collect();
    println!("  {}", join_or_dash(&items));
}

fn join_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(", ")
    }
}
