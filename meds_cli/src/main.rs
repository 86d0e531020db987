use clap::{Parser, Subcommand};
use meds_core::export::{render_drug_text, write_travel_matrix};
use meds_core::loader::{load_dir, load_glossary, DRUGS_DIR, TERMS_FILE};
use meds_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "adhd-meds")]
#[command(about = "ADHD medication reference: records, travel status and interactions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Display locale (en, zh, zh-TW, ja)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List medications, optionally filtered
    List {
        /// Drug class (stimulant, non-stimulant)
        #[arg(long = "class")]
        drug_class: Option<String>,

        /// Category key (e.g. amphetamine)
        #[arg(long)]
        category: Option<String>,

        /// Only medications available in this region
        #[arg(long)]
        region: Option<String>,
    },

    /// Show one medication
    Show {
        id: String,
    },

    /// Travel status for carrying a medication between regions
    Travel {
        id: String,

        /// Origin region code
        #[arg(long)]
        from: String,

        /// Destination region code
        #[arg(long)]
        to: String,
    },

    /// Check interactions for a comma-separated list of medication ids
    Interactions {
        ids: String,

        /// Interacting drug class code or label (e.g. MAOI)
        #[arg(long = "class")]
        check_class: Option<String>,
    },

    /// Export the travel status matrix as CSV
    Matrix {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Search the glossary
    Terms {
        query: Option<String>,
    },

    /// Report data-quality problems in the record corpus
    Validate,
}

/// Resolved settings shared by every command
struct Context {
    data_dir: PathBuf,
    locale: Locale,
    json: bool,
}

impl Context {
    fn library(&self) -> Result<DrugLibrary> {
        load_dir(&self.data_dir.join(DRUGS_DIR))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    meds_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let ctx = Context {
        data_dir: cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone()),
        locale: cli.locale.unwrap_or(config.display.locale),
        json: cli.json,
    };

    match cli.command {
        Commands::List {
            drug_class,
            category,
            region,
        } => cmd_list(
            &ctx,
            DrugQuery {
                drug_class: drug_class.map(DrugClass::from),
                category,
                available_in: region.map(Region::new),
            },
        ),
        Commands::Show { id } => cmd_show(&ctx, &id),
        Commands::Travel { id, from, to } => {
            cmd_travel(&ctx, &id, &Region::new(from), &Region::new(to))
        }
        Commands::Interactions { ids, check_class } => cmd_interactions(&ctx, &ids, check_class),
        Commands::Matrix { output } => cmd_matrix(&ctx, &config, output.as_deref()),
        Commands::Terms { query } => cmd_terms(&ctx, query.as_deref().unwrap_or("")),
        Commands::Validate => cmd_validate(&ctx),
    }
}

fn lookup<'a>(library: &'a DrugLibrary, id: &str) -> Result<&'a DrugRecord> {
    library
        .get(id)
        .ok_or_else(|| Error::Other(format!("Unknown medication id '{}'", id)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_list(ctx: &Context, query: DrugQuery) -> Result<()> {
    let library = ctx.library()?;
    let matches: Vec<&DrugRecord> = library.filter(&query).collect();

    if ctx.json {
        let rows: Vec<_> = matches
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "name": d.generic_name(ctx.locale),
                    "drugClass": d.drug_class,
                    "category": d.category,
                    "controlledSubstance": d.controlled_substance,
                })
            })
            .collect();
        return print_json(&rows);
    }

    if matches.is_empty() {
        println!("No medications match.");
        return Ok(());
    }

    for drug in matches {
        println!(
            "{:<26} {:<14} {:<32} {}",
            drug.id,
            drug.drug_class,
            drug.category,
            drug.generic_name(ctx.locale)
        );
    }
    Ok(())
}

fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let library = ctx.library()?;
    let drug = lookup(&library, id)?;

    if ctx.json {
        return print_json(drug);
    }

    print!("{}", render_drug_text(drug, ctx.locale));
    Ok(())
}

fn cmd_travel(ctx: &Context, id: &str, from: &Region, to: &Region) -> Result<()> {
    let library = ctx.library()?;
    let drug = lookup(&library, id)?;

    let result = infer_status(drug, from, to);
    let rule = find_rule(drug, from, to);
    let explanation = result.reason.map(|r| r.explanation(ctx.locale));

    if ctx.json {
        return print_json(&serde_json::json!({
            "drugId": drug.id,
            "from": from,
            "to": to,
            "status": result.status,
            "inferred": result.inferred,
            "reason": result.reason,
            "explanation": explanation,
            "requirements": rule.map(|r| r.requirements(ctx.locale)).unwrap_or(&[]),
            "sources": rule.map(|r| r.sources.as_slice()).unwrap_or(&[]),
        }));
    }

    println!("{}: {} -> {}", drug.generic_name(ctx.locale), from, to);
    println!(
        "  Status: {} ({})",
        result.status,
        if result.inferred { "inferred" } else { "authored rule" }
    );
    if let Some(reason) = result.reason {
        println!("  Reason: {}", reason);
    }
    if let Some(text) = explanation {
        println!("  {}", text);
    }

    if let Some(rule) = rule {
        let requirements = rule.requirements(ctx.locale);
        if !requirements.is_empty() {
            println!("  Requirements:");
            for item in requirements {
                println!("    - {}", item);
            }
        }
        let documentation = rule.documentation(ctx.locale);
        if !documentation.is_empty() {
            println!("  Documentation:");
            for item in documentation {
                println!("    - {}", item);
            }
        }
        if let Some(days) = rule.max_supply_days {
            println!("  Maximum supply: {} days", days);
        }
        for source in &rule.sources {
            println!("  Source: {}", source);
        }
    }

    let advice = drug.travel_advice(ctx.locale);
    if !advice.is_empty() {
        println!("  {}", advice);
    }
    Ok(())
}

fn cmd_interactions(ctx: &Context, ids: &str, check_class: Option<String>) -> Result<()> {
    let library = ctx.library()?;
    let ids: Vec<&str> = ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let options = InteractionOptions {
        check_class,
        locale: ctx.locale,
    };
    let report = check_interactions(&library, &ids, &options);

    if ctx.json {
        return print_json(&report);
    }

    if report.per_drug_results.is_empty() {
        println!("No known medications in request.");
    }

    for result in &report.per_drug_results {
        println!("{} ({})", result.generic_name, result.drug_id);
        if let Some(ref class) = result.class_interaction {
            println!(
                "  [{}] {}: {}",
                class.severity, class.class_label, class.effect
            );
            if let Some(ref rec) = class.recommendation {
                println!("      {}", rec);
            }
        }
        for pair in &result.pairwise_interactions {
            println!(
                "  [{}] with {} ({}): {}",
                pair.severity, pair.with_drug, pair.substance, pair.effect
            );
        }
        for nutrient in &result.nutrient_warnings {
            println!(
                "  [{}] {}: {}",
                nutrient.severity, nutrient.nutrient, nutrient.effect
            );
        }
    }

    let summary = &report.summary;
    println!();
    println!(
        "Overall risk: {} ({} major, {} moderate)",
        summary.overall_risk, summary.major_count, summary.moderate_count
    );
    Ok(())
}

fn cmd_matrix(ctx: &Context, config: &Config, output: Option<&Path>) -> Result<()> {
    let library = ctx.library()?;
    let regions = &config.travel.regions;

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let count = write_travel_matrix(&library, regions, file)?;
            println!("✓ Wrote {} rows to {}", count, path.display());
        }
        None => {
            let stdout = io::stdout();
            write_travel_matrix(&library, regions, stdout.lock())?;
        }
    }
    Ok(())
}

fn cmd_terms(ctx: &Context, query: &str) -> Result<()> {
    let glossary = load_glossary(&ctx.data_dir.join(TERMS_FILE))?;
    let found = glossary.search(query, ctx.locale);

    if ctx.json {
        return print_json(&found);
    }

    for term in found {
        println!("{}", term.term.resolve(ctx.locale));
        println!("  {}", term.definition.resolve(ctx.locale));
    }
    Ok(())
}

fn cmd_validate(ctx: &Context) -> Result<()> {
    let library = ctx.library()?;

    let mut problems = library.validate();
    problems.extend(get_reference_tables().validate());

    if problems.is_empty() {
        println!("✓ {} medication records valid", library.len());
        return Ok(());
    }

    let mut stderr = io::stderr();
    writeln!(stderr, "Found {} problems:", problems.len())?;
    for problem in &problems {
        writeln!(stderr, "  - {}", problem)?;
    }
    std::process::exit(1);
}
