//! Plaintext and CSV exports.
//!
//! Exports read only the already-loaded library; travel rows are
//! produced by the same inference used for interactive queries.

use crate::travel::infer_status;
use crate::{DrugLibrary, DrugRecord, Locale, Region, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// One row of the travel matrix CSV
#[derive(Debug, Serialize)]
struct TravelRow<'a> {
    drug_id: &'a str,
    from: &'a str,
    to: &'a str,
    status: &'static str,
    inferred: bool,
    reason: &'static str,
}

/// Write a CSV row for every drug and every ordered pair of distinct regions
///
/// Returns the number of data rows written.
pub fn write_travel_matrix<W: Write>(
    library: &DrugLibrary,
    regions: &[Region],
    writer: W,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut count = 0;

    for drug in library.iter() {
        for from in regions {
            for to in regions.iter().filter(|to| *to != from) {
                let result = infer_status(drug, from, to);
                wtr.serialize(TravelRow {
                    drug_id: &drug.id,
                    from: from.as_str(),
                    to: to.as_str(),
                    status: result.status.as_str(),
                    inferred: result.inferred,
                    reason: result.reason.map(|r| r.code()).unwrap_or(""),
                })?;
                count += 1;
            }
        }
    }

    wtr.flush()?;
    tracing::info!("Wrote {} travel matrix rows", count);
    Ok(count)
}

/// Render a human-readable summary of a record in `locale`
pub fn render_drug_text(drug: &DrugRecord, locale: Locale) -> String {
    // Writing to a String cannot fail
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", drug.generic_name(locale), drug.id);
    let brands = drug.brand_names(locale);
    if !brands.is_empty() {
        let _ = writeln!(out, "  Brands: {}", brands.join(", "));
    }
    let _ = writeln!(out, "  Class: {}", drug.drug_class);
    let _ = writeln!(out, "  Category: {}", drug.category);
    let _ = writeln!(
        out,
        "  Controlled substance: {}",
        if drug.controlled_substance { "yes" } else { "no" }
    );
    if let Some(date) = drug.last_reviewed {
        let _ = writeln!(out, "  Last reviewed: {}", date.format("%Y-%m-%d"));
    }

    let description = drug.description(locale);
    if !description.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", description);
    }

    if !drug.approvals.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Approvals:");
        for approval in &drug.approvals {
            let mut line = format!(
                "  {:<3} {}",
                approval.region,
                if approval.available { "available" } else { "not available" }
            );
            if !approval.agency.is_empty() {
                let _ = write!(line, " ({}", approval.agency);
                if let Some(year) = approval.year {
                    let _ = write!(line, ", {}", year);
                }
                line.push(')');
            }
            if let Some(ref schedule) = approval.schedule {
                let _ = write!(line, " schedule {}", schedule);
            }
            let _ = writeln!(out, "{}", line);
        }
    }

    let side_effects = drug.side_effects(locale);
    if !side_effects.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Side effects:");
        for effect in side_effects {
            let _ = writeln!(out, "  - {}", effect);
        }
    }

    let rules = drug.cross_border_rules();
    let advice = drug.travel_advice(locale);
    if !rules.is_empty() || !advice.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Travel:");
        if !advice.is_empty() {
            let _ = writeln!(out, "  {}", advice);
        }
        for rule in rules {
            let _ = writeln!(
                out,
                "  {} -> {}: {}",
                rule.from_region, rule.to_region, rule.status
            );
            for requirement in rule.requirements(locale) {
                let _ = writeln!(out, "    * {}", requirement);
            }
        }
    }

    out
}
