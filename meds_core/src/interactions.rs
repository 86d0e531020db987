//! Interaction check over a requested set of drugs.
//!
//! Three curated sources feed each drug's result:
//! - the class table, when a class filter is supplied
//! - pairwise interactions authored on the record that mention another
//!   requested drug
//! - nutrient warnings whose scope covers the drug
//!
//! The summary counts `major` and `moderate` findings across all of
//! them. Unknown ids are skipped.

use crate::catalog::{get_reference_tables, ReferenceTables};
use crate::i18n::resolve_text;
use crate::{DrugClass, DrugLibrary, DrugRecord, Locale, RiskLevel, Severity};
use serde::Serialize;
use std::collections::HashSet;

/// Parameters of an interaction check
#[derive(Clone, Debug, Default)]
pub struct InteractionOptions {
    /// Drug class code or label to check against (e.g. `MAOI`)
    pub check_class: Option<String>,
    pub locale: Locale,
}

/// A curated class interaction affecting the drug
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassFinding {
    pub class_code: String,
    pub class_label: String,
    pub severity: Severity,
    pub effect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// An authored interaction naming another requested drug
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseFinding {
    pub with_drug: String,
    pub substance: String,
    pub severity: Severity,
    pub effect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// A nutrient warning that applies to the drug
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutrientWarning {
    pub nutrient: String,
    pub severity: Severity,
    pub effect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Everything found for one requested drug
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteractionResult {
    pub drug_id: String,
    pub generic_name: String,
    pub drug_class: DrugClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_interaction: Option<ClassFinding>,
    pub pairwise_interactions: Vec<PairwiseFinding>,
    pub nutrient_warnings: Vec<NutrientWarning>,
}

impl DrugInteractionResult {
    fn severities(&self) -> impl Iterator<Item = Severity> + '_ {
        self.class_interaction
            .iter()
            .map(|c| c.severity)
            .chain(self.pairwise_interactions.iter().map(|p| p.severity))
            .chain(self.nutrient_warnings.iter().map(|n| n.severity))
    }
}

/// Aggregate severity over every requested drug
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSummary {
    pub drugs_checked: usize,
    pub major_count: usize,
    pub moderate_count: usize,
    pub overall_risk: RiskLevel,
}

impl InteractionSummary {
    fn from_results(results: &[DrugInteractionResult]) -> Self {
        let (mut major_count, mut moderate_count) = (0, 0);
        for severity in results.iter().flat_map(|r| r.severities()) {
            match severity {
                Severity::Major => major_count += 1,
                Severity::Moderate => moderate_count += 1,
                Severity::Minor | Severity::Unknown => {}
            }
        }

        Self {
            drugs_checked: results.len(),
            major_count,
            moderate_count,
            overall_risk: overall_risk(major_count, moderate_count),
        }
    }
}

/// Threshold rule: any major finding is high, else any moderate is moderate
pub fn overall_risk(major_count: usize, moderate_count: usize) -> RiskLevel {
    if major_count > 0 {
        RiskLevel::High
    } else if moderate_count > 0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Result body of an interaction check
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReport {
    pub per_drug_results: Vec<DrugInteractionResult>,
    pub summary: InteractionSummary,
}

/// Check interactions using the built-in reference tables
pub fn check_interactions<S: AsRef<str>>(
    library: &DrugLibrary,
    drug_ids: &[S],
    options: &InteractionOptions,
) -> InteractionReport {
    check_interactions_with(get_reference_tables(), library, drug_ids, options)
}

/// Check interactions against explicit reference tables
pub fn check_interactions_with<S: AsRef<str>>(
    tables: &ReferenceTables,
    library: &DrugLibrary,
    drug_ids: &[S],
    options: &InteractionOptions,
) -> InteractionReport {
    let locale = options.locale;

    let mut seen = HashSet::new();
    let requested: Vec<&DrugRecord> = drug_ids
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| seen.insert(*id))
        .filter_map(|id| {
            let drug = library.get(id);
            if drug.is_none() {
                tracing::debug!(drug = id, "skipping unknown drug id");
            }
            drug
        })
        .collect();

    let class = options
        .check_class
        .as_deref()
        .and_then(|query| tables.find_class(query, locale));
    if let (Some(query), None) = (options.check_class.as_deref(), class) {
        tracing::debug!(class = query, "no curated interaction class matched");
    }

    let per_drug_results: Vec<DrugInteractionResult> = requested
        .iter()
        .map(|drug| {
            let class_interaction = class.filter(|c| c.affects(&drug.id)).map(|c| ClassFinding {
                class_code: c.code.clone(),
                class_label: c.label.resolve(locale).to_string(),
                severity: c.severity,
                effect: c.effect.resolve(locale).to_string(),
                recommendation: localized_option(c.recommendation.as_ref(), locale),
            });

            let nutrient_warnings = tables
                .nutrients
                .iter()
                .filter(|n| n.applies_to(drug))
                .map(|n| NutrientWarning {
                    nutrient: n.nutrient.resolve(locale).to_string(),
                    severity: n.severity,
                    effect: n.effect.resolve(locale).to_string(),
                    recommendation: localized_option(n.recommendation.as_ref(), locale),
                })
                .collect();

            DrugInteractionResult {
                drug_id: drug.id.clone(),
                generic_name: drug.generic_name(locale).to_string(),
                drug_class: drug.drug_class.clone(),
                class_interaction,
                pairwise_interactions: pairwise_findings(drug, &requested, locale),
                nutrient_warnings,
            }
        })
        .collect();

    let summary = InteractionSummary::from_results(&per_drug_results);
    tracing::debug!(
        drugs = summary.drugs_checked,
        major = summary.major_count,
        moderate = summary.moderate_count,
        risk = %summary.overall_risk,
        "interaction check complete"
    );

    InteractionReport {
        per_drug_results,
        summary,
    }
}

/// Authored interactions on `drug` whose substance text mentions another
/// requested drug id, with hyphens read as spaces
fn pairwise_findings(
    drug: &DrugRecord,
    requested: &[&DrugRecord],
    locale: Locale,
) -> Vec<PairwiseFinding> {
    let mut findings = Vec::new();

    for interaction in &drug.drug_interactions {
        let substance_en = interaction.substance.resolve(Locale::En).to_lowercase();

        for other in requested.iter().filter(|o| o.id != drug.id) {
            let needle = other.id.replace('-', " ");
            if substance_en.contains(&needle) {
                findings.push(PairwiseFinding {
                    with_drug: other.id.clone(),
                    substance: interaction.substance.resolve(locale).to_string(),
                    severity: interaction.severity,
                    effect: interaction.effect.resolve(locale).to_string(),
                    recommendation: localized_option(interaction.recommendation.as_ref(), locale),
                });
            }
        }
    }

    findings
}

fn localized_option(field: Option<&crate::LocalizedText>, locale: Locale) -> Option<String> {
    Some(resolve_text(field, locale))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrugInteraction, LocalizedText};

    fn stimulant(id: &str) -> DrugRecord {
        let mut drug = DrugRecord::new(id, DrugClass::Stimulant, id);
        drug.generic_name = Some(LocalizedText::from_pairs([
            (Locale::En, "Methylphenidate"),
            (Locale::Zh, "哌甲酯"),
        ]));
        drug
    }

    fn library() -> DrugLibrary {
        let mph = stimulant("methylphenidate");

        let mut guanfacine = DrugRecord::new("guanfacine", DrugClass::NonStimulant, "alpha-2-agonist");
        guanfacine.drug_interactions = vec![DrugInteraction {
            substance: LocalizedText::from("Methylphenidate and other stimulants"),
            severity: Severity::Moderate,
            effect: LocalizedText::from("Opposing effects on heart rate"),
            recommendation: None,
        }];

        let mut atx = DrugRecord::new("atomoxetine", DrugClass::NonStimulant, "snri");
        atx.drug_interactions = vec![DrugInteraction {
            substance: LocalizedText::from("Fluoxetine"),
            severity: Severity::Major,
            effect: LocalizedText::from("Raised atomoxetine levels"),
            recommendation: None,
        }];

        let mut lisdex = DrugRecord::new("lisdexamfetamine", DrugClass::Stimulant, "amphetamine");
        lisdex.drug_interactions = vec![DrugInteraction {
            substance: LocalizedText::from("Amphetamine mixed salts"),
            severity: Severity::Major,
            effect: LocalizedText::from("Duplicate therapy"),
            recommendation: Some(LocalizedText::from("Do not combine")),
        }];
        let salts = DrugRecord::new("amphetamine-mixed-salts", DrugClass::Stimulant, "amphetamine");

        DrugLibrary::from_records(vec![mph, guanfacine, atx, lisdex, salts]).unwrap()
    }

    fn options(class: Option<&str>) -> InteractionOptions {
        InteractionOptions {
            check_class: class.map(str::to_string),
            locale: Locale::En,
        }
    }

    #[test]
    fn test_maoi_with_methylphenidate_is_high_risk() {
        let report = check_interactions(&library(), &["methylphenidate"], &options(Some("MAOI")));

        let result = &report.per_drug_results[0];
        let class = result.class_interaction.as_ref().unwrap();
        assert_eq!(class.class_code, "MAOI");
        assert_eq!(class.severity, Severity::Major);
        assert!(report.summary.major_count >= 1);
        assert_eq!(report.summary.overall_risk, RiskLevel::High);
    }

    #[test]
    fn test_class_not_curated_for_drug_is_ignored() {
        let report = check_interactions(&library(), &["guanfacine"], &options(Some("maoi")));
        assert!(report.per_drug_results[0].class_interaction.is_none());
    }

    #[test]
    fn test_class_matched_by_label() {
        let report =
            check_interactions(&library(), &["guanfacine"], &options(Some("Blood Pressure")));
        let class = report.per_drug_results[0].class_interaction.as_ref().unwrap();
        assert_eq!(class.class_code, "ANTIHYPERTENSIVE");
    }

    #[test]
    fn test_pairwise_requires_other_drug_requested() {
        let alone = check_interactions(&library(), &["guanfacine"], &options(None));
        assert!(alone.per_drug_results[0].pairwise_interactions.is_empty());

        let both = check_interactions(
            &library(),
            &["guanfacine", "methylphenidate"],
            &options(None),
        );
        let pairs = &both.per_drug_results[0].pairwise_interactions;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].with_drug, "methylphenidate");
        assert_eq!(pairs[0].severity, Severity::Moderate);
    }

    #[test]
    fn test_pairwise_reads_hyphens_as_spaces() {
        let report = check_interactions(
            &library(),
            &["lisdexamfetamine", "amphetamine-mixed-salts"],
            &options(None),
        );
        let pairs = &report.per_drug_results[0].pairwise_interactions;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].with_drug, "amphetamine-mixed-salts");
        assert_eq!(pairs[0].recommendation.as_deref(), Some("Do not combine"));
        assert_eq!(report.summary.overall_risk, RiskLevel::High);
    }

    #[test]
    fn test_nutrient_warnings_follow_scope() {
        let report = check_interactions(
            &library(),
            &["methylphenidate", "guanfacine"],
            &options(None),
        );

        let nutrients = |i: usize| -> Vec<&str> {
            report.per_drug_results[i]
                .nutrient_warnings
                .iter()
                .map(|n| n.nutrient.as_str())
                .collect()
        };
        assert_eq!(nutrients(0), vec!["Vitamin C", "Caffeine", "Alcohol"]);
        assert_eq!(nutrients(1), vec!["Grapefruit", "Alcohol"]);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let report = check_interactions(
            &library(),
            &["not-a-drug", "methylphenidate", "methylphenidate"],
            &options(None),
        );
        assert_eq!(report.summary.drugs_checked, 1);
        assert_eq!(report.per_drug_results[0].drug_id, "methylphenidate");

        let empty = check_interactions(&library(), &["nope"], &options(Some("MAOI")));
        assert!(empty.per_drug_results.is_empty());
        assert_eq!(empty.summary.overall_risk, RiskLevel::Low);
    }

    #[test]
    fn test_results_are_localized() {
        let opts = InteractionOptions {
            check_class: Some("MAOI".into()),
            locale: Locale::ZhTw,
        };
        let report = check_interactions(&library(), &["methylphenidate"], &opts);
        let result = &report.per_drug_results[0];
        assert_eq!(result.generic_name, "哌甲酯");
        assert_eq!(
            result.class_interaction.as_ref().unwrap().class_label,
            "單胺氧化酶抑制劑（抗憂鬱藥）"
        );
    }

    #[test]
    fn test_overall_risk_precedence() {
        assert_eq!(overall_risk(0, 0), RiskLevel::Low);
        assert_eq!(overall_risk(0, 3), RiskLevel::Moderate);
        assert_eq!(overall_risk(1, 0), RiskLevel::High);
        assert_eq!(overall_risk(1, 10), RiskLevel::High);
    }

    #[test]
    fn test_adding_major_never_lowers_risk() {
        for major in 0..3 {
            for moderate in 0..3 {
                let before = overall_risk(major, moderate);
                let after = overall_risk(major + 1, moderate);
                assert!(after >= before);
                assert_eq!(after, RiskLevel::High);
            }
        }
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = check_interactions(&library(), &["methylphenidate"], &options(Some("MAOI")));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["perDrugResults"].is_array());
        assert_eq!(json["summary"]["overallRisk"], "high");
        assert_eq!(json["perDrugResults"][0]["classInteraction"]["severity"], "major");
    }
}
