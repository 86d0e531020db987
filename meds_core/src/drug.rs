//! The in-memory shape of one medication entry.
//!
//! A [`DrugRecord`] is deserialized once from a single YAML document and
//! never modified afterwards. Fields the travel and interaction logic
//! reads are strongly typed; `metadata` is the one open-ended section.

use crate::i18n::{resolve_list, resolve_text, LocalizedList, LocalizedText};
use crate::{DrugClass, Locale, Region, Severity, TravelStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Regulatory Facts
// ============================================================================

/// Marketing approval of a drug in one region
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub region: Region,
    pub available: bool,
    #[serde(default)]
    pub agency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Controlled-substance schedule in this region (e.g. "CII")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// Authored carriage rule for one origin/destination pair
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrossBorderRule {
    pub from_region: Region,
    pub to_region: Region,
    pub status: TravelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<LocalizedList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<LocalizedList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supply_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl CrossBorderRule {
    pub fn new(from: impl Into<Region>, to: impl Into<Region>, status: TravelStatus) -> Self {
        Self {
            from_region: from.into(),
            to_region: to.into(),
            status,
            documentation: None,
            requirements: None,
            max_supply_days: None,
            sources: Vec::new(),
        }
    }

    pub fn documentation(&self, locale: Locale) -> &[String] {
        resolve_list(self.documentation.as_ref(), locale)
    }

    pub fn requirements(&self, locale: Locale) -> &[String] {
        resolve_list(self.requirements.as_ref(), locale)
    }
}

/// Optional travel section of a record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TravelRules {
    #[serde(default)]
    pub cross_border_rules: Vec<CrossBorderRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_advice: Option<LocalizedText>,
}

// ============================================================================
// Curated Interactions
// ============================================================================

/// A curated drug-drug interaction authored on a record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteraction {
    pub substance: LocalizedText,
    #[serde(default)]
    pub severity: Severity,
    pub effect: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<LocalizedText>,
}

/// Identifiers written by the offline enrichment tooling
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rxcui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openfda_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_trials_query: Option<String>,
}

// ============================================================================
// Drug Record
// ============================================================================

/// One medication entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_names: Option<LocalizedList>,
    pub drug_class: DrugClass,
    pub category: String,
    /// Absent is treated as `false`
    #[serde(default)]
    pub controlled_substance: bool,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_rules: Option<TravelRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<LocalizedList>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drug_interactions: Vec<DrugInteraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<ExternalIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl DrugRecord {
    /// Create a record with only the fields the inference logic needs
    pub fn new(id: impl Into<String>, drug_class: DrugClass, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            generic_name: None,
            brand_names: None,
            drug_class,
            category: category.into(),
            controlled_substance: false,
            approvals: Vec::new(),
            travel_rules: None,
            description: None,
            side_effects: None,
            drug_interactions: Vec::new(),
            external_ids: None,
            last_reviewed: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Generic name in `locale`, falling back to the id when unnamed
    pub fn generic_name(&self, locale: Locale) -> &str {
        match resolve_text(self.generic_name.as_ref(), locale) {
            "" => &self.id,
            name => name,
        }
    }

    pub fn brand_names(&self, locale: Locale) -> &[String] {
        resolve_list(self.brand_names.as_ref(), locale)
    }

    pub fn description(&self, locale: Locale) -> &str {
        resolve_text(self.description.as_ref(), locale)
    }

    pub fn side_effects(&self, locale: Locale) -> &[String] {
        resolve_list(self.side_effects.as_ref(), locale)
    }

    /// Authored cross-border rules, empty when the record has none
    pub fn cross_border_rules(&self) -> &[CrossBorderRule] {
        self.travel_rules
            .as_ref()
            .map(|t| t.cross_border_rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn travel_advice(&self, locale: Locale) -> &str {
        resolve_text(
            self.travel_rules.as_ref().and_then(|t| t.general_advice.as_ref()),
            locale,
        )
    }

    /// First approval entry for `region`, if any
    pub fn approval_in(&self, region: &Region) -> Option<&Approval> {
        self.approvals.iter().find(|a| &a.region == region)
    }

    /// True iff some approval for `region` is marked available
    pub fn is_available_in(&self, region: &Region) -> bool {
        self.approvals
            .iter()
            .any(|a| &a.region == region && a.available)
    }

    pub fn is_stimulant(&self) -> bool {
        self.drug_class == DrugClass::Stimulant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
id: atomoxetine
drugClass: non-stimulant
category: norepinephrine-reuptake-inhibitor
"#;

    const FULL: &str = r#"
id: methylphenidate
genericName:
  en: Methylphenidate
  zh: 哌甲酯
  ja: メチルフェニデート
brandNames:
  en: [Ritalin, Concerta]
drugClass: stimulant
category: methylphenidate
controlledSubstance: true
approvals:
  - region: US
    available: true
    agency: FDA
    year: 1955
    schedule: CII
  - region: JP
    available: false
    agency: PMDA
travelRules:
  generalAdvice: Carry the original prescription.
  crossBorderRules:
    - fromRegion: US
      toRegion: JP
      status: requires_permit
      requirements:
        en: [Yakkan Shoumei]
      maxSupplyDays: 30
      sources: ["https://www.mhlw.go.jp/"]
drugInteractions:
  - substance: MAO inhibitors
    severity: major
    effect:
      en: Hypertensive crisis
lastReviewed: 2024-03-01
metadata:
  pubchemCid: 4158
"#;

    #[test]
    fn test_minimal_record_defaults() {
        let drug: DrugRecord = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(drug.drug_class, DrugClass::NonStimulant);
        assert!(!drug.controlled_substance);
        assert!(drug.approvals.is_empty());
        assert!(drug.cross_border_rules().is_empty());
        assert_eq!(drug.generic_name(Locale::En), "atomoxetine");
        assert_eq!(drug.description(Locale::Ja), "");
        assert!(drug.side_effects(Locale::Zh).is_empty());
    }

    #[test]
    fn test_full_record_accessors() {
        let drug: DrugRecord = serde_yaml::from_str(FULL).unwrap();

        assert_eq!(drug.generic_name(Locale::ZhTw), "哌甲酯");
        assert_eq!(drug.brand_names(Locale::Ja), &["Ritalin", "Concerta"]);
        assert!(drug.controlled_substance);
        assert!(drug.is_stimulant());

        assert!(drug.is_available_in(&Region::new("US")));
        assert!(!drug.is_available_in(&Region::new("JP")));
        assert!(!drug.is_available_in(&Region::new("CN")));
        assert_eq!(
            drug.approval_in(&Region::new("US")).and_then(|a| a.schedule.as_deref()),
            Some("CII")
        );

        let rules = drug.cross_border_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].status, TravelStatus::RequiresPermit);
        assert_eq!(rules[0].requirements(Locale::Zh), &["Yakkan Shoumei"]);
        assert_eq!(rules[0].max_supply_days, Some(30));
        assert_eq!(drug.travel_advice(Locale::Ja), "Carry the original prescription.");

        assert_eq!(drug.drug_interactions[0].severity, Severity::Major);
        assert_eq!(drug.last_reviewed, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(drug.metadata["pubchemCid"], serde_json::json!(4158));
    }

    #[test]
    fn test_unrecognized_class_is_preserved() {
        let yaml = MINIMAL.replace("non-stimulant", "alpha-2-agonist");
        let drug: DrugRecord = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(drug.drug_class, DrugClass::Other("alpha-2-agonist".into()));
    }
}
