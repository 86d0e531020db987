//! Core domain types shared across the medication reference.
//!
//! This module defines the small closed vocabularies the rest of the
//! crate is written against:
//! - Display locales
//! - Region codes
//! - Drug classes
//! - Travel statuses, interaction severities and risk levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Locale
// ============================================================================

/// A display language for localized fields
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    /// Simplified Chinese
    #[serde(rename = "zh")]
    Zh,
    /// Traditional Chinese
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "ja")]
    Ja,
}

impl Locale {
    /// Every supported locale, in fallback scan order
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Zh, Locale::ZhTw, Locale::Ja];

    /// The locale used when the requested one has no text
    pub const DEFAULT: Locale = Locale::En;

    /// Key used for this locale in localized maps
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::ZhTw => "zh-TW",
            Locale::Ja => "ja",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" => Ok(Locale::En),
            "zh" | "zh-cn" | "zh-hans" => Ok(Locale::Zh),
            "zh-tw" | "zh-hant" => Ok(Locale::ZhTw),
            "ja" => Ok(Locale::Ja),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// A jurisdiction code such as `US` or `EU`
///
/// Regions compare by exact string equality. The registry is only used
/// for data-quality reporting; unknown codes are carried as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// The fixed set of region codes the corpus is authored against
    pub const REGISTRY: [&'static str; 7] = ["US", "CA", "UK", "EU", "JP", "CN", "AU"];

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this code appears in [`Region::REGISTRY`]
    pub fn is_registered(&self) -> bool {
        Self::REGISTRY.contains(&self.0.as_str())
    }

    /// All registered regions as owned values
    pub fn registry() -> Vec<Region> {
        Self::REGISTRY.iter().map(|c| Region::new(*c)).collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Region {
    fn from(code: &str) -> Self {
        Region::new(code)
    }
}

impl PartialEq<str> for Region {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Region {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Drug Class
// ============================================================================

/// Pharmacological class of a medication
///
/// Values outside the known pair are preserved in `Other` rather than
/// rejected, so partially migrated records still load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DrugClass {
    Stimulant,
    NonStimulant,
    Other(String),
}

impl DrugClass {
    pub fn as_str(&self) -> &str {
        match self {
            DrugClass::Stimulant => "stimulant",
            DrugClass::NonStimulant => "non-stimulant",
            DrugClass::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DrugClass::Other(_))
    }
}

impl From<String> for DrugClass {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "stimulant" => DrugClass::Stimulant,
            "non-stimulant" => DrugClass::NonStimulant,
            _ => DrugClass::Other(raw),
        }
    }
}

impl From<&str> for DrugClass {
    fn from(raw: &str) -> Self {
        DrugClass::from(raw.to_string())
    }
}

impl From<DrugClass> for String {
    fn from(class: DrugClass) -> Self {
        match class {
            DrugClass::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DrugClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Travel and Interaction Vocabularies
// ============================================================================

/// Legality of carrying a medication across a border
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TravelStatus {
    Allowed,
    Restricted,
    Prohibited,
    RequiresPermit,
}

impl TravelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelStatus::Allowed => "allowed",
            TravelStatus::Restricted => "restricted",
            TravelStatus::Prohibited => "prohibited",
            TravelStatus::RequiresPermit => "requires_permit",
        }
    }
}

impl fmt::Display for TravelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a curated interaction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Major,
    Moderate,
    Minor,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Major => "major",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk of a requested drug set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
