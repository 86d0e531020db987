//! Read-only snapshot of every loaded drug record.
//!
//! A [`DrugLibrary`] is built once and then shared behind an `Arc`, so
//! clones are cheap and any number of threads may query it concurrently.

use crate::{DrugClass, DrugRecord, Error, Region, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug)]
struct Snapshot {
    drugs: Vec<DrugRecord>,
    index: HashMap<String, usize>,
}

/// Immutable collection of drug records keyed by id
#[derive(Clone, Debug)]
pub struct DrugLibrary {
    inner: Arc<Snapshot>,
}

impl DrugLibrary {
    /// Build a library, rejecting repeated ids
    pub fn from_records(drugs: Vec<DrugRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(drugs.len());
        for (pos, drug) in drugs.iter().enumerate() {
            if index.insert(drug.id.clone(), pos).is_some() {
                return Err(Error::DuplicateDrugId(drug.id.clone()));
            }
        }

        Ok(Self {
            inner: Arc::new(Snapshot { drugs, index }),
        })
    }

    pub fn get(&self, id: &str) -> Option<&DrugRecord> {
        self.inner.index.get(id).map(|&pos| &self.inner.drugs[pos])
    }

    /// Records in load order
    pub fn iter(&self) -> impl Iterator<Item = &DrugRecord> {
        self.inner.drugs.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.drugs.is_empty()
    }

    /// Records matching every predicate of `query`, in load order
    pub fn filter<'a>(&'a self, query: &'a DrugQuery) -> impl Iterator<Item = &'a DrugRecord> + 'a {
        self.iter().filter(move |d| query.matches(d))
    }

    /// Report data-quality problems in the loaded corpus
    ///
    /// Returns a list of problems, or empty Vec if the corpus is clean.
    /// Findings here never change lookup or inference behaviour.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for drug in self.iter() {
            let id = &drug.id;
            if id.is_empty() {
                errors.push("Drug record has empty id".to_string());
            } else if !is_slug(id) {
                errors.push(format!("Drug id '{}' is not lowercase-hyphenated", id));
            }
            if !drug.drug_class.is_recognized() {
                errors.push(format!(
                    "Drug '{}' has unrecognized drug class '{}'",
                    id, drug.drug_class
                ));
            }
            if drug.category.is_empty() {
                errors.push(format!("Drug '{}' has empty category", id));
            }

            for approval in &drug.approvals {
                if !approval.region.is_registered() {
                    errors.push(format!(
                        "Drug '{}': approval references unknown region '{}'",
                        id, approval.region
                    ));
                }
            }

            let mut pairs = HashSet::new();
            for rule in drug.cross_border_rules() {
                for region in [&rule.from_region, &rule.to_region] {
                    if !region.is_registered() {
                        errors.push(format!(
                            "Drug '{}': cross-border rule references unknown region '{}'",
                            id, region
                        ));
                    }
                }
                if !pairs.insert((&rule.from_region, &rule.to_region)) {
                    errors.push(format!(
                        "Drug '{}': duplicate cross-border rule {} -> {}",
                        id, rule.from_region, rule.to_region
                    ));
                }
            }
        }

        errors
    }
}

fn is_slug(id: &str) -> bool {
    !id.starts_with('-')
        && !id.ends_with('-')
        && !id.contains("--")
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Exact-match list filters over record fields
#[derive(Clone, Debug, Default)]
pub struct DrugQuery {
    pub drug_class: Option<DrugClass>,
    pub category: Option<String>,
    /// Only records with an available approval in this region
    pub available_in: Option<Region>,
}

impl DrugQuery {
    pub fn matches(&self, drug: &DrugRecord) -> bool {
        self.drug_class
            .as_ref()
            .map_or(true, |class| &drug.drug_class == class)
            && self
                .category
                .as_ref()
                .map_or(true, |category| &drug.category == category)
            && self
                .available_in
                .as_ref()
                .map_or(true, |region| drug.is_available_in(region))
    }
}
