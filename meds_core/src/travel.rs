//! Cross-border travel status for a medication.
//!
//! An authored [`CrossBorderRule`] always wins. Without one, the status
//! is inferred from a fixed precedence chain where the first match wins:
//!
//! 1. **Explicit rule** for the exact (from, to) pair
//! 2. **Amphetamine overrides**: prohibited into CN, permit required into JP
//! 3. **Controlled substances**: restricted, with the reason depending on
//!    whether the destination has an available approval
//! 4. **Default**: allowed
//!
//! Unknown region codes are not rejected; they simply match nothing and
//! fall through to the default.

use crate::{CrossBorderRule, DrugRecord, Locale, Region, TravelStatus};
use serde::{Deserialize, Serialize};

const AMPHETAMINE_CATEGORY: &str = "amphetamine";

/// Why an inferred status was chosen
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TravelReason {
    AmphetamineProhibitedCn,
    AmphetamineRequiresPermitJp,
    ControlledNotApproved,
    ControlledSubstance,
    NonControlled,
}

impl TravelReason {
    pub const ALL: [TravelReason; 5] = [
        TravelReason::AmphetamineProhibitedCn,
        TravelReason::AmphetamineRequiresPermitJp,
        TravelReason::ControlledNotApproved,
        TravelReason::ControlledSubstance,
        TravelReason::NonControlled,
    ];

    /// Stable reason code for presentation layers
    pub fn code(self) -> &'static str {
        match self {
            TravelReason::AmphetamineProhibitedCn => "amphetamine_prohibited_cn",
            TravelReason::AmphetamineRequiresPermitJp => "amphetamine_requires_permit_jp",
            TravelReason::ControlledNotApproved => "controlled_not_approved",
            TravelReason::ControlledSubstance => "controlled_substance",
            TravelReason::NonControlled => "non_controlled",
        }
    }

    /// Human explanation of the reason in `locale`
    pub fn explanation(self, locale: Locale) -> &'static str {
        use Locale::*;
        use TravelReason::*;

        match (self, locale) {
            (AmphetamineProhibitedCn, En) => {
                "Amphetamine-class medications are prohibited in mainland China, even with a prescription."
            }
            (AmphetamineProhibitedCn, Zh) => "苯丙胺类药物在中国大陆被禁止，即使持有处方也不能携带。",
            (AmphetamineProhibitedCn, ZhTw) => "苯丙胺類藥物在中國大陸被禁止，即使持有處方也不能攜帶。",
            (AmphetamineProhibitedCn, Ja) => {
                "アンフェタミン系の薬は、処方箋があっても中国本土への持ち込みが禁止されています。"
            }

            (AmphetamineRequiresPermitJp, En) => {
                "Amphetamine-class medications require an import permit before entering Japan."
            }
            (AmphetamineRequiresPermitJp, Zh) => "苯丙胺类药物入境日本前需要取得进口许可。",
            (AmphetamineRequiresPermitJp, ZhTw) => "苯丙胺類藥物入境日本前需要取得進口許可。",
            (AmphetamineRequiresPermitJp, Ja) => {
                "アンフェタミン系の薬を日本に持ち込むには事前の輸入許可が必要です。"
            }

            (ControlledNotApproved, En) => {
                "This controlled substance is not approved in the destination; carriage is likely restricted."
            }
            (ControlledNotApproved, Zh) => "该管制药物未在目的地获批，携带可能受到限制。",
            (ControlledNotApproved, ZhTw) => "該管制藥物未在目的地獲准，攜帶可能受到限制。",
            (ControlledNotApproved, Ja) => {
                "この規制薬物は渡航先で承認されていないため、持ち込みが制限される可能性があります。"
            }

            (ControlledSubstance, En) => {
                "This is a controlled substance; carry a prescription and check quantity limits."
            }
            (ControlledSubstance, Zh) => "这是管制药物，请携带处方并确认数量限制。",
            (ControlledSubstance, ZhTw) => "這是管制藥物，請攜帶處方並確認數量限制。",
            (ControlledSubstance, Ja) => "規制薬物です。処方箋を携帯し、数量制限を確認してください。",

            (NonControlled, En) => "This medication is not a controlled substance.",
            (NonControlled, Zh) => "该药物不属于管制药物。",
            (NonControlled, ZhTw) => "該藥物不屬於管制藥物。",
            (NonControlled, Ja) => "この薬は規制薬物ではありません。",
        }
    }
}

impl std::fmt::Display for TravelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Travel status for one (drug, from, to) query
///
/// `inferred` is false iff an authored rule matched, in which case
/// `reason` is `None`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InferredTravelStatus {
    pub status: TravelStatus,
    pub inferred: bool,
    pub reason: Option<TravelReason>,
}

impl InferredTravelStatus {
    fn explicit(status: TravelStatus) -> Self {
        Self {
            status,
            inferred: false,
            reason: None,
        }
    }

    fn derived(status: TravelStatus, reason: TravelReason) -> Self {
        Self {
            status,
            inferred: true,
            reason: Some(reason),
        }
    }
}

/// Find the authored rule for an exact (from, to) pair
///
/// Scans in authored order and returns the first match, so duplicate
/// rules resolve to the earliest entry.
pub fn find_rule<'a>(
    drug: &'a DrugRecord,
    from: &Region,
    to: &Region,
) -> Option<&'a CrossBorderRule> {
    drug.cross_border_rules()
        .iter()
        .find(|rule| &rule.from_region == from && &rule.to_region == to)
}

/// Determine the travel status of carrying `drug` from `from` to `to`
pub fn infer_status(drug: &DrugRecord, from: &Region, to: &Region) -> InferredTravelStatus {
    // Rule 1: Authored rule
    if let Some(rule) = find_rule(drug, from, to) {
        tracing::debug!(drug = %drug.id, %from, %to, "explicit cross-border rule matched");
        return InferredTravelStatus::explicit(rule.status);
    }

    // Rule 2: Amphetamine destination overrides
    if drug.category == AMPHETAMINE_CATEGORY {
        if to == "CN" {
            tracing::debug!(drug = %drug.id, %to, "amphetamine override: prohibited");
            return InferredTravelStatus::derived(
                TravelStatus::Prohibited,
                TravelReason::AmphetamineProhibitedCn,
            );
        } else if to == "JP" {
            tracing::debug!(drug = %drug.id, %to, "amphetamine override: permit required");
            return InferredTravelStatus::derived(
                TravelStatus::RequiresPermit,
                TravelReason::AmphetamineRequiresPermitJp,
            );
        }
    }

    // Rule 3: Controlled substances
    if drug.controlled_substance {
        let reason = if drug.is_available_in(to) {
            TravelReason::ControlledSubstance
        } else {
            TravelReason::ControlledNotApproved
        };
        tracing::debug!(drug = %drug.id, %to, reason = reason.code(), "controlled substance rule");
        return InferredTravelStatus::derived(TravelStatus::Restricted, reason);
    }

    // Rule 4: Default
    InferredTravelStatus::derived(TravelStatus::Allowed, TravelReason::NonControlled)
}
