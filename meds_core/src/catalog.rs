//! Curated interaction reference tables.
//!
//! This module provides the built-in drug-class and nutrient interaction
//! tables consulted by the interaction aggregator. They are reference
//! data, independent of any loaded record.

use crate::i18n::LocalizedText;
use crate::{DrugClass, DrugRecord, Locale, Severity};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// An interacting drug class and the record ids it is curated against
#[derive(Clone, Debug)]
pub struct ClassInteraction {
    /// Lookup key, matched case-insensitively (e.g. `MAOI`)
    pub code: String,
    pub label: LocalizedText,
    pub severity: Severity,
    pub effect: LocalizedText,
    pub recommendation: Option<LocalizedText>,
    pub drug_ids: Vec<String>,
}

impl ClassInteraction {
    pub fn affects(&self, drug_id: &str) -> bool {
        self.drug_ids.iter().any(|id| id == drug_id)
    }
}

/// Which records a nutrient warning applies to
#[derive(Clone, Debug, PartialEq)]
pub enum NutrientScope {
    AllDrugs,
    DrugClass(DrugClass),
    DrugId(String),
}

/// A curated drug-nutrient interaction
#[derive(Clone, Debug)]
pub struct NutrientInteraction {
    pub nutrient: LocalizedText,
    pub severity: Severity,
    pub effect: LocalizedText,
    pub recommendation: Option<LocalizedText>,
    pub scope: NutrientScope,
}

impl NutrientInteraction {
    pub fn applies_to(&self, drug: &DrugRecord) -> bool {
        match &self.scope {
            NutrientScope::AllDrugs => true,
            NutrientScope::DrugClass(class) => &drug.drug_class == class,
            NutrientScope::DrugId(id) => &drug.id == id,
        }
    }
}

/// The complete set of curated interaction tables
#[derive(Clone, Debug)]
pub struct ReferenceTables {
    pub classes: Vec<ClassInteraction>,
    pub nutrients: Vec<NutrientInteraction>,
}

/// Cached default tables - built once and shared read-only
static DEFAULT_TABLES: Lazy<ReferenceTables> = Lazy::new(build_reference_tables);

/// Get a reference to the cached default tables
pub fn get_reference_tables() -> &'static ReferenceTables {
    &DEFAULT_TABLES
}

const STIMULANTS: [&str; 5] = [
    "methylphenidate",
    "dexmethylphenidate",
    "amphetamine-mixed-salts",
    "dextroamphetamine",
    "lisdexamfetamine",
];

const AMPHETAMINES: [&str; 3] = [
    "amphetamine-mixed-salts",
    "dextroamphetamine",
    "lisdexamfetamine",
];

fn ids(groups: &[&[&str]]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|g| g.iter())
        .map(|s| s.to_string())
        .collect()
}

fn text(en: &str, zh: &str, zh_tw: &str, ja: &str) -> LocalizedText {
    LocalizedText::from_pairs([
        (Locale::En, en),
        (Locale::Zh, zh),
        (Locale::ZhTw, zh_tw),
        (Locale::Ja, ja),
    ])
}

/// Builds the curated interaction tables
///
/// **Note**: prefer `get_reference_tables()` outside of tests.
pub fn build_reference_tables() -> ReferenceTables {
    // ========================================================================
    // Drug Classes
    // ========================================================================

    let classes = vec![
        ClassInteraction {
            code: "MAOI".into(),
            label: text(
                "Monoamine oxidase inhibitors (antidepressants)",
                "单胺氧化酶抑制剂（抗抑郁药）",
                "單胺氧化酶抑制劑（抗憂鬱藥）",
                "モノアミン酸化酵素阻害薬（抗うつ薬）",
            ),
            severity: Severity::Major,
            effect: text(
                "Risk of hypertensive crisis.",
                "有发生高血压危象的风险。",
                "有發生高血壓危象的風險。",
                "高血圧クリーゼのリスクがあります。",
            ),
            recommendation: Some(text(
                "Do not combine; allow 14 days after stopping an MAOI.",
                "禁止合用；停用单胺氧化酶抑制剂后需间隔14天。",
                "禁止併用；停用單胺氧化酶抑制劑後需間隔14天。",
                "併用禁忌です。MAO阻害薬の中止後14日間は空けてください。",
            )),
            drug_ids: ids(&[&STIMULANTS, &["atomoxetine", "viloxazine"]]),
        },
        ClassInteraction {
            code: "SSRI".into(),
            label: text(
                "Selective serotonin reuptake inhibitors (antidepressants)",
                "选择性5-羟色胺再摄取抑制剂（抗抑郁药）",
                "選擇性血清素再回收抑制劑（抗憂鬱藥）",
                "選択的セロトニン再取り込み阻害薬（抗うつ薬）",
            ),
            severity: Severity::Moderate,
            effect: text(
                "Increased serotonergic effects or raised atomoxetine levels.",
                "血清素能作用增强或托莫西汀血药浓度升高。",
                "血清素作用增強或托莫西汀血中濃度升高。",
                "セロトニン作用の増強、またはアトモキセチン濃度の上昇。",
            ),
            recommendation: Some(text(
                "Monitor for serotonin syndrome and adjust dose.",
                "监测血清素综合征并调整剂量。",
                "監測血清素症候群並調整劑量。",
                "セロトニン症候群に注意し、用量を調整してください。",
            )),
            drug_ids: ids(&[&AMPHETAMINES, &["atomoxetine"]]),
        },
        ClassInteraction {
            code: "CYP2D6".into(),
            label: text(
                "Strong CYP2D6 inhibitors",
                "强效CYP2D6抑制剂",
                "強效CYP2D6抑制劑",
                "強いCYP2D6阻害薬",
            ),
            severity: Severity::Moderate,
            effect: text(
                "Atomoxetine exposure increases several-fold.",
                "托莫西汀暴露量成倍增加。",
                "托莫西汀暴露量成倍增加。",
                "アトモキセチンの曝露量が数倍に増加します。",
            ),
            recommendation: None,
            drug_ids: ids(&[&["atomoxetine"]]),
        },
        ClassInteraction {
            code: "CYP1A2".into(),
            label: text(
                "Sensitive CYP1A2 substrates",
                "敏感的CYP1A2底物",
                "敏感的CYP1A2受質",
                "CYP1A2の感受性基質",
            ),
            severity: Severity::Major,
            effect: text(
                "Viloxazine raises substrate levels (e.g. tizanidine, theophylline).",
                "维洛沙秦会升高底物浓度（如替扎尼定、茶碱）。",
                "維洛沙秦會升高受質濃度（如替扎尼定、茶鹼）。",
                "ビロキサジンが基質濃度を上昇させます（チザニジン、テオフィリンなど）。",
            ),
            recommendation: None,
            drug_ids: ids(&[&["viloxazine"]]),
        },
        ClassInteraction {
            code: "ANTIHYPERTENSIVE".into(),
            label: text(
                "Antihypertensives (blood pressure medications)",
                "降压药",
                "降血壓藥",
                "降圧薬",
            ),
            severity: Severity::Moderate,
            effect: text(
                "Blood pressure effects may be reduced or additive.",
                "降压效果可能减弱或叠加。",
                "降壓效果可能減弱或疊加。",
                "降圧作用が減弱または増強する可能性があります。",
            ),
            recommendation: Some(text(
                "Monitor blood pressure.",
                "监测血压。",
                "監測血壓。",
                "血圧を監視してください。",
            )),
            drug_ids: ids(&[&STIMULANTS, &["guanfacine", "clonidine"]]),
        },
        ClassInteraction {
            code: "ANTIPSYCHOTIC".into(),
            label: text(
                "Antipsychotics (dopamine antagonists)",
                "抗精神病药",
                "抗精神病藥",
                "抗精神病薬",
            ),
            severity: Severity::Moderate,
            effect: text(
                "Opposing dopaminergic effects may reduce efficacy of both.",
                "多巴胺作用相互拮抗，可能降低两者疗效。",
                "多巴胺作用相互拮抗，可能降低兩者療效。",
                "ドパミン作用が拮抗し、双方の効果が低下する可能性があります。",
            ),
            recommendation: None,
            drug_ids: ids(&[&STIMULANTS]),
        },
        ClassInteraction {
            code: "ALKALINIZER".into(),
            label: text(
                "Antacids and urinary alkalinizers",
                "抗酸药和尿液碱化剂",
                "制酸劑和尿液鹼化劑",
                "制酸薬・尿アルカリ化薬",
            ),
            severity: Severity::Minor,
            effect: text(
                "Increased amphetamine absorption and prolonged effect.",
                "苯丙胺吸收增加，作用时间延长。",
                "苯丙胺吸收增加，作用時間延長。",
                "アンフェタミンの吸収が増加し、作用が延長します。",
            ),
            recommendation: None,
            drug_ids: ids(&[&AMPHETAMINES]),
        },
    ];

    // ========================================================================
    // Nutrients
    // ========================================================================

    let nutrients = vec![
        NutrientInteraction {
            nutrient: text("Vitamin C", "维生素C", "維生素C", "ビタミンC"),
            severity: Severity::Minor,
            effect: text(
                "Acidic supplements can reduce stimulant absorption.",
                "酸性补充剂可能降低兴奋剂吸收。",
                "酸性補充劑可能降低興奮劑吸收。",
                "酸性のサプリメントは刺激薬の吸収を低下させることがあります。",
            ),
            recommendation: Some(text(
                "Separate doses by at least one hour.",
                "服药间隔至少一小时。",
                "服藥間隔至少一小時。",
                "服用を1時間以上空けてください。",
            )),
            scope: NutrientScope::DrugClass(DrugClass::Stimulant),
        },
        NutrientInteraction {
            nutrient: text("Caffeine", "咖啡因", "咖啡因", "カフェイン"),
            severity: Severity::Moderate,
            effect: text(
                "Additive stimulation: jitteriness, insomnia, raised heart rate.",
                "兴奋作用叠加：紧张不安、失眠、心率加快。",
                "興奮作用疊加：緊張不安、失眠、心跳加快。",
                "刺激作用が重なり、不安感、不眠、心拍数増加が起こります。",
            ),
            recommendation: None,
            scope: NutrientScope::DrugClass(DrugClass::Stimulant),
        },
        NutrientInteraction {
            nutrient: text("Grapefruit", "西柚", "葡萄柚", "グレープフルーツ"),
            severity: Severity::Moderate,
            effect: text(
                "CYP3A4 inhibition raises guanfacine levels.",
                "抑制CYP3A4，使胍法辛血药浓度升高。",
                "抑制CYP3A4，使胍法辛血中濃度升高。",
                "CYP3A4阻害によりグアンファシン濃度が上昇します。",
            ),
            recommendation: Some(text(
                "Avoid grapefruit juice.",
                "避免饮用西柚汁。",
                "避免飲用葡萄柚汁。",
                "グレープフルーツジュースは避けてください。",
            )),
            scope: NutrientScope::DrugId("guanfacine".into()),
        },
        NutrientInteraction {
            nutrient: text("Alcohol", "酒精", "酒精", "アルコール"),
            severity: Severity::Moderate,
            effect: text(
                "May worsen side effects and impair judgment.",
                "可能加重副作用并影响判断力。",
                "可能加重副作用並影響判斷力。",
                "副作用を悪化させ、判断力を低下させる可能性があります。",
            ),
            recommendation: Some(text(
                "Avoid or limit alcohol.",
                "避免或限制饮酒。",
                "避免或限制飲酒。",
                "飲酒は避けるか控えてください。",
            )),
            scope: NutrientScope::AllDrugs,
        },
    ];

    ReferenceTables { classes, nutrients }
}

impl ReferenceTables {
    /// Look up a class by code, falling back to a label match
    ///
    /// Codes compare case-insensitively. If no code matches, the query is
    /// searched for inside each class label (English and `locale`).
    pub fn find_class(&self, query: &str, locale: Locale) -> Option<&ClassInteraction> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(class) = self
            .classes
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(query))
        {
            return Some(class);
        }

        let needle = query.to_lowercase();
        self.classes.iter().find(|c| {
            [Locale::En, locale]
                .iter()
                .any(|l| c.label.resolve(*l).to_lowercase().contains(&needle))
        })
    }

    /// Validate the tables for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for class in &self.classes {
            if class.code.is_empty() {
                errors.push("Interaction class has empty code".to_string());
            }
            if !seen.insert(class.code.to_ascii_uppercase()) {
                errors.push(format!("Duplicate interaction class code '{}'", class.code));
            }
            if class.label.is_empty() {
                errors.push(format!("Interaction class '{}' has empty label", class.code));
            }
            if class.drug_ids.is_empty() {
                errors.push(format!("Interaction class '{}' affects no drugs", class.code));
            }
        }

        for nutrient in &self.nutrients {
            if nutrient.nutrient.is_empty() {
                errors.push("Nutrient interaction has empty name".to_string());
            }
            if nutrient.effect.is_empty() {
                errors.push(format!(
                    "Nutrient '{}' has empty effect",
                    nutrient.nutrient.resolve(Locale::En)
                ));
            }
        }

        errors
    }
}
