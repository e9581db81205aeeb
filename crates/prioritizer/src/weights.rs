//! Per-intent importance of each section category.
//!
//! A fixed policy table, looked up by intent. `Unknown` intent uses the
//! `Analytical` row.

use querylens_core::profile::IntentType;
use querylens_core::section::SectionCategory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceWeights {
    pub table_definitions: f64,
    pub column_definitions: f64,
    pub business_rules: f64,
    pub examples: f64,
    pub relationships: f64,
    pub glossary: f64,
    /// Reserved; no section category maps here yet.
    pub performance_hints: f64,
}

impl ImportanceWeights {
    const fn row(t: f64, c: f64, r: f64, e: f64, rel: f64, g: f64, p: f64) -> Self {
        Self {
            table_definitions: t,
            column_definitions: c,
            business_rules: r,
            examples: e,
            relationships: rel,
            glossary: g,
            performance_hints: p,
        }
    }

    pub const ANALYTICAL: Self = Self::row(0.9, 0.8, 0.7, 0.6, 0.8, 0.5, 0.4);
    pub const OPERATIONAL: Self = Self::row(0.8, 0.9, 0.8, 0.7, 0.5, 0.4, 0.6);
    pub const EXPLORATORY: Self = Self::row(0.9, 0.7, 0.5, 0.8, 0.7, 0.6, 0.3);
    pub const COMPARISON: Self = Self::row(0.8, 0.8, 0.8, 0.7, 0.6, 0.5, 0.4);
    pub const AGGREGATION: Self = Self::row(0.9, 0.9, 0.7, 0.8, 0.6, 0.4, 0.7);
    pub const TREND: Self = Self::row(0.8, 0.8, 0.6, 0.7, 0.5, 0.4, 0.6);
    pub const DETAIL: Self = Self::row(0.7, 0.9, 0.6, 0.6, 0.8, 0.5, 0.3);

    pub const fn for_intent(intent: IntentType) -> Self {
        match intent {
            IntentType::Analytical | IntentType::Unknown => Self::ANALYTICAL,
            IntentType::Operational => Self::OPERATIONAL,
            IntentType::Exploratory => Self::EXPLORATORY,
            IntentType::Comparison => Self::COMPARISON,
            IntentType::Aggregation => Self::AGGREGATION,
            IntentType::Trend => Self::TREND,
            IntentType::Detail => Self::DETAIL,
        }
    }

    pub fn for_category(&self, category: SectionCategory) -> f64 {
        match category {
            SectionCategory::TableDefinition => self.table_definitions,
            SectionCategory::ColumnDefinition => self.column_definitions,
            SectionCategory::BusinessRule => self.business_rules,
            SectionCategory::Example => self.examples,
            SectionCategory::Relationship => self.relationships,
            SectionCategory::Glossary => self.glossary,
        }
    }
}
