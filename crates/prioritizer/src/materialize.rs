//! Candidate metadata → `ContextSection`s with rendered text and token cost.

use querylens_core::candidate::{
    CandidateSchema, ColumnCandidate, ExampleCandidate, GlossaryCandidate, RelationshipCandidate,
    RuleCandidate, TableCandidate,
};
use querylens_core::error::PrioritizationError;
use querylens_core::provider::TokenCounter;
use querylens_core::section::{ContextSection, SectionCategory};

/// Relationships carry no score of their own.
pub const RELATIONSHIP_RELEVANCE: f32 = 0.6;

pub const SOURCE_TABLE: &str = "source_table";
pub const SOURCE_COLUMN: &str = "source_column";
pub const RULE_ID: &str = "rule_id";
pub const TERM: &str = "term";

/// Materialize every candidate, in schema order: tables, columns, rules,
/// examples, relationships, glossary.
pub fn materialize(
    schema: &CandidateSchema,
    counter: &dyn TokenCounter,
) -> Result<Vec<ContextSection>, PrioritizationError> {
    let mut sections = Vec::with_capacity(schema.len());

    for table in &schema.tables {
        sections.push(
            section(counter, SectionCategory::TableDefinition, render_table(table), table.relevance)?
                .with_attribute(SOURCE_TABLE, table.name.as_str()),
        );
    }
    for column in &schema.columns {
        sections.push(
            section(counter, SectionCategory::ColumnDefinition, render_column(column), column.relevance)?
                .with_attribute(SOURCE_TABLE, column.table.as_str())
                .with_attribute(SOURCE_COLUMN, column.name.as_str()),
        );
    }
    for rule in &schema.business_rules {
        sections.push(
            section(counter, SectionCategory::BusinessRule, render_rule(rule), rule.relevance)?
                .with_attribute(RULE_ID, rule.id.as_str()),
        );
    }
    for example in &schema.examples {
        sections.push(section(
            counter,
            SectionCategory::Example,
            render_example(example),
            example.relevance,
        )?);
    }
    for relationship in &schema.relationships {
        sections.push(
            section(
                counter,
                SectionCategory::Relationship,
                render_relationship(relationship),
                RELATIONSHIP_RELEVANCE,
            )?
            .with_attribute(SOURCE_TABLE, relationship.from_table.as_str()),
        );
    }
    for entry in &schema.glossary {
        sections.push(
            section(counter, SectionCategory::Glossary, render_glossary(entry), entry.relevance)?
                .with_attribute(TERM, entry.term.as_str()),
        );
    }

    Ok(sections)
}

fn section(
    counter: &dyn TokenCounter,
    category: SectionCategory,
    content: String,
    relevance: f32,
) -> Result<ContextSection, PrioritizationError> {
    let tokens = counter.count_tokens(&content, category.token_hint())?;
    let relevance = if relevance.is_nan() { 0.0 } else { relevance.clamp(0.0, 1.0) };
    Ok(ContextSection::new(category, content, tokens, relevance))
}

fn render_table(table: &TableCandidate) -> String {
    let mut out = format!("Table: {}", table.name);
    if !table.description.is_empty() {
        out.push_str(&format!("\nDescription: {}", table.description));
    }
    if !table.columns.is_empty() {
        out.push_str(&format!("\nColumns: {}", table.columns.join(", ")));
    }
    out
}

fn render_column(column: &ColumnCandidate) -> String {
    let mut out = format!("Column: {}.{}", column.table, column.name);
    if !column.data_type.is_empty() {
        out.push_str(&format!(" ({})", column.data_type));
    }
    if !column.description.is_empty() {
        out.push_str(&format!("\nDescription: {}", column.description));
    }
    out
}

fn render_rule(rule: &RuleCandidate) -> String {
    let mut out = format!("Rule: {}", rule.name);
    if !rule.description.is_empty() {
        out.push_str(&format!("\n{}", rule.description));
    }
    if let Some(logic) = rule.logic.as_deref().filter(|l| !l.is_empty()) {
        out.push_str(&format!("\nLogic: {logic}"));
    }
    out
}

fn render_example(example: &ExampleCandidate) -> String {
    format!("Question: {}\nSQL: {}", example.question, example.sql)
}

fn render_relationship(r: &RelationshipCandidate) -> String {
    format!(
        "{}.{} -> {}.{} ({})",
        r.from_table, r.from_column, r.to_table, r.to_column, r.kind
    )
}

fn render_glossary(entry: &GlossaryCandidate) -> String {
    let mut out = format!("{}: {}", entry.term, entry.definition);
    if !entry.synonyms.is_empty() {
        out.push_str(&format!("\nSynonyms: {}", entry.synonyms.join(", ")));
    }
    out
}
