//! Plain-text rendering of a selection for prompt assembly.

use querylens_core::section::{ContextSection, SectionCategory};

fn header(category: SectionCategory) -> &'static str {
    match category {
        SectionCategory::TableDefinition => "[Tables]",
        SectionCategory::ColumnDefinition => "[Columns]",
        SectionCategory::Relationship => "[Relationships]",
        SectionCategory::BusinessRule => "[Business Rules]",
        SectionCategory::Example => "[Examples]",
        SectionCategory::Glossary => "[Glossary]",
    }
}

/// Group sections under category headers, in presentation order. Empty
/// categories are omitted; an empty selection renders as an empty string.
pub fn render_sections(sections: &[ContextSection]) -> String {
    SectionCategory::PRESENTATION_ORDER
        .iter()
        .filter_map(|&category| {
            let body: Vec<&str> = sections
                .iter()
                .filter(|s| s.category == category)
                .map(|s| s.content.as_str())
                .collect();
            (!body.is_empty()).then(|| format!("{}\n{}", header(category), body.join("\n")))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
