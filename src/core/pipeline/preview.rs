//! Deterministic preview and one-liner generation for large documents.
//! This stage never calls out; it is pure and reproducible.

use std::fmt::Write;

/// A document is large when its content exceeds this many characters.
pub const LARGE_DOCUMENT_THRESHOLD: usize = 2000;
/// Character budget for the extractive preview, footer excluded.
pub const PREVIEW_BUDGET: usize = 800;
/// Minimum remaining budget for a truncated line to still be included.
pub const PREVIEW_MIN_TAIL: usize = 50;

/// Lines starting with these prefixes are document metadata, not content.
const METADATA_PREFIXES: &[&str] = &["auteur:", "bron:", "datum:", "pagina:", "hoofdstuk:"];

/// Keyword groups scanned in order; the first matching group selects the
/// one-liner template.
const KEYWORD_GROUPS: &[(OneLinerTheme, &[&str])] = &[
    (
        OneLinerTheme::Supplements,
        &["vitamine", "mineralen", "supplement", "suppletie", "voeding"],
    ),
    (
        OneLinerTheme::Gut,
        &["darm", "microbioom", "spijsvertering", "probiotica"],
    ),
    (
        OneLinerTheme::Inflammation,
        &["ontstekingsremmend", "antioxidant", "ontsteking", "oxidatieve stress"],
    ),
    (
        OneLinerTheme::Stress,
        &["stress", "energie", "vermoeidheid", "slaap"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OneLinerTheme {
    Supplements,
    Gut,
    Inflammation,
    Stress,
}

pub fn is_large(content: &str) -> bool {
    content.chars().count() > LARGE_DOCUMENT_THRESHOLD
}

/// Build a bounded extractive preview for a large document.
///
/// Content lines are scanned top to bottom; blanks and metadata lines are
/// skipped, the rest accumulate until the [PREVIEW_BUDGET] is spent. A line
/// that would overflow the budget contributes its fitting prefix followed by
/// an ellipsis, but only when at least [PREVIEW_MIN_TAIL] characters remain.
pub fn build_preview(title: &str, content: &str) -> String {
    let total = content.chars().count();
    let mut out = String::new();

    if !title.trim().is_empty() {
        let _ = writeln!(out, "Samenvatting van: {title}");
        let _ = writeln!(out);
    }

    let mut budget = PREVIEW_BUDGET.saturating_sub(out.chars().count());

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();
        if METADATA_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            continue;
        }

        let len = line.chars().count() + 1;
        if len <= budget {
            let _ = writeln!(out, "{line}");
            budget -= len;
            continue;
        }

        if budget >= PREVIEW_MIN_TAIL {
            let cut: String = line.chars().take(budget.saturating_sub(4)).collect();
            let _ = writeln!(out, "{}...", cut.trim_end());
        }
        break;
    }

    let _ = write!(
        out,
        "\n[Het volledige document bevat {total} tekens; de volledige inhoud \
         blijft beschikbaar voor verdere verwerking.]"
    );

    out
}

/// Rule based single sentence summary. Pure: identical input always yields
/// identical output.
pub fn one_liner(title: &str, content: &str) -> String {
    let haystack = content.to_lowercase();
    let title = title.trim().to_lowercase();

    let matched: Vec<OneLinerTheme> = KEYWORD_GROUPS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(theme, _)| *theme)
        .take(3)
        .collect();

    match matched.first() {
        Some(OneLinerTheme::Supplements) => format!(
            "Dit document behandelt {title} met focus op vitaminen, mineralen en suppletie."
        ),
        Some(OneLinerTheme::Gut) => format!(
            "Dit document behandelt {title} met aandacht voor darmgezondheid en het microbioom."
        ),
        Some(OneLinerTheme::Inflammation) => format!(
            "Dit document behandelt {title} in relatie tot ontstekingsremming en antioxidanten."
        ),
        Some(OneLinerTheme::Stress) => format!(
            "Dit document behandelt {title} met betrekking tot stress- en energiehuishouding."
        ),
        None => format!("Dit document bevat orthomoleculaire kennis over {title}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn large_content() -> String {
        let mut out = String::from("Auteur: J. Jansen\nBron: Ortho Instituut\n\n");
        for i in 0..60 {
            out.push_str(&format!(
                "Regel {i} over de werking van magnesium bij spierkrampen en ontspanning.\n"
            ));
        }
        assert!(is_large(&out));
        out
    }

    #[test]
    fn small_content_is_not_large() {
        assert!(!is_large("korte tekst"));
        assert!(!is_large(&"a".repeat(LARGE_DOCUMENT_THRESHOLD)));
        assert!(is_large(&"a".repeat(LARGE_DOCUMENT_THRESHOLD + 1)));
    }

    #[test]
    fn preview_respects_budget_plus_footer() {
        let content = large_content();
        let preview = build_preview("Magnesium", &content);

        let footer_start = preview.find("\n[Het volledige document").unwrap();
        let body_len = preview[..footer_start].chars().count();

        assert!(body_len <= PREVIEW_BUDGET + 1, "body is {body_len} chars");
    }

    #[test]
    fn preview_reports_original_char_count() {
        let content = large_content();
        let total = content.chars().count();
        let preview = build_preview("Magnesium", &content);

        assert!(preview.contains(&format!("{total} tekens")));
    }

    #[test]
    fn preview_skips_metadata_lines() {
        let preview = build_preview("Magnesium", &large_content());

        assert!(!preview.contains("Auteur: J. Jansen"));
        assert!(!preview.contains("Bron: Ortho Instituut"));
        assert!(preview.contains("Regel 0"));
    }

    #[test]
    fn preview_includes_title_header() {
        let preview = build_preview("Magnesium", &large_content());
        assert!(preview.starts_with("Samenvatting van: Magnesium\n"));

        let untitled = build_preview("  ", &large_content());
        assert!(!untitled.contains("Samenvatting van"));
    }

    #[test]
    fn overflowing_line_is_truncated_with_ellipsis() {
        // One short line, then a single line far larger than the budget.
        let long_line = "magnesium ".repeat(400);
        let content = format!("Korte inleiding over mineralen.\n{long_line}\n");
        assert!(is_large(&content));

        let preview = build_preview("", &content);
        let footer_start = preview.find("\n[Het volledige document").unwrap();
        let body = &preview[..footer_start];

        assert!(body.trim_end().ends_with("..."));
        assert!(body.chars().count() <= PREVIEW_BUDGET + 1);
    }

    #[test]
    fn one_liner_is_deterministic() {
        let a = one_liner("Vitamine D", "Alles over vitamine D en mineralen.");
        let b = one_liner("Vitamine D", "Alles over vitamine D en mineralen.");
        assert_eq!(a, b);
    }

    #[test]
    fn one_liner_template_selection() {
        let supplements = one_liner("Vitamine D", "Over vitamine D suppletie.");
        assert!(supplements.contains("vitaminen, mineralen en suppletie"));

        let gut = one_liner("Darmflora", "De rol van het microbioom bij weerstand.");
        assert!(gut.contains("darmgezondheid"));

        let inflammation = one_liner("Curcuma", "Curcumine werkt ontstekingsremmend.");
        assert!(inflammation.contains("ontstekingsremming"));

        let stress = one_liner("Burn-out", "Chronische stress put de energie uit.");
        assert!(stress.contains("stress- en energiehuishouding"));

        let generic = one_liner("Agenda", "Notulen van het overleg.");
        assert!(generic.contains("orthomoleculaire kennis over agenda"));
    }

    #[test]
    fn one_liner_first_matching_group_wins() {
        // Mentions supplements before gut keywords; supplements template wins.
        let line = one_liner("Test", "vitamine en darm in één tekst");
        assert!(line.contains("vitaminen, mineralen en suppletie"));
    }
}
