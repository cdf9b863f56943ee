use crate::form::{is_valid_date, SectionRecord};
use regex::Regex;
use std::sync::OnceLock;

pub const PREVIEW_ID_PLACEHOLDER: &str = "{id}";

struct SegmentPatterns {
    whitespace: Regex,
    disallowed: Regex,
    dashes: Regex,
}

fn patterns() -> &'static SegmentPatterns {
    static PATTERNS: OnceLock<SegmentPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SegmentPatterns {
        whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        disallowed: Regex::new(r"[^A-Za-z0-9_-]").expect("disallowed pattern is valid"),
        dashes: Regex::new(r"-{2,}").expect("dash pattern is valid"),
    })
}

/// Makes free text usable as a URL path segment.
///
/// Whitespace runs become one dash, characters outside `[A-Za-z0-9_-]` become
/// dashes, and repeated dashes collapse.
pub fn sanitize_url_segment(text: &str) -> String {
    let p = patterns();
    let dashed = p.whitespace.replace_all(text.trim(), "-");
    let cleaned = p.disallowed.replace_all(&dashed, "-");
    p.dashes.replace_all(&cleaned, "-").into_owned()
}

fn trimmed_base(base_url: &str) -> &str {
    base_url.trim().trim_end_matches('/')
}

/// `{base}/{date}/{motif}-{motif_num}-{product_type}`, or `None` while a part is missing.
pub fn product_base_url(base_url: &str, section: &SectionRecord) -> Option<String> {
    let date = section.date.trim();
    let motif = sanitize_url_segment(&section.motif);
    let motif_num = sanitize_url_segment(&section.motif_number.to_string());
    let product_type = sanitize_url_segment(&section.product_type);

    if motif.is_empty() || product_type.is_empty() || !is_valid_date(date) {
        return None;
    }

    Some(format!(
        "{}/{}/{}-{}-{}",
        trimmed_base(base_url),
        date,
        motif,
        motif_num,
        product_type
    ))
}

/// Source URL of the image variant for one color.
pub fn image_src(
    base_url: &str,
    section: &SectionRecord,
    color_name: &str,
    image_id: u64,
) -> Option<String> {
    let product = product_base_url(base_url, section)?;
    Some(format!(
        "{}-{}-{}.png",
        product,
        sanitize_url_segment(color_name),
        image_id
    ))
}

/// Live "Product Image URL" for the section's sample color; empty until complete.
pub fn preview_url(base_url: &str, section: &SectionRecord) -> String {
    let color = sanitize_url_segment(&section.color);
    if color.is_empty() {
        return String::new();
    }
    match product_base_url(base_url, section) {
        Some(product) => format!("{}-{}-{}.png", product, color, PREVIEW_ID_PLACEHOLDER),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::MotifNumber;

    const BASE: &str = "https://example.com/uploads/";

    fn section() -> SectionRecord {
        SectionRecord {
            motif: "  Carreau  Ciment ".to_string(),
            motif_number: MotifNumber::Motif(3),
            date: "2024/05".to_string(),
            color: "Bleu Nuit".to_string(),
            width: "100".to_string(),
            height: "200".to_string(),
            product_type: "Tapis/Vinyle".to_string(),
        }
    }

    #[test]
    fn sanitize_collapses_and_replaces() {
        assert_eq!(sanitize_url_segment("  Hello   World "), "Hello-World");
        assert_eq!(sanitize_url_segment("a/b?c"), "a-b-c");
        assert_eq!(sanitize_url_segment("Rosé & Or"), "Ros-Or");
        assert_eq!(sanitize_url_segment("keep_under-score"), "keep_under-score");
        assert_eq!(sanitize_url_segment("a -- b"), "a-b");
        assert_eq!(sanitize_url_segment("x!"), "x-");
        assert_eq!(sanitize_url_segment("   "), "");
    }

    #[test]
    fn sanitize_output_only_contains_allowed_characters() {
        for input in ["été 2024", "tab\there", "émoji 🎨 ok", "--a--", "ÿ\u{00a0}z"] {
            let out = sanitize_url_segment(input);
            assert!(
                out.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "{:?} -> {:?}",
                input,
                out
            );
            assert!(!out.contains("--"), "{:?} -> {:?}", input, out);
        }
    }

    #[test]
    fn builds_product_and_image_urls() {
        let section = section();
        assert_eq!(
            product_base_url(BASE, &section).as_deref(),
            Some("https://example.com/uploads/2024/05/Carreau-Ciment-Motif-3-Tapis-Vinyle")
        );
        assert_eq!(
            image_src(BASE, &section, "Bleu Nuit", 100_007).as_deref(),
            Some("https://example.com/uploads/2024/05/Carreau-Ciment-Motif-3-Tapis-Vinyle-Bleu-Nuit-100007.png")
        );
    }

    #[test]
    fn incomplete_sections_have_no_url() {
        let mut missing_motif = section();
        missing_motif.motif = " ".to_string();
        assert_eq!(product_base_url(BASE, &missing_motif), None);

        let mut bad_date = section();
        bad_date.date = "May 2024".to_string();
        assert_eq!(product_base_url(BASE, &bad_date), None);
        assert_eq!(preview_url(BASE, &bad_date), "");
    }

    #[test]
    fn preview_needs_a_color() {
        let mut section = section();
        assert!(preview_url(BASE, &section).ends_with("-Bleu-Nuit-{id}.png"));
        section.color.clear();
        assert_eq!(preview_url(BASE, &section), "");
    }
}
