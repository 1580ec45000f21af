//! Element rendering: one classified layout element → one Markdown fragment.
//!
//! ## Rendering rules
//!
//! | Category        | Fragment                                  |
//! |-----------------|-------------------------------------------|
//! | `Title`         | `# <text>`                                |
//! | `Table`         | blank line, ` ```text `, text, ` ``` `, blank line |
//! | `ListItem`      | `- <text>`                                |
//! | anything else   | `<text>` verbatim                         |
//!
//! Tables go inside a `text`-tagged fence because column alignment in
//! extracted tables is positional; Markdown reflow would destroy it.
//! The fence content is the element text verbatim — it may itself span
//! multiple lines and is never split or re-wrapped here.
//!
//! Elements whose text trims to empty contribute nothing: they are skipped
//! entirely rather than rendered as blank fragments, so they never count as
//! lines for the later duplicate-elimination pass.
//!
//! Rendering is a pure function of the input sequence and preserves element
//! order. Unknown categories fall through to the paragraph rule — an
//! extraction tool introducing a new tag can never make rendering fail.

use crate::element::{ElementCategory, LayoutElement};

/// Render a single element, or `None` if its text trims to empty.
pub fn render_element(element: &LayoutElement) -> Option<String> {
    let text = element.text.trim();
    if text.is_empty() {
        return None;
    }

    let fragment = match element.category {
        ElementCategory::Title => format!("# {text}"),
        ElementCategory::Table => format!("\n```text\n{text}\n```\n"),
        ElementCategory::ListItem => format!("- {text}"),
        ElementCategory::NarrativeText | ElementCategory::Other(_) => text.to_string(),
    };
    Some(fragment)
}

/// Render an ordered element sequence into an ordered fragment sequence.
///
/// Empty elements are dropped; the relative order of the survivors matches
/// the relative order of their source elements.
pub fn render_elements(elements: &[LayoutElement]) -> Vec<String> {
    elements.iter().filter_map(render_element).collect()
}

/// Join rendered fragments into a single Markdown blob with blank-line
/// separators, ready for the normalization stages.
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementCategory::*;

    fn el(category: crate::element::ElementCategory, text: &str) -> LayoutElement {
        LayoutElement::new(category, text)
    }

    #[test]
    fn title_renders_as_heading() {
        assert_eq!(
            render_element(&el(Title, "Experience")).unwrap(),
            "# Experience"
        );
    }

    #[test]
    fn title_text_is_trimmed() {
        assert_eq!(
            render_element(&el(Title, "  Experience \n")).unwrap(),
            "# Experience"
        );
    }

    #[test]
    fn table_renders_as_text_fence() {
        let got = render_element(&el(Table, "A | B\n1 | 2")).unwrap();
        assert_eq!(got, "\n```text\nA | B\n1 | 2\n```\n");
    }

    #[test]
    fn list_item_renders_as_bullet() {
        assert_eq!(render_element(&el(ListItem, "Engineer")).unwrap(), "- Engineer");
    }

    #[test]
    fn narrative_renders_verbatim() {
        assert_eq!(
            render_element(&el(NarrativeText, "Plain paragraph.")).unwrap(),
            "Plain paragraph."
        );
    }

    #[test]
    fn unknown_category_falls_through_to_paragraph_rule() {
        let got = render_element(&el(Other("Footer".into()), "p. 9")).unwrap();
        assert_eq!(got, "p. 9");
    }

    #[test]
    fn empty_and_whitespace_elements_are_skipped() {
        assert!(render_element(&el(Title, "")).is_none());
        assert!(render_element(&el(NarrativeText, "   \n\t ")).is_none());
    }

    #[test]
    fn rendering_preserves_element_order() {
        let elements = vec![
            el(Title, "Experience"),
            el(NarrativeText, ""),
            el(ListItem, "Engineer"),
            el(ListItem, "Engineer"),
            el(Other("Paragraph".into()), "Page 2"),
        ];
        let fragments = render_elements(&elements);
        assert_eq!(
            fragments,
            vec!["# Experience", "- Engineer", "- Engineer", "Page 2"]
        );
    }

    #[test]
    fn join_separates_fragments_with_blank_line() {
        let fragments = vec!["# A".to_string(), "b".to_string()];
        assert_eq!(join_fragments(&fragments), "# A\n\nb");
    }

    #[test]
    fn join_of_nothing_is_empty() {
        assert_eq!(join_fragments(&[]), "");
    }
}
