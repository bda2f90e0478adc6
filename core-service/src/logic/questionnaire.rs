//! Questionnaire Catalogue - the 30 screening items
//!
//! **Item order here IS the canonical feature order.** Request keys
//! (`q1..q30`) and the DASS-42 source columns (`Q1A`, `Q3A`, ...) both map
//! onto the same positions.

use serde::Serialize;

use crate::constants::ITEM_COUNT;

/// One questionnaire item
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Item {
    /// Request key, e.g. `q1`
    pub id: &'static str,
    /// DASS-42 answer column the item was selected from
    pub source_column: &'static str,
    pub text: &'static str,
}

const fn item(id: &'static str, source_column: &'static str, text: &'static str) -> Item {
    Item { id, source_column, text }
}

/// Items in canonical order
pub const ITEMS: [Item; ITEM_COUNT] = [
    item("q1", "Q1A", "I found myself getting upset by quite trivial things."),
    item("q2", "Q3A", "I couldn't seem to experience any positive feeling at all."),
    item("q3", "Q4A", "I experienced breathing difficulty (e.g., excessively rapid breathing, breathlessness in the absence of physical exertion)."),
    item("q4", "Q5A", "I just couldn't seem to get going."),
    item("q5", "Q7A", "I had a feeling of shakiness (e.g., legs going to give way)."),
    item("q6", "Q8A", "I found it difficult to relax."),
    item("q7", "Q9A", "I found myself in situations that made me so anxious I was most relieved when they ended."),
    item("q8", "Q10A", "I felt that I had nothing to look forward to."),
    item("q9", "Q11A", "I found myself getting upset rather easily."),
    item("q10", "Q12A", "I felt that I was using a lot of nervous energy."),
    item("q11", "Q13A", "I felt sad and depressed."),
    item("q12", "Q16A", "I felt that I had lost interest in just about everything."),
    item("q13", "Q17A", "I felt I wasn't worth much as a person."),
    item("q14", "Q20A", "I felt scared without any good reason."),
    item("q15", "Q21A", "I felt that life wasn't worthwhile."),
    item("q16", "Q22A", "I found it hard to wind down."),
    item("q17", "Q24A", "I couldn't seem to get any enjoyment out of the things I did."),
    item("q18", "Q26A", "I felt down-hearted and blue."),
    item("q19", "Q27A", "I found that I was very irritable."),
    item("q20", "Q28A", "I felt I was close to panic."),
    item("q21", "Q29A", "I found it hard to calm down after something upset me."),
    item("q22", "Q30A", "I feared that I would be 'thrown' by some trivial but unfamiliar task."),
    item("q23", "Q32A", "I found it difficult to tolerate interruptions to what I was doing."),
    item("q24", "Q33A", "I was in a state of nervous tension."),
    item("q25", "Q34A", "I felt I was pretty worthless."),
    item("q26", "Q36A", "I felt terrified."),
    item("q27", "Q38A", "I felt that life was meaningless."),
    item("q28", "Q39A", "I found myself getting agitated."),
    item("q29", "Q40A", "I was worried about situations in which I might panic and make a fool of myself."),
    item("q30", "Q41A", "I experienced trembling (e.g., in the hands)."),
];

/// Wording of each point on the 1-4 response scale
pub const RESPONSE_SCALE: [(u8, &str); 4] = [
    (1, "Did not apply to me at all"),
    (2, "Applied to me to some degree, or some of the time"),
    (3, "Applied to me to a considerable degree, or a good part of the time"),
    (4, "Applied to me very much, or most of the time"),
];

/// Position of a request key (`q7`) in canonical order
pub fn item_index(id: &str) -> Option<usize> {
    ITEMS.iter().position(|item| item.id == id)
}

/// Position of a feature name, accepting request keys or source columns.
///
/// Matching is case-insensitive so `Q7`, `q7` and `q9a` all resolve.
pub fn resolve_feature_name(name: &str) -> Option<usize> {
    let name = name.trim();
    ITEMS.iter().position(|item| {
        item.id.eq_ignore_ascii_case(name) || item.source_column.eq_ignore_ascii_case(name)
    })
}

/// Default feature names when the artifact ships none: `q1..q30`
pub fn default_feature_names() -> Vec<String> {
    ITEMS.iter().map(|item| item.id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_sequential() {
        for (i, item) in ITEMS.iter().enumerate() {
            assert_eq!(item.id, format!("q{}", i + 1));
        }
    }

    #[test]
    fn test_item_index() {
        assert_eq!(item_index("q1"), Some(0));
        assert_eq!(item_index("q30"), Some(29));
        assert_eq!(item_index("q31"), None);
        assert_eq!(item_index("Q1"), None);
    }

    #[test]
    fn test_resolve_feature_name() {
        assert_eq!(resolve_feature_name("q7"), Some(6));
        assert_eq!(resolve_feature_name("Q7"), Some(6));
        assert_eq!(resolve_feature_name("Q9A"), Some(6));
        assert_eq!(resolve_feature_name(" q41a "), Some(29));
        assert_eq!(resolve_feature_name("Q2A"), None);
        assert_eq!(resolve_feature_name("stress"), None);
    }

    #[test]
    fn test_source_columns_unique() {
        let mut cols: Vec<_> = ITEMS.iter().map(|i| i.source_column).collect();
        cols.sort();
        cols.dedup();
        assert_eq!(cols.len(), ITEM_COUNT);
    }
}
