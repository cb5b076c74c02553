/// Placeholder for an empty food list when the caller has no specific wording.
pub const NO_DATA_PLACEHOLDER: &str = "No specific data provided";
/// Placeholder wording for an empty "foods to eat" list.
pub const NO_RECOMMENDATIONS_PLACEHOLDER: &str = "No specific recommendations";
/// Placeholder wording for an empty "foods to avoid" list.
pub const NO_RESTRICTIONS_PLACEHOLDER: &str = "No specific restrictions";

// Order matters: the bracket-quote pairs go before the lone quote.
const WRAPPERS: [&str; 5] = ["[\"", "\"]", "{", "\"", "}"];

/// Strip stray JSON quoting and brackets from a single food item.
pub fn normalize_food_item(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    for wrapper in WRAPPERS {
        if cleaned.contains(wrapper) {
            cleaned = cleaned.replace(wrapper, "");
        }
    }
    cleaned.trim().to_string()
}

/// Normalize every item of a food list.
///
/// Items that are empty after cleanup are dropped. A list with nothing left
/// becomes a single `placeholder` item, never an empty list.
pub fn normalize_food_list<S: AsRef<str>>(items: &[S], placeholder: &str) -> Vec<String> {
    let cleaned: Vec<String> = items
        .iter()
        .map(|item| normalize_food_item(item.as_ref()))
        .filter(|item| !item.is_empty())
        .collect();

    if cleaned.is_empty() {
        vec![placeholder.to_string()]
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_bracket_quote_wrapper() {
        assert_eq!(normalize_food_item(r#"["Spinach"]"#), "Spinach");
    }

    #[test]
    fn test_item_plain_unchanged() {
        assert_eq!(normalize_food_item("Brown rice"), "Brown rice");
    }

    #[test]
    fn test_item_surrounding_whitespace_trimmed() {
        assert_eq!(normalize_food_item("  Oats \n"), "Oats");
    }

    #[test]
    fn test_item_braces_and_quotes() {
        assert_eq!(normalize_food_item(r#"{"Salmon"}"#), "Salmon");
        assert_eq!(normalize_food_item(r#""Green tea""#), "Green tea");
    }

    #[test]
    fn test_item_lone_square_bracket_kept() {
        assert_eq!(normalize_food_item("[Tofu]"), "[Tofu]");
    }

    #[test]
    fn test_item_empty() {
        assert_eq!(normalize_food_item(""), "");
    }

    #[test]
    fn test_list_cleans_each_item() {
        let items = vec![r#"["Spinach""#.to_string(), r#""Kale"]"#.to_string()];
        assert_eq!(normalize_food_list(&items, NO_DATA_PLACEHOLDER), vec!["Spinach", "Kale"]);
    }

    #[test]
    fn test_list_empty_gives_placeholder() {
        let items: Vec<String> = Vec::new();
        assert_eq!(
            normalize_food_list(&items, NO_DATA_PLACEHOLDER),
            vec![NO_DATA_PLACEHOLDER]
        );
    }

    #[test]
    fn test_list_of_blank_items_gives_placeholder() {
        assert_eq!(
            normalize_food_list(&["", r#""""#, " "], NO_RESTRICTIONS_PLACEHOLDER),
            vec![NO_RESTRICTIONS_PLACEHOLDER]
        );
    }

    #[test]
    fn test_list_drops_blank_items_keeps_order() {
        assert_eq!(
            normalize_food_list(&["Oats", "", "Beans"], NO_DATA_PLACEHOLDER),
            vec!["Oats", "Beans"]
        );
    }
}
