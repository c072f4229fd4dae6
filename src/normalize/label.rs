//! Display labels derived from field names.

/// Turn a field name into a display label.
///
/// CamelCase and snake_case are split into words and each word is
/// capitalised. Runs of capitals are kept together as an acronym, so
/// `PDFVersion` becomes `PDF Version`.
pub fn titleize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut spaced = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            spaced.push(' ');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                spaced.push(' ');
            }
        }
        spaced.push(c);
    }

    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pluralize the last word of a label. Labels already ending in `s` are
/// taken to be plural.
pub fn pluralize(label: &str) -> String {
    let (head, last) = match label.rsplit_once(' ') {
        Some((head, last)) => (Some(head), last),
        None => (None, label),
    };
    let plural = pluralize_word(last);
    match head {
        Some(head) => format!("{head} {plural}"),
        None => plural,
    }
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.chars().all(|c| !c.is_lowercase()) && word.chars().any(char::is_alphabetic) {
        // Acronym
        return format!("{word}s");
    }
    let lower = word.to_lowercase();
    if lower.ends_with('s') {
        return word.to_string();
    }
    if ["ch", "sh", "x", "z"].iter().any(|end| lower.ends_with(end)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    format!("{word}s")
}

/// Label for a field holding `count` values.
pub fn display_label(field: &str, count: usize) -> String {
    let label = titleize(field);
    if count > 1 { pluralize(&label) } else { label }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_titleize() {
        assert_eq!(titleize("Title"), "Title");
        assert_eq!(titleize("PublicationDate"), "Publication Date");
        assert_eq!(titleize("AccessModeSufficient"), "Access Mode Sufficient");
        assert_eq!(titleize("PDFVersion"), "PDF Version");
        assert_eq!(titleize("produced_date"), "Produced Date");
        assert_eq!(titleize("ISBN"), "ISBN");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Creator"), "Creators");
        assert_eq!(pluralize("Identifiers"), "Identifiers");
        assert_eq!(pluralize("Access Mode"), "Access Modes");
        assert_eq!(pluralize("Accessibility Summary"), "Accessibility Summaries");
        assert_eq!(pluralize("Key"), "Keys");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("ISBN"), "ISBNs");
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("Subject", 1), "Subject");
        assert_eq!(display_label("Subject", 2), "Subjects");
        assert_eq!(display_label("Identifiers", 1), "Identifiers");
    }

    proptest! {
        #[test]
        fn titleize_is_idempotent(name in "[A-Za-z][A-Za-z_]{0,24}") {
            let once = titleize(&name);
            prop_assert_eq!(titleize(&once), once);
        }

        #[test]
        fn plural_labels_stay_plural(name in "[A-Z][a-z]{1,10}([A-Z][a-z]{1,10}){0,2}") {
            let plural = display_label(&name, 2);
            prop_assert_eq!(pluralize(&plural), plural.clone());
            prop_assert!(plural.starts_with(&titleize(&name)[..1]));
        }
    }
}
