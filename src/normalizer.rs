// Text normalization shared by the relevance filter and the category classifier
use scraper::Html;

/// Lower-cases, replaces every non-word, non-space character with a space,
/// collapses whitespace runs and trims.
///
/// A word character is anything Unicode-alphabetic or numeric, plus `_`.
/// Alphabetic includes the spacing and non-spacing vowel signs of Indic
/// scripts, so a Bengali word such as `টাকা` stays one token instead of being
/// split at its vowel signs.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(&replaced)
}

/// Title form used for category matching: lower-case and trim only.
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase().trim().to_string()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips markup from an HTML fragment, keeping its visible text.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: Vec<&str> = fragment.root_element().text().collect();
    collapse_whitespace(&text.join(" "))
}
