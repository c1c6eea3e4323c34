/// Drops every empty line and rejoins the rest with single newlines
///
/// Whitespace inside a line is preserved, so a line holding only spaces
/// survives. Runs of blank lines collapse to nothing.
///
/// # Examples
///
/// ```
/// use site_tap::extract::normalize_text;
///
/// assert_eq!(normalize_text("A\n\n\nB"), "A\nB");
/// assert_eq!(normalize_text("\n  indented\n"), "  indented");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
