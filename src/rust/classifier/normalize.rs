/// Reduces raw user text to the form the model was trained on.
///
/// The input is lowercased and every character outside `[a-z0-9 ]` is
/// dropped. Nothing is substituted, so `"what's up?"` becomes `"whats up"`.
/// The result may be empty.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|&c| is_allowed(c))
        .collect()
}

fn is_allowed(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | ' ')
}
