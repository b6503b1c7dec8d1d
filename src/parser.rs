//! Turns free ingredient text into search tokens.

/// Characters kept besides alphanumerics and whitespace
const KEPT_PUNCTUATION: [char; 3] = [',', '.', '-'];

/// Parse user input into lowercase search tokens.
///
/// Anything other than alphanumerics, whitespace, `,`, `.` and `-` is
/// dropped. The rest is split on commas and runs of whitespace. Tokens keep
/// the order of their first appearance; repeats are removed. Malformed input
/// only ever yields fewer tokens.
pub fn parse_ingredients(input: &str) -> Vec<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(c))
        .collect();

    let mut tokens: Vec<String> = Vec::new();
    for piece in cleaned.split(|c: char| c == ',' || c.is_whitespace()) {
        let token = piece.trim().to_lowercase();
        if token.is_empty() || tokens.contains(&token) {
            continue;
        }
        tokens.push(token);
    }
    tokens
}
