//! Recovery of a secret embedded in the generated comparisons.
//!
//! Checker programs compare each input character against a constant that is
//! built up with additions, so the pseudocode ends up containing one
//! `+ <code>` literal per expected character.

/// Concatenate the characters whose codes appear as `+ <digits>` literals.
///
/// Numbers that do not name a character are skipped, and so is everything
/// inside double-quoted string literals.
pub fn recover_secret(pseudocode: &str) -> String {
    outside_literals(pseudocode)
        .into_iter()
        .flat_map(addends)
        .filter_map(char::from_u32)
        .collect()
}

fn addends(text: &str) -> impl Iterator<Item = u32> + '_ {
    text.match_indices("+ ").filter_map(move |(at, op)| {
        let rest = &text[at + op.len()..];
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .map_or(rest, |end| &rest[..end]);
        digits.parse::<u32>().ok()
    })
}

/// Split `text` into the runs that lie outside C string literals.
fn outside_literals(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = Some(0);
    let mut escaped = false;
    for (at, c) in text.char_indices() {
        match start {
            Some(from) if c == '"' => {
                segments.push(&text[from..at]);
                start = None;
            }
            Some(_) => {}
            None if escaped => escaped = false,
            None if c == '\\' => escaped = true,
            None if c == '"' => start = Some(at + 1),
            None => {}
        }
    }
    if let Some(from) = start {
        segments.push(&text[from..]);
    }
    segments
}
