//! Separator splitting that ignores separators nested in brackets, so that
//! `Bow (Range 12/24/48, 2d6), Dagger (Str+d4)` yields two entries.

/// Split on any of `separators` found at bracket depth zero. Pieces are
/// trimmed and empty pieces dropped. Unbalanced closers are ignored.
pub fn split_top_level(text: &str, separators: &[char]) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in text.chars() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            _ if depth == 0 && separators.contains(&ch) => {
                push_piece(&mut out, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_piece(&mut out, &current);
    out
}

/// Replace `from` with `to` wherever it sits inside parentheses.
pub fn substitute_nested(text: &str, from: char, to: char) -> String {
    let mut depth = 0usize;
    text.chars()
        .map(|ch| match ch {
            '(' => {
                depth += 1;
                ch
            }
            ')' => {
                depth = depth.saturating_sub(1);
                ch
            }
            _ if depth > 0 && ch == from => to,
            _ => ch,
        })
        .collect()
}

/// Byte index of the last `(` that opens at depth zero.
pub fn last_top_level_open(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut last = None;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    last = Some(i);
                }
                depth += 1;
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    last
}

/// Byte index of the `)` matching the `(` at `open`, if the text closes it.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Open-minus-close parenthesis count.
pub fn paren_balance(text: &str) -> i32 {
    text.chars().fold(0, |acc, ch| match ch {
        '(' => acc + 1,
        ')' => acc - 1,
        _ => acc,
    })
}

/// Split `Name (details)` at the last top-level parenthesis.
/// Text after the closing parenthesis is dropped; an unclosed group runs to the end.
pub fn name_and_details(text: &str) -> (String, Option<String>) {
    let Some(open) = last_top_level_open(text) else {
        return (text.trim().to_string(), None);
    };
    let name = text[..open].trim().to_string();
    let inner = match matching_close(text, open) {
        Some(close) => &text[open + 1..close],
        None => &text[open + 1..],
    };
    (name, Some(inner.trim().to_string()))
}

fn push_piece(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}
