//! Text shaping for tool output
//!
//! Hosts render tool output as plain text, and some of them (or the terminals behind them)
//! cannot display pictographs. Everything a tool returns goes through [`strip_emoji`].

/// Remove emoji and pictographs, keeping every other character.
///
/// A space left dangling by a removed pictograph is dropped as well; indentation is kept.
pub fn strip_emoji(text: &str) -> String {
    text.lines()
        .map(strip_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut removed = false;
    for c in line.chars() {
        if is_pictograph(c) {
            removed = true;
        } else if c == ' ' && removed && (out.is_empty() || out.ends_with(' ')) {
            continue;
        } else {
            removed &= c == ' ';
            out.push(c);
        }
    }
    out.trim_end().to_string()
}

fn is_pictograph(c: char) -> bool {
    matches!(c as u32,
        0x1F000..=0x1FAFF
        | 0x2600..=0x27BF
        | 0x2300..=0x23FF
        | 0x2B00..=0x2BFF
        | 0xFE00..=0xFE0F
        | 0x200D
        | 0x20E3
        | 0xE0020..=0xE007F
    )
}

/// Use `value` when it has visible content, otherwise `fallback`
pub(crate) fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}
