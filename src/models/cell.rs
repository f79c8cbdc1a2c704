//! Cell-text helpers.
//!
//! Every spreadsheet cell arrives as a string. These helpers interpret cell
//! text the way spreadsheet users expect: comma-separated lists, bracketed
//! lists, leading-integer priorities and loosely formatted numbers.

/// Splits a comma-separated cell into trimmed, non-empty tokens.
///
/// Token order follows the cell text.
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Removes every literal `[` and `]` from a cell.
///
/// `"[cook, clean]"` becomes `"cook, clean"`.
pub fn strip_brackets(raw: &str) -> String {
    raw.chars().filter(|c| *c != '[' && *c != ']').collect()
}

/// Splits a possibly bracketed list (`"[a, b]"` or `"a, b"`) into tokens.
pub fn split_bracketed_list(raw: &str) -> Vec<String> {
    split_list(&strip_brackets(raw)).map(str::to_string).collect()
}

/// Parses the leading integer of a cell.
///
/// Leading whitespace and a sign are accepted, then the longest run of
/// digits. A `0x`/`0X` prefix switches to hexadecimal. Trailing garbage is
/// ignored (`"3 stars"` is 3), no digits at all yields `None`. Values beyond
/// the `i64` range saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if s.len() > 2 && (s.starts_with("0x") || s.starts_with("0X")) {
        (16, &s[2..])
    } else {
        (10, s)
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        seen = true;
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_add(i64::from(d));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Interprets a whole cell as a number.
///
/// Surrounding whitespace is ignored and whitespace-only text is zero.
/// Accepts decimal and exponent forms, `0x`/`0o`/`0b` integer literals and
/// `Infinity`. Returns `None` for anything else, including `NaN`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if s.len() > 2 && s.as_bytes()[0] == b'0' {
        let radix = match s.as_bytes()[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return u64::from_str_radix(&s[2..], radix).ok().map(|v| v as f64);
        }
    }

    // Rust's float grammar also admits "inf" and "nan"; restrict to plain digits.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}
