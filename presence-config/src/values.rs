//! Syntax helpers for scalar document values.
//!
//! These decide whether a raw leaf is a valid boolean, integer or color
//! code the same way everywhere: in verification, in migrations and in the
//! legacy imports.

use std::sync::OnceLock;

use regex::Regex;

/// Returns true for `true` / `false` in any casing.
///
/// # Examples
///
/// ```
/// use presence_config::values::is_valid_boolean;
///
/// assert!(is_valid_boolean("TRUE"));
/// assert!(!is_valid_boolean("maybe"));
/// ```
#[must_use]
pub fn is_valid_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// Parses a boolean, accepting the casings [`is_valid_boolean`] accepts.
#[must_use]
pub fn parse_boolean(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses a 32-bit signed integer.
///
/// # Examples
///
/// ```
/// use presence_config::values::parse_integer;
///
/// assert_eq!(parse_integer("57"), Some(57));
/// assert_eq!(parse_integer("-1"), Some(-1));
/// assert_eq!(parse_integer("57.5"), None);
/// ```
#[must_use]
pub fn parse_integer(value: &str) -> Option<i32> {
    value.parse().ok()
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:0x([\dA-Fa-f]{1,8})|#?([\dA-Fa-f]{6}))$")
            .unwrap_or_else(|e| unreachable!("static color pattern is valid: {e}"))
    })
}

/// Decodes a hex color code (`0xAARRGGBB` or `#RRGGBB` / `RRGGBB`) to ARGB.
///
/// The `0x` form reads alpha from bits 24..32, so short codes come out
/// fully transparent; the `#` form is always opaque.
#[must_use]
pub fn parse_hex_color(code: &str) -> Option<u32> {
    let caps = color_pattern().captures(code)?;
    if let Some(long) = caps.get(1) {
        u32::from_str_radix(long.as_str(), 16).ok()
    } else {
        let rgb = u32::from_str_radix(caps.get(2)?.as_str(), 16).ok()?;
        Some(0xFF00_0000 | rgb)
    }
}

/// Returns true when the code is a hex color or a decimal ARGB integer.
///
/// # Examples
///
/// ```
/// use presence_config::values::is_valid_color_code;
///
/// assert!(is_valid_color_code("#FF00FF"));
/// assert!(is_valid_color_code("0x50FF0050"));
/// assert!(is_valid_color_code("-16777216"));
/// assert!(!is_valid_color_code("minecraft:textures/gui/options_background.png"));
/// ```
#[must_use]
pub fn is_valid_color_code(code: &str) -> bool {
    !code.is_empty() && (parse_hex_color(code).is_some() || parse_integer(code).is_some())
}

/// Resolves a color code to ARGB bits.
///
/// Hex codes win over decimal integers. Anything unparsable yields
/// `0x00FFFFFF`, white with no alpha.
#[must_use]
pub fn find_color(code: &str) -> u32 {
    if let Some(argb) = parse_hex_color(code) {
        return argb;
    }
    parse_integer(code).map_or(0x00FF_FFFF, |bits| u32::from_ne_bytes(bits.to_ne_bytes()))
}

/// Derives the darker end stop of a border gradient from its start color.
///
/// Each RGB channel is halved; alpha is kept.
#[must_use]
pub fn darken_border(argb: u32) -> u32 {
    ((argb & 0x00FE_FEFE) >> 1) | (argb & 0xFF00_0000)
}

fn word_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[\W_]+").unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
    })
}

/// Converts `snake_case`, `kebab-case` or dotted keys to `camelCase`.
///
/// # Examples
///
/// ```
/// use presence_config::values::to_camel_case;
///
/// assert_eq!(to_camel_case("detect_curse_manifest"), "detectCurseManifest");
/// assert_eq!(to_camel_case("CLIENT-ID"), "clientId");
/// ```
#[must_use]
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (index, word) in word_separator()
        .split(key)
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_lowercase();
        if index == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
