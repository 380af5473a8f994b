//! Keyboard keycode table.
//!
//! Hosts before protocol 341 number keys with the legacy scan-code style
//! scheme; from 341 on they use the modern scheme. Unknown is `0` in the
//! legacy namespace and `-1` in the modern one.

use std::sync::OnceLock;

use super::{CodeMapping, CodeTable, ConversionMode, Namespace};
use crate::error::Result;

/// First host version that uses modern keycodes.
pub const KEYCODE_EPOCH: i32 = 341;

/// Legacy "unknown / none" keycode.
pub const LEGACY_UNKNOWN: i32 = 0;

/// Modern "unknown / none" keycode.
pub const MODERN_UNKNOWN: i32 = -1;

/// `(legacy, modern, name)`. The sentinel row comes first so it owns both
/// unknown codes; keys missing from one namespace use that namespace's
/// sentinel.
const KEY_MAPPINGS: &[(i32, i32, &str)] = &[
    (0, -1, "None"),
    (1, 256, "Escape"),
    (2, 49, "1"),
    (3, 50, "2"),
    (4, 51, "3"),
    (5, 52, "4"),
    (6, 53, "5"),
    (7, 54, "6"),
    (8, 55, "7"),
    (9, 56, "8"),
    (10, 57, "9"),
    (11, 48, "0"),
    (12, 45, "Minus"),
    (13, 61, "Equals"),
    (14, 259, "Backspace"),
    (15, 258, "Tab"),
    (16, 81, "Q"),
    (17, 87, "W"),
    (18, 69, "E"),
    (19, 82, "R"),
    (20, 84, "T"),
    (21, 89, "Y"),
    (22, 85, "U"),
    (23, 73, "I"),
    (24, 79, "O"),
    (25, 80, "P"),
    (26, 91, "Left Bracket"),
    (27, 93, "Right Bracket"),
    (28, 257, "Return"),
    (29, 341, "Left Control"),
    (30, 65, "A"),
    (31, 83, "S"),
    (32, 68, "D"),
    (33, 70, "F"),
    (34, 71, "G"),
    (35, 72, "H"),
    (36, 74, "J"),
    (37, 75, "K"),
    (38, 76, "L"),
    (39, 59, "Semicolon"),
    (40, 39, "Apostrophe"),
    (41, 96, "Grave"),
    (42, 340, "Left Shift"),
    (43, 92, "Backslash"),
    (44, 90, "Z"),
    (45, 88, "X"),
    (46, 67, "C"),
    (47, 86, "V"),
    (48, 66, "B"),
    (49, 78, "N"),
    (50, 77, "M"),
    (51, 44, "Comma"),
    (52, 46, "Period"),
    (53, 47, "Slash"),
    (54, 344, "Right Shift"),
    (55, 332, "Keypad - Multiply"),
    (56, 342, "Left Alt"),
    (57, 32, "Space"),
    (58, 280, "Caps Lock"),
    (59, 290, "F1"),
    (60, 291, "F2"),
    (61, 292, "F3"),
    (62, 293, "F4"),
    (63, 294, "F5"),
    (64, 295, "F6"),
    (65, 296, "F7"),
    (66, 297, "F8"),
    (67, 298, "F9"),
    (68, 299, "F10"),
    (69, 282, "Number Lock"),
    (70, 281, "Scroll Lock"),
    (71, 327, "Keypad - 7"),
    (72, 328, "Keypad - 8"),
    (73, 329, "Keypad - 9"),
    (74, 333, "Keypad - Subtract"),
    (75, 324, "Keypad - 4"),
    (76, 325, "Keypad - 5"),
    (77, 326, "Keypad - 6"),
    (78, 334, "Keypad - Add"),
    (79, 321, "Keypad - 1"),
    (80, 322, "Keypad - 2"),
    (81, 323, "Keypad - 3"),
    (82, 320, "Keypad - 0"),
    (83, 330, "Keypad - Decimal"),
    (87, 300, "F11"),
    (88, 301, "F12"),
    (100, 302, "F13"),
    (101, 303, "F14"),
    (102, 304, "F15"),
    (103, 305, "F16"),
    (104, 306, "F17"),
    (105, 307, "F18"),
    (112, -1, "Kana"),
    (113, 308, "F19"),
    (121, -1, "Convert"),
    (123, -1, "NoConvert"),
    (125, -1, "Symbol - Yen"),
    (141, 336, "Keypad - Equals"),
    (144, -1, "Symbol - Circumflex"),
    (145, -1, "Symbol - At"),
    (146, -1, "Symbol - Colon"),
    (147, -1, "Underline"),
    (148, -1, "Kanji"),
    (149, -1, "Stop"),
    (150, -1, "AX"),
    (151, -1, "Unlabeled"),
    (156, 335, "Keypad - Enter"),
    (157, 345, "Right Control"),
    (179, -1, "Keypad - Comma"),
    (181, 331, "Keypad - Divide"),
    (183, -1, "SysRq"),
    (184, 346, "Right Alt"),
    (196, -1, "Function"),
    (197, 284, "Pause"),
    (199, 268, "Home"),
    (200, 265, "Up Arrow"),
    (201, 266, "Page Up"),
    (203, 263, "Left Arrow"),
    (205, 262, "Right Arrow"),
    (207, 269, "End"),
    (208, 264, "Down Arrow"),
    (209, 267, "Page Down"),
    (210, 260, "Insert"),
    (211, 261, "Delete"),
    (219, 343, "Left Meta"),
    (220, 347, "Right Meta"),
    (221, -1, "Apps"),
    (222, -1, "Power"),
    (223, -1, "Sleep"),
    (0, 161, "World 1"),
    (0, 162, "World 2"),
    (0, 283, "Print Screen"),
    (0, 309, "F20"),
    (0, 310, "F21"),
    (0, 311, "F22"),
    (0, 312, "F23"),
    (0, 313, "F24"),
    (0, 314, "F25"),
    (0, 348, "Menu"),
];

/// The process-wide keycode table.
pub fn keycodes() -> &'static CodeTable<i32> {
    static TABLE: OnceLock<CodeTable<i32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        CodeTable::new(
            KEY_MAPPINGS
                .iter()
                .map(|&(legacy, modern, name)| CodeMapping::new(legacy, modern, name)),
            LEGACY_UNKNOWN,
            MODERN_UNKNOWN,
        )
    })
}

/// Namespace a host at `host_version` reads keycodes in.
#[must_use]
pub fn active_namespace(host_version: i32) -> Namespace {
    Namespace::for_version(host_version, KEYCODE_EPOCH)
}

/// Converts a keycode for a host at `host_version`.
///
/// # Errors
///
/// Returns an error for [`ConversionMode::Unknown`].
///
/// # Examples
///
/// ```
/// use presence_config::codes::convert_key;
/// use presence_config::ConversionMode;
///
/// assert_eq!(convert_key(57, ConversionMode::ToModern, 400).unwrap(), 32);
/// assert_eq!(convert_key(32, ConversionMode::ToLegacy, 340).unwrap(), 57);
/// assert_eq!(convert_key(9999, ConversionMode::Verify, 765).unwrap(), -1);
/// ```
pub fn convert_key(code: i32, mode: ConversionMode, host_version: i32) -> Result<i32> {
    let converted = keycodes().convert(&code, mode, active_namespace(host_version))?;
    if converted == code && mode.is_migration() {
        log::debug!("keycode {code} unchanged by {mode} conversion");
    }
    Ok(converted)
}

/// True when `code` is a known keycode in `namespace`.
#[must_use]
pub fn is_valid_key(code: i32, namespace: Namespace) -> bool {
    keycodes().contains(&code, namespace)
}

/// Human-readable name of a keycode.
#[must_use]
pub fn key_name(code: i32, namespace: Namespace) -> Option<&'static str> {
    keycodes().get(&code, namespace).map(|m| m.name.as_str())
}


#[cfg(test)]
#[allow(unused_doc_comments)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: conversion always lands on a code known in the target namespace
        #[test]
        fn prop_conversion_is_closed(code in -5i32..400) {
            let modern = convert_key(code, ConversionMode::ToModern, 765).unwrap();
            prop_assert!(is_valid_key(modern, Namespace::Modern));
            let legacy = convert_key(code, ConversionMode::ToLegacy, 340).unwrap();
            prop_assert!(is_valid_key(legacy, Namespace::Legacy));
        }

        /// Property: verification is idempotent
        #[test]
        fn prop_verify_idempotent(code in -5i32..400, host in 0i32..800) {
            let once = convert_key(code, ConversionMode::Verify, host).unwrap();
            let twice = convert_key(once, ConversionMode::Verify, host).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
