//! Locale id table.
//!
//! Resource packs before format 3 (host 301) spell locales `en_US`; later
//! hosts use `en_us`. Well-formed five-character ids that are not listed
//! still convert by casing alone, so a user's rarer locale is moved across
//! the epoch rather than discarded.

use std::sync::OnceLock;

use super::{CodeMapping, CodeTable, ConversionMode, Namespace};
use crate::error::{Error, Result};

/// First host version whose resource packs use lower-case locale ids.
pub const LOCALE_EPOCH: i32 = 301;

/// Hosts below this version still read `Verify`-mode ids in legacy casing.
pub const LEGACY_CASING_BELOW: i32 = 315;

/// Modern id and display name of every listed locale.
const LOCALES: &[(&str, &str)] = &[
    ("en_us", "English (US)"),
    ("en_gb", "English (UK)"),
    ("en_au", "English (Australia)"),
    ("en_ca", "English (Canada)"),
    ("en_nz", "English (New Zealand)"),
    ("de_de", "Deutsch (Deutschland)"),
    ("de_at", "Deutsch (Österreich)"),
    ("de_ch", "Deutsch (Schweiz)"),
    ("fr_fr", "Français (France)"),
    ("fr_ca", "Français (Canada)"),
    ("es_es", "Español (España)"),
    ("es_mx", "Español (México)"),
    ("es_ar", "Español (Argentina)"),
    ("it_it", "Italiano (Italia)"),
    ("pt_br", "Português (Brasil)"),
    ("pt_pt", "Português (Portugal)"),
    ("nl_nl", "Nederlands (Nederland)"),
    ("sv_se", "Svenska (Sverige)"),
    ("da_dk", "Dansk (Danmark)"),
    ("fi_fi", "Suomi (Suomi)"),
    ("no_no", "Norsk (Norge)"),
    ("pl_pl", "Polski (Polska)"),
    ("cs_cz", "Čeština (Česko)"),
    ("hu_hu", "Magyar (Magyarország)"),
    ("ro_ro", "Română (România)"),
    ("bg_bg", "Български (България)"),
    ("el_gr", "Ελληνικά (Ελλάδα)"),
    ("ru_ru", "Русский (Россия)"),
    ("uk_ua", "Українська (Україна)"),
    ("tr_tr", "Türkçe (Türkiye)"),
    ("he_il", "עברית (ישראל)"),
    ("ar_sa", "العربية (المملكة العربية السعودية)"),
    ("th_th", "ภาษาไทย (ประเทศไทย)"),
    ("vi_vn", "Tiếng Việt (Việt Nam)"),
    ("id_id", "Bahasa Indonesia (Indonesia)"),
    ("ja_jp", "日本語 (日本)"),
    ("ko_kr", "한국어 (대한민국)"),
    ("zh_cn", "简体中文 (中国大陆)"),
    ("zh_tw", "繁體中文 (台灣)"),
];

/// Default locale in each namespace; doubles as the table's sentinel.
const LEGACY_DEFAULT: &str = "en_US";
const MODERN_DEFAULT: &str = "en_us";

/// The process-wide locale table.
pub fn locales() -> &'static CodeTable<String> {
    static TABLE: OnceLock<CodeTable<String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        CodeTable::new(
            LOCALES.iter().map(|&(modern, name)| {
                CodeMapping::new(legacy_casing(modern), modern.to_string(), name)
            }),
            LEGACY_DEFAULT.to_string(),
            MODERN_DEFAULT.to_string(),
        )
    })
}

/// Default locale id for a host at `host_version`.
#[must_use]
pub fn default_locale(host_version: i32) -> &'static str {
    if host_version < LEGACY_CASING_BELOW {
        LEGACY_DEFAULT
    } else {
        MODERN_DEFAULT
    }
}

/// True when `id` has the `xx_yy` shape of a locale id, in either casing.
///
/// Ids of this shape convert across the epoch even when unlisted; anything
/// else cannot name a resource-pack locale.
#[must_use]
pub fn is_well_formed_locale(id: &str) -> bool {
    let mut parts = id.split('_');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(language), Some(region), None)
            if language.len() == 2
                && region.len() == 2
                && language.chars().chain(region.chars()).all(|c| c.is_ascii_alphabetic())
    )
}

fn legacy_casing(id: &str) -> String {
    id.chars()
        .enumerate()
        .flat_map(|(index, c)| {
            if index < 3 {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}

/// Converts a locale id for a host at `host_version`.
///
/// Listed ids map through the table. Other five-character ids containing
/// `_` are recased; anything else is returned trimmed but otherwise
/// unchanged. Under `Verify`, hosts below 315 get legacy casing.
///
/// # Errors
///
/// Returns an error for [`ConversionMode::Unknown`].
///
/// # Examples
///
/// ```
/// use presence_config::codes::convert_locale;
/// use presence_config::ConversionMode;
///
/// assert_eq!(convert_locale("en_US", ConversionMode::ToModern, 400).unwrap(), "en_us");
/// assert_eq!(convert_locale("xx_yy", ConversionMode::ToLegacy, 200).unwrap(), "xx_YY");
/// assert_eq!(convert_locale("lolcat", ConversionMode::ToModern, 400).unwrap(), "lolcat");
/// ```
pub fn convert_locale(id: &str, mode: ConversionMode, host_version: i32) -> Result<String> {
    let target = match mode {
        ConversionMode::ToModern => Namespace::Modern,
        ConversionMode::ToLegacy => Namespace::Legacy,
        ConversionMode::Verify if host_version < LEGACY_CASING_BELOW => Namespace::Legacy,
        ConversionMode::Verify => Namespace::Modern,
        ConversionMode::Unknown => {
            return Err(Error::InvalidConversionMode {
                mode: mode.to_string(),
            })
        }
    };

    let trimmed = id.trim();
    if !is_well_formed_locale(trimmed) {
        return Ok(trimmed.to_string());
    }

    let table = locales();
    let listed = table
        .get(&trimmed.to_string(), Namespace::Legacy)
        .or_else(|| table.get(&trimmed.to_string(), Namespace::Modern))
        .or_else(|| table.get(&trimmed.to_lowercase(), Namespace::Modern));
    let converted = match (listed, target) {
        (Some(mapping), Namespace::Legacy) => mapping.legacy.clone(),
        (Some(mapping), Namespace::Modern) => mapping.modern.clone(),
        (None, Namespace::Legacy) => legacy_casing(trimmed),
        (None, Namespace::Modern) => trimmed.to_lowercase(),
    };

    if converted == trimmed && mode.is_migration() {
        log::debug!("locale id {trimmed} unchanged by {mode} conversion");
    }
    Ok(converted)
}

/// True when `id` names a listed locale in either casing.
#[must_use]
pub fn is_known_locale(id: &str) -> bool {
    locales().contains(&id.to_lowercase(), Namespace::Modern)
}
