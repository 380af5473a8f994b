//! Import of the flat `.properties` file that predates the JSON document.
//!
//! Keys are camel-cased, renamed onto current property paths and coerced to
//! the kind of the value already at that path. Values that cannot take the
//! target's kind are left alone. Legacy `&TOKEN&` placeholders are rewritten
//! into `{expression}` form on the way in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use im::OrdMap;
use regex::{Captures, NoExpand, Regex};

use crate::error::Result;
use crate::logging::Logger;
use crate::messages::LogMessage;
use crate::property::{AnySection, Dictionary, Property, PropertyPath};
use crate::schema::{Button, ConfigGraph, ModuleData, DEFAULT_KEY};
use crate::values::{parse_boolean, parse_integer, to_camel_case};

/// Separator between the fields of one legacy dictionary entry.
pub const DEFAULT_SPLIT_CHARACTER: &str = ";";

/// File extension of the legacy format.
pub const LEGACY_EXTENSION: &str = "properties";

const SPLIT_CHARACTER_KEY: &str = "splitCharacter";
const SHOW_TIME_KEY: &str = "showElapsedTime";
const START_TIMESTAMP_PATH: &str = "displaySettings.presenceData.startTimestamp";
const ELAPSED_TIME_EXPR: &str = "{data.general.time}";

const EXCLUDED: [&str; 6] = [
    "schemaVersion",
    SPLIT_CHARACTER_KEY,
    "guiBackgroundColor",
    "buttonBackgroundColor",
    "tooltipBackgroundColor",
    "tooltipBorderColor",
];

/// Legacy name to current path. Names missing here are looked up as-is.
const NAME_MAP: &[(&str, &str)] = &[
    ("lastMcVersionId", "_lastMCVersionId"),
    ("detectCurseManifest", "generalSettings.detectCurseManifest"),
    ("detectMultimcInstance", "generalSettings.detectMultiMCManifest"),
    ("detectMcupdaterInstance", "generalSettings.detectMCUpdaterInstance"),
    ("detectTechnicPack", "generalSettings.detectTechnicPack"),
    ("detectBiomeData", "generalSettings.detectBiomeData"),
    ("detectDimensionData", "generalSettings.detectDimensionData"),
    ("detectWorldData", "generalSettings.detectWorldData"),
    ("clientId", "generalSettings.clientId"),
    ("defaultIcon", "generalSettings.defaultIcon"),
    ("enableJoinRequests", "generalSettings.enableJoinRequests"),
    ("preferredClient", "generalSettings.preferredClientLevel"),
    ("resetTimeOnInit", "generalSettings.resetTimeOnInit"),
    ("autoRegister", "generalSettings.autoRegister"),
    ("defaultBiomeIcon", "biomeSettings.fallbackBiomeIcon"),
    ("biomeMessages", "biomeSettings.biomeData"),
    ("defaultDimensionIcon", "dimensionSettings.fallbackDimensionIcon"),
    ("dimensionMessages", "dimensionSettings.dimensionData"),
    ("defaultServerIcon", "serverSettings.fallbackServerIcon"),
    ("defaultServerName", "serverSettings.fallbackServerName"),
    ("defaultServerMotd", "serverSettings.fallbackServerMotd"),
    ("serverMessages", "serverSettings.serverData"),
    ("mainMenuMessage", "statusMessages.mainMenuData.textOverride"),
    ("loadingMessage", "statusMessages.loadingData.textOverride"),
    ("lanGameMessage", "statusMessages.lanData.textOverride"),
    ("singleplayerGameMessage", "statusMessages.singleplayerData.textOverride"),
    ("modpackMessage", "displaySettings.dynamicVariables.pack"),
    ("playerOuterInfoPlaceholder", "displaySettings.dynamicVariables.player_info_out"),
    ("playerInnerInfoPlaceholder", "displaySettings.dynamicVariables.player_info_in"),
    ("playerCoordinatePlaceholder", "displaySettings.dynamicVariables.player_info_coordinate"),
    ("playerHealthPlaceholder", "displaySettings.dynamicVariables.player_info_health"),
    ("playerListPlaceholder", "displaySettings.dynamicVariables.players"),
    ("playerItemsPlaceholder", "displaySettings.dynamicVariables.player_info_items"),
    ("worldDataPlaceholder", "displaySettings.dynamicVariables.world_info"),
    ("modsPlaceholder", "displaySettings.dynamicVariables.mods"),
    ("enablePerGuiSystem", "advancedSettings.enablePerGui"),
    ("enablePerItemSystem", "advancedSettings.enablePerItem"),
    ("enablePerEntitySystem", "advancedSettings.enablePerEntity"),
    ("renderTooltips", "accessibilitySettings.renderTooltips"),
    ("formatWords", "advancedSettings.formatWords"),
    ("debugMode", "advancedSettings.debugMode"),
    ("verboseMode", "advancedSettings.verboseMode"),
    ("refreshRate", "advancedSettings.refreshRate"),
    ("allowPlaceholderPreviews", "advancedSettings.allowPlaceholderPreviews"),
    ("guiMessages", "advancedSettings.guiSettings.guiData"),
    ("itemMessages", "advancedSettings.itemMessages"),
    ("entityTargetMessages", "advancedSettings.entitySettings.targetData"),
    ("entityRidingMessages", "advancedSettings.entitySettings.ridingData"),
    ("playerSkinEndpoint", "advancedSettings.playerSkinEndpoint"),
    ("languageId", "accessibilitySettings.languageId"),
    ("stripTranslationColors", "accessibilitySettings.stripTranslationColors"),
    ("stripExtraGuiElements", "accessibilitySettings.stripExtraGuiElements"),
    ("configGuiKeybind", "accessibilitySettings.configKeyCode"),
    ("gameStateMessageFormat", "displaySettings.presenceData.gameState"),
    ("detailsMessageFormat", "displaySettings.presenceData.details"),
    ("largeImageTextFormat", "displaySettings.presenceData.largeImageText"),
    ("smallImageTextFormat", "displaySettings.presenceData.smallImageText"),
    ("largeImageKeyFormat", "displaySettings.presenceData.largeImageKey"),
    ("smallImageKeyFormat", "displaySettings.presenceData.smallImageKey"),
    ("extraButtonMessages", "displaySettings.presenceData.buttons"),
    ("dynamicIcons", "displaySettings.dynamicIcons"),
];

/// Whether a value names text or an image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Text,
    Icon,
}

impl Slot {
    fn for_name(name: &str) -> Self {
        if name.contains("ImageKey") {
            Self::Icon
        } else {
            Self::Text
        }
    }
}

struct PlaceholderRule {
    token: &'static str,
    replacement: &'static str,
    slot: Slot,
    only_in: Option<&'static str>,
}

const fn text(token: &'static str, replacement: &'static str) -> PlaceholderRule {
    PlaceholderRule {
        token,
        replacement,
        slot: Slot::Text,
        only_in: None,
    }
}

const fn icon(token: &'static str, replacement: &'static str) -> PlaceholderRule {
    PlaceholderRule {
        token,
        replacement,
        slot: Slot::Icon,
        only_in: None,
    }
}

const fn text_in(
    token: &'static str,
    replacement: &'static str,
    option: &'static str,
) -> PlaceholderRule {
    PlaceholderRule {
        token,
        replacement,
        slot: Slot::Text,
        only_in: Some(option),
    }
}

const fn icon_in(
    token: &'static str,
    replacement: &'static str,
    option: &'static str,
) -> PlaceholderRule {
    PlaceholderRule {
        token,
        replacement,
        slot: Slot::Icon,
        only_in: Some(option),
    }
}

const BIOMES: &str = "biomeMessages";
const DIMENSIONS: &str = "dimensionMessages";
const SERVERS: &str = "serverMessages";
const SCREENS: &str = "guiMessages";
const ITEMS: &str = "itemMessages";
const TARGETS: &str = "entityTargetMessages";
const RIDING: &str = "entityRidingMessages";
const OUTER_INFO: &str = "playerOuterInfoPlaceholder";
const INNER_INFO: &str = "playerInnerInfoPlaceholder";
const COORDINATES: &str = "playerCoordinatePlaceholder";
const HEALTH: &str = "playerHealthPlaceholder";
const PLAYER_LIST: &str = "playerListPlaceholder";
const PLAYER_ITEMS: &str = "playerItemsPlaceholder";
const WORLD_DATA: &str = "worldDataPlaceholder";

// Applied top to bottom; scoped rules precede their generic fallbacks.
const PLACEHOLDER_RULES: &[PlaceholderRule] = &[
    icon("&DEFAULT&", "{general.icon}"),
    text("&MAINMENU&", "{menu.message}"),
    icon("&MAINMENU&", "{menu.icon}"),
    text("&BRAND&", "{general.brand}"),
    text("&MCVERSION&", "{general.version}"),
    text("&IGN&", "{custom.player_info_out}"),
    icon("&IGN&", "{player.icon}"),
    text("&IGN:NAME&", "{player.name}"),
    text_in("&NAME&", "{player.name}", OUTER_INFO),
    text("&IGN:UUID&", "{player.uuid.short}"),
    text_in("&UUID&", "{player.uuid.short}", OUTER_INFO),
    text("&IGN:UUID_FULL&", "{player.uuid.full}"),
    text_in("&UUID_FULL&", "{player.uuid.full}", OUTER_INFO),
    text("&MODS&", "{custom.mods}"),
    text("&MODS:MODCOUNT&", "{general.mods}"),
    text_in("&MODCOUNT&", "{general.mods}", "modsPlaceholder"),
    text("&PACK&", "{custom.pack}"),
    icon("&PACK&", "{pack.icon}"),
    text("&PACK:NAME&", "{pack.name}"),
    text_in("&NAME&", "{pack.name}", "modpackMessage"),
    text("&DIMENSION:DIMENSION&", "{dimension.name}"),
    text_in("&DIMENSION&", "{dimension.name}", DIMENSIONS),
    text("&DIMENSION&", "{dimension.message}"),
    icon("&DIMENSION:ICON&", "{dimension.icon}"),
    icon_in("&ICON&", "{dimension.icon}", DIMENSIONS),
    icon("&DIMENSION&", "{dimension.icon}"),
    text("&BIOME:BIOME&", "{biome.name}"),
    text_in("&BIOME&", "{biome.name}", BIOMES),
    text("&BIOME&", "{biome.message}"),
    icon("&BIOME:ICON&", "{biome.icon}"),
    icon_in("&ICON&", "{biome.icon}", BIOMES),
    icon("&BIOME&", "{biome.icon}"),
    text("&SERVER:IP&", "{server.address.short}"),
    text_in("&IP&", "{server.address.short}", SERVERS),
    text("&SERVER:NAME&", "{server.name}"),
    text_in("&NAME&", "{server.name}", SERVERS),
    text("&SERVER:MOTD&", "{server.motd.raw}"),
    text_in("&MOTD&", "{server.motd.raw}", SERVERS),
    text("&SERVER&", "{server.message}"),
    icon("&SERVER:ICON&", "{server.icon}"),
    icon_in("&ICON&", "{server.icon}", SERVERS),
    icon("&SERVER&", "{server.icon}"),
    text("&SERVER:PLAYERS&", "{custom.players}"),
    text_in("&PLAYERS&", "{custom.players}", SERVERS),
    text("&SERVER:WORLDINFO&", "{custom.world_info}"),
    text_in("&WORLDINFO&", "{custom.world_info}", SERVERS),
    text("&SERVER:PLAYERINFO&", "{custom.player_info_in}"),
    text_in("&PLAYERINFO&", "{custom.player_info_in}", SERVERS),
    text("&SERVER:PLAYERINFO:COORDS&", "{custom.player_info_coordinate}"),
    text_in("&PLAYERINFO:COORDS&", "{custom.player_info_coordinate}", SERVERS),
    text_in("&COORDS&", "{custom.player_info_coordinate}", INNER_INFO),
    text("&SERVER:PLAYERINFO:HEALTH&", "{custom.player_info_health}"),
    text_in("&PLAYERINFO:HEALTH&", "{custom.player_info_health}", SERVERS),
    text_in("&HEALTH&", "{custom.player_info_health}", INNER_INFO),
    text("&SERVER:PLAYERINFO:COORDS:xPosition&", "{player.position.x}"),
    text_in("&PLAYERINFO:COORDS:xPosition&", "{player.position.x}", SERVERS),
    text_in("&COORDS:xPosition&", "{player.position.x}", INNER_INFO),
    text_in("&xPosition&", "{player.position.x}", COORDINATES),
    text("&SERVER:PLAYERINFO:COORDS:yPosition&", "{player.position.y}"),
    text_in("&PLAYERINFO:COORDS:yPosition&", "{player.position.y}", SERVERS),
    text_in("&COORDS:yPosition&", "{player.position.y}", INNER_INFO),
    text_in("&yPosition&", "{player.position.y}", COORDINATES),
    text("&SERVER:PLAYERINFO:COORDS:zPosition&", "{player.position.z}"),
    text_in("&PLAYERINFO:COORDS:zPosition&", "{player.position.z}", SERVERS),
    text_in("&COORDS:zPosition&", "{player.position.z}", INNER_INFO),
    text_in("&zPosition&", "{player.position.z}", COORDINATES),
    text("&SERVER:PLAYERINFO:HEALTH:CURRENT&", "{player.health.current}"),
    text_in("&PLAYERINFO:HEALTH:CURRENT&", "{player.health.current}", SERVERS),
    text_in("&HEALTH:CURRENT&", "{player.health.current}", INNER_INFO),
    text_in("&CURRENT&", "{player.health.current}", HEALTH),
    text("&SERVER:PLAYERINFO:HEALTH:MAX&", "{player.health.max}"),
    text_in("&PLAYERINFO:HEALTH:MAX&", "{player.health.max}", SERVERS),
    text_in("&HEALTH:MAX&", "{player.health.max}", INNER_INFO),
    text_in("&MAX&", "{player.health.max}", HEALTH),
    text("&SERVER:PLAYERS:CURRENT&", "{server.players.current}"),
    text_in("&PLAYERS:CURRENT&", "{server.players.current}", SERVERS),
    text_in("&CURRENT&", "{server.players.current}", PLAYER_LIST),
    text("&SERVER:PLAYERS:MAX&", "{server.players.max}"),
    text_in("&PLAYERS:MAX&", "{server.players.max}", SERVERS),
    text_in("&MAX&", "{server.players.max}", PLAYER_LIST),
    text("&SERVER:WORLDINFO:DIFFICULTY&", "{world.difficulty}"),
    text_in("&WORLDINFO:DIFFICULTY&", "{world.difficulty}", SERVERS),
    text_in("&DIFFICULTY&", "{world.difficulty}", WORLD_DATA),
    text("&SERVER:WORLDINFO:WORLDNAME&", "{world.name}"),
    text_in("&WORLDINFO:WORLDNAME&", "{world.name}", SERVERS),
    text_in("&WORLDNAME&", "{world.name}", WORLD_DATA),
    text("&SERVER:WORLDINFO:WORLDTIME&", "{world.time.format_24}"),
    text_in("&WORLDINFO:WORLDTIME&", "{world.time.format_24}", SERVERS),
    text_in("&WORLDTIME&", "{world.time.format_24}", WORLD_DATA),
    text("&SERVER:WORLDINFO:WORLDTIME12&", "{world.time.format_12}"),
    text_in("&WORLDINFO:WORLDTIME12&", "{world.time.format_12}", SERVERS),
    text_in("&WORLDTIME12&", "{world.time.format_12}", WORLD_DATA),
    text("&SERVER:WORLDINFO:WORLDDAY&", "{world.time.day}"),
    text_in("&WORLDINFO:WORLDDAY&", "{world.time.day}", SERVERS),
    text_in("&WORLDDAY&", "{world.time.day}", WORLD_DATA),
    text("&SCREEN:SCREEN&", "{screen.name}"),
    text_in("&SCREEN&", "{screen.name}", SCREENS),
    text("&SCREEN&", "{screen.message}"),
    icon("&SCREEN:ICON&", "{screen.icon}"),
    icon_in("&ICON&", "{screen.icon}", SCREENS),
    icon("&SCREEN&", "{screen.icon}"),
    text("&SCREEN:CLASS&", "{getClass(data.screen.instance)}"),
    text_in("&CLASS&", "{getClass(data.screen.instance)}", SCREENS),
    text("&TARGETENTITY:ENTITY&", "{entity.target.name}"),
    text_in("&ENTITY&", "{entity.target.name}", TARGETS),
    text("&TARGETENTITY&", "{entity.target.message}"),
    icon("&TARGETENTITY:ICON&", "{entity.target.icon}"),
    icon_in("&ICON&", "{entity.target.icon}", TARGETS),
    icon("&TARGETENTITY&", "{entity.target.icon}"),
    text("&RIDINGENTITY:ENTITY&", "{entity.riding.name}"),
    text_in("&ENTITY&", "{entity.riding.name}", RIDING),
    text("&RIDINGENTITY&", "{entity.riding.message}"),
    icon("&RIDINGENTITY:ICON&", "{entity.riding.icon}"),
    icon_in("&ICON&", "{entity.riding.icon}", RIDING),
    icon("&RIDINGENTITY&", "{entity.riding.icon}"),
    text("&TILEENTITY:MAIN&", "{item.main_hand.message}"),
    text_in("&MAIN&", "{item.main_hand.message}", PLAYER_ITEMS),
    text("&TILEENTITY:OFFHAND&", "{item.off_hand.message}"),
    text_in("&OFFHAND&", "{item.off_hand.message}", PLAYER_ITEMS),
    text("&TILEENTITY:HELMET&", "{item.helmet.message}"),
    text_in("&HELMET&", "{item.helmet.message}", PLAYER_ITEMS),
    text("&TILEENTITY:CHEST&", "{item.chestplate.message}"),
    text_in("&CHEST&", "{item.chestplate.message}", PLAYER_ITEMS),
    text("&TILEENTITY:LEGS&", "{item.leggings.message}"),
    text_in("&LEGS&", "{item.leggings.message}", PLAYER_ITEMS),
    text("&TILEENTITY:BOOTS&", "{item.boots.message}"),
    text_in("&BOOTS&", "{item.boots.message}", PLAYER_ITEMS),
    text("&TILEENTITY&", "{item.message.default}"),
    text_in("&ITEM&", "{item.message.holding}", ITEMS),
];

fn compiled_rules() -> &'static [(&'static PlaceholderRule, Regex)] {
    static RULES: OnceLock<Vec<(&'static PlaceholderRule, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        PLACEHOLDER_RULES
            .iter()
            .map(|rule| {
                let pattern = Regex::new(&format!("(?i){}", regex::escape(rule.token)))
                    .unwrap_or_else(|e| unreachable!("escaped token is valid: {e}"));
                (rule, pattern)
            })
            .collect()
    })
}

fn fallback_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([^{}]*)}\|\{([^{}]*)}")
            .unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
    })
}

/// Rewrites legacy `&TOKEN&` placeholders in a value of the legacy option
/// `option`, then turns `{a}|{b}` fallbacks into conditional expressions.
fn rewrite_placeholders(input: &str, option: &str, slot: Slot) -> String {
    let mut result = input.to_string();
    for (rule, pattern) in compiled_rules() {
        let in_scope = rule
            .only_in
            .map_or(true, |only| only.eq_ignore_ascii_case(option));
        if rule.slot == slot && in_scope && pattern.is_match(&result) {
            log::debug!(
                "replacing {} with {} in legacy option {option}",
                rule.token,
                rule.replacement
            );
            result = pattern
                .replace_all(&result, NoExpand(rule.replacement))
                .into_owned();
        }
    }
    fallback_pattern()
        .replace_all(&result, |caps: &Captures<'_>| {
            format!("{{{first} != null ? {first} : {second}}}", first = &caps[1], second = &caps[2])
        })
        .into_owned()
}

/// Key-value pairs of a Java-style properties file, in file order.
///
/// Supports `#`/`!` comments, `=`, `:` or whitespace separators, backslash
/// line continuations and `\uXXXX` escapes. A repeated key keeps its last
/// value at the position of its first occurrence.
///
/// # Examples
///
/// ```
/// use presence_config::import::PropertiesFile;
///
/// let file = PropertiesFile::parse("# comment\nCLIENT_ID = 123\nDEBUG_MODE:true\n");
/// assert_eq!(file.get("CLIENT_ID"), Some("123"));
/// assert_eq!(file.get("DEBUG_MODE"), Some("true"));
/// assert_eq!(file.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesFile {
    entries: Vec<(String, String)>,
}

impl PropertiesFile {
    /// Parses properties text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            let mut logical = line.trim_start().to_string();
            if logical.is_empty() || logical.starts_with(['#', '!']) {
                continue;
            }
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let (key, value) = (unescape(key), unescape(value));
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self { entries }
    }

    /// Reads and parses a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Value of `key`, compared exactly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the file held no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn split_character(&self) -> &str {
        self.iter()
            .find(|(key, _)| to_camel_case(key) == SPLIT_CHARACTER_KEY)
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_SPLIT_CHARACTER)
    }
}

/// An odd number of trailing backslashes continues the line.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            let mut rest = line[index..].trim_start();
            if let Some(stripped) = rest.strip_prefix(['=', ':']) {
                rest = stripped.trim_start();
            }
            return (&line[..index], rest);
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Imports a legacy properties file into a graph and removes the file.
///
/// # Examples
///
/// ```
/// use presence_config::import::PropertiesImport;
/// use presence_config::{ConfigGraph, LogLevel, Logger};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = PropertiesImport::locate(dir.path(), "craftpresence");
/// std::fs::write(&path, "DEBUG_MODE=true\n").unwrap();
///
/// let mut graph = ConfigGraph::default();
/// let changed = PropertiesImport::new(&path)
///     .apply(&mut graph, &Logger::new(LogLevel::Quiet))
///     .unwrap();
/// assert_eq!(changed, 1);
/// assert!(graph.advanced_settings.debug_mode);
/// assert!(!path.exists());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesImport {
    path: PathBuf,
}

impl PropertiesImport {
    /// An import reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the legacy file of `mod_id` lives inside `config_dir`.
    #[must_use]
    pub fn locate(config_dir: &Path, mod_id: &str) -> PathBuf {
        config_dir.join(format!("{mod_id}.{LEGACY_EXTENSION}"))
    }

    /// Location of the legacy file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, writes every recognized property into `graph`, then
    /// deletes the file. Returns the number of properties changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. The file is kept in
    /// that case.
    pub fn apply(&self, graph: &mut ConfigGraph, logger: &Logger) -> Result<usize> {
        logger.emit(&LogMessage::LegacyImport {
            path: self.path.clone(),
        });
        let file = PropertiesFile::read(&self.path)?;
        let changed = import_properties(&file, graph, logger)?;

        if let Err(err) = fs::remove_file(&self.path) {
            logger.error(&format!(
                "Failed to remove {}: {err}",
                self.path.display()
            ));
        }
        Ok(changed)
    }
}

/// Writes every recognized entry of `file` into `graph`. Returns the
/// number of properties changed.
///
/// # Errors
///
/// Returns an error if a converted value cannot be written back.
pub fn import_properties(
    file: &PropertiesFile,
    graph: &mut ConfigGraph,
    logger: &Logger,
) -> Result<usize> {
    let split = file.split_character();
    let mut changed = 0;

    for (key, raw) in file.iter() {
        let name = to_camel_case(key);
        if name.is_empty() || EXCLUDED.contains(&name.as_str()) {
            continue;
        }

        let (target, value) = if name == SHOW_TIME_KEY {
            let Some(show) = parse_boolean(raw.trim()) else {
                continue;
            };
            let expr = if show { ELAPSED_TIME_EXPR } else { "" };
            (PropertyPath::parse(START_TIMESTAMP_PATH), Property::from(expr))
        } else {
            let target = NAME_MAP
                .iter()
                .find(|(legacy, _)| *legacy == name)
                .map_or_else(|| PropertyPath::parse(&name), |(_, path)| PropertyPath::parse(path));
            let Some(current) = graph.get(&target) else {
                log::debug!("legacy option {name} has no counterpart");
                continue;
            };
            let Some(value) = convert(&current, raw, &name, split) else {
                continue;
            };
            if value == current {
                continue;
            }
            (target, value)
        };

        graph.set(&target, value)?;
        logger.emit(&LogMessage::ImportedProperty {
            legacy: name,
            path: target.to_string(),
        });
        changed += 1;
    }
    Ok(changed)
}

/// Converts a legacy value to the kind of `current`.
fn convert(current: &Property, raw: &str, name: &str, split: &str) -> Option<Property> {
    match current {
        Property::Bool(_) => parse_boolean(raw.trim()).map(Property::Bool),
        Property::Int(_) => parse_integer(raw.trim()).map(Property::Int),
        Property::Text(_) => Some(Property::Text(rewrite_placeholders(
            raw,
            name,
            Slot::for_name(name),
        ))),
        Property::Dictionary(dictionary) => {
            parse_dictionary(raw, dictionary, name, split).map(Property::Dictionary)
        }
        Property::Section(_) => None,
    }
}

/// Parses `[key;a;b, key2;a]` into a dictionary of the same entry kind as
/// `current`. The `default` entry of `current` survives when the legacy
/// list has none.
fn parse_dictionary(raw: &str, current: &Dictionary, name: &str, split: &str) -> Option<Dictionary> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return None;
    }
    let body = trimmed.replace(['[', ']'], "");
    let items: Vec<&str> = if body.contains(", ") {
        body.split(", ").collect()
    } else {
        body.split(',').collect()
    };

    let mut parsed = match current {
        Dictionary::Text(_) => Dictionary::Text(OrdMap::new()),
        Dictionary::Modules(_) => Dictionary::Modules(OrdMap::new()),
        Dictionary::Buttons(_) => Dictionary::Buttons(OrdMap::new()),
    };
    for item in items.into_iter().filter(|item| !item.is_empty()) {
        let parts: Vec<&str> = item.split(split).collect();
        let key = parts[0];
        if key.is_empty() {
            continue;
        }
        let field = |index: usize, slot: Slot| {
            parts
                .get(index)
                .filter(|part| !part.is_empty())
                .map(|part| rewrite_placeholders(part, name, slot))
        };
        let entry = match current {
            Dictionary::Text(_) => Property::Text(field(1, Slot::Text).unwrap_or_default()),
            Dictionary::Modules(_) => Property::Section(AnySection::Module(ModuleData {
                text_override: field(1, Slot::Text),
                icon_override: field(2, Slot::Icon),
                data: None,
            })),
            Dictionary::Buttons(_) => Property::Section(AnySection::Button(Button::new(
                field(1, Slot::Text).unwrap_or_default(),
                field(2, Slot::Text).unwrap_or_default(),
            ))),
        };
        parsed = parsed.with_entry(key, entry).ok()?;
    }

    if !parsed.has_default() {
        if let Some(default) = current.get(DEFAULT_KEY) {
            parsed = parsed.with_entry(DEFAULT_KEY, default).ok()?;
        }
    }
    Some(parsed)
}
