//! Import of SimpleRPC TOML configurations.
//!
//! SimpleRPC keeps a main `simple-rpc.toml`, optional per-server entries in
//! `server-entries.toml` and optional replay screens in
//! `simple-rpc-replaymod.toml`. Which features a file uses depends on its
//! declared version; see [`Feature`].

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use toml::{Table, Value};

use crate::error::Result;
use crate::logging::Logger;
use crate::messages::LogMessage;
use crate::schema::{Button, ConfigGraph, ModuleData, PresenceData, DEFAULT_KEY};

/// Main configuration file name.
pub const SIMPLE_RPC_FILE: &str = "simple-rpc.toml";
/// Per-server entries file name.
pub const SERVER_ENTRIES_FILE: &str = "server-entries.toml";
/// Replay screen file name.
pub const REPLAY_MOD_FILE: &str = "simple-rpc-replaymod.toml";
/// Directory name used by newer SimpleRPC releases.
pub const SIMPLE_RPC_DIR: &str = "simple-rpc";

/// Oldest and newest `general.version` that can be imported.
pub const SUPPORTED_VERSIONS: RangeInclusive<i64> = 13..=26;
/// Versions written by releases whose layout cannot be imported.
pub const UNSUPPORTED_RELEASES: RangeInclusive<i64> = 19..=23;

const START_TIMESTAMP: &str = "{data.general.time}";

const LEGACY_PLACEHOLDERS: &[(&str, &str)] = &[
    ("%player%", "{player.name}"),
    ("%world%", "{dimension.name}"),
    ("%mods%", "{general.mods}"),
    ("%difficulty%", "{world.difficulty}"),
    (
        "%position%",
        "{'x: ' + player.position.x + ', y: ' + player.position.y + ', z: ' + player.position.z}",
    ),
    ("%biome%", "{biome.name}"),
    ("%mcver%", "{general.version}"),
    ("%instance%", "{pack.name}"),
    ("%launcher%", "{general.brand}"),
    ("%server%", "{replace(server.address.short, '.', '_')}"),
    ("%launchername%", "{toLower(general.brand)}"),
    ("%savename%", "{world.name}"),
    ("%playerhead%", "{player.icon}"),
    ("%gametime12%", "{world.time.format_12}"),
    ("%gametime%", "{world.time.format_24}"),
    ("%day%", "{world.day}"),
    ("%weather%", "{world.weather.name}"),
    ("%replayframe%", "{replaymod.frames.current}"),
    ("%replaytotal%", "{replaymod.frames.total}"),
    ("%replaytime%", "{replaymod.time.current}"),
    ("%replaytimeleft%", "{replaymod.time.remaining}"),
    ("%serverip%", "{server.address.short}"),
    ("%servername%", "{server.name}"),
    ("%players%", "{server.players.current}"),
    ("%playersexcl%", "{server.players.current - 1}"),
    ("%maxplayers%", "{server.players.max}"),
    ("%motd%", "{server.motd.raw}"),
    ("%servericon%", "{server.icon}"),
    ("%realmname%", "{server.name}"),
    ("%realmdescription%", "{server.motd.raw}"),
    ("%realmgame%", "{server.minigame}"),
    ("%realmicon%", "{server.icon}"),
];

const PLACEHOLDERS: &[(&str, &str)] = &[
    ("{{game.version}}", "{general.version}"),
    ("{{game.mods}}", "{general.mods}"),
    ("{{player.name}}", "{player.name}"),
    ("{{player.uuid}}", "{player.uuid.full}"),
    ("{{world.name}}", "{dimension.name}"),
    ("{{world.difficulty}}", "{world.difficulty}"),
    ("{{world.savename}}", "{world.name}"),
    ("{{world.time.12}}", "{world.time.format_12}"),
    ("{{world.time.24}}", "{world.time.format_24}"),
    ("{{world.time.day}}", "{world.day}"),
    ("{{world.weather}}", "{world.weather.name}"),
    ("{{world.biome}}", "{biome.name}"),
    (
        "{{player.position}}",
        "{'x: ' + player.position.x + ', y: ' + player.position.y + ', z: ' + player.position.z}",
    ),
    ("{{player.health.current}}", "{player.health.current}"),
    ("{{player.health.max}}", "{player.health.max}"),
    (
        "{{player.health.percent}}",
        "{(player.health.current / player.health.max) * 100}",
    ),
    ("{{player.item.off_hand}}", "{item.off_hand.name}"),
    ("{{player.item.main_hand}}", "{item.main_hand.name}"),
    (
        "{{images.player}}",
        "https://skinatar.firstdark.dev/avatar/{getOrDefault(player.uuid.short, player.name)}",
    ),
    (
        "{{images.player.head}}",
        "https://skinatar.firstdark.dev/head/{getOrDefault(player.uuid.short, player.name)}",
    ),
    ("{{images.realm}}", "{server.icon}"),
    ("{{images.server}}", "{server.icon}"),
    ("{{server.ip}}", "{server.address.short}"),
    (
        "{{server.ip_underscore}}",
        "{replace(server.address.short, '.', '_')}",
    ),
    ("{{server.name}}", "{server.name}"),
    ("{{server.motd}}", "{server.motd.raw}"),
    ("{{server.players.count}}", "{server.players.current}"),
    ("{{server.players.countexcl}}", "{server.players.current - 1}"),
    ("{{server.players.max}}", "{server.players.max}"),
    ("{{realm.name}}", "{server.name}"),
    ("{{realm.description}}", "{server.motd.raw}"),
    ("{{realm.world}}", "{server.type}"),
    ("{{realm.game}}", "{server.minigame}"),
    ("{{realm.players.count}}", "{server.players.count}"),
    ("{{realm.players.max}}", "{server.players.max}"),
    ("{{replaymod.time.elapsed}}", "{replaymod.time.current}"),
    ("{{replaymod.time.left}}", "{replaymod.time.remaining}"),
    ("{{replaymod.frames.current}}", "{replaymod.frames.current}"),
    ("{{replaymod.frames.total}}", "{replaymod.frames.total}"),
    ("{{launcher.name}}", "{general.brand}"),
    ("{{launcher.pack}}", "{pack.name}"),
    ("{{launcher.icon}}", "{pack.icon}"),
];

fn expression_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{(.*?)}").unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
    })
}

/// A SimpleRPC capability and the first file versions that have it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Image keys may be lists picked from at random.
    ImagePools,
    /// Events hold a `presence` list and use `{{a.b}}` placeholders.
    MultiRpc,
    /// The pause screen has its own event.
    PauseEvent,
}

impl Feature {
    /// First (main, server entries, replay mod) versions with the feature.
    #[must_use]
    pub const fn since(self) -> (i64, i64, i64) {
        match self {
            Self::ImagePools => (17, 2, 1),
            Self::MultiRpc => (24, 3, 1),
            Self::PauseEvent => (25, 3, 1),
        }
    }
}

/// Versions of the files read so far; `-1` for files not read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileVersions {
    config: i64,
    server_entries: i64,
    replay_mod: i64,
}

impl FileVersions {
    fn has(self, feature: Feature) -> bool {
        let (config, server_entries, replay_mod) = feature.since();
        let meets = |found: i64, needed: i64| found < 0 || found >= needed;
        meets(self.config, config)
            && meets(self.server_entries, server_entries)
            && meets(self.replay_mod, replay_mod)
    }
}

/// Where a SimpleRPC installation was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRpcSource {
    /// Layout generation: 0 for the shared config directory, 31 for the
    /// game directory, 32 for the nested config directory.
    pub file_version: i32,
    /// Directory holding the TOML files.
    pub dir: PathBuf,
}

impl SimpleRpcSource {
    /// Looks for `simple-rpc.toml` in every known location, oldest layout
    /// first. The first hit wins.
    #[must_use]
    pub fn probe(config_dir: &Path, user_dir: &Path) -> Option<Self> {
        [
            (0, config_dir.to_path_buf()),
            (31, user_dir.join(SIMPLE_RPC_DIR)),
            (32, config_dir.join(SIMPLE_RPC_DIR)),
        ]
        .into_iter()
        .map(|(file_version, dir)| Self { file_version, dir })
        .find(|source| source.config_path().is_file())
    }

    /// Path of the main file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(SIMPLE_RPC_FILE)
    }

    /// Path of the server entries file.
    #[must_use]
    pub fn server_entries_path(&self) -> PathBuf {
        self.dir.join(SERVER_ENTRIES_FILE)
    }

    /// Path of the replay screens file.
    #[must_use]
    pub fn replay_mod_path(&self) -> PathBuf {
        self.dir.join(REPLAY_MOD_FILE)
    }
}

/// Result of a SimpleRPC import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleRpcOutcome {
    /// Settings were imported from a file of this version.
    Imported {
        /// Declared `general.version`.
        version: i64,
    },
    /// The file was left alone.
    Unsupported {
        /// Declared `general.version`, `-1` if absent.
        version: i64,
    },
}

/// Converts a SimpleRPC installation into graph settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRpcImport {
    source: SimpleRpcSource,
}

impl SimpleRpcImport {
    /// An import of the installation at `source`.
    #[must_use]
    pub fn new(source: SimpleRpcSource) -> Self {
        Self { source }
    }

    /// The installation being imported.
    #[must_use]
    pub fn source(&self) -> &SimpleRpcSource {
        &self.source
    }

    /// Imports every file of the installation into `graph`.
    ///
    /// Files are left in place; SimpleRPC may still be installed.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or is not valid
    /// TOML.
    pub fn apply(&self, graph: &mut ConfigGraph, logger: &Logger) -> Result<SimpleRpcOutcome> {
        let path = self.source.config_path();
        let config = read_table(&path)?;
        let version = lookup(&config, "general.version")
            .and_then(Value::as_integer)
            .unwrap_or(-1);
        logger.emit(&LogMessage::SimpleRpcImport {
            path: path.clone(),
            version,
        });
        log::debug!(
            "simple-rpc main config v{version}, layout {}",
            self.source.file_version
        );

        let reason = if !SUPPORTED_VERSIONS.contains(&version) {
            Some(format!(
                "unsupported config version v{version} (supported: v{} - v{})",
                SUPPORTED_VERSIONS.start(),
                SUPPORTED_VERSIONS.end()
            ))
        } else if UNSUPPORTED_RELEASES.contains(&version) {
            Some("written by an unsupported release, update it with a newer SimpleRPC first".into())
        } else {
            None
        };
        if let Some(reason) = reason {
            logger.emit(&LogMessage::UnsupportedImport { path, reason });
            return Ok(SimpleRpcOutcome::Unsupported { version });
        }

        let mut converter = Converter {
            versions: FileVersions {
                config: version,
                server_entries: -1,
                replay_mod: -1,
            },
        };
        converter.main_config(&config, graph);

        let server_entries = self.source.server_entries_path();
        if server_entries.is_file() {
            let table = read_table(&server_entries)?;
            converter.versions.server_entries =
                table.get("version").and_then(Value::as_integer).unwrap_or(-1);
            converter.server_entries(&table, graph);
        }

        let replay_mod = self.source.replay_mod_path();
        if replay_mod.is_file() {
            let table = read_table(&replay_mod)?;
            converter.versions.replay_mod = lookup(&table, "general.version")
                .and_then(Value::as_integer)
                .unwrap_or(-1);
            converter.replay_mod(&table, graph);
        }

        logger.info("Simple RPC migration complete");
        Ok(SimpleRpcOutcome::Imported { version })
    }
}

fn read_table(path: &Path) -> Result<Table> {
    Ok(fs::read_to_string(path)?.parse::<Table>()?)
}

/// Resolves a dotted key through nested tables.
fn lookup<'a>(table: &'a Table, dotted: &str) -> Option<&'a Value> {
    let mut segments = dotted.split('.');
    let first = table.get(segments.next()?)?;
    segments.try_fold(first, |value, key| value.as_table()?.get(key))
}

fn lookup_bool(table: &Table, dotted: &str) -> Option<bool> {
    lookup(table, dotted).and_then(Value::as_bool)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(n) => Some(n.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_at(table: &Table, key: &str) -> String {
    table.get(key).and_then(scalar_string).unwrap_or_default()
}

fn tables(value: Option<&Value>) -> impl Iterator<Item = &Table> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_table)
}

fn activity_type(name: &str) -> i32 {
    match name.to_lowercase().as_str() {
        "streaming" => 1,
        "listening" => 2,
        "watching" => 3,
        "custom" => 4,
        "competing" => 5,
        _ => 0,
    }
}

struct Converter {
    versions: FileVersions,
}

impl Converter {
    fn placeholders(&self, original: &str, quoted: bool) -> String {
        let table = if self.versions.has(Feature::MultiRpc) {
            PLACEHOLDERS
        } else {
            LEGACY_PLACEHOLDERS
        };
        let start = if quoted {
            format!("'{original}'")
        } else {
            original.to_string()
        };
        table
            .iter()
            .fold(start, |acc, (from, to)| acc.replace(from, to))
    }

    fn text(&self, table: &Table, key: &str) -> String {
        self.placeholders(&string_at(table, key), false)
    }

    /// A single image key, or `{randomString(...)}` over a pool of them.
    fn image_pool(&self, value: Option<&Value>) -> String {
        match value {
            Some(Value::String(item)) => self.placeholders(item, false),
            Some(Value::Array(items)) => {
                let items: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                match items.as_slice() {
                    [] => String::new(),
                    [single] => self.placeholders(single, false),
                    many => {
                        let choices: Vec<String> = many
                            .iter()
                            .map(|item| {
                                let output = self.placeholders(item, true);
                                if expression_pattern().is_match(&output) {
                                    format!("getResult({output})")
                                } else {
                                    output
                                }
                            })
                            .collect();
                        format!("{{randomString({})}}", choices.join(","))
                    }
                }
            }
            _ => String::new(),
        }
    }

    /// The table holding the presence fields of an event.
    fn presence_entry<'t>(&self, entry: &'t Table) -> Option<&'t Table> {
        if self.versions.has(Feature::MultiRpc) {
            tables(entry.get("presence")).next()
        } else {
            Some(entry)
        }
    }

    fn event<'t>(&self, config: &'t Table, name: &str) -> Option<&'t Table> {
        config
            .get(name)
            .and_then(Value::as_table)
            .and_then(|entry| self.presence_entry(entry))
    }

    fn presence(&self, entry: &Table, enabled: bool, use_as_main: bool) -> PresenceData {
        let mut data = PresenceData {
            enabled,
            use_as_main,
            details: self.text(entry, "description"),
            game_state: self.text(entry, "state"),
            large_image_text: self.text(entry, "largeImageText"),
            small_image_text: self.text(entry, "smallImageText"),
            start_timestamp: START_TIMESTAMP.to_string(),
            ..PresenceData::default()
        };
        if self.versions.has(Feature::MultiRpc) {
            data.activity_type = activity_type(&string_at(entry, "type"));
        }
        if self.versions.has(Feature::ImagePools) {
            data.large_image_key = self.image_pool(entry.get("largeImageKey"));
            data.small_image_key = self.image_pool(entry.get("smallImageKey"));
        } else {
            data.large_image_key = self.text(entry, "largeImageKey");
            data.small_image_key = self.text(entry, "smallImageKey");
        }
        for (index, button) in tables(entry.get("buttons")).enumerate() {
            data.buttons.insert(
                format!("button_{}", index + 1),
                Button::new(self.text(button, "label"), self.text(button, "url")),
            );
        }
        data
    }

    fn event_presence(&self, entry: &Table) -> PresenceData {
        let enabled = entry.get("enabled").and_then(Value::as_bool).unwrap_or(true);
        self.presence(entry, enabled, true)
    }

    fn module(data: PresenceData) -> ModuleData {
        ModuleData {
            data: Some(data),
            ..ModuleData::default()
        }
    }

    fn main_config(&self, config: &Table, graph: &mut ConfigGraph) {
        let client_id = lookup(config, "general.applicationID")
            .or_else(|| lookup(config, "general.clientID"))
            .and_then(scalar_string);
        if let Some(client_id) = client_id {
            graph.general_settings.client_id = client_id;
        }
        if let Some(debugging) = lookup_bool(config, "general.debugging") {
            graph.advanced_settings.debug_mode = debugging;
        }
        if let Some(launchers) = lookup_bool(config, "general.launcherIntegration") {
            let general = &mut graph.general_settings;
            general.detect_at_launcher_instance = launchers;
            general.detect_curse_manifest = launchers;
            general.detect_mc_updater_instance = launchers;
            general.detect_technic_pack = launchers;
            general.detect_multi_mc_manifest = launchers;
        }

        let overrides_enabled = lookup_bool(config, "dimension_overrides.enabled").unwrap_or(false);
        for entry in tables(lookup(config, "dimension_overrides.dimensions")) {
            let name = string_at(entry, "name");
            let Some(target) = self.presence_entry(entry) else {
                continue;
            };
            let module = Self::module(self.presence(target, overrides_enabled, true));
            match name.strip_prefix("biome:").map(str::to_string) {
                Some(biome) => graph.biome_settings.biome_data.insert(biome, module),
                None => graph.dimension_settings.dimension_data.insert(name, module),
            };
        }

        if lookup_bool(config, "custom.enabled").unwrap_or(false) {
            for variable in tables(lookup(config, "custom.variables")) {
                let name = string_at(variable, "name");
                if name.is_empty() {
                    continue;
                }
                let value = self.text(variable, "value");
                graph.display_settings.dynamic_variables.insert(name, value);
            }
        }

        graph.advanced_settings.enable_per_gui = true;
        let mut screens: Vec<(&str, &str)> = vec![
            ("server_list", "GuiSelectServer"),
            ("server_list", "GuiConnectFailed"),
            ("join_game", "GuiDownloadTerrain"),
        ];
        if self.versions.has(Feature::PauseEvent) {
            screens.push(("paused", "GuiIngameMenu"));
        }
        self.screens(config, &screens, graph);

        let status = &mut graph.status_messages;
        for (event, slot) in [
            ("init", &mut status.loading_data),
            ("main_menu", &mut status.main_menu_data),
            ("realms", &mut status.realm_data),
            ("single_player", &mut status.singleplayer_data),
        ] {
            if let Some(entry) = self.event(config, event) {
                slot.data = Some(self.event_presence(entry));
            }
        }

        if let Some(entry) = self.event(config, "multi_player") {
            let servers = &mut graph.server_settings.server_data;
            let mut module = servers.get(DEFAULT_KEY).cloned().unwrap_or_default();
            module.data = Some(self.event_presence(entry));
            servers.insert(DEFAULT_KEY.to_string(), module);
        }

        if let Some(entry) = self.event(config, "generic") {
            graph.display_settings.presence_data = self.event_presence(entry);
        }
    }

    fn screens(&self, config: &Table, screens: &[(&str, &str)], graph: &mut ConfigGraph) {
        for (event, screen) in screens {
            if let Some(entry) = self.event(config, event) {
                graph
                    .advanced_settings
                    .gui_settings
                    .gui_data
                    .insert((*screen).to_string(), Self::module(self.event_presence(entry)));
            }
        }
    }

    fn server_entries(&self, table: &Table, graph: &mut ConfigGraph) {
        let enabled = table.get("enabled").and_then(Value::as_bool).unwrap_or(false);
        for entry in tables(table.get("entry")) {
            let address = string_at(entry, "ip");
            if address.is_empty() {
                continue;
            }
            if let Some(target) = self.presence_entry(entry) {
                let module = Self::module(self.presence(target, enabled, true));
                graph.server_settings.server_data.insert(address, module);
            }
        }
    }

    fn replay_mod(&self, table: &Table, graph: &mut ConfigGraph) {
        graph.advanced_settings.enable_per_gui = true;
        self.screens(
            table,
            &[
                ("replay_viewer", "GuiReplayViewer"),
                ("replay_editor", "GuiReplayOverlay"),
                ("replay_render", "GuiVideoRenderer"),
            ],
            graph,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::TempDir;

    const V18: &str = r#"
[general]
version = 18
clientID = "123456"
debugging = true
launcherIntegration = false

[dimension_overrides]
enabled = true

[[dimension_overrides.dimensions]]
name = "minecraft:the_nether"
description = "Burning in %world%"

[[dimension_overrides.dimensions]]
name = "biome:plains"
description = "Walking through %biome%"

[custom]
enabled = true

[[custom.variables]]
name = "greeting"
value = "Hello %player%"

[main_menu]
description = "In the menu"

[paused]
description = "Paused"

[generic]
description = "Playing as %player%"
state = "%difficulty%"
largeImageKey = ["grass", "%playerhead%"]
smallImageKey = "%launchername%"

[[generic.buttons]]
label = "Website"
url = "https://example.com"
"#;

    const V25: &str = r#"
[general]
version = 25
applicationID = 987

[[generic.presence]]
description = "As {{player.name}}"
type = "watching"
largeImageKey = "single"

[[paused.presence]]
description = "Taking a break"
enabled = false

[[multi_player.presence]]
description = "On {{server.name}}"
"#;

    fn quiet() -> Logger {
        Logger::new(LogLevel::Quiet)
    }

    fn install(dir: &Path, main: &str) -> SimpleRpcSource {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(SIMPLE_RPC_FILE), main).unwrap();
        SimpleRpcSource {
            file_version: 32,
            dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_probe_prefers_oldest_layout() {
        let config = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        assert!(SimpleRpcSource::probe(config.path(), user.path()).is_none());

        install(&config.path().join(SIMPLE_RPC_DIR), V18);
        let found = SimpleRpcSource::probe(config.path(), user.path()).unwrap();
        assert_eq!(found.file_version, 32);

        install(&user.path().join(SIMPLE_RPC_DIR), V18);
        let found = SimpleRpcSource::probe(config.path(), user.path()).unwrap();
        assert_eq!(found.file_version, 31);

        install(config.path(), V18);
        let found = SimpleRpcSource::probe(config.path(), user.path()).unwrap();
        assert_eq!(found.file_version, 0);
        assert_eq!(found.dir, config.path());
    }

    #[test]
    fn test_feature_thresholds() {
        let versions = |config| FileVersions {
            config,
            server_entries: -1,
            replay_mod: -1,
        };
        assert!(!versions(16).has(Feature::ImagePools));
        assert!(versions(17).has(Feature::ImagePools));
        assert!(!versions(18).has(Feature::MultiRpc));
        assert!(versions(24).has(Feature::MultiRpc));
        assert!(!versions(24).has(Feature::PauseEvent));
        let mut old_entries = versions(26);
        old_entries.server_entries = 2;
        assert!(!old_entries.has(Feature::MultiRpc));
    }

    #[test]
    fn test_import_pre_multi_rpc_config() {
        let dir = TempDir::new().unwrap();
        let source = install(dir.path(), V18);
        let mut graph = ConfigGraph::default();
        let outcome = SimpleRpcImport::new(source).apply(&mut graph, &quiet()).unwrap();
        assert_eq!(outcome, SimpleRpcOutcome::Imported { version: 18 });

        assert_eq!(graph.general_settings.client_id, "123456");
        assert!(graph.advanced_settings.debug_mode);
        assert!(!graph.general_settings.detect_curse_manifest);
        assert!(graph.general_settings.detect_modrinth_pack);
        assert!(graph.advanced_settings.enable_per_gui);

        let presence = &graph.display_settings.presence_data;
        assert_eq!(presence.details, "Playing as {player.name}");
        assert_eq!(presence.game_state, "{world.difficulty}");
        assert_eq!(
            presence.large_image_key,
            "{randomString('grass',getResult('{player.icon}'))}"
        );
        assert_eq!(presence.small_image_key, "{toLower(general.brand)}");
        assert_eq!(presence.start_timestamp, "{data.general.time}");
        assert!(presence.use_as_main);
        assert_eq!(
            presence.buttons.get("button_1"),
            Some(&Button::new("Website", "https://example.com"))
        );
        assert!(presence.buttons.contains_key(DEFAULT_KEY));

        let nether = graph
            .dimension_settings
            .dimension_data
            .get("minecraft:the_nether")
            .and_then(|m| m.data.as_ref())
            .unwrap();
        assert_eq!(nether.details, "Burning in {dimension.name}");
        assert!(nether.enabled);
        let plains = graph.biome_settings.biome_data.get("plains").unwrap();
        assert_eq!(
            plains.data.as_ref().unwrap().details,
            "Walking through {biome.name}"
        );

        assert_eq!(
            graph.display_settings.dynamic_variables.get("greeting").map(String::as_str),
            Some("Hello {player.name}")
        );
        assert_eq!(
            graph.status_messages.main_menu_data.data.as_ref().unwrap().details,
            "In the menu"
        );
        assert!(!graph.advanced_settings.gui_settings.gui_data.contains_key("GuiIngameMenu"));
        assert!(dir.path().join(SIMPLE_RPC_FILE).exists());
    }

    #[test]
    fn test_import_multi_rpc_config_with_side_files() {
        let dir = TempDir::new().unwrap();
        let source = install(dir.path(), V25);
        fs::write(
            source.server_entries_path(),
            r#"
version = 3
enabled = true

[[entry]]
ip = "mc.example.com"

[[entry.presence]]
description = "Mining on {{server.ip}}"
"#,
        )
        .unwrap();
        fs::write(
            source.replay_mod_path(),
            r#"
[general]
version = 1

[[replay_viewer.presence]]
description = "Watching frame {{replaymod.frames.current}}"
"#,
        )
        .unwrap();

        let mut graph = ConfigGraph::default();
        let outcome = SimpleRpcImport::new(source).apply(&mut graph, &quiet()).unwrap();
        assert_eq!(outcome, SimpleRpcOutcome::Imported { version: 25 });
        assert_eq!(graph.general_settings.client_id, "987");

        let presence = &graph.display_settings.presence_data;
        assert_eq!(presence.details, "As {player.name}");
        assert_eq!(presence.activity_type, 3);
        assert_eq!(presence.large_image_key, "single");

        let screens = &graph.advanced_settings.gui_settings.gui_data;
        let paused = screens.get("GuiIngameMenu").and_then(|m| m.data.as_ref()).unwrap();
        assert!(!paused.enabled);
        assert_eq!(
            screens
                .get("GuiReplayViewer")
                .and_then(|m| m.data.as_ref())
                .unwrap()
                .details,
            "Watching frame {replaymod.frames.current}"
        );

        let servers = &graph.server_settings.server_data;
        let default = servers.get(DEFAULT_KEY).unwrap();
        assert_eq!(default.data.as_ref().unwrap().details, "On {server.name}");
        assert_eq!(
            default.text_override,
            ConfigGraph::default()
                .server_settings
                .server_data
                .get(DEFAULT_KEY)
                .unwrap()
                .text_override
        );
        assert_eq!(
            servers
                .get("mc.example.com")
                .and_then(|m| m.data.as_ref())
                .unwrap()
                .details,
            "Mining on {server.address.short}"
        );
    }

    #[test]
    fn test_unsupported_versions_are_skipped() {
        for version in [12, 20, 27] {
            let dir = TempDir::new().unwrap();
            let source = install(
                dir.path(),
                &format!("[general]\nversion = {version}\nclientID = \"1\"\n"),
            );
            let mut graph = ConfigGraph::default();
            let outcome = SimpleRpcImport::new(source).apply(&mut graph, &quiet()).unwrap();
            assert_eq!(outcome, SimpleRpcOutcome::Unsupported { version });
            assert_eq!(graph, ConfigGraph::default());
        }
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let source = install(dir.path(), "[general\nversion = ");
        let err = SimpleRpcImport::new(source)
            .apply(&mut ConfigGraph::default(), &quiet())
            .unwrap_err();
        assert!(matches!(err, crate::Error::Toml(_)));
    }
}
