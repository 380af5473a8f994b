//! Top-level and nested settings sections.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::elements::{
    ColorData, ColorSection, ModuleData, ModuleMap, PresenceData, TextMap, DEFAULT_KEY,
};
use super::{lenient, DEFAULT_HOST_VERSION};
use crate::codes::keycodes::KEYCODE_EPOCH;
use crate::codes::locale::default_locale;

fn module_map(default: ModuleData) -> ModuleMap {
    OrdMap::unit(DEFAULT_KEY.to_string(), default)
}

fn text_map<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> TextMap {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Launcher detection and Discord client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneralSettings {
    /// Detect ATLauncher instances.
    #[serde(rename = "detectATLauncherInstance", deserialize_with = "lenient::boolean")]
    pub detect_at_launcher_instance: bool,
    /// Detect CurseForge manifests.
    #[serde(deserialize_with = "lenient::boolean")]
    pub detect_curse_manifest: bool,
    /// Detect MultiMC manifests.
    #[serde(rename = "detectMultiMCManifest", deserialize_with = "lenient::boolean")]
    pub detect_multi_mc_manifest: bool,
    /// Detect MCUpdater instances.
    #[serde(rename = "detectMCUpdaterInstance", deserialize_with = "lenient::boolean")]
    pub detect_mc_updater_instance: bool,
    /// Detect Technic packs.
    #[serde(deserialize_with = "lenient::boolean")]
    pub detect_technic_pack: bool,
    /// Detect Modrinth packs.
    #[serde(deserialize_with = "lenient::boolean")]
    pub detect_modrinth_pack: bool,
    /// Detect biome changes.
    #[serde(deserialize_with = "lenient::boolean")]
    pub detect_biome_data: bool,
    /// Detect dimension changes.
    #[serde(deserialize_with = "lenient::boolean")]
    pub detect_dimension_data: bool,
    /// Detect world data.
    #[serde(deserialize_with = "lenient::boolean")]
    pub detect_world_data: bool,
    /// Discord application id.
    #[serde(deserialize_with = "lenient::text")]
    pub client_id: String,
    /// Icon used when nothing more specific applies.
    #[serde(deserialize_with = "lenient::text")]
    pub default_icon: String,
    /// Accept join requests.
    #[serde(deserialize_with = "lenient::boolean")]
    pub enable_join_requests: bool,
    /// Preferred Discord client build ordinal.
    #[serde(deserialize_with = "lenient::integer")]
    pub preferred_client_level: i32,
    /// Restart the elapsed timer on every init.
    #[serde(deserialize_with = "lenient::boolean")]
    pub reset_time_on_init: bool,
    /// Register the client with Discord on first run.
    #[serde(deserialize_with = "lenient::boolean")]
    pub auto_register: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            detect_at_launcher_instance: true,
            detect_curse_manifest: true,
            detect_multi_mc_manifest: true,
            detect_mc_updater_instance: true,
            detect_technic_pack: true,
            detect_modrinth_pack: true,
            detect_biome_data: true,
            detect_dimension_data: true,
            detect_world_data: true,
            client_id: "450485984333660181".to_string(),
            default_icon: "grass".to_string(),
            enable_join_requests: false,
            preferred_client_level: 0,
            reset_time_on_init: false,
            auto_register: false,
        }
    }
}

/// Per-biome overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BiomeSettings {
    /// Icon used for biomes without an override.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_biome_icon: String,
    /// Overrides keyed by biome name.
    #[serde(deserialize_with = "lenient::object_map")]
    pub biome_data: ModuleMap,
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            fallback_biome_icon: "unknown".to_string(),
            biome_data: module_map(ModuleData::with_text("Playing in {biome.name}")),
        }
    }
}

/// Per-dimension overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DimensionSettings {
    /// Icon used for dimensions without an override.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_dimension_icon: String,
    /// Overrides keyed by dimension name.
    #[serde(deserialize_with = "lenient::object_map")]
    pub dimension_data: ModuleMap,
}

impl Default for DimensionSettings {
    fn default() -> Self {
        Self {
            fallback_dimension_icon: "unknown".to_string(),
            dimension_data: module_map(ModuleData::with_text("In the {dimension.name}")),
        }
    }
}

/// Multiplayer server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerSettings {
    /// Icon used for servers without an override.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_server_icon: String,
    /// Name shown for unlisted servers.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_server_name: String,
    /// Motd shown for unlisted servers.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_server_motd: String,
    /// Overrides keyed by server address.
    #[serde(deserialize_with = "lenient::object_map")]
    pub server_data: ModuleMap,
    /// How often servers are pinged.
    #[serde(deserialize_with = "lenient::integer")]
    pub ping_rate_interval: i32,
    /// Unit of `pingRateInterval`.
    #[serde(deserialize_with = "lenient::text")]
    pub ping_rate_unit: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            fallback_server_icon: "default".to_string(),
            fallback_server_name: "{server.message}".to_string(),
            fallback_server_motd: "{server.motd.raw}".to_string(),
            server_data: module_map(ModuleData::with_text("Playing on {server.name}")),
            ping_rate_interval: 5,
            ping_rate_unit: "minutes".to_string(),
        }
    }
}

/// Messages for the fixed game states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusMessages {
    /// Shown on the title screen.
    #[serde(deserialize_with = "lenient::object")]
    pub main_menu_data: ModuleData,
    /// Shown while the game loads.
    #[serde(deserialize_with = "lenient::object")]
    pub loading_data: ModuleData,
    /// Shown on a LAN world.
    #[serde(deserialize_with = "lenient::object")]
    pub lan_data: ModuleData,
    /// Shown in singleplayer.
    #[serde(deserialize_with = "lenient::object")]
    pub singleplayer_data: ModuleData,
    /// Shown on a realm.
    #[serde(deserialize_with = "lenient::object")]
    pub realm_data: ModuleData,
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            main_menu_data: ModuleData::with_text("In the main menu"),
            loading_data: ModuleData::with_text("Loading..."),
            lan_data: ModuleData::with_text("Playing on a LAN server"),
            singleplayer_data: ModuleData::with_text("Playing singleplayer"),
            realm_data: ModuleData::with_text("Playing on a realm"),
        }
    }
}

/// Per-screen overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuiSettings {
    /// Icon used for screens without an override.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_gui_icon: String,
    /// Overrides keyed by screen class name.
    #[serde(deserialize_with = "lenient::object_map")]
    pub gui_data: ModuleMap,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            fallback_gui_icon: "unknown".to_string(),
            gui_data: module_map(ModuleData::with_text("In {screen.name}")),
        }
    }
}

/// Per-entity overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntitySettings {
    /// Icon used for entities without an override.
    #[serde(deserialize_with = "lenient::text")]
    pub fallback_entity_icon: String,
    /// Overrides for the targeted entity.
    #[serde(deserialize_with = "lenient::object_map")]
    pub target_data: ModuleMap,
    /// Overrides for the ridden entity.
    #[serde(deserialize_with = "lenient::object_map")]
    pub riding_data: ModuleMap,
}

impl Default for EntitySettings {
    fn default() -> Self {
        Self {
            fallback_entity_icon: "unknown".to_string(),
            target_data: module_map(ModuleData::with_text("Targeting {entity.target.name}")),
            riding_data: module_map(ModuleData::with_text("Riding {entity.riding.name}")),
        }
    }
}

/// Rarely changed behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct AdvancedSettings {
    /// Enable per-screen overrides.
    #[serde(deserialize_with = "lenient::boolean")]
    pub enable_per_gui: bool,
    /// Enable per-item messages.
    #[serde(deserialize_with = "lenient::boolean")]
    pub enable_per_item: bool,
    /// Enable per-entity overrides.
    #[serde(deserialize_with = "lenient::boolean")]
    pub enable_per_entity: bool,
    /// Title-case identifiers before display.
    #[serde(deserialize_with = "lenient::boolean")]
    pub format_words: bool,
    /// Debug output.
    #[serde(deserialize_with = "lenient::boolean")]
    pub debug_mode: bool,
    /// Verbose output.
    #[serde(deserialize_with = "lenient::boolean")]
    pub verbose_mode: bool,
    /// Seconds between presence refreshes.
    #[serde(deserialize_with = "lenient::integer")]
    pub refresh_rate: i32,
    /// Show placeholder previews in editors.
    #[serde(deserialize_with = "lenient::boolean")]
    pub allow_placeholder_previews: bool,
    /// Screen overrides.
    #[serde(deserialize_with = "lenient::object")]
    pub gui_settings: GuiSettings,
    /// Messages keyed by held item.
    #[serde(deserialize_with = "lenient::text_map")]
    pub item_messages: TextMap,
    /// Entity overrides.
    #[serde(deserialize_with = "lenient::object")]
    pub entity_settings: EntitySettings,
    /// Fetch icons from the endpoints below.
    #[serde(deserialize_with = "lenient::boolean")]
    pub allow_endpoint_icons: bool,
    /// Server icon url template.
    #[serde(deserialize_with = "lenient::text")]
    pub server_icon_endpoint: String,
    /// Player avatar url template.
    #[serde(deserialize_with = "lenient::text")]
    pub player_skin_endpoint: String,
    /// Send packets even when nothing changed.
    #[serde(deserialize_with = "lenient::boolean")]
    pub allow_duplicate_packets: bool,
    /// Connection attempts before giving up.
    #[serde(deserialize_with = "lenient::integer")]
    pub max_connection_attempts: i32,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            enable_per_gui: false,
            enable_per_item: false,
            enable_per_entity: false,
            format_words: true,
            debug_mode: false,
            verbose_mode: false,
            refresh_rate: 2,
            allow_placeholder_previews: false,
            gui_settings: GuiSettings::default(),
            item_messages: text_map([(DEFAULT_KEY, "Holding {item.message.holding}")]),
            entity_settings: EntitySettings::default(),
            allow_endpoint_icons: true,
            server_icon_endpoint: "https://api.mcsrvstat.us/icon/{server.address.short}"
                .to_string(),
            player_skin_endpoint:
                "https://mc-heads.net/avatar/{getOrDefault(player.uuid.short, player.name)}"
                    .to_string(),
            allow_duplicate_packets: false,
            max_connection_attempts: 10,
        }
    }
}

/// Rendering and input settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct AccessibilitySettings {
    /// Tooltip fill.
    #[serde(deserialize_with = "lenient::object")]
    pub tooltip_background: ColorData,
    /// Tooltip border gradient.
    #[serde(deserialize_with = "lenient::object")]
    pub tooltip_border: ColorData,
    /// Screen background.
    #[serde(deserialize_with = "lenient::object")]
    pub gui_background: ColorData,
    /// Background used over a running world.
    #[serde(deserialize_with = "lenient::object")]
    pub alt_gui_background: ColorData,
    /// Locale id of the interface language.
    #[serde(deserialize_with = "lenient::text")]
    pub language_id: String,
    /// Strip color codes from translations.
    #[serde(deserialize_with = "lenient::boolean")]
    pub strip_translation_colors: bool,
    /// Strip formatting codes from translations.
    #[serde(deserialize_with = "lenient::boolean")]
    pub strip_translation_formatting: bool,
    /// Hide decorative screen elements.
    #[serde(deserialize_with = "lenient::boolean")]
    pub strip_extra_gui_elements: bool,
    /// Draw tooltips.
    #[serde(deserialize_with = "lenient::boolean")]
    pub render_tooltips: bool,
    /// Keycode that opens the settings screen.
    #[serde(deserialize_with = "lenient::integer")]
    pub config_key_code: i32,
}

impl AccessibilitySettings {
    /// Defaults for a host at `host_version`.
    ///
    /// The language id and the settings key differ on either side of their
    /// epochs.
    #[must_use]
    pub fn for_host(host_version: i32) -> Self {
        Self {
            tooltip_background: ColorData::solid(ColorSection::new(16, 0, 16, 240)),
            tooltip_border: ColorData::gradient(
                ColorSection::new(80, 0, 255, 80),
                ColorSection::new(40, 0, 127, 80),
            ),
            gui_background: ColorData::texture(
                ColorSection::new(64, 64, 64, 255),
                "minecraft:textures/gui/options_background.png",
            ),
            alt_gui_background: ColorData::gradient(
                ColorSection::new(16, 16, 16, 192),
                ColorSection::new(16, 16, 16, 208),
            ),
            language_id: default_locale(host_version).to_string(),
            strip_translation_colors: false,
            strip_translation_formatting: false,
            strip_extra_gui_elements: false,
            render_tooltips: true,
            // Grave, in whichever keycode scheme the host reads
            config_key_code: if host_version >= KEYCODE_EPOCH { 96 } else { 41 },
        }
    }
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self::for_host(DEFAULT_HOST_VERSION)
    }
}

/// The main presence template and its variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Template used when no module overrides it.
    #[serde(deserialize_with = "lenient::object")]
    pub presence_data: PresenceData,
    /// Icon urls keyed by icon name.
    #[serde(deserialize_with = "lenient::text_map")]
    pub dynamic_icons: TextMap,
    /// User-defined placeholder expressions.
    #[serde(deserialize_with = "lenient::text_map")]
    pub dynamic_variables: TextMap,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let state = "{getOrDefault(server.message)} {getOrDefault(pack.name)}";
        let details = "{getFirst(menu.message, dimension.message)}";
        Self {
            presence_data: PresenceData {
                details: details.to_string(),
                game_state: state.to_string(),
                large_image_key: "{getFirst(menu.icon, dimension.icon)}".to_string(),
                large_image_text: details.to_string(),
                small_image_key: "{getFirst(server.icon, pack.icon)}".to_string(),
                small_image_text: state.to_string(),
                start_timestamp: "{data.general.time}".to_string(),
                ..PresenceData::default()
            },
            dynamic_icons: text_map([(DEFAULT_KEY, "https://via.placeholder.com/256.png")]),
            dynamic_variables: text_map([
                (DEFAULT_KEY, "Example"),
                ("pack", "Pack: {pack.name}"),
                ("players", "{server.players.current} / {server.players.max} players"),
                ("player_info_out", "{player.name}"),
                ("player_info_in", "{player.name} on {world.name}"),
                ("player_info_coordinate", "At {player.position.x}, {player.position.z}"),
                ("player_info_health", "Health: {player.health.current}/{player.health.max}"),
                ("player_info_items", "Holding {item.message.holding}"),
                ("world_info", "{world.difficulty} - {world.time.format_24}"),
                ("mods", "{general.mods} mods loaded"),
            ]),
        }
    }
}
