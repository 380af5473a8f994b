//! Named-property tables for every section.

use super::elements::{Button, ColorData, ColorSection, ModuleData, PresenceData};
use super::sections::{
    AccessibilitySettings, AdvancedSettings, BiomeSettings, DimensionSettings, DisplaySettings,
    EntitySettings, GeneralSettings, GuiSettings, ServerSettings, StatusMessages,
};
use super::ConfigGraph;
use crate::property::section::impl_section;

impl_section!(ConfigGraph, Config, defaults(host) => ConfigGraph::defaults(host), {
    "_schemaVersion" => schema_version,
    "_lastMCVersionId" => last_host_version,
    "generalSettings" => general_settings,
    "biomeSettings" => biome_settings,
    "dimensionSettings" => dimension_settings,
    "serverSettings" => server_settings,
    "statusMessages" => status_messages,
    "advancedSettings" => advanced_settings,
    "accessibilitySettings" => accessibility_settings,
    "displaySettings" => display_settings,
});

impl_section!(GeneralSettings, General, defaults(_host) => GeneralSettings::default(), {
    "detectATLauncherInstance" => detect_at_launcher_instance,
    "detectCurseManifest" => detect_curse_manifest,
    "detectMultiMCManifest" => detect_multi_mc_manifest,
    "detectMCUpdaterInstance" => detect_mc_updater_instance,
    "detectTechnicPack" => detect_technic_pack,
    "detectModrinthPack" => detect_modrinth_pack,
    "detectBiomeData" => detect_biome_data,
    "detectDimensionData" => detect_dimension_data,
    "detectWorldData" => detect_world_data,
    "clientId" => client_id,
    "defaultIcon" => default_icon,
    "enableJoinRequests" => enable_join_requests,
    "preferredClientLevel" => preferred_client_level,
    "resetTimeOnInit" => reset_time_on_init,
    "autoRegister" => auto_register,
});

impl_section!(BiomeSettings, Biome, defaults(_host) => BiomeSettings::default(), {
    "fallbackBiomeIcon" => fallback_biome_icon,
    "biomeData" => biome_data,
});

impl_section!(DimensionSettings, Dimension, defaults(_host) => DimensionSettings::default(), {
    "fallbackDimensionIcon" => fallback_dimension_icon,
    "dimensionData" => dimension_data,
});

impl_section!(ServerSettings, Server, defaults(_host) => ServerSettings::default(), {
    "fallbackServerIcon" => fallback_server_icon,
    "fallbackServerName" => fallback_server_name,
    "fallbackServerMotd" => fallback_server_motd,
    "serverData" => server_data,
    "pingRateInterval" => ping_rate_interval,
    "pingRateUnit" => ping_rate_unit,
});

impl_section!(StatusMessages, Status, defaults(_host) => StatusMessages::default(), {
    "mainMenuData" => main_menu_data,
    "loadingData" => loading_data,
    "lanData" => lan_data,
    "singleplayerData" => singleplayer_data,
    "realmData" => realm_data,
});

impl_section!(AdvancedSettings, Advanced, defaults(_host) => AdvancedSettings::default(), {
    "enablePerGui" => enable_per_gui,
    "enablePerItem" => enable_per_item,
    "enablePerEntity" => enable_per_entity,
    "formatWords" => format_words,
    "debugMode" => debug_mode,
    "verboseMode" => verbose_mode,
    "refreshRate" => refresh_rate,
    "allowPlaceholderPreviews" => allow_placeholder_previews,
    "guiSettings" => gui_settings,
    "itemMessages" => item_messages,
    "entitySettings" => entity_settings,
    "allowEndpointIcons" => allow_endpoint_icons,
    "serverIconEndpoint" => server_icon_endpoint,
    "playerSkinEndpoint" => player_skin_endpoint,
    "allowDuplicatePackets" => allow_duplicate_packets,
    "maxConnectionAttempts" => max_connection_attempts,
});

impl_section!(GuiSettings, Gui, defaults(_host) => GuiSettings::default(), {
    "fallbackGuiIcon" => fallback_gui_icon,
    "guiData" => gui_data,
});

impl_section!(EntitySettings, Entity, defaults(_host) => EntitySettings::default(), {
    "fallbackEntityIcon" => fallback_entity_icon,
    "targetData" => target_data,
    "ridingData" => riding_data,
});

impl_section!(
    AccessibilitySettings, Accessibility,
    defaults(host) => AccessibilitySettings::for_host(host),
    {
        "tooltipBackground" => tooltip_background,
        "tooltipBorder" => tooltip_border,
        "guiBackground" => gui_background,
        "altGuiBackground" => alt_gui_background,
        "languageId" => language_id,
        "stripTranslationColors" => strip_translation_colors,
        "stripTranslationFormatting" => strip_translation_formatting,
        "stripExtraGuiElements" => strip_extra_gui_elements,
        "renderTooltips" => render_tooltips,
        "configKeyCode" => config_key_code,
    }
);

impl_section!(DisplaySettings, Display, defaults(_host) => DisplaySettings::default(), {
    "presenceData" => presence_data,
    "dynamicIcons" => dynamic_icons,
    "dynamicVariables" => dynamic_variables,
});

impl_section!(ColorData, Color, defaults(_host) => ColorData::default(), {
    "start" => start,
    "end" => end,
    "texLocation" => tex_location,
});

impl_section!(ColorSection, ColorStop, defaults(_host) => ColorSection::default(), {
    "red" => red,
    "green" => green,
    "blue" => blue,
    "alpha" => alpha,
});

impl_section!(PresenceData, Presence, defaults(_host) => PresenceData::default(), {
    "enabled" => enabled,
    "useAsMain" => use_as_main,
    "isInstance" => is_instance,
    "activityType" => activity_type,
    "partyPrivacy" => party_privacy,
    "details" => details,
    "gameState" => game_state,
    "largeImageKey" => large_image_key,
    "largeImageText" => large_image_text,
    "smallImageKey" => small_image_key,
    "smallImageText" => small_image_text,
    "startTimestamp" => start_timestamp,
    "endTimestamp" => end_timestamp,
    "buttons" => buttons,
});

impl_section!(ModuleData, Module, defaults(_host) => ModuleData::default(), {
    "textOverride" => text_override,
    "iconOverride" => icon_override,
    "data" => data,
});

impl_section!(Button, Button, defaults(_host) => Button::default(), {
    "label" => label,
    "url" => url,
});

#[cfg(test)]
mod tests {
    use crate::property::{Property, Section};
    use crate::schema::*;

    /// Every listed name must read back and survive a write of its own value.
    fn check_table<S: Section + PartialEq + std::fmt::Debug>(section: &S) {
        let document = serde_json::to_value(section).unwrap();
        for name in S::PROPERTIES {
            let Some(value) = section.property(name) else {
                assert!(document.get(*name).is_none(), "{name} is serialized but unreadable");
                continue;
            };
            assert!(document.get(*name).is_some(), "{name} is not a document key");
            let mut copy = section.copy();
            copy.set_property(name, value).unwrap();
            assert_eq!(&copy, section);
        }
        assert_eq!(
            document.as_object().unwrap().len(),
            S::PROPERTIES
                .iter()
                .filter(|n| section.property(n).is_some())
                .count()
        );
    }

    #[test]
    fn test_tables_match_serialized_keys() {
        let graph = ConfigGraph::defaults(765);
        check_table(&graph);
        check_table(&graph.general_settings);
        check_table(&graph.biome_settings);
        check_table(&graph.dimension_settings);
        check_table(&graph.server_settings);
        check_table(&graph.status_messages);
        check_table(&graph.advanced_settings);
        check_table(&graph.advanced_settings.gui_settings);
        check_table(&graph.advanced_settings.entity_settings);
        check_table(&graph.accessibility_settings);
        check_table(&graph.display_settings);
        check_table(&graph.display_settings.presence_data);
        check_table(&graph.accessibility_settings.tooltip_border);
        check_table(&graph.accessibility_settings.tooltip_border.start);
        check_table(&ModuleData::with_text_and_icon("t", "i"));
        check_table(&Button::new("l", "u"));
    }

    #[test]
    fn test_unknown_property_name() {
        let mut general = GeneralSettings::default();
        assert!(general.property("showTime").is_none());
        assert!(general
            .set_property("showTime", Property::Bool(true))
            .is_err());
    }

    #[test]
    fn test_transfer_from() {
        let mut target = DisplaySettings::default();
        assert!(!target.transfer_from(&DisplaySettings::default()));
        let mut changed = DisplaySettings::default();
        changed.presence_data.details = "other".into();
        assert!(target.transfer_from(&changed));
        assert_eq!(target, changed);
    }

    #[test]
    fn test_defaults_follow_host() {
        assert_eq!(AccessibilitySettings::defaults(340).config_key_code, 41);
        assert_eq!(<ConfigGraph as Section>::defaults(340).last_host_version, 340);
    }
}
