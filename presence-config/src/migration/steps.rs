use super::{MigrationContext, MigrationStep, TextReplacer};
use crate::error::Result;
use crate::property::{AnySection, Property, PropertyPath};
use crate::schema::{ColorData, ColorSection};
use crate::values::{darken_border, find_color, is_valid_color_code, parse_boolean};

const STEPS: [MigrationStep; 5] = [
    MigrationStep::new(
        1,
        2,
        "generalSettings.showTime -> displaySettings.presenceData.startTimestamp",
        show_time_to_start_timestamp,
    ),
    MigrationStep::new(2, 3, "world time placeholders", world_time_placeholders),
    MigrationStep::new(3, 4, "flat color codes -> color data", colors_to_color_data),
    MigrationStep::new(4, 5, "screen class placeholder", screen_class_placeholder),
    MigrationStep::new(
        5,
        6,
        "advancedSettings.renderTooltips -> accessibilitySettings.renderTooltips",
        relocate_render_tooltips,
    ),
];

/// The built-in steps, ending at the current schema version.
#[must_use]
pub fn standard_steps() -> &'static [MigrationStep] {
    &STEPS
}

fn show_time_to_start_timestamp(context: &mut MigrationContext<'_>) -> Result<()> {
    let show_time = context.require_bool(&["generalSettings", "showTime"])?;
    context.graph.display_settings.presence_data.start_timestamp = if show_time {
        "{data.general.time}".to_string()
    } else {
        String::new()
    };
    Ok(())
}

fn world_time_placeholders(context: &mut MigrationContext<'_>) -> Result<()> {
    TextReplacer::new(
        [
            ("world.time24", "world.time.format_24"),
            ("world.time12", "world.time.format_12"),
            ("world.day", "world.time.day"),
        ],
        true,
    )
    .apply(context.raw, context.graph, context.defaults, context.logger)?;
    Ok(())
}

fn colors_to_color_data(context: &mut MigrationContext<'_>) -> Result<()> {
    const SECTION: &str = "accessibilitySettings";
    let dark = context.require_bool(&[SECTION, "showBackgroundAsDark"])?;

    for (old_key, new_key) in [
        ("tooltipBackgroundColor", "tooltipBackground"),
        ("tooltipBorderColor", "tooltipBorder"),
        ("guiBackgroundColor", "guiBackground"),
    ] {
        let old_value = context.require_text(&[SECTION, old_key])?;
        let color = if old_value.is_empty() {
            ColorData::default()
        } else if is_valid_color_code(&old_value) {
            let argb = find_color(&old_value);
            let start = ColorSection::from_argb(argb);
            if new_key == "tooltipBorder" {
                ColorData::gradient(start, ColorSection::from_argb(darken_border(argb)))
            } else {
                ColorData::solid(start)
            }
        } else {
            let tint = if dark && new_key == "guiBackground" {
                ColorSection::new(64, 64, 64, 255)
            } else {
                ColorSection::default()
            };
            ColorData::texture(tint, old_value)
        };
        context.graph.set(
            &PropertyPath::from_segments([SECTION, new_key]),
            Property::Section(AnySection::Color(color)),
        )?;
    }
    Ok(())
}

fn screen_class_placeholder(context: &mut MigrationContext<'_>) -> Result<()> {
    TextReplacer::new(
        [("data.screen.class", "getClass(data.screen.instance)")],
        true,
    )
    .apply(context.raw, context.graph, context.defaults, context.logger)?;
    Ok(())
}

/// Later schemas dropped the old key, so its absence is not an error.
fn relocate_render_tooltips(context: &mut MigrationContext<'_>) -> Result<()> {
    let old = context.optional(&["advancedSettings", "renderTooltips"]);
    let value = old.and_then(|v| {
        v.as_bool()
            .or_else(|| v.as_str().and_then(parse_boolean))
    });
    if let Some(render) = value {
        context.graph.accessibility_settings.render_tooltips = render;
    }
    Ok(())
}
