//! Settings merging.

use crate::settings::schema::EngineSettings;

/// Overlays one settings value onto another.
///
/// # Examples
///
/// ```
/// use presence_config::settings::{EngineSettings, SettingsMerger};
///
/// let mut base = EngineSettings { mod_id: Some("low".into()), ..Default::default() };
/// let high = EngineSettings { host_version: Some(340), ..Default::default() };
/// SettingsMerger::merge_into(&mut base, &high);
/// assert_eq!(base.mod_id(), "low");
/// assert_eq!(base.host_version(), 340);
/// ```
pub struct SettingsMerger;

impl SettingsMerger {
    /// Copies every field set in `source` into `target`.
    pub fn merge_into(target: &mut EngineSettings, source: &EngineSettings) {
        fn overlay<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
            if source.is_some() {
                target.clone_from(source);
            }
        }

        overlay(&mut target.mod_id, &source.mod_id);
        overlay(&mut target.config_dir, &source.config_dir);
        overlay(&mut target.user_dir, &source.user_dir);
        overlay(&mut target.host_version, &source.host_version);
        overlay(&mut target.keycode_triggers, &source.keycode_triggers);
        overlay(&mut target.locale_triggers, &source.locale_triggers);
        overlay(&mut target.opaque_kinds, &source.opaque_kinds);
        overlay(&mut target.reserved_substring, &source.reserved_substring);
        overlay(&mut target.log_mode, &source.log_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_keep_target() {
        let mut target = EngineSettings {
            mod_id: Some("a".into()),
            keycode_triggers: Some(vec!["key".into()]),
            ..Default::default()
        };
        SettingsMerger::merge_into(&mut target, &EngineSettings::default());
        assert_eq!(target.mod_id.as_deref(), Some("a"));
        assert_eq!(target.keycode_triggers, Some(vec!["key".to_string()]));
    }

    #[test]
    fn test_lists_are_replaced_not_joined() {
        let mut target = EngineSettings {
            locale_triggers: Some(vec!["lang".into()]),
            ..Default::default()
        };
        let source = EngineSettings {
            locale_triggers: Some(vec!["locale".into()]),
            ..Default::default()
        };
        SettingsMerger::merge_into(&mut target, &source);
        assert_eq!(target.locale_triggers, Some(vec!["locale".to_string()]));
    }
}
