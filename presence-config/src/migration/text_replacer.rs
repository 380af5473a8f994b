//! Token substitution across every string leaf of a subtree.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::Result;
use crate::logging::Logger;
use crate::messages::LogMessage;
use crate::property::{Property, PropertyPath};
use crate::schema::ConfigGraph;

fn expression_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{[^{}]*}").unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
    })
}

/// Replaces fixed tokens in string leaves.
///
/// In placeholder mode only the text inside `{...}` expressions is touched,
/// so a token that also occurs in plain prose survives.
///
/// # Examples
///
/// ```
/// use presence_config::migration::TextReplacer;
///
/// let replacer = TextReplacer::new([("world.day", "world.time.day")], true);
/// assert_eq!(
///     replacer.replace("world.day is {world.day}"),
///     "world.day is {world.time.day}"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TextReplacer {
    replacements: Vec<(String, String)>,
    placeholder_mode: bool,
}

impl TextReplacer {
    /// Creates a replacer. Replacements apply in the order given.
    pub fn new<I, K, V>(replacements: I, placeholder_mode: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            replacements: replacements
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
            placeholder_mode,
        }
    }

    fn replace_tokens(&self, text: &str) -> String {
        self.replacements
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    /// Applies the replacements to one string.
    #[must_use]
    pub fn replace(&self, original: &str) -> String {
        if self.placeholder_mode {
            expression_pattern()
                .replace_all(original, |caps: &Captures<'_>| self.replace_tokens(&caps[0]))
                .into_owned()
        } else {
            self.replace_tokens(original)
        }
    }

    /// Rewrites every string leaf of `graph` reachable through the keys of
    /// `raw`. Returns the number of leaves changed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing a rewritten leaf back fails.
    pub fn apply(
        &self,
        raw: &Value,
        graph: &mut ConfigGraph,
        defaults: &ConfigGraph,
        logger: &Logger,
    ) -> Result<usize> {
        self.walk(raw, &PropertyPath::root(), graph, defaults, logger)
    }

    fn walk(
        &self,
        raw: &Value,
        path: &PropertyPath,
        graph: &mut ConfigGraph,
        defaults: &ConfigGraph,
        logger: &Logger,
    ) -> Result<usize> {
        let Some(entries) = raw.as_object() else {
            return Ok(0);
        };
        let mut changed = 0;
        for (key, value) in entries {
            let full = path.join(key.as_str());
            let current = graph.get(&full);
            let Some(template) = defaults.get(&full).or_else(|| current.clone()) else {
                continue;
            };

            if let Property::Section(_) = template {
                changed += self.walk(value, &full, graph, defaults, logger)?;
                continue;
            }
            match current {
                Some(Property::Text(text)) => {
                    changed += usize::from(self.rewrite(&full, &text, graph, logger)?);
                }
                Some(Property::Dictionary(dictionary)) if value.is_object() => {
                    for entry in dictionary.keys() {
                        let entry_path = full.join(entry.as_str());
                        match dictionary.get(&entry) {
                            Some(Property::Section(_)) => {
                                if let Some(entry_raw) = value.get(&entry) {
                                    changed +=
                                        self.walk(entry_raw, &entry_path, graph, defaults, logger)?;
                                }
                            }
                            Some(Property::Text(text)) => {
                                changed +=
                                    usize::from(self.rewrite(&entry_path, &text, graph, logger)?);
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(changed)
    }

    fn rewrite(
        &self,
        path: &PropertyPath,
        original: &str,
        graph: &mut ConfigGraph,
        logger: &Logger,
    ) -> Result<bool> {
        let replaced = self.replace(original);
        if replaced == original {
            return Ok(false);
        }
        logger.emit(&LogMessage::PropertyModified {
            path: path.to_string(),
            old: original.to_string(),
            new: replaced.clone(),
        });
        graph.set(path, Property::Text(replaced))?;
        Ok(true)
    }
}
