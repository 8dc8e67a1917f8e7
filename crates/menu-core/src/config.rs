use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dialog::{IMAGE_DIALOG_SIZE, LINK_DIALOG_SIZE};
use crate::error::MenuError;
use crate::geometry::Size;
use crate::names::DEFAULT_PREFIX;

/// Width and height of a dialog panel, in pixels.
pub type DialogSize = Size;

/// Command name to the chords that run it, e.g. `"redo": ["Mod-Shift-z", "Mod-y"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeymapConfig(pub BTreeMap<String, Vec<String>>);

impl KeymapConfig {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn bind(mut self, name: impl Into<String>, chords: &[&str]) -> Self {
        self.0
            .insert(name.into(), chords.iter().map(|c| c.to_string()).collect());
        self
    }
}

impl Default for KeymapConfig {
    fn default() -> Self {
        KeymapConfig(BTreeMap::new())
            .bind("undo", &["Mod-z"])
            .bind("redo", &["Mod-Shift-z", "Mod-y"])
            .bind("bold", &["Mod-b"])
            .bind("italic", &["Mod-i"])
            .bind("underline", &["Mod-u"])
            .bind("code", &["Mod-e"])
            .bind("strikethrough", &["Mod-Shift-s"])
            .bind("link", &["Mod-k"])
            .bind("image", &["Mod-Shift-i"])
            .bind("search", &["Mod-f"])
    }
}

/// Which items the toolbar shows, in which groups, and how keys map to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub prefix: String,
    pub groups: Vec<Vec<String>>,
    /// Items past this many move to the "more" panel.
    pub capacity: Option<usize>,
    pub keymap: KeymapConfig,
    pub link_dialog: DialogSize,
    pub image_dialog: DialogSize,
}

fn group(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            groups: vec![
                group(&["undo", "redo"]),
                group(&["link", "image"]),
                group(&["bold", "italic", "underline", "strikethrough", "code"]),
                group(&["heading", "blockquote", "bullet_list", "ordered_list"]),
                group(&["search"]),
            ],
            capacity: None,
            keymap: KeymapConfig::default(),
            link_dialog: LINK_DIALOG_SIZE,
            image_dialog: IMAGE_DIALOG_SIZE,
        }
    }
}

impl MenuConfig {
    /// Parses a JSON document; omitted fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, MenuError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(String::as_str)
    }
}
