use crate::config::KeymapConfig;
use crate::error::MenuError;

/// A key press as delivered by the host. `key` is the logical key: a single
/// character (`"b"`, `"Z"`, `"/"`) or a named key (`"Enter"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().collect(),
        _ => key.to_ascii_lowercase(),
    }
}

/// One parsed binding such as `Mod-Shift-z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    key: String,
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
}

impl KeyChord {
    pub fn parse(chord: &str, platform: Platform) -> Result<Self, MenuError> {
        // A `-` right after a separator, or standing alone, is the minus key:
        // `-`, `Shift--`, `Mod--`. A bare trailing separator has no key.
        let (modifiers, key) = if chord == "-" {
            ("", "-")
        } else if let Some(rest) = chord.strip_suffix("--") {
            (rest, "-")
        } else {
            chord.rsplit_once('-').unwrap_or(("", chord))
        };
        if key.is_empty() {
            return Err(MenuError::invalid_chord(chord, "missing key"));
        }

        let mut parsed = KeyChord {
            key: normalize_key(key),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        };
        let mut letters = key.chars();
        if let (Some(c), None) = (letters.next(), letters.next())
            && c.is_uppercase()
        {
            parsed.shift = true;
        }

        for modifier in modifiers.split('-').filter(|m| !m.is_empty()) {
            match modifier.to_ascii_lowercase().as_str() {
                "mod" => match platform {
                    Platform::Mac => parsed.meta = true,
                    Platform::Other => parsed.ctrl = true,
                },
                "ctrl" | "control" | "c" => parsed.ctrl = true,
                "alt" | "option" | "a" => parsed.alt = true,
                "shift" | "s" => parsed.shift = true,
                "meta" | "cmd" | "m" => parsed.meta = true,
                _ => {
                    return Err(MenuError::invalid_chord(
                        chord,
                        format!("unknown modifier `{modifier}`"),
                    ));
                }
            }
        }
        Ok(parsed)
    }

    pub fn matches(&self, press: &KeyPress) -> bool {
        self.ctrl == press.ctrl
            && self.alt == press.alt
            && self.shift == press.shift
            && self.meta == press.meta
            && self.key == normalize_key(&press.key)
    }
}

/// Chords bound to named commands. The first binding of a chord wins.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(KeyChord, String)>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &KeymapConfig, platform: Platform) -> Result<Self, MenuError> {
        let mut keymap = Self::new();
        for (name, chords) in config.iter() {
            for chord in chords {
                keymap.bind(KeyChord::parse(chord, platform)?, name.clone());
            }
        }
        Ok(keymap)
    }

    pub fn bind(&mut self, chord: KeyChord, name: impl Into<String>) {
        let name = name.into();
        if let Some((_, existing)) = self.bindings.iter().find(|(bound, _)| *bound == chord) {
            tracing::warn!(?chord, existing = %existing, rejected = %name, "key chord already bound");
            return;
        }
        self.bindings.push((chord, name));
    }

    /// Drops every binding whose command name fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.bindings.retain(|(_, name)| keep(name));
    }

    pub fn resolve(&self, press: &KeyPress) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(chord, _)| chord.matches(press))
            .map(|(_, name)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
