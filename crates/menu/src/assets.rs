use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::PathBuf;

use gpui::{AssetSource, Result, SharedString};

/// Serves the menu's `icons/*.svg` from a directory on disk.
///
/// Missing files load as `None`, so an absent icon paints nothing instead of
/// failing the frame.
pub struct MenuAssetSource {
    root: PathBuf,
}

impl MenuAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for part in path.trim_matches('/').split('/') {
            if part.is_empty() || part == "." || part == ".." {
                continue;
            }
            resolved.push(part);
        }
        resolved
    }
}

impl AssetSource for MenuAssetSource {
    fn load(&self, path: &str) -> Result<Option<Cow<'static, [u8]>>> {
        match std::fs::read(self.resolve(path)) {
            Ok(bytes) => Ok(Some(Cow::Owned(bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self, path: &str) -> Result<Vec<SharedString>> {
        let entries = match std::fs::read_dir(self.resolve(path)) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut children: Vec<SharedString> = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                children.push(SharedString::from(name.to_string()));
            }
        }
        children.sort();
        Ok(children)
    }
}
