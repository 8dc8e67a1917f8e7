use std::path::Path;

use gpui_menu_core::is_valid_url;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "ico"];

/// Decides whether an image source would load.
///
/// Runs on the background executor. Remote URLs are accepted on syntax alone
/// since the host carries no HTTP client; inline `data:image/` sources and
/// local image files are checked for real.
pub fn probe_image_source(src: &str) -> bool {
    let src = src.trim();
    if src.is_empty() {
        return false;
    }
    if let Some(rest) = src.strip_prefix("data:") {
        return rest.starts_with("image/") && rest.contains(',');
    }

    let lower = src.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return is_valid_url(src);
    }

    let path = match src.strip_prefix("file://") {
        Some(path) => Path::new(path),
        None => Path::new(src),
    };
    let has_image_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    has_image_extension && path.is_file()
}
