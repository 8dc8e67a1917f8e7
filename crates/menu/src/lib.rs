mod assets;
mod icon;
mod keys;
mod probe;
mod toolbar;
mod view;

pub use assets::MenuAssetSource;
pub use icon::MenuIconName;
pub use keys::key_press;
pub use probe::probe_image_source;
pub use toolbar::{MenuToolbarButton, MenuToolbarSeparator};
pub use view::MenuSurface;

pub use gpui_menu_core as core;
