pub const DEFAULT_PREFIX: &str = "plate-menu";

/// Class names for every role the menu paints, derived from one prefix so
/// that several editors can share a surface without colliding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub prefix: String,
    pub bar: String,
    pub item: String,
    pub icon: String,
    pub label: String,
    pub disabled: String,
    pub active: String,
    pub separator: String,
    pub dropdown: String,
    pub dropdown_wrap: String,
    pub dropdown_menu: String,
    pub dropdown_item: String,
    pub submenu: String,
    pub submenu_wrap: String,
    pub submenu_wrap_active: String,
    pub submenu_label: String,
    pub more_panel: String,
    pub more_toggle: String,
    pub search_bar: String,
    pub search_toggle: String,
    pub search_input: String,
    pub search_status: String,
    pub dialog: String,
    pub dialog_title: String,
    pub dialog_input: String,
    pub dialog_button: String,
    pub dialog_ok: String,
    pub dialog_cancel: String,
    pub dialog_select: String,
    pub overlay: String,
    pub toolbar_overlay: String,
    pub selection_highlight: String,
    pub image_probe: String,
}

impl ClassNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let name = |suffix: &str| format!("{prefix}{suffix}");
        Self {
            bar: name("bar"),
            item: name("item"),
            icon: name("-icon"),
            label: name("-label"),
            disabled: name("-disabled"),
            active: name("-active"),
            separator: name("separator"),
            dropdown: name("-dropdown"),
            dropdown_wrap: name("-dropdown-wrap"),
            dropdown_menu: name("-dropdown-menu"),
            dropdown_item: name("-dropdown-item"),
            submenu: name("-submenu"),
            submenu_wrap: name("-submenu-wrap"),
            submenu_wrap_active: name("-submenu-wrap-active"),
            submenu_label: name("-submenu-label"),
            more_panel: name("-more"),
            more_toggle: name("-more-toggle"),
            search_bar: name("-search"),
            search_toggle: name("-search-toggle"),
            search_input: name("-search-input"),
            search_status: name("-search-status"),
            dialog: name("-dialog"),
            dialog_title: name("-dialog-title"),
            dialog_input: name("-dialog-input"),
            dialog_button: name("-dialog-button"),
            dialog_ok: name("-dialog-ok"),
            dialog_cancel: name("-dialog-cancel"),
            dialog_select: name("-dialog-select"),
            overlay: name("-overlay"),
            toolbar_overlay: name("-toolbar-overlay"),
            selection_highlight: name("-selection"),
            image_probe: name("-image-probe"),
            prefix,
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}
