use gpui::Keystroke;
use gpui_menu_core::KeyPress;

/// Translates a gpui keystroke into the key names the menu matches against.
pub fn key_press(keystroke: &Keystroke) -> KeyPress {
    let key = match keystroke.key.as_str() {
        "enter" => "Enter",
        "escape" => "Escape",
        "tab" => "Tab",
        "backspace" => "Backspace",
        "delete" => "Delete",
        "space" => " ",
        "up" => "ArrowUp",
        "down" => "ArrowDown",
        "left" => "ArrowLeft",
        "right" => "ArrowRight",
        other => other,
    };
    let modifiers = &keystroke.modifiers;
    KeyPress {
        key: key.to_string(),
        ctrl: modifiers.control,
        alt: modifiers.alt,
        shift: modifiers.shift,
        meta: modifiers.platform,
    }
}
