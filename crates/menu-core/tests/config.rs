mod support;

use gpui_menu_core::{
    ClassNames, DEFAULT_PREFIX, IMAGE_DIALOG_SIZE, LINK_DIALOG_SIZE, LinkDialog, MenuConfig,
    MenuError, Menubar, Size,
};
use support::{FakeEditor, apply_link, groups, named_item};

#[test]
fn default_layout() {
    let config = MenuConfig::default();
    assert_eq!(config.prefix, DEFAULT_PREFIX);
    assert_eq!(config.groups.len(), 5);
    assert_eq!(config.groups[0], vec!["undo", "redo"]);
    assert_eq!(config.groups[4], vec!["search"]);
    assert_eq!(config.capacity, None);
    assert_eq!(config.link_dialog, LINK_DIALOG_SIZE);
    assert_eq!(config.image_dialog, IMAGE_DIALOG_SIZE);
}

#[test]
fn json_overrides_keep_defaults_for_missing_fields() {
    let config = MenuConfig::from_json_str(
        r#"{
            "prefix": "doc-menu",
            "groups": [["bold", "italic"], ["link"]],
            "capacity": 2,
            "keymap": { "bold": ["Mod-b", "Mod-Shift-b"] },
            "link_dialog": { "width": 400, "height": 120 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.prefix, "doc-menu");
    assert_eq!(config.item_names().collect::<Vec<_>>(), vec!["bold", "italic", "link"]);
    assert_eq!(config.capacity, Some(2));
    assert_eq!(config.keymap.iter().count(), 1);
    assert_eq!(config.link_dialog, Size::new(400.0, 120.0));
    assert_eq!(config.image_dialog, IMAGE_DIALOG_SIZE);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = MenuConfig::from_json_str(r#"{ "groups": "bold" }"#).unwrap_err();
    assert!(matches!(err, MenuError::Config(_)));
}

#[test]
fn unknown_item_names_fail_the_build() {
    let editor = FakeEditor::default();
    let result = Menubar::builder(MenuConfig {
        groups: groups(&[&["a", "missing"]]),
        ..MenuConfig::default()
    })
    .item("a", named_item("a"))
    .build(&editor);
    let Err(err) = result else {
        panic!("expected the build to fail");
    };
    assert!(matches!(err, MenuError::UnknownItem(ref name) if name == "missing"));
}

#[test]
fn invalid_chords_fail_the_build() {
    let editor = FakeEditor::default();
    let mut config = MenuConfig {
        groups: groups(&[&["a"]]),
        ..MenuConfig::default()
    };
    config.keymap = config.keymap.bind("a", &["Super-a"]);
    let result = Menubar::builder(config).item("a", named_item("a")).build(&editor);
    assert!(matches!(result, Err(MenuError::InvalidChord { .. })));
}

#[test]
fn prefix_drives_every_class_name() {
    let editor = FakeEditor::default();
    let bar = Menubar::builder(MenuConfig {
        prefix: "doc-menu".into(),
        groups: groups(&[&["link"]]),
        ..MenuConfig::default()
    })
    .link_dialog(LinkDialog::new(apply_link))
    .build(&editor)
    .unwrap();

    let names = ClassNames::new("doc-menu");
    assert_eq!(bar.names(), &names);
    assert_eq!(names.bar, "doc-menubar");
    assert_eq!(names.disabled, "doc-menu-disabled");
    assert_eq!(bar.ui().toolbar_root(), Some(bar.root()));
    assert!(bar.ui().surface.has_class(bar.root(), "doc-menubar"));
}

#[test]
fn unknown_command_name_is_reported() {
    let mut editor = FakeEditor::default();
    let mut bar = Menubar::builder(MenuConfig {
        groups: groups(&[&["a"]]),
        ..MenuConfig::default()
    })
    .item("a", named_item("a"))
    .build(&editor)
    .unwrap();
    assert!(matches!(
        bar.run(&mut editor, "nope"),
        Err(MenuError::UnknownCommand(_))
    ));
    assert!(bar.run(&mut editor, "a").unwrap());
}
