mod support;

use gpui_menu_core::{
    DialogAction, DialogMode, EditorView, ImageAttrs, ImageDialog, KeyPress, MenuConfig, Menubar,
    NodeId, UiEvent,
};
use support::{FakeEditor, Tx, apply_image, groups, icon, input, key, press, texts};

fn menubar(editor: &FakeEditor, dialog: ImageDialog<FakeEditor>) -> Menubar<FakeEditor> {
    let config = MenuConfig {
        groups: groups(&[&["image"]]),
        ..MenuConfig::default()
    };
    Menubar::builder(config)
        .image_dialog(dialog)
        .build(editor)
        .unwrap()
}

fn open(bar: &mut Menubar<FakeEditor>, editor: &mut FakeEditor) -> ImageDialog<FakeEditor> {
    let names = bar.names().clone();
    let image = icon(&bar.ui().surface, &names.icon, "image");
    bar.handle_event(editor, &press(image, 100));
    bar.image_dialog().unwrap().clone()
}

fn fields(bar: &Menubar<FakeEditor>) -> (NodeId, NodeId) {
    let class = bar.names().dialog_input.clone();
    let inputs = bar.ui().surface.find_all_by_class(&class);
    (inputs[0], inputs[1])
}

/// The probe for the latest keystroke and the generation it carries.
fn probe(bar: &Menubar<FakeEditor>) -> (NodeId, u64) {
    let class = bar.names().image_probe.clone();
    let probes = bar.ui().surface.find_all_by_class(&class);
    assert_eq!(probes.len(), 1, "stale probes must be discarded");
    let node = probes[0];
    let generation = bar
        .ui()
        .surface
        .attr(node, "data-generation")
        .and_then(|value| value.parse().ok())
        .unwrap();
    (node, generation)
}

fn enter_action(dialog: &ImageDialog<FakeEditor>) -> DialogAction {
    dialog.session().as_ref().unwrap().enter_action()
}

#[test]
fn ok_is_enabled_throughout_but_enter_waits_for_a_loaded_probe() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor, ImageDialog::new(apply_image));
    let names = bar.names().clone();
    let dialog = open(&mut bar, &mut editor);
    assert_eq!(texts(&bar.ui().surface, &names.dialog_title), vec!["Insert image"]);
    let ok = bar.ui().surface.find_by_class(&names.dialog_ok).unwrap();
    let (src, _) = fields(&bar);

    bar.handle_event(&mut editor, &input(src, "not-a-url"));
    let (node, _) = probe(&bar);
    assert_eq!(bar.ui().surface.attr(node, "src"), Some("not-a-url"));
    assert!(!bar.ui().surface.has_class(ok, &names.disabled));
    bar.handle_event(&mut editor, &UiEvent::Error { target: node });
    assert!(!bar.ui().surface.has_class(ok, &names.disabled));
    assert_eq!(enter_action(&dialog), DialogAction::Cancel);

    bar.handle_event(&mut editor, &input(src, "https://example.test/a.png"));
    assert!(!bar.ui().surface.has_class(ok, &names.disabled));
    assert_eq!(enter_action(&dialog), DialogAction::Cancel);

    let (node, _) = probe(&bar);
    bar.handle_event(&mut editor, &UiEvent::Load { target: node });
    assert!(bar.ui().surface.has_class(ok, &names.active));
    assert_eq!(enter_action(&dialog), DialogAction::Confirm);

    bar.handle_event(&mut editor, &key(src, KeyPress::new("Enter")));
    assert!(!dialog.is_open());
    assert_eq!(
        editor.dispatched,
        vec![Tx::SetImage(ImageAttrs {
            src: "https://example.test/a.png".into(),
            alt: String::new(),
            title: None,
        })]
    );
}

#[test]
fn slow_superseded_probe_cannot_override_a_newer_result() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor, ImageDialog::new(apply_image));
    let dialog = open(&mut bar, &mut editor);
    let (src, _) = fields(&bar);

    bar.handle_event(&mut editor, &input(src, "https://slow.test/a.png"));
    let (slow_node, slow) = probe(&bar);
    bar.handle_event(&mut editor, &input(src, "https://fast.test/b.png"));
    let (fast_node, fast) = probe(&bar);
    assert!(fast > slow);
    assert!(!bar.ui().surface.exists(slow_node));

    bar.handle_event(&mut editor, &UiEvent::Load { target: fast_node });
    dialog.resolve_probe(bar.ui_mut(), slow, false);
    assert!(dialog.session().as_ref().unwrap().is_valid());
    assert_eq!(enter_action(&dialog), DialogAction::Confirm);
}

#[test]
fn probe_resolving_after_close_is_ignored() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor, ImageDialog::new(apply_image));
    let dialog = open(&mut bar, &mut editor);
    let (src, _) = fields(&bar);

    bar.handle_event(&mut editor, &input(src, "https://late.test/a.png"));
    let (_, generation) = probe(&bar);
    bar.handle_event(&mut editor, &key(src, KeyPress::new("Escape")));
    assert!(!dialog.is_open());

    let before = bar.ui().surface.mutation_count();
    dialog.resolve_probe(bar.ui_mut(), generation, true);
    assert!(!dialog.is_open());
    assert_eq!(bar.ui().surface.mutation_count(), before);
}

#[test]
fn editing_prefills_source_and_description() {
    let mut editor = FakeEditor::default();
    editor.state.image = Some(ImageAttrs {
        src: "https://x.test/cat.png".into(),
        alt: "a cat".into(),
        title: None,
    });
    let mut bar = menubar(&editor, ImageDialog::new(apply_image));
    let names = bar.names().clone();
    let dialog = open(&mut bar, &mut editor);

    assert_eq!(texts(&bar.ui().surface, &names.dialog_title), vec!["Edit image"]);
    {
        let session = dialog.session();
        let session = session.as_ref().unwrap();
        assert_eq!(session.mode(), DialogMode::Edit);
        assert_eq!(session.values(), ["https://x.test/cat.png", "a cat"]);
    }
    let (_, alt) = fields(&bar);
    bar.handle_event(&mut editor, &input(alt, " a grey cat "));
    let (node, _) = probe(&bar);
    bar.handle_event(&mut editor, &UiEvent::Load { target: node });

    let ok = bar.ui().surface.find_by_class(&names.dialog_ok).unwrap();
    bar.handle_event(&mut editor, &press(ok, 200));
    assert_eq!(
        editor.state().image.as_ref().map(|image| image.alt.as_str()),
        Some("a grey cat")
    );
}

#[test]
fn select_delegate_takes_over_and_closes_the_dialog() {
    let mut editor = FakeEditor::default();
    let dialog = ImageDialog::<FakeEditor>::new(apply_image).select_with(|cx| cx.view.focus());
    let mut bar = menubar(&editor, dialog);
    let names = bar.names().clone();
    let dialog = open(&mut bar, &mut editor);

    let select = bar.ui().surface.find_by_class(&names.dialog_select).unwrap();
    bar.handle_event(&mut editor, &press(select, 200));
    assert!(!dialog.is_open());
    assert_eq!(editor.focus_count, 1);
    assert!(editor.dispatched.is_empty());
}

#[test]
fn select_delegate_set_after_the_item_was_handed_out() {
    let mut editor = FakeEditor::default();
    let dialog = ImageDialog::<FakeEditor>::new(apply_image);
    let _early = dialog.item();
    let dialog = dialog.select_with(|cx| cx.view.focus());
    let mut bar = menubar(&editor, dialog);
    let names = bar.names().clone();
    open(&mut bar, &mut editor);

    let select = bar.ui().surface.find_by_class(&names.dialog_select).unwrap();
    bar.handle_event(&mut editor, &press(select, 200));
    assert_eq!(editor.focus_count, 1);
}

#[test]
fn no_select_button_without_a_delegate() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor, ImageDialog::new(apply_image));
    let names = bar.names().clone();
    open(&mut bar, &mut editor);
    assert!(bar.ui().surface.find_by_class(&names.dialog_select).is_none());
}
