mod support;

use std::rc::Rc;

use gpui_menu_core::{
    ClassNames, Dropdown, MENU_EVENT_WINDOW_MS, MenuElement, MenuItem, RenderResult, Submenu, Ui,
    UiEvent, dispatch,
};
use support::{FakeEditor, FakeState, Tx, bold_item, named_item, press};

fn element(spec: gpui_menu_core::ItemSpec<FakeEditor>) -> Rc<dyn MenuElement<FakeEditor>> {
    Rc::new(MenuItem::new(spec).unwrap())
}

struct Fixture {
    ui: Ui<FakeEditor>,
    editor: FakeEditor,
    result: RenderResult<FakeEditor>,
    outside: gpui_menu_core::NodeId,
}

fn fixture(root: Rc<dyn MenuElement<FakeEditor>>) -> Fixture {
    let mut ui = Ui::new(ClassNames::default());
    let result = root.render(&mut ui);
    let body = ui.surface.body();
    ui.surface.append(body, result.node);
    let outside = ui.surface.create("div");
    ui.surface.append(body, outside);
    let mut fixture = Fixture {
        ui,
        editor: FakeEditor::default(),
        result,
        outside,
    };
    let state = fixture.editor.state.clone();
    (fixture.result.update)(&mut fixture.ui.surface, &state);
    fixture
}

impl Fixture {
    fn label(&self, class: &str) -> gpui_menu_core::NodeId {
        self.ui.surface.find_by_class(class).unwrap()
    }

    fn send(&mut self, event: UiEvent) -> bool {
        dispatch(&mut self.editor, &mut self.ui, &event)
    }

    fn menu_open(&self) -> bool {
        self.ui
            .surface
            .find_by_class(&self.ui.names().dropdown_menu)
            .is_some()
    }
}

fn format_dropdown() -> Rc<dyn MenuElement<FakeEditor>> {
    Rc::new(
        Dropdown::new("Format", vec![element(bold_item()), element(named_item("quote"))])
            .title("Formatting"),
    )
}

#[test]
fn label_press_opens_and_outside_press_closes() {
    let mut fx = fixture(format_dropdown());
    let label = fx.label(&fx.ui.names().dropdown.clone());
    assert_eq!(fx.ui.surface.attr(label, "title"), Some("Formatting"));

    fx.send(press(label, 1_000));
    assert!(fx.menu_open());
    assert_eq!(fx.ui.capture_listener_count(), 1);

    let outside = fx.outside;
    fx.send(press(outside, 2_000));
    assert!(!fx.menu_open());
    assert_eq!(fx.ui.capture_listener_count(), 0);
}

#[test]
fn press_inside_the_recency_window_does_not_close() {
    let mut fx = fixture(format_dropdown());
    let label = fx.label(&fx.ui.names().dropdown.clone());

    fx.send(press(label, 1_000));
    let outside = fx.outside;
    fx.send(press(outside, 1_000 + MENU_EVENT_WINDOW_MS - 1));
    assert!(fx.menu_open());

    fx.send(press(outside, 1_000 + MENU_EVENT_WINDOW_MS));
    assert!(!fx.menu_open());
}

#[test]
fn second_label_press_closes() {
    let mut fx = fixture(format_dropdown());
    let label = fx.label(&fx.ui.names().dropdown.clone());
    fx.send(press(label, 1_000));
    fx.send(press(label, 3_000));
    assert!(!fx.menu_open());
    assert_eq!(fx.ui.capture_listener_count(), 0);
}

#[test]
fn activating_an_item_runs_it_and_closes_the_menu() {
    let mut fx = fixture(format_dropdown());
    let label = fx.label(&fx.ui.names().dropdown.clone());
    fx.send(press(label, 1_000));

    let icon = fx.label(&fx.ui.names().icon.clone());
    fx.send(press(icon, 5_000));
    assert_eq!(fx.editor.dispatched, vec![Tx::ToggleBold]);
    assert!(!fx.menu_open());

    // Items survive the menu and come back on the next open.
    fx.send(press(label, 9_000));
    assert!(fx.ui.surface.find_by_class(&fx.ui.names().icon.clone()).is_some());
}

#[test]
fn dropdown_hides_when_no_child_shows() {
    let root: Rc<dyn MenuElement<FakeEditor>> = Rc::new(Dropdown::new(
        "Table",
        vec![element(named_item("a")), element(named_item("b"))],
    ));
    let mut fx = fixture(root);
    let mut state = FakeState::default();
    state.hidden.insert("a".into());
    assert!((fx.result.update)(&mut fx.ui.surface, &state));
    assert!(!fx.ui.surface.is_hidden(fx.result.node));

    state.hidden.insert("b".into());
    assert!(!(fx.result.update)(&mut fx.ui.surface, &state));
    assert!(fx.ui.surface.is_hidden(fx.result.node));
}

#[test]
fn submenu_expands_on_hover_and_collapses_on_leave() {
    let root: Rc<dyn MenuElement<FakeEditor>> =
        Rc::new(Submenu::new("Insert", vec![element(named_item("hr"))]));
    let mut fx = fixture(root);
    let wrap = fx.result.node;
    let active = fx.ui.names().submenu_wrap_active.clone();
    let menu = fx.label(&fx.ui.names().submenu.clone());
    assert_eq!(fx.ui.surface.attr(menu, "data-expand"), Some("right"));

    fx.send(UiEvent::PointerEnter { target: wrap });
    assert!(fx.ui.surface.has_class(wrap, &active));
    fx.send(UiEvent::PointerLeave { target: wrap });
    assert!(!fx.ui.surface.has_class(wrap, &active));
}

#[test]
fn tapped_submenu_stays_open_until_an_outside_press() {
    let root: Rc<dyn MenuElement<FakeEditor>> =
        Rc::new(Submenu::new("Insert", vec![element(named_item("hr"))]));
    let mut fx = fixture(root);
    let wrap = fx.result.node;
    let active = fx.ui.names().submenu_wrap_active.clone();
    let label = fx.label(&fx.ui.names().submenu_label.clone());

    fx.send(press(label, 1_000));
    fx.send(UiEvent::PointerLeave { target: wrap });
    assert!(fx.ui.surface.has_class(wrap, &active));

    let outside = fx.outside;
    fx.send(press(outside, 2_000));
    assert!(!fx.ui.surface.has_class(wrap, &active));
    assert_eq!(fx.ui.capture_listener_count(), 0);
}

fn dropdown_with_submenu() -> Rc<dyn MenuElement<FakeEditor>> {
    let insert: Rc<dyn MenuElement<FakeEditor>> =
        Rc::new(Submenu::new("Insert", vec![element(named_item("hr"))]));
    Rc::new(Dropdown::new("Format", vec![element(bold_item()), insert]))
}

#[test]
fn nested_submenu_label_keeps_the_dropdown_open() {
    let mut fx = fixture(dropdown_with_submenu());
    let names = fx.ui.names().clone();
    let label = fx.label(&names.dropdown);
    fx.send(press(label, 1_000));
    assert!(fx.menu_open());

    let submenu_label = fx.label(&names.submenu_label);
    fx.send(press(submenu_label, 3_000));
    assert!(fx.menu_open());
    let wrap = fx.label(&names.submenu_wrap);
    assert!(fx.ui.surface.is_attached(wrap));
    assert!(fx.ui.surface.has_class(wrap, &names.submenu_wrap_active));
    assert_eq!(fx.ui.capture_listener_count(), 2);

    // Running an item inside the submenu closes both menus.
    let hr = fx
        .ui
        .surface
        .find_all_by_class(&names.label)
        .into_iter()
        .find(|node| fx.ui.surface.text_content(*node) == "hr")
        .unwrap();
    fx.send(press(hr, 5_000));
    assert!(!fx.menu_open());
    assert!(!fx.ui.surface.has_class(wrap, &names.submenu_wrap_active));
    assert_eq!(fx.ui.capture_listener_count(), 0);
}

#[test]
fn outside_press_closes_the_dropdown_and_its_pinned_submenu() {
    let mut fx = fixture(dropdown_with_submenu());
    let names = fx.ui.names().clone();
    let label = fx.label(&names.dropdown);
    fx.send(press(label, 1_000));
    let submenu_label = fx.label(&names.submenu_label);
    fx.send(press(submenu_label, 3_000));

    let outside = fx.outside;
    fx.send(press(outside, 5_000));
    assert!(!fx.menu_open());
    assert_eq!(fx.ui.capture_listener_count(), 0);

    // Reopening shows the submenu collapsed.
    fx.send(press(label, 7_000));
    let wrap = fx.label(&names.submenu_wrap);
    assert!(!fx.ui.surface.has_class(wrap, &names.submenu_wrap_active));
}

#[test]
fn removing_the_dropdown_releases_its_menu_and_items() {
    let mut fx = fixture(dropdown_with_submenu());
    let names = fx.ui.names().clone();
    let label = fx.label(&names.dropdown);
    fx.send(press(label, 1_000));
    let submenu_label = fx.label(&names.submenu_label);
    fx.send(press(submenu_label, 3_000));
    let items = fx.ui.surface.find_all_by_class(&names.dropdown_item);
    assert!(!items.is_empty());

    let wrap = fx.result.node;
    fx.ui.remove(wrap);
    assert!(items.iter().all(|item| !fx.ui.surface.exists(*item)));
    assert_eq!(fx.ui.capture_listener_count(), 0);
    assert_eq!(fx.ui.listener_count(), 0);
}
