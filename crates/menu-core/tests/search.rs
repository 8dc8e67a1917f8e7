mod support;

use gpui_menu_core::{
    KeyPress, MenuConfig, Menubar, SearchDirection, SearchSession,
};
use support::{FakeEditor, groups, icon, input, key, press};

fn menubar(editor: &FakeEditor) -> Menubar<FakeEditor> {
    let config = MenuConfig {
        groups: groups(&[&["search"]]),
        ..MenuConfig::default()
    };
    Menubar::builder(config).build(editor).unwrap()
}

fn status(bar: &Menubar<FakeEditor>) -> String {
    let class = bar.names().search_status.clone();
    let node = bar.ui().surface.find_by_class(&class).unwrap();
    bar.ui().surface.text_content(node)
}

fn show(bar: &mut Menubar<FakeEditor>, editor: &mut FakeEditor) {
    let names = bar.names().clone();
    let toggle = icon(&bar.ui().surface, &names.icon, "search");
    bar.handle_event(editor, &press(toggle, 100));
}

fn query_input(bar: &Menubar<FakeEditor>) -> gpui_menu_core::NodeId {
    bar.search().input().unwrap()
}

#[test]
fn status_formatting() {
    let mut session = SearchSession::default();
    assert_eq!(session.status(), "");

    session = session.rearmed(0);
    session.advance(SearchDirection::Forward);
    assert_eq!(session.status(), "No matches");

    let session = SearchSession {
        match_count: 5,
        match_index: 3,
        searched: true,
        ..SearchSession::default()
    };
    assert_eq!(session.status(), "3/5");
}

#[test]
fn advancing_wraps_in_both_directions() {
    let mut session = SearchSession::default().rearmed(3);
    assert_eq!(session.advance(SearchDirection::Backward), Some(2));
    assert_eq!(session.advance(SearchDirection::Forward), Some(0));
    assert_eq!(session.advance(SearchDirection::Forward), Some(1));
    assert_eq!(session.advance(SearchDirection::Forward), Some(2));
    assert_eq!(session.advance(SearchDirection::Forward), Some(0));
    assert_eq!(session.status(), "1/3");
}

#[test]
fn toggle_inserts_the_bar_right_after_the_toolbar() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor);
    let names = bar.names().clone();
    show(&mut bar, &mut editor);

    let search_bar = bar.ui().search_bar().unwrap();
    assert_eq!(bar.ui().surface.next_sibling(bar.root()), Some(search_bar));
    assert!(bar.search().is_active());
    let toggle = icon(&bar.ui().surface, &names.icon, "search");
    assert!(bar.ui().surface.has_class(toggle, &names.active));
    assert_eq!(status(&bar), "");

    show(&mut bar, &mut editor);
    assert!(bar.ui().search_bar().is_none());
    assert!(!bar.search().is_active());
    assert!(!bar.ui().surface.has_class(toggle, &names.active));
}

#[test]
fn typing_rearms_without_jumping_and_enter_jumps() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor);
    show(&mut bar, &mut editor);
    let field = query_input(&bar);

    bar.handle_event(&mut editor, &input(field, "alpha"));
    assert_eq!(bar.search().session().match_count, 3);
    assert_eq!(editor.selected_match, None);
    assert!(editor.scrolled.is_empty());
    assert_eq!(status(&bar), "");

    bar.handle_event(&mut editor, &key(field, KeyPress::new("Enter")));
    assert_eq!(editor.selected_match, Some(0));
    assert_eq!(editor.scrolled.len(), 1);
    assert_eq!(status(&bar), "1/3");

    bar.handle_event(&mut editor, &key(field, KeyPress::new("Enter").shift()));
    assert_eq!(editor.selected_match, Some(2));
    assert_eq!(status(&bar), "3/3");

    let names = bar.names().clone();
    let forward = icon(&bar.ui().surface, &names.icon, "search-forward");
    bar.handle_event(&mut editor, &press(forward, 200));
    assert_eq!(status(&bar), "1/3");
    let backward = icon(&bar.ui().surface, &names.icon, "search-backward");
    bar.handle_event(&mut editor, &press(backward, 300));
    assert_eq!(status(&bar), "3/3");

    bar.handle_event(&mut editor, &input(field, "alphab"));
    assert_eq!(status(&bar), "");
    bar.handle_event(&mut editor, &key(field, KeyPress::new("Enter")));
    assert_eq!(status(&bar), "No matches");
}

#[test]
fn case_toggle_rearms_and_repaints_itself() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor);
    let names = bar.names().clone();
    show(&mut bar, &mut editor);
    let field = query_input(&bar);
    bar.handle_event(&mut editor, &input(field, "alpha"));

    let case = icon(&bar.ui().surface, &names.icon, "case-sensitive");
    assert!(!bar.ui().surface.has_class(case, &names.active));
    bar.handle_event(&mut editor, &press(case, 200));
    assert!(bar.ui().surface.has_class(case, &names.active));
    assert!(bar.search().session().case_sensitive);
    assert_eq!(bar.search().session().match_count, 1);
    assert_eq!(editor.active_query.as_ref().map(|q| q.case_sensitive), Some(true));
}

#[test]
fn hiding_clears_the_query_but_keeps_case_sensitivity() {
    let mut editor = FakeEditor::default();
    let mut bar = menubar(&editor);
    let names = bar.names().clone();
    show(&mut bar, &mut editor);
    let field = query_input(&bar);
    bar.handle_event(&mut editor, &input(field, "beta"));
    let case = icon(&bar.ui().surface, &names.icon, "case-sensitive");
    bar.handle_event(&mut editor, &press(case, 200));

    bar.handle_event(&mut editor, &key(field, KeyPress::new("Escape")));
    assert!(bar.ui().search_bar().is_none());
    assert!(editor.active_query.is_none());
    let session = bar.search().session();
    assert_eq!(session.query, "");
    assert!(session.case_sensitive);
    assert!(!session.active);

    show(&mut bar, &mut editor);
    let field = query_input(&bar);
    assert_eq!(bar.ui().surface.attr(field, "value"), Some(""));
    let case = icon(&bar.ui().surface, &names.icon, "case-sensitive");
    assert!(bar.ui().surface.has_class(case, &names.active));
}

#[test]
fn mod_f_toggles_the_search_bar() {
    let mut editor = FakeEditor::default();
    let mut bar = Menubar::builder(MenuConfig {
        groups: groups(&[&["search"]]),
        ..MenuConfig::default()
    })
    .platform(gpui_menu_core::Platform::Other)
    .build(&editor)
    .unwrap();

    assert!(bar.handle_key(&mut editor, &KeyPress::new("f").ctrl()));
    assert!(bar.ui().search_bar().is_some());
    assert!(!bar.handle_key(&mut editor, &KeyPress::new("f").meta()));
    assert!(bar.ui().search_bar().is_some());
}

#[test]
fn mod_f_refreshes_the_toggle_on_the_next_update() {
    let mut editor = FakeEditor::default();
    let mut bar = Menubar::builder(MenuConfig {
        groups: groups(&[&["search"]]),
        ..MenuConfig::default()
    })
    .platform(gpui_menu_core::Platform::Other)
    .build(&editor)
    .unwrap();
    let names = bar.names().clone();
    let toggle = bar.ui().surface.find_by_class(&names.search_toggle).unwrap();
    assert!(!bar.ui().surface.has_class(toggle, &names.active));

    assert!(bar.handle_key(&mut editor, &KeyPress::new("f").ctrl()));
    let state = editor.state.clone();
    bar.update(&state);
    assert!(bar.ui().surface.has_class(toggle, &names.active));

    assert!(bar.handle_key(&mut editor, &KeyPress::new("f").ctrl()));
    bar.update(&state);
    assert!(!bar.ui().surface.has_class(toggle, &names.active));
    assert!(bar.ui().search_bar().is_none());
}
