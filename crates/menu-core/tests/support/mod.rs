#![allow(dead_code)]

use std::collections::BTreeSet;

use gpui_menu_core::{
    Command, EditorView, FindView, ImageAttrs, ItemSpec, KeyPress, LinkAttrs, NodeId, Rect,
    SearchQuery, Surface, UiEvent, Viewport,
};

/// Document state of the fake engine: just enough for predicates to read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeState {
    pub text: String,
    pub bold: bool,
    pub can_undo: bool,
    pub in_table: bool,
    pub link: Option<LinkAttrs>,
    pub image: Option<ImageAttrs>,
    /// Names of [`named_item`]s whose select predicate rejects this state.
    pub hidden: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tx {
    ToggleBold,
    Undo,
    SetLink(LinkAttrs),
    SetImage(ImageAttrs),
}

/// In-memory stand-in for a document engine.
#[derive(Debug)]
pub struct FakeEditor {
    pub state: FakeState,
    pub dispatched: Vec<Tx>,
    pub selection: Rect,
    pub viewport: Viewport,
    pub focus_count: usize,
    pub scrolled: Vec<Rect>,
    pub active_query: Option<SearchQuery>,
    pub selected_match: Option<usize>,
    pub cancel_count: usize,
}

impl FakeEditor {
    pub fn new(text: &str) -> Self {
        Self {
            state: FakeState {
                text: text.to_string(),
                ..FakeState::default()
            },
            dispatched: Vec::new(),
            selection: Rect::new(300.0, 100.0, 200.0, 320.0),
            viewport: Viewport::new(Rect::new(0.0, 0.0, 1000.0, 800.0), 40.0),
            focus_count: 0,
            scrolled: Vec::new(),
            active_query: None,
            selected_match: None,
            cancel_count: 0,
        }
    }

    fn matches(&self, query: &SearchQuery) -> Vec<usize> {
        if query.text.is_empty() {
            return Vec::new();
        }
        if query.case_sensitive {
            self.state
                .text
                .match_indices(&query.text)
                .map(|(pos, _)| pos)
                .collect()
        } else {
            self.state
                .text
                .to_lowercase()
                .match_indices(&query.text.to_lowercase())
                .map(|(pos, _)| pos)
                .collect()
        }
    }
}

impl Default for FakeEditor {
    fn default() -> Self {
        Self::new("Alpha beta alpha gamma ALPHA")
    }
}

impl EditorView for FakeEditor {
    type State = FakeState;
    type Transaction = Tx;

    fn state(&self) -> &FakeState {
        &self.state
    }

    fn dispatch(&mut self, tr: Tx) {
        match &tr {
            Tx::ToggleBold => self.state.bold = !self.state.bold,
            Tx::Undo => self.state.can_undo = false,
            Tx::SetLink(attrs) => self.state.link = Some(attrs.clone()),
            Tx::SetImage(attrs) => self.state.image = Some(attrs.clone()),
        }
        self.dispatched.push(tr);
    }

    fn focus(&mut self) {
        self.focus_count += 1;
    }

    fn selection_rect(&self) -> Rect {
        self.selection
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn coords_at(&self, pos: usize) -> Option<Rect> {
        let left = pos as f32 * 8.0;
        Some(Rect::new(100.0, left, left + 8.0, 116.0))
    }

    fn scroll_into_view(&mut self, rect: Rect) {
        self.scrolled.push(rect);
    }

    fn link_at_selection(&self) -> Option<LinkAttrs> {
        self.state.link.clone()
    }

    fn image_at_selection(&self) -> Option<ImageAttrs> {
        self.state.image.clone()
    }
}

impl FindView for FakeEditor {
    fn search(&mut self, query: &SearchQuery) -> usize {
        self.active_query = Some(query.clone());
        self.matches(query).len()
    }

    fn select_match(&mut self, index: usize) -> Option<usize> {
        let query = self.active_query.clone()?;
        let pos = self.matches(&query).get(index).copied()?;
        self.selected_match = Some(index);
        Some(pos)
    }

    fn cancel_search(&mut self) {
        self.active_query = None;
        self.cancel_count += 1;
    }
}

pub fn toggle_bold() -> Command<FakeEditor> {
    Command::from_state(|_, dispatch| {
        if let Some(dispatch) = dispatch {
            dispatch(Tx::ToggleBold);
        }
        true
    })
}

pub fn undo() -> Command<FakeEditor> {
    Command::from_state(|state: &FakeState, dispatch| {
        if !state.can_undo {
            return false;
        }
        if let Some(dispatch) = dispatch {
            dispatch(Tx::Undo);
        }
        true
    })
}

pub fn bold_item() -> ItemSpec<FakeEditor> {
    ItemSpec::new(toggle_bold())
        .icon("bold")
        .title("Bold")
        .active(|state: &FakeState| state.bold)
}

pub fn undo_item() -> ItemSpec<FakeEditor> {
    ItemSpec::new(undo()).icon("undo").title("Undo")
}

/// Only visible while the selection is inside a table.
pub fn table_item() -> ItemSpec<FakeEditor> {
    ItemSpec::new(Command::from_state(|_, _| true))
        .label("Table")
        .select(|state: &FakeState| state.in_table)
}

/// A labelled item that shows unless its name is in `FakeState::hidden`.
pub fn named_item(name: &str) -> ItemSpec<FakeEditor> {
    let key = name.to_string();
    ItemSpec::new(Command::from_state(|_, _| true))
        .label(name)
        .select(move |state: &FakeState| !state.hidden.contains(&key))
}

pub fn apply_link(state: &FakeState, attrs: &LinkAttrs, dispatch: Option<&mut dyn FnMut(Tx)>) -> bool {
    if state.link.as_ref() == Some(attrs) {
        return true;
    }
    if let Some(dispatch) = dispatch {
        dispatch(Tx::SetLink(attrs.clone()));
    }
    true
}

pub fn apply_image(_: &FakeState, attrs: &ImageAttrs, dispatch: Option<&mut dyn FnMut(Tx)>) -> bool {
    if let Some(dispatch) = dispatch {
        dispatch(Tx::SetImage(attrs.clone()));
    }
    true
}

pub fn press(target: NodeId, time_ms: u64) -> UiEvent {
    UiEvent::PointerDown { target, time_ms }
}

pub fn input(target: NodeId, value: &str) -> UiEvent {
    UiEvent::Input {
        target,
        value: value.to_string(),
    }
}

pub fn key(target: NodeId, key: KeyPress) -> UiEvent {
    UiEvent::KeyDown { target, key }
}

/// Visible text of every node carrying `class`, in tree order.
pub fn texts(surface: &Surface, class: &str) -> Vec<String> {
    surface
        .find_all_by_class(class)
        .into_iter()
        .map(|node| surface.text_content(node))
        .collect()
}

/// The attached icon node painted for `name`.
pub fn icon(surface: &Surface, icon_class: &str, name: &str) -> NodeId {
    surface
        .find_all_by_class(icon_class)
        .into_iter()
        .find(|node| surface.attr(*node, "data-icon") == Some(name))
        .unwrap_or_else(|| panic!("no `{name}` icon on the surface"))
}

pub fn groups(groups: &[&[&str]]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|group| group.iter().map(|name| name.to_string()).collect())
        .collect()
}
