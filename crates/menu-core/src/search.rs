use std::cell::RefCell;
use std::rc::Rc;

use crate::command::{Command, FindView, SearchQuery};
use crate::event::{Cx, EventKind, Propagation, Ui, UiEvent};
use crate::item::{ItemSpec, MenuElement, MenuItem, RenderResult};
use crate::surface::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// Search state for one editor. Survives hiding the bar, minus the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    pub case_sensitive: bool,
    pub match_count: usize,
    /// One based; zero until the first jump.
    pub match_index: usize,
    /// Whether a find ran since the query last changed.
    pub searched: bool,
    pub active: bool,
}

impl SearchSession {
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            text: self.query.clone(),
            case_sensitive: self.case_sensitive,
        }
    }

    pub fn status(&self) -> String {
        if !self.searched {
            String::new()
        } else if self.match_count == 0 {
            "No matches".to_string()
        } else {
            format!("{}/{}", self.match_index, self.match_count)
        }
    }

    /// New query text or sensitivity: highlighting restarts, nothing moves.
    pub fn rearmed(mut self, match_count: usize) -> Self {
        self.match_count = match_count;
        self.match_index = 0;
        self.searched = false;
        self
    }

    /// Steps to the next match in `direction`, wrapping around. Returns the
    /// zero based index to select.
    pub fn advance(&mut self, direction: SearchDirection) -> Option<usize> {
        self.searched = true;
        if self.match_count == 0 {
            self.match_index = 0;
            return None;
        }
        self.match_index = match direction {
            SearchDirection::Forward => self.match_index % self.match_count + 1,
            SearchDirection::Backward if self.match_index <= 1 => self.match_count,
            SearchDirection::Backward => self.match_index - 1,
        };
        Some(self.match_index - 1)
    }

    pub fn deactivated(self) -> Self {
        Self {
            case_sensitive: self.case_sensitive,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SearchBar {
    root: NodeId,
    input: NodeId,
    status: NodeId,
}

/// Shows and hides the search bar and drives the engine's find primitives.
pub struct SearchController<V: FindView> {
    session: Rc<RefCell<SearchSession>>,
    bar: Rc<RefCell<Option<SearchBar>>>,
    _view: std::marker::PhantomData<fn(V)>,
}

impl<V: FindView> Clone for SearchController<V> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            bar: self.bar.clone(),
            _view: std::marker::PhantomData,
        }
    }
}

impl<V: FindView> Default for SearchController<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: FindView> SearchController<V> {
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(SearchSession::default())),
            bar: Rc::new(RefCell::new(None)),
            _view: std::marker::PhantomData,
        }
    }

    pub fn session(&self) -> SearchSession {
        self.session.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.session.borrow().active
    }

    pub fn input(&self) -> Option<NodeId> {
        self.bar.borrow().map(|bar| bar.input)
    }

    pub fn toggle(&self, cx: &mut Cx<'_, V>) {
        if self.is_active() {
            self.hide(cx);
        } else {
            self.show(cx);
        }
    }

    pub fn show(&self, cx: &mut Cx<'_, V>) {
        if self.is_active() {
            return;
        }
        self.session.borrow_mut().active = true;

        let names = cx.ui.names().clone();
        let surface = &mut cx.ui.surface;
        let root = surface.create_with_class("div", &names.search_bar);
        let input = surface.create_with_class("input", &names.search_input);
        surface.set_attr(input, "placeholder", "Search document...");
        surface.set_attr(input, "value", self.session.borrow().query.clone());
        surface.append(root, input);

        let buttons = [
            self.find_item(SearchDirection::Backward),
            self.find_item(SearchDirection::Forward),
            self.case_item(),
        ];
        let state = cx.view.state().clone();
        for item in buttons {
            let RenderResult { node, mut update } = item.render(cx.ui);
            update(&mut cx.ui.surface, &state);
            cx.ui.surface.append(root, node);
        }

        let status = cx.ui.surface.create_with_class("span", &names.search_status);
        cx.ui.surface.append(root, status);

        let anchor = cx.ui.more_panel().or_else(|| cx.ui.toolbar_root());
        match anchor {
            Some(anchor) => cx.ui.surface.insert_after(anchor, root),
            None => {
                let body = cx.ui.surface.body();
                cx.ui.surface.append(body, root);
            }
        }

        cx.ui.on(input, EventKind::Input, {
            let this = self.clone();
            move |cx, event| {
                if let UiEvent::Input { value, .. } = event {
                    this.set_query(cx, value.clone());
                }
                Propagation::Continue
            }
        });
        cx.ui.on(input, EventKind::KeyDown, {
            let this = self.clone();
            move |cx, event| {
                let UiEvent::KeyDown { key, .. } = event else {
                    return Propagation::Continue;
                };
                match key.key.as_str() {
                    "Enter" if key.shift => this.find(cx, SearchDirection::Backward),
                    "Enter" => this.find(cx, SearchDirection::Forward),
                    "Escape" => this.hide(cx),
                    _ => return Propagation::Continue,
                }
                Propagation::Stop
            }
        });

        *self.bar.borrow_mut() = Some(SearchBar {
            root,
            input,
            status,
        });
        self.refresh_status(cx.ui);
        tracing::debug!("search bar shown");
    }

    /// Removes the bar and any highlighting. Case sensitivity is kept.
    pub fn hide(&self, cx: &mut Cx<'_, V>) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            cx.ui.remove(bar.root);
        }
        cx.view.cancel_search();
        let session = self.session.take();
        *self.session.borrow_mut() = session.deactivated();
        tracing::debug!("search bar hidden");
    }

    /// Restarts highlighting for `text` without jumping to a match.
    pub fn set_query(&self, cx: &mut Cx<'_, V>, text: impl Into<String>) {
        self.session.borrow_mut().query = text.into();
        self.rearm(cx);
    }

    fn rearm(&self, cx: &mut Cx<'_, V>) {
        cx.view.cancel_search();
        let query = self.session.borrow().query();
        let count = if query.text.is_empty() {
            0
        } else {
            cx.view.search(&query)
        };
        let session = self.session.take();
        *self.session.borrow_mut() = session.rearmed(count);
        self.refresh_status(cx.ui);
    }

    /// Jumps to the next match and scrolls it into view.
    pub fn find(&self, cx: &mut Cx<'_, V>, direction: SearchDirection) {
        if self.session.borrow().query.is_empty() {
            return;
        }
        let index = self.session.borrow_mut().advance(direction);
        if let Some(index) = index
            && let Some(pos) = cx.view.select_match(index)
            && let Some(rect) = cx.view.coords_at(pos)
        {
            cx.view.scroll_into_view(rect);
        }
        self.refresh_status(cx.ui);
    }

    pub fn toggle_case_sensitive(&self, cx: &mut Cx<'_, V>) {
        {
            let mut session = self.session.borrow_mut();
            session.case_sensitive = !session.case_sensitive;
        }
        self.rearm(cx);
    }

    fn refresh_status(&self, ui: &mut Ui<V>) {
        let Some(bar) = *self.bar.borrow() else {
            return;
        };
        let status = self.session.borrow().status();
        let text = ui.surface.children(bar.status).first().copied();
        match text {
            Some(text) => ui.surface.set_text(text, status),
            None => {
                let text = ui.surface.create_text(status);
                ui.surface.append(bar.status, text);
            }
        }
    }

    fn find_item(&self, direction: SearchDirection) -> MenuItem<V> {
        let this = self.clone();
        let (icon, title) = match direction {
            SearchDirection::Forward => ("search-forward", "Search forward (Enter)"),
            SearchDirection::Backward => ("search-backward", "Search backward (Shift-Enter)"),
        };
        let spec = ItemSpec::new(Command::new(move |_, dispatch, cx| {
            if dispatch.is_none() {
                return true;
            }
            if let Some(cx) = cx {
                this.find(cx, direction);
            }
            true
        }))
        .title(title);
        MenuItem::with_icon(spec, icon)
    }

    /// Not part of the toolbar's update cascade: it re-renders itself after
    /// every toggle.
    fn case_item(&self) -> MenuItem<V> {
        let this = self.clone();
        let session = self.session.clone();
        let spec = ItemSpec::new(Command::new(move |_, dispatch, cx| {
            if dispatch.is_none() {
                return true;
            }
            if let Some(cx) = cx {
                this.toggle_case_sensitive(cx);
            }
            true
        }))
        .title("Match case")
        .active(move |_| session.borrow().case_sensitive)
        .refresh_after_run(true);
        MenuItem::with_icon(spec, "case-sensitive")
    }

    /// Toolbar item that shows and hides the bar.
    pub fn item(&self) -> ItemSpec<V> {
        let this = self.clone();
        let session = self.session.clone();
        ItemSpec::new(Command::new(move |_, dispatch, cx| {
            if dispatch.is_none() {
                return true;
            }
            if let Some(cx) = cx {
                this.toggle(cx);
            }
            true
        }))
        .icon("search")
        .title("Toggle search")
        .active(move |_| session.borrow().active)
        .refresh_after_run(true)
    }
}
