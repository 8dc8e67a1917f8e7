use std::cell::RefCell;
use std::rc::Rc;

use crate::command::{Command, EditorView};
use crate::event::{Cx, Ui};
use crate::grouped::{Group, render_grouped};
use crate::item::{ItemSpec, RenderResult, Update};
use crate::surface::{NodeId, Surface};

/// Splits `groups` so that the first `capacity` items stay inline and the
/// rest go to the overflow panel. Group boundaries and order survive on both
/// sides; empty groups are dropped.
pub fn split_overflow<T: Clone>(groups: &[Vec<T>], capacity: usize) -> (Vec<Vec<T>>, Vec<Vec<T>>) {
    let mut inline = Vec::new();
    let mut overflow = Vec::new();
    let mut remaining = capacity;
    for group in groups.iter().filter(|group| !group.is_empty()) {
        let take = remaining.min(group.len());
        remaining -= take;
        if take > 0 {
            inline.push(group[..take].to_vec());
        }
        if take < group.len() {
            overflow.push(group[take..].to_vec());
        }
    }
    (inline, overflow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowState {
    #[default]
    Collapsed,
    Expanded {
        panel: NodeId,
    },
}

impl OverflowState {
    pub fn is_expanded(&self) -> bool {
        matches!(self, OverflowState::Expanded { .. })
    }
}

struct OverflowShared<V: EditorView> {
    state: OverflowState,
    update: Option<Update<V>>,
}

/// The "more" panel: items past the toolbar's capacity, rendered on demand
/// right below the toolbar and destroyed again on collapse.
pub struct Overflow<V: EditorView> {
    groups: Rc<Vec<Group<V>>>,
    shared: Rc<RefCell<OverflowShared<V>>>,
}

impl<V: EditorView> Clone for Overflow<V> {
    fn clone(&self) -> Self {
        Self {
            groups: self.groups.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<V: EditorView> Overflow<V> {
    pub fn new(groups: Vec<Group<V>>) -> Self {
        Self {
            groups: Rc::new(groups),
            shared: Rc::new(RefCell::new(OverflowShared {
                state: OverflowState::Collapsed,
                update: None,
            })),
        }
    }

    pub fn groups(&self) -> &[Group<V>] {
        &self.groups
    }

    pub fn state(&self) -> OverflowState {
        self.shared.borrow().state
    }

    pub fn is_expanded(&self) -> bool {
        self.state().is_expanded()
    }

    pub fn toggle(&self, cx: &mut Cx<'_, V>) {
        if self.is_expanded() {
            self.collapse(cx.ui);
        } else {
            self.expand(cx);
        }
    }

    pub fn expand(&self, cx: &mut Cx<'_, V>) {
        if self.is_expanded() {
            return;
        }
        let RenderResult { node, mut update } = render_grouped(cx.ui, &self.groups);
        let class = cx.ui.names().more_panel.clone();
        let panel = cx.ui.surface.create_with_class("div", &class);
        cx.ui.surface.append(panel, node);
        match cx.ui.toolbar_root() {
            Some(toolbar) => cx.ui.surface.insert_after(toolbar, panel),
            None => {
                let body = cx.ui.surface.body();
                cx.ui.surface.append(body, panel);
            }
        }

        let state = cx.view.state().clone();
        update(&mut cx.ui.surface, &state);

        let mut shared = self.shared.borrow_mut();
        shared.state = OverflowState::Expanded { panel };
        shared.update = Some(update);
        tracing::debug!("overflow panel expanded");
    }

    pub fn collapse(&self, ui: &mut Ui<V>) {
        let mut shared = self.shared.borrow_mut();
        let OverflowState::Expanded { panel } = shared.state else {
            return;
        };
        ui.remove(panel);
        shared.state = OverflowState::Collapsed;
        shared.update = None;
        tracing::debug!("overflow panel collapsed");
    }

    /// Keeps the panel in sync while it is expanded.
    pub fn update(&self, surface: &mut Surface, state: &V::State) -> bool {
        let mut shared = self.shared.borrow_mut();
        match shared.update.as_mut() {
            Some(update) => update(surface, state),
            None => false,
        }
    }

    /// The toggle appended to the toolbar in place of the overflowed items.
    pub fn item(&self) -> ItemSpec<V> {
        let toggle = self.clone();
        let expanded = self.clone();
        ItemSpec::new(Command::new(move |_, dispatch, cx| {
            if dispatch.is_none() {
                return true;
            }
            if let Some(cx) = cx {
                toggle.toggle(cx);
            }
            true
        }))
        .icon("more")
        .title("More")
        .active(move |_| expanded.is_expanded())
        .refresh_after_run(true)
    }
}
