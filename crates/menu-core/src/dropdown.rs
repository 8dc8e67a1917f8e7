use std::cell::RefCell;
use std::rc::Rc;

use crate::command::EditorView;
use crate::event::{Cx, EventKind, ListenerId, Propagation, Ui, UiEvent};
use crate::item::{MenuElement, RenderResult, Update};
use crate::names::ClassNames;
use crate::surface::{NodeId, Surface};

/// A press on a menu's own controls within this window belongs to the
/// gesture that opened it and must not close it again.
pub const MENU_EVENT_WINDOW_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub node: NodeId,
    pub time_ms: u64,
}

impl Press {
    pub fn is_recent(&self, time_ms: u64) -> bool {
        time_ms >= self.time_ms && time_ms - self.time_ms < MENU_EVENT_WINDOW_MS
    }
}

/// The nodes an open menu measures presses against: its whole subtree and
/// the label that toggles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuBounds {
    pub wrap: NodeId,
    pub label: NodeId,
}

/// Whether a pointer press should close an open menu.
///
/// Presses outside the menu's subtree close it, and so do presses on its
/// items, which run as the menu goes away. Presses on its own label are left
/// to the label, and presses on the label of a menu nested inside keep it
/// open so the nested one can expand.
pub fn press_closes_menu(
    surface: &Surface,
    names: &ClassNames,
    bounds: MenuBounds,
    opened_by: Press,
    event: &UiEvent,
) -> bool {
    let UiEvent::PointerDown { target, time_ms } = *event else {
        return false;
    };
    if opened_by.is_recent(time_ms) {
        return false;
    }
    if !surface.contains(bounds.wrap, target) {
        return true;
    }
    if surface.contains(bounds.label, target) {
        return false;
    }
    !surface
        .ancestors(target)
        .into_iter()
        .take_while(|node| *node != bounds.wrap)
        .any(|node| {
            surface.has_class(node, &names.dropdown) || surface.has_class(node, &names.submenu_label)
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    #[default]
    Closed,
    Open {
        menu: NodeId,
        listener: ListenerId,
        opened_by: Press,
    },
}

impl DropdownState {
    pub fn is_open(&self) -> bool {
        matches!(self, DropdownState::Open { .. })
    }

    pub fn opened(menu: NodeId, listener: ListenerId, opened_by: Press) -> Self {
        DropdownState::Open {
            menu,
            listener,
            opened_by,
        }
    }

    pub fn closed(self) -> Self {
        DropdownState::Closed
    }
}

pub(crate) struct DropdownItems<V: EditorView> {
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) update: Update<V>,
}

/// Renders each child into its own wrapper. The combined update hides the
/// wrapper of every child that shows nothing.
pub(crate) fn render_dropdown_items<V: EditorView>(
    content: &[Rc<dyn MenuElement<V>>],
    ui: &mut Ui<V>,
) -> DropdownItems<V> {
    let class = ui.names().dropdown_item.clone();
    let mut nodes = Vec::with_capacity(content.len());
    let mut updates = Vec::with_capacity(content.len());
    for element in content {
        let RenderResult { node, update } = element.render(ui);
        let wrapper = ui.surface.create_with_class("div", &class);
        ui.surface.append(wrapper, node);
        nodes.push(wrapper);
        updates.push(update);
    }

    let wrappers = nodes.clone();
    DropdownItems {
        nodes,
        update: Box::new(move |surface, state| {
            let mut something = false;
            for (update, wrapper) in updates.iter_mut().zip(&wrappers) {
                let showing = update(surface, state);
                surface.set_hidden(*wrapper, !showing);
                something |= showing;
            }
            something
        }),
    }
}

/// A labelled button that drops a list of elements below itself.
pub struct Dropdown<V: EditorView> {
    content: Vec<Rc<dyn MenuElement<V>>>,
    label: String,
    title: Option<String>,
    class: Option<String>,
}

impl<V: EditorView> Dropdown<V> {
    pub fn new(label: impl Into<String>, content: Vec<Rc<dyn MenuElement<V>>>) -> Self {
        Self {
            content,
            label: label.into(),
            title: None,
            class: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

struct DropdownShared {
    wrap: NodeId,
    label: NodeId,
    items: Vec<NodeId>,
    menu_class: String,
    state: DropdownState,
}

fn close_dropdown<V: EditorView>(shared: &RefCell<DropdownShared>, ui: &mut Ui<V>) {
    let mut shared = shared.borrow_mut();
    let DropdownState::Open { menu, listener, .. } = shared.state else {
        return;
    };
    // The items are rendered once and outlive the menu that shows them.
    for item in &shared.items {
        ui.surface.detach(*item);
    }
    ui.remove(menu);
    ui.off(listener);
    shared.state = shared.state.closed();
    tracing::debug!("dropdown closed");
}

fn open_dropdown<V: EditorView>(
    shared: &Rc<RefCell<DropdownShared>>,
    cx: &mut Cx<'_, V>,
    opened_by: Press,
) {
    let (wrap, label) = {
        let shared = shared.borrow();
        (shared.wrap, shared.label)
    };
    let menu_class = shared.borrow().menu_class.clone();
    let menu = cx.ui.surface.create("div");
    cx.ui.surface.add_class(menu, &menu_class);
    cx.ui.surface.set_attr(menu, "data-expand", "below");
    for item in shared.borrow().items.iter() {
        cx.ui.surface.append(menu, *item);
    }
    cx.ui.surface.append(wrap, menu);

    let bounds = MenuBounds { wrap, label };
    let listener = cx.ui.on_capture(EventKind::PointerDown, {
        let shared = shared.clone();
        move |cx, event| {
            let opened_by = match shared.borrow().state {
                DropdownState::Open { opened_by, .. } => opened_by,
                DropdownState::Closed => return Propagation::Continue,
            };
            if press_closes_menu(&cx.ui.surface, cx.ui.names(), bounds, opened_by, event) {
                close_dropdown(&shared, cx.ui);
            }
            Propagation::Continue
        }
    });

    shared.borrow_mut().state = DropdownState::opened(menu, listener, opened_by);
    tracing::debug!("dropdown opened");
}

impl<V: EditorView> MenuElement<V> for Dropdown<V> {
    fn render(&self, ui: &mut Ui<V>) -> RenderResult<V> {
        let names = ui.names().clone();
        let DropdownItems {
            nodes: items,
            update: mut items_update,
        } = render_dropdown_items(&self.content, ui);

        let wrap = ui.surface.create_with_class("div", &names.dropdown_wrap);
        let label = ui.surface.create_with_class("div", &names.dropdown);
        if let Some(class) = &self.class {
            ui.surface.add_class(label, class);
        }
        if let Some(title) = &self.title {
            ui.surface.set_attr(label, "title", title.clone());
        }
        let text = ui.surface.create_text(self.label.clone());
        ui.surface.append(label, text);
        ui.surface.append(wrap, label);

        let mut menu_class = names.dropdown_menu.clone();
        if let Some(class) = &self.class {
            menu_class.push(' ');
            menu_class.push_str(class);
        }
        let shared = Rc::new(RefCell::new(DropdownShared {
            wrap,
            label,
            items,
            menu_class,
            state: DropdownState::Closed,
        }));

        ui.on(label, EventKind::PointerDown, {
            let shared = shared.clone();
            move |cx, event| {
                let UiEvent::PointerDown { time_ms, .. } = *event else {
                    return Propagation::Continue;
                };
                if shared.borrow().state.is_open() {
                    close_dropdown(&shared, cx.ui);
                } else {
                    open_dropdown(&shared, cx, Press { node: label, time_ms });
                }
                Propagation::Stop
            }
        });

        // Closed menus keep their items off the tree, out of reach of a
        // subtree removal.
        ui.on_teardown(wrap, move |ui| {
            close_dropdown(&shared, ui);
            let items = std::mem::take(&mut shared.borrow_mut().items);
            for item in items {
                ui.remove(item);
            }
        });

        RenderResult {
            node: wrap,
            update: Box::new(move |surface, state| {
                let inner = items_update(surface, state);
                surface.set_hidden(wrap, !inner);
                inner
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmenuState {
    #[default]
    Closed,
    /// Open while the pointer is over it.
    Hovered,
    /// Opened by a tap; stays open until a press lands elsewhere.
    Pinned { listener: ListenerId, opened_by: Press },
}

impl SubmenuState {
    pub fn is_open(&self) -> bool {
        !matches!(self, SubmenuState::Closed)
    }

    pub fn entered(self) -> Self {
        match self {
            SubmenuState::Closed => SubmenuState::Hovered,
            other => other,
        }
    }

    pub fn left(self) -> Self {
        match self {
            SubmenuState::Hovered => SubmenuState::Closed,
            other => other,
        }
    }
}

/// A nested menu that expands to the right of its label.
pub struct Submenu<V: EditorView> {
    content: Vec<Rc<dyn MenuElement<V>>>,
    label: String,
}

impl<V: EditorView> Submenu<V> {
    pub fn new(label: impl Into<String>, content: Vec<Rc<dyn MenuElement<V>>>) -> Self {
        Self {
            content,
            label: label.into(),
        }
    }
}

struct SubmenuShared {
    wrap: NodeId,
    active_class: String,
    state: SubmenuState,
}

impl SubmenuShared {
    fn apply<V: EditorView>(&mut self, ui: &mut Ui<V>, next: SubmenuState) {
        if let SubmenuState::Pinned { listener, .. } = self.state
            && !matches!(next, SubmenuState::Pinned { .. })
        {
            ui.off(listener);
        }
        self.state = next;
        ui.surface
            .set_class(self.wrap, &self.active_class, self.state.is_open());
    }
}

impl<V: EditorView> MenuElement<V> for Submenu<V> {
    fn render(&self, ui: &mut Ui<V>) -> RenderResult<V> {
        let names = ui.names().clone();
        let DropdownItems {
            nodes: items,
            update: mut items_update,
        } = render_dropdown_items(&self.content, ui);

        let wrap = ui.surface.create_with_class("div", &names.submenu_wrap);
        let label = ui.surface.create_with_class("div", &names.submenu_label);
        let text = ui.surface.create_text(self.label.clone());
        ui.surface.append(label, text);
        let menu = ui.surface.create_with_class("div", &names.submenu);
        ui.surface.set_attr(menu, "data-expand", "right");
        for item in items {
            ui.surface.append(menu, item);
        }
        ui.surface.append(wrap, label);
        ui.surface.append(wrap, menu);

        let shared = Rc::new(RefCell::new(SubmenuShared {
            wrap,
            active_class: names.submenu_wrap_active.clone(),
            state: SubmenuState::Closed,
        }));

        ui.on(wrap, EventKind::PointerEnter, {
            let shared = shared.clone();
            move |cx, _| {
                let mut shared = shared.borrow_mut();
                let next = shared.state.entered();
                shared.apply(cx.ui, next);
                Propagation::Continue
            }
        });
        ui.on(wrap, EventKind::PointerLeave, {
            let shared = shared.clone();
            move |cx, _| {
                let mut shared = shared.borrow_mut();
                let next = shared.state.left();
                shared.apply(cx.ui, next);
                Propagation::Continue
            }
        });

        ui.on(label, EventKind::PointerDown, {
            let shared = shared.clone();
            move |cx, event| {
                let UiEvent::PointerDown { time_ms, .. } = *event else {
                    return Propagation::Continue;
                };
                if matches!(shared.borrow().state, SubmenuState::Pinned { .. }) {
                    let mut shared = shared.borrow_mut();
                    shared.apply(cx.ui, SubmenuState::Closed);
                    return Propagation::Stop;
                }

                let listener = cx.ui.on_capture(EventKind::PointerDown, {
                    let shared = shared.clone();
                    move |cx, event| {
                        let SubmenuState::Pinned { opened_by, .. } = shared.borrow().state else {
                            return Propagation::Continue;
                        };
                        let bounds = MenuBounds { wrap, label };
                        if press_closes_menu(&cx.ui.surface, cx.ui.names(), bounds, opened_by, event) {
                            shared.borrow_mut().apply(cx.ui, SubmenuState::Closed);
                        }
                        Propagation::Continue
                    }
                });
                let opened_by = Press {
                    node: label,
                    time_ms,
                };
                shared
                    .borrow_mut()
                    .apply(cx.ui, SubmenuState::Pinned { listener, opened_by });
                Propagation::Stop
            }
        });

        ui.on_teardown(wrap, move |ui| {
            shared.borrow_mut().apply(ui, SubmenuState::Closed);
        });

        RenderResult {
            node: wrap,
            update: Box::new(move |surface, state| {
                let inner = items_update(surface, state);
                surface.set_hidden(wrap, !inner);
                inner
            }),
        }
    }
}
