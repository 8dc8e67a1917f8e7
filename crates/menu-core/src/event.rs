use std::collections::HashMap;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::command::EditorView;
use crate::keymap::KeyPress;
use crate::names::ClassNames;
use crate::surface::{NodeId, Surface};

new_key_type! {
    pub struct ListenerId;
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PointerDown { target: NodeId, time_ms: u64 },
    PointerEnter { target: NodeId },
    PointerLeave { target: NodeId },
    /// The host changed the value of a text field.
    Input { target: NodeId, value: String },
    KeyDown { target: NodeId, key: KeyPress },
    /// An image element finished loading its `src`.
    Load { target: NodeId },
    /// An image element failed to load its `src`.
    Error { target: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerEnter,
    PointerLeave,
    Input,
    KeyDown,
    Load,
    Error,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::PointerDown { .. } => EventKind::PointerDown,
            UiEvent::PointerEnter { .. } => EventKind::PointerEnter,
            UiEvent::PointerLeave { .. } => EventKind::PointerLeave,
            UiEvent::Input { .. } => EventKind::Input,
            UiEvent::KeyDown { .. } => EventKind::KeyDown,
            UiEvent::Load { .. } => EventKind::Load,
            UiEvent::Error { .. } => EventKind::Error,
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            UiEvent::PointerDown { target, .. }
            | UiEvent::PointerEnter { target }
            | UiEvent::PointerLeave { target }
            | UiEvent::Input { target, .. }
            | UiEvent::KeyDown { target, .. }
            | UiEvent::Load { target }
            | UiEvent::Error { target } => *target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// What a handler gets to work with: the editor and the surface it paints.
pub struct Cx<'a, V: EditorView> {
    pub view: &'a mut V,
    pub ui: &'a mut Ui<V>,
}

impl<'a, V: EditorView> Cx<'a, V> {
    pub fn new(view: &'a mut V, ui: &'a mut Ui<V>) -> Self {
        Self { view, ui }
    }
}

pub type Handler<V> = Rc<dyn Fn(&mut Cx<'_, V>, &UiEvent) -> Propagation>;

type Teardown<V> = Box<dyn FnOnce(&mut Ui<V>)>;

struct Registered<V: EditorView> {
    node: Option<NodeId>,
    kind: EventKind,
    handler: Handler<V>,
}

/// The host surface handle every component is given: the node tree, the
/// class names it is painted with and the listeners attached to it.
pub struct Ui<V: EditorView> {
    pub surface: Surface,
    names: ClassNames,
    listeners: SlotMap<ListenerId, Registered<V>>,
    by_node: HashMap<(NodeId, EventKind), Vec<ListenerId>>,
    capture: Vec<ListenerId>,
    teardowns: HashMap<NodeId, Vec<Teardown<V>>>,
}

impl<V: EditorView> Ui<V> {
    pub fn new(names: ClassNames) -> Self {
        Self {
            surface: Surface::new(),
            names,
            listeners: SlotMap::with_key(),
            by_node: HashMap::new(),
            capture: Vec::new(),
            teardowns: HashMap::new(),
        }
    }

    pub fn names(&self) -> &ClassNames {
        &self.names
    }

    pub fn toolbar_root(&self) -> Option<NodeId> {
        self.surface.find_by_class(&self.names.bar)
    }

    pub fn search_bar(&self) -> Option<NodeId> {
        self.surface.find_by_class(&self.names.search_bar)
    }

    pub fn more_panel(&self) -> Option<NodeId> {
        self.surface.find_by_class(&self.names.more_panel)
    }

    pub fn dialog(&self) -> Option<NodeId> {
        self.surface.find_by_class(&self.names.dialog)
    }

    pub fn on(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&mut Cx<'_, V>, &UiEvent) -> Propagation + 'static,
    ) -> ListenerId {
        let id = self.listeners.insert(Registered {
            node: Some(node),
            kind,
            handler: Rc::new(handler),
        });
        self.by_node.entry((node, kind)).or_default().push(id);
        id
    }

    /// Document-level listener that sees every event of `kind` before the
    /// target does. Lives until [`Ui::off`] is called.
    pub fn on_capture(
        &mut self,
        kind: EventKind,
        handler: impl Fn(&mut Cx<'_, V>, &UiEvent) -> Propagation + 'static,
    ) -> ListenerId {
        let id = self.listeners.insert(Registered {
            node: None,
            kind,
            handler: Rc::new(handler),
        });
        self.capture.push(id);
        id
    }

    pub fn off(&mut self, id: ListenerId) {
        let Some(registered) = self.listeners.remove(id) else {
            return;
        };
        match registered.node {
            Some(node) => {
                if let Some(ids) = self.by_node.get_mut(&(node, registered.kind)) {
                    ids.retain(|other| *other != id);
                }
            }
            None => self.capture.retain(|other| *other != id),
        }
    }

    /// Runs `teardown` when `node` is destroyed as part of a removed
    /// subtree. Composites use it to release what lives outside the tree:
    /// detached nodes and capture listeners.
    pub fn on_teardown(&mut self, node: NodeId, teardown: impl FnOnce(&mut Ui<V>) + 'static) {
        self.teardowns
            .entry(node)
            .or_default()
            .push(Box::new(teardown));
    }

    /// Destroys the subtree at `node` together with its listeners, then runs
    /// the teardowns registered inside it.
    pub fn remove(&mut self, node: NodeId) {
        let removed = self.surface.remove(node);
        let mut teardowns = Vec::new();
        for removed in &removed {
            let stale: Vec<ListenerId> = self
                .by_node
                .iter()
                .filter(|((id, _), _)| id == removed)
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect();
            for id in stale {
                self.listeners.remove(id);
            }
            self.by_node.retain(|(id, _), _| id != removed);
            if let Some(registered) = self.teardowns.remove(removed) {
                teardowns.extend(registered);
            }
        }
        for teardown in teardowns {
            teardown(self);
        }
    }

    pub fn capture_listener_count(&self) -> usize {
        self.capture.len()
    }

    /// Every live listener, node-bound and capture alike.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn capture_handlers(&self, kind: EventKind) -> Vec<Handler<V>> {
        self.capture
            .iter()
            .filter_map(|id| self.listeners.get(*id))
            .filter(|registered| registered.kind == kind)
            .map(|registered| registered.handler.clone())
            .collect()
    }

    fn node_handlers(&self, node: NodeId, kind: EventKind) -> Vec<Handler<V>> {
        self.by_node
            .get(&(node, kind))
            .into_iter()
            .flatten()
            .filter_map(|id| self.listeners.get(*id))
            .map(|registered| registered.handler.clone())
            .collect()
    }
}

/// Delivers `event`: capture listeners first, then the target and its
/// ancestors. The bubbling path is fixed before any handler runs, so a
/// handler that detaches part of the tree does not cut the path short.
///
/// Returns `true` when some handler stopped propagation.
pub fn dispatch<V: EditorView>(view: &mut V, ui: &mut Ui<V>, event: &UiEvent) -> bool {
    let target = event.target();
    if let UiEvent::Input { value, .. } = event {
        ui.surface.set_attr(target, "value", value.clone());
    }

    let kind = event.kind();
    let path = ui.surface.ancestors(target);

    for handler in ui.capture_handlers(kind) {
        let mut cx = Cx::new(view, ui);
        if handler(&mut cx, event) == Propagation::Stop {
            return true;
        }
    }

    for node in path {
        for handler in ui.node_handlers(node, kind) {
            let mut cx = Cx::new(view, ui);
            if handler(&mut cx, event) == Propagation::Stop {
                return true;
            }
        }
    }
    false
}
