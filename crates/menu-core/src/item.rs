use std::rc::Rc;

use crate::command::{Command, EditorView, Predicate};
use crate::error::MenuError;
use crate::event::{EventKind, Propagation, Ui};
use crate::names::ClassNames;
use crate::surface::{NodeId, Surface};

pub type Update<V> = Box<dyn FnMut(&mut Surface, &<V as EditorView>::State) -> bool>;

/// A rendered component: the node its parent now owns, and the closure that
/// keeps it in sync with the editor. `update` returns whether the component
/// currently shows anything.
pub struct RenderResult<V: EditorView> {
    pub node: NodeId,
    pub update: Update<V>,
}

/// Anything that can sit in a toolbar group: items, dropdowns, submenus.
pub trait MenuElement<V: EditorView> {
    fn render(&self, ui: &mut Ui<V>) -> RenderResult<V>;

    /// The command a key binding to this element should run.
    fn command(&self) -> Option<Command<V>> {
        None
    }
}

pub type CustomRender = Rc<dyn Fn(&mut Surface, &ClassNames) -> NodeId>;

#[derive(Clone)]
pub enum ItemContent {
    /// Named icon; the host maps the name to artwork.
    Icon(String),
    Label(String),
    Custom(CustomRender),
}

pub struct ItemSpec<V: EditorView> {
    pub command: Command<V>,
    pub enable: Option<Predicate<V::State>>,
    pub active: Option<Predicate<V::State>>,
    /// Controls visibility. When it rejects a state, enable and active are
    /// not evaluated for that cycle.
    pub select: Option<Predicate<V::State>>,
    pub content: Option<ItemContent>,
    pub title: Option<String>,
    pub class: Option<String>,
    /// Re-run this item's own update right after its command fires. For
    /// items whose look follows state the editor does not own.
    pub refresh_after_run: bool,
}

impl<V: EditorView> Clone for ItemSpec<V> {
    fn clone(&self) -> Self {
        Self {
            command: self.command.clone(),
            enable: self.enable.clone(),
            active: self.active.clone(),
            select: self.select.clone(),
            content: self.content.clone(),
            title: self.title.clone(),
            class: self.class.clone(),
            refresh_after_run: self.refresh_after_run,
        }
    }
}

impl<V: EditorView> ItemSpec<V> {
    pub fn new(command: Command<V>) -> Self {
        Self {
            command,
            enable: None,
            active: None,
            select: None,
            content: None,
            title: None,
            class: None,
            refresh_after_run: false,
        }
    }

    pub fn icon(mut self, name: impl Into<String>) -> Self {
        self.content = Some(ItemContent::Icon(name.into()));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.content = Some(ItemContent::Label(label.into()));
        self
    }

    pub fn render_with(
        mut self,
        render: impl Fn(&mut Surface, &ClassNames) -> NodeId + 'static,
    ) -> Self {
        self.content = Some(ItemContent::Custom(Rc::new(render)));
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn enable(mut self, enable: impl Fn(&V::State) -> bool + 'static) -> Self {
        self.enable = Some(Rc::new(enable));
        self
    }

    pub fn active(mut self, active: impl Fn(&V::State) -> bool + 'static) -> Self {
        self.active = Some(Rc::new(active));
        self
    }

    pub fn select(mut self, select: impl Fn(&V::State) -> bool + 'static) -> Self {
        self.select = Some(Rc::new(select));
        self
    }

    pub fn refresh_after_run(mut self, refresh: bool) -> Self {
        self.refresh_after_run = refresh;
        self
    }
}

/// A toolbar button bound to one command.
pub struct MenuItem<V: EditorView> {
    spec: ItemSpec<V>,
    content: ItemContent,
}

impl<V: EditorView> MenuItem<V> {
    pub fn new(spec: ItemSpec<V>) -> Result<Self, MenuError> {
        let Some(content) = spec.content.clone() else {
            return Err(MenuError::MissingContent {
                title: spec.title.clone().unwrap_or_default(),
            });
        };
        Ok(Self { spec, content })
    }

    /// An item whose icon is fixed by the caller, so it cannot lack content.
    pub(crate) fn with_icon(spec: ItemSpec<V>, icon: &str) -> Self {
        Self {
            spec: spec.icon(icon),
            content: ItemContent::Icon(icon.to_string()),
        }
    }

    pub fn spec(&self) -> &ItemSpec<V> {
        &self.spec
    }
}

struct ItemUpdater<V: EditorView> {
    node: NodeId,
    command: Command<V>,
    enable: Option<Predicate<V::State>>,
    active: Option<Predicate<V::State>>,
    select: Option<Predicate<V::State>>,
    disabled_class: String,
    active_class: String,
}

impl<V: EditorView> ItemUpdater<V> {
    fn update(&self, surface: &mut Surface, state: &V::State) -> bool {
        if let Some(select) = &self.select {
            let selected = select(state);
            surface.set_hidden(self.node, !selected);
            if !selected {
                return false;
            }
        }

        let enabled = match &self.enable {
            Some(enable) => enable(state),
            None => self.command.can_run(state),
        };
        surface.set_class(self.node, &self.disabled_class, !enabled);

        if let Some(active) = &self.active {
            let on = enabled && active(state);
            surface.set_class(self.node, &self.active_class, on);
        }

        // A disabled item still holds its slot, so it still counts as content.
        true
    }
}

pub(crate) fn render_content(surface: &mut Surface, names: &ClassNames, content: &ItemContent) -> NodeId {
    match content {
        ItemContent::Icon(name) => {
            let node = surface.create_with_class("span", &names.icon);
            surface.set_attr(node, "data-icon", name.clone());
            node
        }
        ItemContent::Label(label) => {
            let node = surface.create_with_class("div", &names.label);
            let text = surface.create_text(label.clone());
            surface.append(node, text);
            node
        }
        ItemContent::Custom(render) => render(surface, names),
    }
}

impl<V: EditorView> MenuElement<V> for MenuItem<V> {
    fn render(&self, ui: &mut Ui<V>) -> RenderResult<V> {
        let names = ui.names().clone();
        let node = render_content(&mut ui.surface, &names, &self.content);
        if let Some(title) = &self.spec.title {
            ui.surface.set_attr(node, "title", title.clone());
        }
        if let Some(class) = &self.spec.class {
            ui.surface.add_class(node, class);
        }

        let updater = Rc::new(ItemUpdater {
            node,
            command: self.spec.command.clone(),
            enable: self.spec.enable.clone(),
            active: self.spec.active.clone(),
            select: self.spec.select.clone(),
            disabled_class: names.disabled.clone(),
            active_class: names.active.clone(),
        });

        let command = self.spec.command.clone();
        let refresh = self.spec.refresh_after_run.then(|| updater.clone());
        let disabled_class = names.disabled;
        ui.on(node, EventKind::PointerDown, move |cx, _| {
            if cx.ui.surface.has_class(node, &disabled_class) {
                return Propagation::Stop;
            }
            command.run(cx);
            if let Some(updater) = &refresh {
                let state = cx.view.state().clone();
                updater.update(&mut cx.ui.surface, &state);
            }
            Propagation::Stop
        });

        RenderResult {
            node,
            update: Box::new(move |surface, state| updater.update(surface, state)),
        }
    }

    fn command(&self) -> Option<Command<V>> {
        Some(self.spec.command.clone())
    }
}
