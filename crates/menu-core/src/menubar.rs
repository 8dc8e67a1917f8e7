use std::collections::HashMap;
use std::rc::Rc;

use crate::command::{Command, FindView};
use crate::config::MenuConfig;
use crate::dialog::{ImageDialog, LinkDialog};
use crate::dropdown::{Dropdown, Submenu};
use crate::error::MenuError;
use crate::event::{Cx, Ui, UiEvent, dispatch};
use crate::grouped::{Group, render_grouped};
use crate::item::{ItemSpec, MenuElement, MenuItem, RenderResult, Update};
use crate::keymap::{KeyPress, Keymap, Platform};
use crate::names::ClassNames;
use crate::overflow::{Overflow, split_overflow};
use crate::search::SearchController;
use crate::surface::NodeId;

enum Entry<V: FindView> {
    Item(ItemSpec<V>),
    Element(Rc<dyn MenuElement<V>>),
}

/// Collects the named building blocks a [`MenuConfig`] refers to.
pub struct MenubarBuilder<V: FindView> {
    config: MenuConfig,
    entries: HashMap<String, Entry<V>>,
    link: Option<LinkDialog<V>>,
    image: Option<ImageDialog<V>>,
    platform: Platform,
}

impl<V: FindView> MenubarBuilder<V> {
    pub fn item(mut self, name: impl Into<String>, spec: ItemSpec<V>) -> Self {
        self.entries.insert(name.into(), Entry::Item(spec));
        self
    }

    pub fn element(mut self, name: impl Into<String>, element: Rc<dyn MenuElement<V>>) -> Self {
        self.entries.insert(name.into(), Entry::Element(element));
        self
    }

    pub fn dropdown(self, name: impl Into<String>, dropdown: Dropdown<V>) -> Self {
        self.element(name, Rc::new(dropdown))
    }

    pub fn submenu(self, name: impl Into<String>, submenu: Submenu<V>) -> Self {
        self.element(name, Rc::new(submenu))
    }

    /// Registers the link dialog and its `link` item.
    pub fn link_dialog(mut self, dialog: LinkDialog<V>) -> Self {
        self.link = Some(dialog);
        self
    }

    /// Registers the image dialog and its `image` item.
    pub fn image_dialog(mut self, dialog: ImageDialog<V>) -> Self {
        self.image = Some(dialog);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Renders the toolbar into a fresh surface and syncs it with `view`.
    pub fn build(self, view: &V) -> Result<Menubar<V>, MenuError> {
        let MenubarBuilder {
            config,
            mut entries,
            link,
            image,
            platform,
        } = self;
        let names = ClassNames::new(config.prefix.clone());
        let search = SearchController::new();

        let link = link.map(|dialog| dialog.size(config.link_dialog));
        let image = image.map(|dialog| dialog.size(config.image_dialog));
        if let Some(dialog) = &link {
            entries
                .entry("link".to_string())
                .or_insert_with(|| Entry::Item(dialog.item()));
        }
        if let Some(dialog) = &image {
            entries
                .entry("image".to_string())
                .or_insert_with(|| Entry::Item(dialog.item()));
        }
        entries
            .entry("search".to_string())
            .or_insert_with(|| Entry::Item(search.item().class(names.search_toggle.clone())));

        let mut elements: HashMap<String, Rc<dyn MenuElement<V>>> = HashMap::new();
        for (name, entry) in entries {
            let element: Rc<dyn MenuElement<V>> = match entry {
                Entry::Item(spec) => Rc::new(MenuItem::new(spec)?),
                Entry::Element(element) => element,
            };
            elements.insert(name, element);
        }

        let mut groups: Vec<Group<V>> = Vec::with_capacity(config.groups.len());
        for group_names in &config.groups {
            let mut group: Group<V> = Vec::with_capacity(group_names.len());
            for name in group_names {
                let element = elements
                    .get(name)
                    .ok_or_else(|| MenuError::UnknownItem(name.clone()))?;
                group.push(element.clone());
            }
            groups.push(group);
        }

        let (mut inline, overflow) = match config.capacity {
            Some(capacity) => split_overflow(&groups, capacity),
            None => (groups, Vec::new()),
        };
        let overflow = (!overflow.is_empty()).then(|| Overflow::new(overflow));
        if let Some(overflow) = &overflow {
            let toggle = MenuItem::new(overflow.item().class(names.more_toggle.clone()))?;
            inline.push(vec![Rc::new(toggle) as Rc<dyn MenuElement<V>>]);
        }

        let mut commands = HashMap::new();
        for (name, element) in &elements {
            if let Some(command) = element.command() {
                commands.insert(name.clone(), command);
            }
        }
        let mut keymap = Keymap::from_config(&config.keymap, platform)?;
        keymap.retain(|name| {
            let known = commands.contains_key(name);
            if !known {
                tracing::warn!(command = name, "dropping key binding for unregistered command");
            }
            known
        });

        let bar_class = names.bar.clone();
        let mut ui = Ui::new(names);
        let root = ui.surface.create_with_class("div", &bar_class);
        let RenderResult { node, update } = render_grouped(&mut ui, &inline);
        ui.surface.append(root, node);
        let body = ui.surface.body();
        ui.surface.append(body, root);

        let mut menubar = Menubar {
            ui,
            root,
            update,
            overflow,
            search,
            link,
            image,
            keymap,
            commands,
        };
        menubar.update(view.state());
        tracing::debug!(items = menubar.commands.len(), "menubar built");
        Ok(menubar)
    }
}

/// A rendered toolbar plus the dialogs and search bar it controls.
pub struct Menubar<V: FindView> {
    ui: Ui<V>,
    root: NodeId,
    update: Update<V>,
    overflow: Option<Overflow<V>>,
    search: SearchController<V>,
    link: Option<LinkDialog<V>>,
    image: Option<ImageDialog<V>>,
    keymap: Keymap,
    commands: HashMap<String, Command<V>>,
}

impl<V: FindView> Menubar<V> {
    pub fn builder(config: MenuConfig) -> MenubarBuilder<V> {
        MenubarBuilder {
            config,
            entries: HashMap::new(),
            link: None,
            image: None,
            platform: Platform::current(),
        }
    }

    pub fn ui(&self) -> &Ui<V> {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui<V> {
        &mut self.ui
    }

    pub fn names(&self) -> &ClassNames {
        self.ui.names()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn overflow(&self) -> Option<&Overflow<V>> {
        self.overflow.as_ref()
    }

    pub fn search(&self) -> &SearchController<V> {
        &self.search
    }

    pub fn link_dialog(&self) -> Option<&LinkDialog<V>> {
        self.link.as_ref()
    }

    pub fn image_dialog(&self) -> Option<&ImageDialog<V>> {
        self.image.as_ref()
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn command(&self, name: &str) -> Option<&Command<V>> {
        self.commands.get(name)
    }

    /// Brings every control in line with `state`. Call once per state change.
    /// Returns whether anything in the toolbar is showing.
    pub fn update(&mut self, state: &V::State) -> bool {
        let inline = (self.update)(&mut self.ui.surface, state);
        let panel = self
            .overflow
            .as_ref()
            .is_some_and(|overflow| overflow.update(&mut self.ui.surface, state));
        inline || panel
    }

    /// Delivers a host event to the surface. Returns whether a handler
    /// consumed it.
    pub fn handle_event(&mut self, view: &mut V, event: &UiEvent) -> bool {
        dispatch(view, &mut self.ui, event)
    }

    /// Runs the command bound to `key`, if any. Returns whether it applied.
    pub fn handle_key(&mut self, view: &mut V, key: &KeyPress) -> bool {
        let Some(name) = self.keymap.resolve(key) else {
            return false;
        };
        let Some(command) = self.commands.get(name).cloned() else {
            return false;
        };
        if !command.can_run(view.state()) {
            return false;
        }
        tracing::debug!(command = name, "running bound command");
        let mut cx = Cx::new(view, &mut self.ui);
        command.run(&mut cx)
    }

    /// Runs a registered command by name, as its toolbar item would.
    pub fn run(&mut self, view: &mut V, name: &str) -> Result<bool, MenuError> {
        let command = self
            .commands
            .get(name)
            .cloned()
            .ok_or_else(|| MenuError::UnknownCommand(name.to_string()))?;
        let mut cx = Cx::new(view, &mut self.ui);
        Ok(command.run(&mut cx))
    }
}
