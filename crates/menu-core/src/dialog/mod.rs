mod image;
mod link;
mod session;
mod validity;

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

pub use image::*;
pub use link::*;
pub use session::*;
pub use validity::*;

use crate::command::{Command, EditorView};
use crate::event::{Cx, EventKind, Propagation, Ui, UiEvent};
use crate::geometry::Size;
use crate::placement::place_dialog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityRule {
    /// Checked on every keystroke.
    UrlSyntax,
    /// Decided by loading the URL as an image.
    ImageProbe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub placeholder: &'static str,
}

type ApplyFn<V> = dyn Fn(
    &<V as EditorView>::State,
    &[String],
    Option<&mut dyn FnMut(<V as EditorView>::Transaction)>,
) -> bool;

type SelectFn<V> = dyn Fn(&mut Cx<'_, V>);

pub(crate) struct DialogConfig<V: EditorView> {
    pub(crate) kind: &'static str,
    pub(crate) insert_title: &'static str,
    pub(crate) edit_title: &'static str,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) rule: ValidityRule,
    pub(crate) apply: Rc<ApplyFn<V>>,
    /// Size and file picker stay adjustable after the dialog was cloned into
    /// a toolbar item; every clone sees the latest value on its next open.
    pub(crate) size: Cell<Size>,
    pub(crate) select: RefCell<Option<Rc<SelectFn<V>>>>,
}

/// The selection-anchored dialog shared by links and images: a floating
/// panel, a pair of overlays standing in for modality, and a highlight box
/// over the selection.
pub(crate) struct Dialog<V: EditorView> {
    config: Rc<DialogConfig<V>>,
    session: Rc<RefCell<Option<DialogSession>>>,
}

impl<V: EditorView> Clone for Dialog<V> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            session: self.session.clone(),
        }
    }
}

impl<V: EditorView> Dialog<V> {
    pub(crate) fn new(config: DialogConfig<V>) -> Self {
        Self {
            config: Rc::new(config),
            session: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn session(&self) -> Ref<'_, Option<DialogSession>> {
        self.session.borrow()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub(crate) fn set_select(&self, select: Rc<SelectFn<V>>) {
        *self.config.select.borrow_mut() = Some(select);
    }

    pub(crate) fn set_size(&self, size: Size) {
        self.config.size.set(size);
    }

    /// Opens a session at the current selection. `existing` pre-fills the
    /// fields and switches the dialog to edit mode.
    pub(crate) fn open(&self, cx: &mut Cx<'_, V>, existing: Option<Vec<String>>) {
        self.close(cx.ui);

        let config = self.config.clone();
        let anchor = cx.view.selection_rect();
        let mode = if existing.is_some() {
            DialogMode::Edit
        } else {
            DialogMode::Insert
        };
        let mut values = existing.unwrap_or_default();
        values.resize(config.fields.len(), String::new());
        let session = DialogSession::begin(mode, anchor, values);

        let size = config.size.get();
        let select_with = config.select.borrow().clone();
        let viewport = cx.view.viewport();
        let placement = place_dialog(anchor, size, viewport);
        let mut session = session.opened(placement);
        tracing::debug!(kind = config.kind, ?mode, side = ?placement.side, "dialog opened");

        let names = cx.ui.names().clone();
        let surface = &mut cx.ui.surface;
        let body = surface.body();

        let highlight = surface.create_with_class("div", &names.selection_highlight);
        surface.set_frame(highlight, anchor);
        surface.append(body, highlight);

        let overlay = surface.create_with_class("div", &names.overlay);
        surface.set_frame(overlay, viewport.visible);
        surface.append(body, overlay);

        let toolbar_overlay = cx.ui.toolbar_root().map(|toolbar| {
            let node = cx.ui.surface.create_with_class("div", &names.toolbar_overlay);
            cx.ui.surface.append(toolbar, node);
            node
        });

        let surface = &mut cx.ui.surface;
        let dialog = surface.create_with_class("div", &names.dialog);
        surface.add_class(dialog, &format!("{}-{}", names.dialog, config.kind));
        surface.set_frame(dialog, placement.frame(size));

        let title = surface.create_with_class("div", &names.dialog_title);
        let title_text = surface.create_text(match mode {
            DialogMode::Insert => config.insert_title,
            DialogMode::Edit => config.edit_title,
        });
        surface.append(title, title_text);
        surface.append(dialog, title);

        for (index, field) in config.fields.iter().enumerate() {
            let input = surface.create_with_class("input", &names.dialog_input);
            surface.set_attr(input, "name", field.name);
            surface.set_attr(input, "placeholder", field.placeholder);
            surface.set_attr(input, "value", session.value(index).to_string());
            surface.append(dialog, input);
            session.inputs.push(input);
        }

        let buttons = surface.create("div");
        let select = select_with.as_ref().map(|_| {
            let node = surface.create_with_class("button", &names.dialog_button);
            surface.add_class(node, &names.dialog_select);
            let text = surface.create_text("Select…");
            surface.append(node, text);
            surface.append(buttons, node);
            node
        });
        let cancel = surface.create_with_class("button", &names.dialog_button);
        surface.add_class(cancel, &names.dialog_cancel);
        let text = surface.create_text("Cancel");
        surface.append(cancel, text);
        surface.append(buttons, cancel);
        let ok = surface.create_with_class("button", &names.dialog_button);
        surface.add_class(ok, &names.dialog_ok);
        let text = surface.create_text("OK");
        surface.append(ok, text);
        surface.append(buttons, ok);
        surface.append(dialog, buttons);
        surface.append(body, dialog);

        session.nodes = Some(DialogNodes {
            dialog,
            overlay,
            toolbar_overlay,
            highlight,
            ok,
        });
        let inputs = session.inputs.clone();
        *self.session.borrow_mut() = Some(session);

        for node in [Some(overlay), toolbar_overlay].into_iter().flatten() {
            let this = self.clone();
            cx.ui.on(node, EventKind::PointerDown, move |cx, _| {
                this.close(cx.ui);
                Propagation::Stop
            });
        }
        cx.ui.on(dialog, EventKind::PointerDown, |_, _| Propagation::Stop);
        cx.ui.on(dialog, EventKind::KeyDown, {
            let this = self.clone();
            move |cx, event| this.handle_key(cx, event)
        });
        for (index, input) in inputs.into_iter().enumerate() {
            let this = self.clone();
            cx.ui.on(input, EventKind::Input, move |cx, event| {
                if let UiEvent::Input { value, .. } = event {
                    this.set_field(cx.ui, index, value.clone());
                }
                Propagation::Continue
            });
        }
        cx.ui.on(cancel, EventKind::PointerDown, {
            let this = self.clone();
            move |cx, _| {
                this.close(cx.ui);
                Propagation::Stop
            }
        });
        cx.ui.on(ok, EventKind::PointerDown, {
            let this = self.clone();
            move |cx, _| {
                let enabled = this
                    .session
                    .borrow()
                    .as_ref()
                    .is_some_and(DialogSession::ok_enabled);
                if enabled {
                    this.confirm(cx);
                }
                Propagation::Stop
            }
        });
        if let (Some(node), Some(delegate)) = (select, select_with) {
            let this = self.clone();
            cx.ui.on(node, EventKind::PointerDown, move |cx, _| {
                this.close(cx.ui);
                delegate(cx);
                Propagation::Stop
            });
        }

        let initial = self.session.borrow().as_ref().map(|s| s.value(0).to_string());
        if let Some(initial) = initial {
            self.revalidate(cx.ui, &initial);
        }
    }

    /// Tears down every node of the session. A no-op when already closed.
    pub(crate) fn close(&self, ui: &mut Ui<V>) {
        let Some(session) = self.session.borrow_mut().take() else {
            return;
        };
        let session = session.closed();
        if let Some(nodes) = session.nodes {
            ui.remove(nodes.dialog);
            ui.remove(nodes.overlay);
            ui.remove(nodes.highlight);
            if let Some(node) = nodes.toolbar_overlay {
                ui.remove(node);
            }
        }
        tracing::debug!(kind = self.config.kind, "dialog closed");
    }

    pub(crate) fn set_field(&self, ui: &mut Ui<V>, index: usize, value: String) {
        let primary = {
            let mut session = self.session.borrow_mut();
            let Some(session) = session.as_mut() else {
                return;
            };
            if let Some(input) = session.inputs.get(index).copied() {
                ui.surface.set_attr(input, "value", value.clone());
            }
            session.set_value(index, value.clone());
            index == 0
        };
        if primary {
            self.revalidate(ui, &value);
        }
    }

    fn revalidate(&self, ui: &mut Ui<V>, value: &str) {
        match self.config.rule {
            ValidityRule::UrlSyntax => {
                if let Some(session) = self.session.borrow_mut().as_mut() {
                    session.validity.check_url(value);
                }
            }
            ValidityRule::ImageProbe => self.start_probe(ui, value),
        }
        self.refresh_buttons(ui);
    }

    fn start_probe(&self, ui: &mut Ui<V>, value: &str) {
        let (probe, stale, dialog) = {
            let mut session = self.session.borrow_mut();
            let Some(session) = session.as_mut() else {
                return;
            };
            let Some(dialog) = session.nodes.map(|nodes| nodes.dialog) else {
                return;
            };
            (session.validity.begin_probe(value), session.probe.take(), dialog)
        };
        if let Some(stale) = stale {
            ui.remove(stale);
        }
        let Some(probe) = probe else {
            return;
        };

        let class = ui.names().image_probe.clone();
        let node = ui.surface.create_with_class("img", &class);
        ui.surface.set_hidden(node, true);
        ui.surface.set_attr(node, "src", probe.url.clone());
        ui.surface
            .set_attr(node, "data-generation", probe.generation.to_string());
        ui.surface.append(dialog, node);
        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.probe = Some(node);
        }

        for (kind, loaded) in [(EventKind::Load, true), (EventKind::Error, false)] {
            let this = self.clone();
            let generation = probe.generation;
            ui.on(node, kind, move |cx, _| {
                this.resolve_probe(cx.ui, generation, loaded);
                Propagation::Stop
            });
        }
    }

    pub(crate) fn resolve_probe(&self, ui: &mut Ui<V>, generation: u64, loaded: bool) {
        let applied = match self.session.borrow_mut().as_mut() {
            Some(session) => session.validity.resolve(generation, loaded),
            None => false,
        };
        if applied {
            self.refresh_buttons(ui);
        }
    }

    fn refresh_buttons(&self, ui: &mut Ui<V>) {
        let session = self.session.borrow();
        let Some(session) = session.as_ref() else {
            return;
        };
        let Some(nodes) = session.nodes else {
            return;
        };
        let names = ui.names().clone();
        ui.surface
            .set_class(nodes.ok, &names.disabled, !session.ok_enabled());
        ui.surface
            .set_class(nodes.ok, &names.active, session.ok_enabled() && session.is_valid());
    }

    fn handle_key(&self, cx: &mut Cx<'_, V>, event: &UiEvent) -> Propagation {
        let UiEvent::KeyDown { key, .. } = event else {
            return Propagation::Continue;
        };
        let action = match key.key.as_str() {
            "Escape" => DialogAction::Cancel,
            "Enter" => match self.session.borrow().as_ref() {
                Some(session) => session.enter_action(),
                None => return Propagation::Continue,
            },
            _ => return Propagation::Continue,
        };
        match action {
            DialogAction::Confirm => {
                self.confirm(cx);
            }
            DialogAction::Cancel => self.close(cx.ui),
        }
        Propagation::Stop
    }

    /// Applies the field values. The dialog stays open when the command
    /// reports that it did not apply.
    pub(crate) fn confirm(&self, cx: &mut Cx<'_, V>) -> bool {
        let values: Vec<String> = match self.session.borrow().as_ref() {
            Some(session) => session.values().iter().map(|v| v.trim().to_string()).collect(),
            None => return false,
        };
        let apply = self.config.apply.clone();
        let command = Command::<V>::from_state(move |state, dispatch| apply(state, &values, dispatch));
        let applied = command.run(cx);
        if applied {
            self.close(cx.ui);
            cx.view.focus();
        } else {
            tracing::debug!(kind = self.config.kind, "dialog command did not apply");
        }
        applied
    }
}
