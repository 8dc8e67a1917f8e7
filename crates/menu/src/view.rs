use std::collections::{HashMap, HashSet};
use std::time::Instant;

use gpui::AppContext as _;
use gpui::InteractiveElement as _;
use gpui::StatefulInteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    AnyElement, App, Context, Div, ElementId, Entity, FocusHandle, Focusable, FontWeight,
    IntoElement, KeyDownEvent, Keystroke, MouseButton, MouseDownEvent, ParentElement, Render,
    Stateful, Styled, Subscription, Window, deferred, div, px, relative,
};
use gpui_component::input::{Input, InputEvent, InputState};
use gpui_component::{ActiveTheme as _, Disableable as _, Icon, Selectable as _};
use gpui_menu_core::{FindView, Menubar, NodeId, Rect, Surface, UiEvent};
use slotmap::Key as _;

use crate::icon::MenuIconName;
use crate::keys::key_press;
use crate::probe::probe_image_source;
use crate::toolbar::{MenuToolbarButton, MenuToolbarSeparator};

struct Field {
    input: Entity<InputState>,
    _subscription: Subscription,
}

/// Paints a [`Menubar`] surface and feeds gpui input back into it.
///
/// The view owns the editor handle the menu drives. Frames on the surface are
/// in document coordinates; they are painted relative to the top-left of the
/// editor's visible rectangle, so the host lays this view over the editor.
pub struct MenuSurface<V: FindView> {
    editor: V,
    menubar: Menubar<V>,
    fields: HashMap<NodeId, Field>,
    focused_field: Option<NodeId>,
    probing: HashSet<NodeId>,
    focus_handle: FocusHandle,
    started: Instant,
}

impl<V: FindView> MenuSurface<V> {
    pub fn view(editor: V, menubar: Menubar<V>, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(editor, menubar, cx))
    }

    fn new(editor: V, mut menubar: Menubar<V>, cx: &mut Context<Self>) -> Self {
        menubar.update(editor.state());
        Self {
            editor,
            menubar,
            fields: HashMap::new(),
            focused_field: None,
            probing: HashSet::new(),
            focus_handle: cx.focus_handle(),
            started: Instant::now(),
        }
    }

    pub fn editor(&self) -> &V {
        &self.editor
    }

    pub fn menubar(&self) -> &Menubar<V> {
        &self.menubar
    }

    /// Mutates the editor from outside the menu, then repaints every control.
    pub fn update_editor<R>(&mut self, cx: &mut Context<Self>, f: impl FnOnce(&mut V) -> R) -> R {
        let result = f(&mut self.editor);
        self.refresh(cx);
        result
    }

    /// Runs the command bound to `keystroke`. Hosts call this from the
    /// editor's own key handler so shortcuts work while the document has focus.
    pub fn handle_keystroke(&mut self, keystroke: &Keystroke, cx: &mut Context<Self>) -> bool {
        let handled = self.menubar.handle_key(&mut self.editor, &key_press(keystroke));
        if handled {
            self.refresh(cx);
        }
        handled
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn deliver(&mut self, event: UiEvent, cx: &mut Context<Self>) -> bool {
        if !self.menubar.ui().surface.exists(event.target()) {
            return false;
        }
        let handled = self.menubar.handle_event(&mut self.editor, &event);
        self.refresh(cx);
        handled
    }

    fn refresh(&mut self, cx: &mut Context<Self>) {
        self.menubar.update(self.editor.state());

        let surface = &self.menubar.ui().surface;
        self.fields.retain(|node, _| surface.exists(*node));
        self.probing.retain(|node| surface.exists(*node));
        if self.focused_field.is_some_and(|node| !surface.exists(node)) {
            self.focused_field = None;
        }

        self.start_probes(cx);
        cx.notify();
    }

    fn start_probes(&mut self, cx: &mut Context<Self>) {
        let class = self.menubar.names().image_probe.clone();
        let surface = &self.menubar.ui().surface;
        let pending: Vec<(NodeId, String)> = surface
            .find_all_by_class(&class)
            .into_iter()
            .filter(|node| !self.probing.contains(node))
            .filter_map(|node| Some((node, surface.attr(node, "src")?.to_string())))
            .collect();

        for (node, src) in pending {
            self.probing.insert(node);
            tracing::debug!(src = %src, "probing image source");
            cx.spawn(async move |this, cx| {
                let loaded = cx
                    .background_executor()
                    .spawn(async move { probe_image_source(&src) })
                    .await;
                this.update(cx, |this, cx| {
                    this.probing.remove(&node);
                    let event = if loaded {
                        UiEvent::Load { target: node }
                    } else {
                        UiEvent::Error { target: node }
                    };
                    // A superseded probe node is already gone; `deliver` drops it.
                    this.deliver(event, cx);
                })
                .ok();
            })
            .detach();
        }
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) -> bool {
        let key = key_press(&event.keystroke);
        if matches!(key.key.as_str(), "Enter" | "Escape") {
            let ui = self.menubar.ui();
            let target = self
                .focused_field
                .filter(|node| ui.surface.exists(*node))
                .or_else(|| ui.dialog());
            if let Some(target) = target
                && self.deliver(UiEvent::KeyDown { target, key: key.clone() }, cx)
            {
                return true;
            }
        }

        // Shortcuts belong to the document, not to a field being typed into.
        if self.focused_field.is_some() {
            return false;
        }
        let handled = self.menubar.handle_key(&mut self.editor, &key);
        if handled {
            self.refresh(cx);
        }
        handled
    }

    fn sync_fields(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let surface = &self.menubar.ui().surface;
        let mut nodes = Vec::new();
        collect_fields(surface, surface.body(), &mut nodes);

        let mut created = Vec::new();
        let mut changed = Vec::new();
        for node in nodes {
            let value = surface.attr(node, "value").unwrap_or_default().to_string();
            match self.fields.get(&node) {
                Some(field) => {
                    if field.input.read(cx).value().to_string() != value {
                        changed.push((field.input.clone(), value));
                    }
                }
                None => {
                    let placeholder = surface.attr(node, "placeholder").unwrap_or_default();
                    created.push((node, placeholder.to_string(), value));
                }
            }
        }

        for (input, value) in changed {
            input.update(cx, |state, cx| state.set_value(value, window, cx));
        }

        let mut focus = None;
        for (node, placeholder, value) in created {
            let input = cx.new(|cx| {
                InputState::new(window, cx)
                    .placeholder(placeholder)
                    .default_value(value)
            });
            let subscription = cx.subscribe(&input, move |this, input, event: &InputEvent, cx| {
                this.on_field_event(node, &input, event, cx);
            });
            focus.get_or_insert((node, input.clone()));
            self.fields.insert(
                node,
                Field {
                    input,
                    _subscription: subscription,
                },
            );
        }

        // A freshly shown dialog or search bar takes the keyboard.
        if let Some((node, input)) = focus {
            input.update(cx, |state, cx| state.focus(window, cx));
            self.focused_field = Some(node);
        }
    }

    fn on_field_event(
        &mut self,
        node: NodeId,
        input: &Entity<InputState>,
        event: &InputEvent,
        cx: &mut Context<Self>,
    ) {
        match event {
            InputEvent::Change => {
                let value = input.read(cx).value().to_string();
                if self.menubar.ui().surface.attr(node, "value") == Some(value.as_str()) {
                    return;
                }
                self.deliver(UiEvent::Input { target: node, value }, cx);
            }
            InputEvent::Focus => self.focused_field = Some(node),
            InputEvent::Blur => {
                if self.focused_field == Some(node) {
                    self.focused_field = None;
                }
            }
            _ => {}
        }
    }

    fn press_listener(
        &self,
        node: NodeId,
        cx: &Context<Self>,
    ) -> impl Fn(&MouseDownEvent, &mut Window, &mut App) + 'static {
        cx.listener(move |this, _: &MouseDownEvent, _, cx| {
            let time_ms = this.elapsed_ms();
            this.deliver(UiEvent::PointerDown { target: node, time_ms }, cx);
        })
    }

    fn hover_listener(
        &self,
        node: NodeId,
        cx: &Context<Self>,
    ) -> impl Fn(&bool, &mut Window, &mut App) + 'static {
        cx.listener(move |this, hovered: &bool, _, cx| {
            let event = if *hovered {
                UiEvent::PointerEnter { target: node }
            } else {
                UiEvent::PointerLeave { target: node }
            };
            this.deliver(event, cx);
        })
    }

    /// A plain container that still reports presses and hovers for `node`.
    fn container(&self, node: NodeId, cx: &Context<Self>) -> Stateful<Div> {
        let press = self.press_listener(node, cx);
        div()
            .id(element_id(node))
            .on_mouse_down(MouseButton::Left, move |event, window, cx| {
                cx.stop_propagation();
                press(event, window, cx);
            })
            .on_hover(self.hover_listener(node, cx))
    }

    fn framed(&self, node: NodeId, frame: Rect, cx: &Context<Self>) -> Stateful<Div> {
        let origin = self.editor.viewport().visible;
        self.container(node, cx)
            .absolute()
            .left(px(frame.left - origin.left))
            .top(px(frame.top - origin.top))
            .w(px(frame.width()))
            .h(px(frame.height()))
    }

    fn render_children(&self, node: NodeId, cx: &Context<Self>) -> Vec<AnyElement> {
        let surface = &self.menubar.ui().surface;
        surface
            .children(node)
            .iter()
            .filter_map(|child| self.render_node(*child, cx))
            .collect()
    }

    fn render_node(&self, node: NodeId, cx: &Context<Self>) -> Option<AnyElement> {
        let surface = &self.menubar.ui().surface;
        let names = self.menubar.names();
        let data = surface.node(node)?;
        if data.hidden {
            return None;
        }
        match data.tag.as_str() {
            "#text" => return Some(data.text.clone().unwrap_or_default().into_any_element()),
            "img" => return None,
            "input" => return self.render_field(node, cx),
            _ => {}
        }

        let theme = cx.theme();
        let has = |class: &str| surface.has_class(node, class);
        let children = self.render_children(node, cx);

        if has(&names.separator) {
            return Some(MenuToolbarSeparator.into_any_element());
        }

        if has(&names.icon)
            || has(&names.label)
            || has(&names.dropdown)
            || has(&names.submenu_label)
            || has(&names.dialog_button)
        {
            let mut button = MenuToolbarButton::new(element_id(node))
                .disabled(has(&names.disabled))
                .selected(has(&names.active))
                .on_press(self.press_listener(node, cx))
                .on_hover(self.hover_listener(node, cx));
            if let Some(title) = surface.attr(node, "title") {
                button = button.tooltip(title.to_string());
            }
            if let Some(icon) = surface.attr(node, "data-icon") {
                button = match MenuIconName::from_name(icon) {
                    Some(icon) => button.child(Icon::new(icon)),
                    None => button.child(icon.to_string()),
                };
            }
            button = button.children(children);
            if has(&names.dropdown) {
                button = button.child(
                    Icon::new(MenuIconName::ChevronDown)
                        .size_3p5()
                        .text_color(theme.muted_foreground),
                );
            } else if has(&names.submenu_label) {
                button = button.child(
                    Icon::new(MenuIconName::ChevronRight)
                        .size_3p5()
                        .text_color(theme.muted_foreground),
                );
            }
            if has(&names.dialog_button) {
                button = button.min_width(px(64.)).h(px(28.)).border_1().border_color(theme.border);
            }
            return Some(button.into_any_element());
        }

        if has(&names.overlay) {
            let frame = surface.frame(node)?;
            return Some(
                self.framed(node, frame, cx)
                    .bg(theme.background.alpha(0.35))
                    .into_any_element(),
            );
        }
        if has(&names.selection_highlight) {
            let frame = surface.frame(node)?;
            return Some(
                self.framed(node, frame, cx)
                    .border_1()
                    .border_color(theme.ring)
                    .bg(theme.accent.alpha(0.25))
                    .into_any_element(),
            );
        }
        if has(&names.toolbar_overlay) {
            return Some(
                self.container(node, cx)
                    .absolute()
                    .top(px(0.))
                    .bottom(px(0.))
                    .left(px(0.))
                    .right(px(0.))
                    .bg(theme.background.alpha(0.5))
                    .into_any_element(),
            );
        }

        if has(&names.dialog) {
            let frame = surface.frame(node)?;
            return Some(
                self.framed(node, frame, cx)
                    .bg(theme.popover)
                    .text_color(theme.popover_foreground)
                    .border_1()
                    .border_color(theme.border)
                    .rounded(theme.radius)
                    .shadow_lg()
                    .flex()
                    .flex_col()
                    .gap(px(8.))
                    .p(px(12.))
                    .children(children)
                    .into_any_element(),
            );
        }
        if has(&names.dialog_title) {
            return Some(
                div()
                    .text_sm()
                    .font_weight(FontWeight::SEMIBOLD)
                    .children(children)
                    .into_any_element(),
            );
        }

        if has(&names.dropdown_menu) || has(&names.submenu) {
            // A submenu stays in the tree; its wrapper says whether it is open.
            let collapsed = has(&names.submenu)
                && !surface
                    .parent(node)
                    .is_some_and(|wrap| surface.has_class(wrap, &names.submenu_wrap_active));
            if collapsed {
                return None;
            }
            let below = surface.attr(node, "data-expand") != Some("right");
            let menu = self
                .container(node, cx)
                .absolute()
                .when(below, |this| this.top(relative(1.)).left(px(0.)))
                .when(!below, |this| this.left(relative(1.)).top(px(0.)))
                .min_w(px(160.))
                .flex()
                .flex_col()
                .gap(px(2.))
                .p(px(4.))
                .bg(theme.popover)
                .border_1()
                .border_color(theme.border)
                .rounded(theme.radius)
                .shadow_lg()
                .children(children);
            return Some(deferred(menu).with_priority(1).into_any_element());
        }

        let bar_like = has(&names.bar) || has(&names.more_panel) || has(&names.search_bar);
        let wrap = has(&names.dropdown_wrap) || has(&names.submenu_wrap);
        let element = self
            .container(node, cx)
            .flex()
            .items_center()
            .when(wrap, |this| this.relative())
            .when(has(&names.submenu_wrap_active), |this| this.bg(theme.muted))
            .when(bar_like, |this| {
                this.relative()
                    .flex_wrap()
                    .gap(px(2.))
                    .px(px(6.))
                    .py(px(4.))
                    .bg(theme.background)
                    .border_b_1()
                    .border_color(theme.border)
            })
            .when(has(&names.search_bar), |this| this.gap(px(6.)))
            .when(has(&names.search_status), |this| {
                this.px(px(6.)).text_xs().text_color(theme.muted_foreground)
            })
            .children(children);
        Some(element.into_any_element())
    }

    fn render_field(&self, node: NodeId, cx: &Context<Self>) -> Option<AnyElement> {
        let field = self.fields.get(&node)?;
        let press = self.press_listener(node, cx);
        let search = self
            .menubar
            .ui()
            .surface
            .has_class(node, &self.menubar.names().search_input);
        Some(
            div()
                .id(element_id(node))
                .when(search, |this| this.w(px(240.)))
                .when(!search, |this| this.w_full())
                .on_mouse_down(MouseButton::Left, move |event, window, cx| {
                    cx.stop_propagation();
                    press(event, window, cx);
                })
                .child(Input::new(&field.input))
                .into_any_element(),
        )
    }
}

impl<V: FindView> Focusable for MenuSurface<V> {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl<V: FindView> Render for MenuSurface<V> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.sync_fields(window, cx);

        let body = self.menubar.ui().surface.body();
        let children = self.render_children(body, cx);
        let press = self.press_listener(body, cx);

        div()
            .id("menu-surface")
            .track_focus(&self.focus_handle)
            .relative()
            .size_full()
            .flex()
            .flex_col()
            .capture_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                if this.handle_key_down(event, cx) {
                    window.prevent_default();
                    cx.stop_propagation();
                }
            }))
            .on_mouse_down(MouseButton::Left, press)
            .children(children)
    }
}

fn element_id(node: NodeId) -> ElementId {
    ("menu-node", node.data().as_ffi() as usize).into()
}

fn collect_fields(surface: &Surface, node: NodeId, out: &mut Vec<NodeId>) {
    let Some(data) = surface.node(node) else {
        return;
    };
    if data.tag == "input" {
        out.push(node);
    }
    for child in data.children() {
        collect_fields(surface, *child, out);
    }
}
