use std::rc::Rc;

use gpui::InteractiveElement as _;
use gpui::StatefulInteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    App, ElementId, IntoElement, MouseButton, MouseDownEvent, ParentElement, RenderOnce,
    SharedString, StyleRefinement, Styled, Window, div, px,
};
use gpui_component::ActiveTheme as _;
use gpui_component::Disableable;
use gpui_component::Selectable;
use gpui_component::StyledExt as _;
use gpui_component::tooltip::Tooltip;

type PressHandler = Rc<dyn Fn(&MouseDownEvent, &mut Window, &mut App)>;
type HoverHandler = Rc<dyn Fn(&bool, &mut Window, &mut App)>;

/// A toolbar control painted from one surface node.
///
/// Presses are delivered on mouse down, before focus moves, so the editor
/// keeps its selection while a menu command runs. Disabled buttons still
/// deliver the press; the menu decides what a disabled press means.
#[derive(IntoElement)]
pub struct MenuToolbarButton {
    id: ElementId,
    style: StyleRefinement,
    tooltip: Option<SharedString>,
    disabled: bool,
    selected: bool,
    children: Vec<gpui::AnyElement>,
    on_press: Option<PressHandler>,
    on_hover: Option<HoverHandler>,
    min_width: gpui::Pixels,
    height: gpui::Pixels,
}

impl MenuToolbarButton {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            style: StyleRefinement::default(),
            tooltip: None,
            disabled: false,
            selected: false,
            children: Vec::new(),
            on_press: None,
            on_hover: None,
            min_width: px(32.),
            height: px(32.),
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<SharedString>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn on_press(
        mut self,
        on_press: impl Fn(&MouseDownEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_press = Some(Rc::new(on_press));
        self
    }

    pub fn on_hover(mut self, on_hover: impl Fn(&bool, &mut Window, &mut App) + 'static) -> Self {
        self.on_hover = Some(Rc::new(on_hover));
        self
    }

    pub fn min_width(mut self, min_width: gpui::Pixels) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn height(mut self, height: gpui::Pixels) -> Self {
        self.height = height;
        self
    }
}

impl ParentElement for MenuToolbarButton {
    fn extend(&mut self, elements: impl IntoIterator<Item = gpui::AnyElement>) {
        self.children.extend(elements);
    }
}

impl Styled for MenuToolbarButton {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl Selectable for MenuToolbarButton {
    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

impl Disableable for MenuToolbarButton {
    fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl RenderOnce for MenuToolbarButton {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let disabled = self.disabled;

        let mut disabled_fg = theme.muted_foreground;
        disabled_fg.a *= 0.6;

        div()
            .id(self.id)
            .flex()
            .items_center()
            .justify_center()
            .gap(px(6.))
            .h(self.height)
            .min_w(self.min_width)
            .px(px(6.))
            .rounded(px(6.))
            .text_size(px(12.))
            .font_weight(gpui::FontWeight::MEDIUM)
            .bg(theme.transparent)
            .text_color(if disabled {
                disabled_fg
            } else {
                theme.foreground
            })
            .when(!disabled, |this| {
                this.cursor_pointer()
                    .hover(|this| this.bg(theme.muted).text_color(theme.muted_foreground))
            })
            .when(self.selected, |this| {
                this.bg(theme.accent).text_color(theme.accent_foreground)
            })
            .refine_style(&self.style)
            .when_some(self.on_press, |this, on_press| {
                this.on_mouse_down(MouseButton::Left, move |event, window, cx| {
                    // Keep focus in the editor or the field being typed into.
                    window.prevent_default();
                    cx.stop_propagation();
                    (on_press)(event, window, cx);
                })
            })
            .when_some(self.on_hover, |this, on_hover| {
                this.on_hover(move |hovered, window, cx| (on_hover)(hovered, window, cx))
            })
            .children(self.children)
            .when_some(self.tooltip, |this, tooltip| {
                this.tooltip(move |window, cx| Tooltip::new(tooltip.clone()).build(window, cx))
            })
    }
}

/// The thin rule painted for a separator node between two groups.
#[derive(IntoElement)]
pub struct MenuToolbarSeparator;

impl RenderOnce for MenuToolbarSeparator {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        div()
            .mx(px(4.))
            .py(px(2.))
            .child(div().h(px(18.)).w(px(1.)).bg(theme.border))
    }
}
