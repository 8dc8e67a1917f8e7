use std::rc::Rc;

use crate::command::EditorView;
use crate::event::Ui;
use crate::item::{MenuElement, RenderResult, Update};
use crate::surface::{NodeId, Surface};

pub type Group<V> = Vec<Rc<dyn MenuElement<V>>>;

struct RenderedGroup<V: EditorView> {
    wrappers: Vec<NodeId>,
    updates: Vec<Update<V>>,
    /// Separator in front of this group; the first rendered group has none.
    separator: Option<NodeId>,
}

impl<V: EditorView> RenderedGroup<V> {
    fn update(&mut self, surface: &mut Surface, state: &V::State) -> bool {
        let mut something = false;
        for (update, wrapper) in self.updates.iter_mut().zip(&self.wrappers) {
            let showing = update(surface, state);
            surface.set_hidden(*wrapper, !showing);
            something |= showing;
        }
        something
    }
}

/// Lays `groups` out left to right inside one container, with a separator
/// between consecutive non-empty groups.
///
/// The combined update shows a separator only while the groups on both of
/// its sides show content, and reports whether anything at all is showing.
pub fn render_grouped<V: EditorView>(ui: &mut Ui<V>, groups: &[Group<V>]) -> RenderResult<V> {
    let names = ui.names().clone();
    let container = ui.surface.create("div");

    let mut rendered: Vec<RenderedGroup<V>> = Vec::new();
    for group in groups.iter().filter(|group| !group.is_empty()) {
        let separator = if rendered.is_empty() {
            None
        } else {
            let separator = ui.surface.create_with_class("span", &names.separator);
            ui.surface.append(container, separator);
            Some(separator)
        };

        let mut wrappers = Vec::with_capacity(group.len());
        let mut updates = Vec::with_capacity(group.len());
        for element in group {
            let RenderResult { node, update } = element.render(ui);
            let wrapper = ui.surface.create_with_class("span", &names.item);
            ui.surface.append(wrapper, node);
            ui.surface.append(container, wrapper);
            wrappers.push(wrapper);
            updates.push(update);
        }
        rendered.push(RenderedGroup {
            wrappers,
            updates,
            separator,
        });
    }

    RenderResult {
        node: container,
        update: Box::new(move |surface, state| {
            let mut something = false;
            let mut previous_showing = false;
            for group in rendered.iter_mut() {
                let showing = group.update(surface, state);
                if let Some(separator) = group.separator {
                    surface.set_hidden(separator, !(previous_showing && showing));
                }
                previous_showing = showing;
                something |= showing;
            }
            something
        }),
    }
}
