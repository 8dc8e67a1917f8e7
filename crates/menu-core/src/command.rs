use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::event::Cx;
use crate::geometry::{Rect, Viewport};

/// Link attributes at, or destined for, the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Image attributes at, or destined for, the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageAttrs {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The document engine as seen from the menu.
pub trait EditorView: 'static {
    /// Immutable snapshot handed to every predicate.
    type State: Clone + 'static;
    type Transaction: 'static;

    fn state(&self) -> &Self::State;
    fn dispatch(&mut self, tr: Self::Transaction);

    fn focus(&mut self) {}

    /// Screen rectangle of the current selection, in document coordinates.
    fn selection_rect(&self) -> Rect;
    fn viewport(&self) -> Viewport;
    /// Rectangle of the character at document position `pos`.
    fn coords_at(&self, pos: usize) -> Option<Rect>;
    fn scroll_into_view(&mut self, rect: Rect);

    fn link_at_selection(&self) -> Option<LinkAttrs> {
        None
    }

    fn image_at_selection(&self) -> Option<ImageAttrs> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub case_sensitive: bool,
}

/// Find primitives of the engine. Match indices are zero based.
pub trait FindView: EditorView {
    /// Re-arms match highlighting for `query` without moving the selection.
    /// Returns the number of matches.
    fn search(&mut self, query: &SearchQuery) -> usize;
    /// Selects match `index` and returns its document position.
    fn select_match(&mut self, index: usize) -> Option<usize>;
    fn cancel_search(&mut self);
}

type CommandFn<V> = dyn Fn(
    &<V as EditorView>::State,
    Option<&mut dyn FnMut(<V as EditorView>::Transaction)>,
    Option<&mut Cx<'_, V>>,
) -> bool;

/// `(state, dispatch?, cx?) -> applied`. Called without a dispatcher it is
/// a dry run that only reports applicability.
pub struct Command<V: EditorView> {
    run: Rc<CommandFn<V>>,
}

impl<V: EditorView> Clone for Command<V> {
    fn clone(&self) -> Self {
        Self {
            run: self.run.clone(),
        }
    }
}

impl<V: EditorView> Command<V> {
    pub fn new(
        run: impl Fn(
            &V::State,
            Option<&mut dyn FnMut(V::Transaction)>,
            Option<&mut Cx<'_, V>>,
        ) -> bool
        + 'static,
    ) -> Self {
        Self { run: Rc::new(run) }
    }

    /// An engine command that never needs the surface.
    pub fn from_state(
        run: impl Fn(&V::State, Option<&mut dyn FnMut(V::Transaction)>) -> bool + 'static,
    ) -> Self {
        Self::new(move |state, dispatch, _| run(state, dispatch))
    }

    pub fn can_run(&self, state: &V::State) -> bool {
        (self.run)(state, None, None)
    }

    /// Runs against a snapshot of the current state, then applies whatever
    /// the command dispatched.
    pub fn run(&self, cx: &mut Cx<'_, V>) -> bool {
        let state = cx.view.state().clone();
        let mut pending = Vec::new();
        let applied = {
            let sink: &mut dyn FnMut(V::Transaction) = &mut |tr| pending.push(tr);
            (self.run)(&state, Some(sink), Some(&mut *cx))
        };
        for tr in pending {
            cx.view.dispatch(tr);
        }
        applied
    }
}

pub type Predicate<S> = Rc<dyn Fn(&S) -> bool>;

pub fn predicate<S>(f: impl Fn(&S) -> bool + 'static) -> Predicate<S> {
    Rc::new(f)
}
