use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::command::{Command, EditorView, LinkAttrs};
use crate::dialog::{Dialog, DialogConfig, DialogSession, FieldSpec, ValidityRule};
use crate::event::{Cx, Ui};
use crate::geometry::Size;
use crate::item::ItemSpec;

pub const LINK_DIALOG_SIZE: Size = Size {
    width: 320.0,
    height: 96.0,
};

/// Edits the link at the selection, or inserts one.
pub struct LinkDialog<V: EditorView> {
    dialog: Dialog<V>,
}

impl<V: EditorView> Clone for LinkDialog<V> {
    fn clone(&self) -> Self {
        Self {
            dialog: self.dialog.clone(),
        }
    }
}

impl<V: EditorView> LinkDialog<V> {
    /// `apply` inserts or modifies the link over the selection.
    pub fn new(
        apply: impl Fn(&V::State, &LinkAttrs, Option<&mut dyn FnMut(V::Transaction)>) -> bool
        + 'static,
    ) -> Self {
        let dialog = Dialog::new(DialogConfig {
            kind: "link",
            insert_title: "Insert link",
            edit_title: "Edit link",
            fields: vec![FieldSpec {
                name: "href",
                placeholder: "Enter url...",
            }],
            rule: ValidityRule::UrlSyntax,
            size: Cell::new(LINK_DIALOG_SIZE),
            apply: Rc::new(move |state, values, dispatch| {
                let attrs = LinkAttrs {
                    href: values.first().cloned().unwrap_or_default(),
                    title: None,
                };
                apply(state, &attrs, dispatch)
            }),
            select: RefCell::new(None),
        });
        Self { dialog }
    }

    pub fn size(self, size: Size) -> Self {
        self.dialog.set_size(size);
        self
    }

    pub fn open(&self, cx: &mut Cx<'_, V>) {
        let existing = cx.view.link_at_selection().map(|attrs| vec![attrs.href]);
        self.dialog.open(cx, existing);
    }

    pub fn close(&self, ui: &mut Ui<V>) {
        self.dialog.close(ui);
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    pub fn session(&self) -> Ref<'_, Option<DialogSession>> {
        self.dialog.session()
    }

    /// Same as typing `href` into the URL field.
    pub fn set_href(&self, ui: &mut Ui<V>, href: impl Into<String>) {
        self.dialog.set_field(ui, 0, href.into());
    }

    pub fn confirm(&self, cx: &mut Cx<'_, V>) -> bool {
        self.dialog.confirm(cx)
    }

    /// Toolbar item that opens this dialog.
    pub fn item(&self) -> ItemSpec<V> {
        let this = self.clone();
        ItemSpec::new(Command::new(move |_, dispatch, cx| {
            if dispatch.is_none() {
                return true;
            }
            if let Some(cx) = cx {
                this.open(cx);
            }
            true
        }))
        .icon("link")
        .title("Insert/edit link")
    }
}
