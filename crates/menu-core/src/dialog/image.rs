use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::command::{Command, EditorView, ImageAttrs};
use crate::dialog::{Dialog, DialogConfig, DialogSession, FieldSpec, ValidityRule};
use crate::event::{Cx, Ui};
use crate::geometry::Size;
use crate::item::ItemSpec;

pub const IMAGE_DIALOG_SIZE: Size = Size {
    width: 320.0,
    height: 140.0,
};

/// Edits the image at the selection, or inserts one. Validity comes from
/// actually loading the URL, so it arrives through `Load`/`Error` events on
/// the probe node the dialog creates for every keystroke.
pub struct ImageDialog<V: EditorView> {
    dialog: Dialog<V>,
}

impl<V: EditorView> Clone for ImageDialog<V> {
    fn clone(&self) -> Self {
        Self {
            dialog: self.dialog.clone(),
        }
    }
}

impl<V: EditorView> ImageDialog<V> {
    pub fn new(
        apply: impl Fn(&V::State, &ImageAttrs, Option<&mut dyn FnMut(V::Transaction)>) -> bool
        + 'static,
    ) -> Self {
        let dialog = Dialog::new(DialogConfig {
            kind: "image",
            insert_title: "Insert image",
            edit_title: "Edit image",
            fields: vec![
                FieldSpec {
                    name: "src",
                    placeholder: "Enter url...",
                },
                FieldSpec {
                    name: "alt",
                    placeholder: "Enter description...",
                },
            ],
            rule: ValidityRule::ImageProbe,
            size: Cell::new(IMAGE_DIALOG_SIZE),
            apply: Rc::new(move |state, values, dispatch| {
                let attrs = ImageAttrs {
                    src: values.first().cloned().unwrap_or_default(),
                    alt: values.get(1).cloned().unwrap_or_default(),
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

    /// Hands local file selection to `select`. The dialog closes before the
    /// delegate runs.
    pub fn select_with(self, select: impl Fn(&mut Cx<'_, V>) + 'static) -> Self {
        self.dialog.set_select(Rc::new(select));
        self
    }

    pub fn open(&self, cx: &mut Cx<'_, V>) {
        let existing = cx
            .view
            .image_at_selection()
            .map(|attrs| vec![attrs.src, attrs.alt]);
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

    pub fn set_src(&self, ui: &mut Ui<V>, src: impl Into<String>) {
        self.dialog.set_field(ui, 0, src.into());
    }

    pub fn set_alt(&self, ui: &mut Ui<V>, alt: impl Into<String>) {
        self.dialog.set_field(ui, 1, alt.into());
    }

    /// Feeds a probe result in directly, as a `Load`/`Error` event would.
    pub fn resolve_probe(&self, ui: &mut Ui<V>, generation: u64, loaded: bool) {
        self.dialog.resolve_probe(ui, generation, loaded);
    }

    pub fn confirm(&self, cx: &mut Cx<'_, V>) -> bool {
        self.dialog.confirm(cx)
    }

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
        .icon("image")
        .title("Insert/edit image")
    }
}
