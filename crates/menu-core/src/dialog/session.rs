use crate::dialog::validity::Validity;
use crate::geometry::Rect;
use crate::placement::Placement;
use crate::surface::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    /// Nothing to edit at the selection; OK inserts.
    Insert,
    /// The selection already carries the target; fields are pre-filled.
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Closed,
    Positioning,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DialogNodes {
    pub(crate) dialog: NodeId,
    pub(crate) overlay: NodeId,
    pub(crate) toolbar_overlay: Option<NodeId>,
    pub(crate) highlight: NodeId,
    pub(crate) ok: NodeId,
}

/// Transient state of one open link or image dialog.
#[derive(Debug, Clone)]
pub struct DialogSession {
    mode: DialogMode,
    phase: DialogPhase,
    anchor: Rect,
    placement: Option<Placement>,
    values: Vec<String>,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) validity: Validity,
    pub(crate) nodes: Option<DialogNodes>,
    pub(crate) probe: Option<NodeId>,
}

impl DialogSession {
    pub fn begin(mode: DialogMode, anchor: Rect, values: Vec<String>) -> Self {
        Self {
            mode,
            phase: DialogPhase::Positioning,
            anchor,
            placement: None,
            values,
            inputs: Vec::new(),
            validity: Validity::default(),
            nodes: None,
            probe: None,
        }
    }

    pub fn opened(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self.phase = DialogPhase::Open;
        self
    }

    pub fn closed(mut self) -> Self {
        self.validity.retire();
        self.phase = DialogPhase::Closed;
        self
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn set_value(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// OK stays usable for any non-empty value so an unreachable target can
    /// still be saved.
    pub fn ok_enabled(&self) -> bool {
        !self.value(0).trim().is_empty()
    }

    /// What Enter does: confirm only while the value is known to be good.
    pub fn enter_action(&self) -> DialogAction {
        if self.ok_enabled() && self.is_valid() {
            DialogAction::Confirm
        } else {
            DialogAction::Cancel
        }
    }
}
