mod command;
mod config;
mod dialog;
mod dropdown;
mod error;
mod event;
mod geometry;
mod grouped;
mod item;
mod keymap;
mod menubar;
mod names;
mod overflow;
mod placement;
mod search;
mod surface;

pub use crate::command::*;
pub use crate::config::*;
pub use crate::dialog::*;
pub use crate::dropdown::*;
pub use crate::error::*;
pub use crate::event::*;
pub use crate::geometry::*;
pub use crate::grouped::*;
pub use crate::item::*;
pub use crate::keymap::*;
pub use crate::menubar::*;
pub use crate::names::*;
pub use crate::overflow::*;
pub use crate::placement::*;
pub use crate::search::*;
pub use crate::surface::*;
