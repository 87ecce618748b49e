//! Popup overlay rendering.
//!
//! [`PopupView`] builds the overlay as an [`Element`] tree and drives a host
//! [`Surface`] (a page, a terminal, a test double) to attach, move and detach
//! it.

pub mod element;
pub mod layout;
pub mod memory;
pub mod surface;
pub mod terminal;
pub mod view;

pub use element::Element;
pub use memory::MemorySurface;
pub use surface::{AudioId, NodeId, Surface};
pub use terminal::TerminalSurface;
pub use view::{PopupHandle, PopupView};
