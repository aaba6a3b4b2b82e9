//! Embeddable widget loader for host pages.
//!
//! Renders the floating launcher button and the chat panel frame, keeps
//! their open/closed state, and adapts the panel layout to the viewport.
//! Installation is idempotent: running the loader twice on the same page
//! yields exactly one button and one panel.

pub mod registry;
pub mod widget;

pub use registry::EmbedRegistry;
pub use widget::{Anchor, ClickTarget, EmbedWidget, PanelLayout, MOBILE_BREAKPOINT_PX};
