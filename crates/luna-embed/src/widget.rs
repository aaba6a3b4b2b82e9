//! Floating widget state and layout.
//!
//! The widget is a launcher button plus a chat panel hosting the chat
//! page in a frame. The panel toggles on button clicks, closes on clicks
//! outside it, and re-lays itself out when the viewport crosses the
//! mobile breakpoint.

use std::str::FromStr;

use tracing::debug;

use luna_core::config::EmbedConfig;
use luna_core::LunaError;

/// Viewport widths below this render the mobile layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 450;

/// Which corner the widget is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    BottomRight,
    BottomLeft,
}

impl Anchor {
    /// CSS side property the horizontal offset applies to.
    pub fn side(&self) -> &'static str {
        match self {
            Anchor::BottomRight => "right",
            Anchor::BottomLeft => "left",
        }
    }
}

impl FromStr for Anchor {
    type Err = LunaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom-right" => Ok(Anchor::BottomRight),
            "bottom-left" => Ok(Anchor::BottomLeft),
            other => Err(LunaError::Embed(format!(
                "Unknown widget position: {}",
                other
            ))),
        }
    }
}

/// Resolved panel geometry for the current viewport.
///
/// Dimensions are CSS lengths because the mobile layout is
/// viewport-relative while the desktop layout is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub width: String,
    pub height: String,
    pub bottom: String,
    /// Offset from the anchored side.
    pub side_offset: String,
    pub mobile: bool,
}

impl PanelLayout {
    /// Compute the layout for a viewport width.
    pub fn for_viewport(viewport_width: u32) -> Self {
        if viewport_width < MOBILE_BREAKPOINT_PX {
            Self {
                width: "90vw".to_string(),
                height: "80vh".to_string(),
                bottom: "80px".to_string(),
                side_offset: "5vw".to_string(),
                mobile: true,
            }
        } else {
            Self {
                width: "380px".to_string(),
                height: "600px".to_string(),
                bottom: "90px".to_string(),
                side_offset: "20px".to_string(),
                mobile: false,
            }
        }
    }
}

/// What a page click landed on, for the outside-click close rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The launcher button (handled by toggle, not the outside rule).
    Launcher,
    /// Anywhere inside the chat panel.
    Panel,
    /// The rest of the page.
    Outside,
}

/// The installed widget instance.
#[derive(Debug, Clone)]
pub struct EmbedWidget {
    config: EmbedConfig,
    anchor: Anchor,
    open: bool,
    layout: PanelLayout,
}

impl EmbedWidget {
    pub fn new(config: EmbedConfig, viewport_width: u32) -> Result<Self, LunaError> {
        let anchor = config.position.parse()?;
        Ok(Self {
            config,
            anchor,
            open: false,
            layout: PanelLayout::for_viewport(viewport_width),
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Launcher button press: flip the panel.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        debug!(open = self.open, "Widget toggled");
        self.open
    }

    /// Page click: close only when the panel is open and the click
    /// landed outside both the panel and the launcher.
    pub fn handle_click(&mut self, target: ClickTarget) {
        if self.open && target == ClickTarget::Outside {
            self.open = false;
            debug!("Widget closed by outside click");
        }
    }

    /// Viewport resize: recompute the panel layout.
    pub fn handle_resize(&mut self, viewport_width: u32) {
        let layout = PanelLayout::for_viewport(viewport_width);
        if layout != self.layout {
            debug!(mobile = layout.mobile, "Widget layout changed");
            self.layout = layout;
        }
    }

    /// Markup for the launcher button.
    pub fn launcher_html(&self) -> String {
        format!(
            r#"<button id="luna-widget-button" aria-label="Open chat" style="position:fixed;bottom:20px;{}:20px;">💬</button>"#,
            self.anchor.side()
        )
    }

    /// Markup for the panel and its chat frame, using the current layout.
    pub fn panel_html(&self) -> String {
        let l = &self.layout;
        format!(
            r#"<div id="luna-widget-panel" style="position:fixed;bottom:{};{}:{};width:{};height:{};display:{};"><iframe src="{}" title="Luna chat" allow="microphone"></iframe></div>"#,
            l.bottom,
            self.anchor.side(),
            l.side_offset,
            l.width,
            l.height,
            if self.open { "block" } else { "none" },
            self.config.chat_url
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
