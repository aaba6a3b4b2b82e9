//! Idempotent widget installation.
//!
//! Host pages may include the loader more than once (tag managers,
//! server-side templates). The registry guarantees a single widget
//! instance per page regardless of how many times install runs.

use tracing::{info, warn};

use luna_core::config::EmbedConfig;
use luna_core::LunaError;

use crate::widget::EmbedWidget;

/// Per-page widget registry.
#[derive(Debug, Default)]
pub struct EmbedRegistry {
    widget: Option<EmbedWidget>,
}

impl EmbedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the widget. A repeat call is a no-op that returns the
    /// already-installed instance.
    pub fn install(
        &mut self,
        config: EmbedConfig,
        viewport_width: u32,
    ) -> Result<&mut EmbedWidget, LunaError> {
        if self.widget.is_some() {
            warn!("Widget already installed; ignoring repeat install");
        } else {
            let widget = EmbedWidget::new(config, viewport_width)?;
            info!("Widget installed");
            self.widget = Some(widget);
        }
        Ok(self.widget.as_mut().expect("widget installed above"))
    }

    pub fn is_installed(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&EmbedWidget> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut EmbedWidget> {
        self.widget.as_mut()
    }

    /// Complete page markup: one launcher and one panel, or empty when
    /// nothing is installed.
    pub fn render(&self) -> String {
        match &self.widget {
            Some(widget) => format!("{}{}", widget.launcher_html(), widget.panel_html()),
            None => String::new(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
