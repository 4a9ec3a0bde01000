// Presentation model for the status widget

use serde::{Deserialize, Serialize};

use crate::format::PLACEHOLDER;

/// Binary Online/Offline mode driving badge, footer and metric rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationState {
    Online,
    Offline,
}

/// Visual accent attached to the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Live,
    Offline,
}

/// Named text targets inside the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    Uptime,
    Cpu,
    Ram,
    Disk,
    LastUpdated,
    FooterText,
}

impl DisplayTarget {
    /// The four metric displays reset on every failed poll.
    pub const METRICS: [DisplayTarget; 4] = [
        DisplayTarget::Uptime,
        DisplayTarget::Cpu,
        DisplayTarget::Ram,
        DisplayTarget::Disk,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub label: String,
    pub accent: Accent,
}

/// Everything the page renders for the widget, as one serializable frame.
///
/// The initial frame is a quiet Offline: placeholders everywhere, `footer_offline` set
/// to match `state`, and no badge. `badge: None` means no poll has completed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub state: PresentationState,
    /// `None` until the first poll completes.
    pub badge: Option<Badge>,
    pub footer_offline: bool,
    pub footer_text: String,
    pub uptime: String,
    pub cpu: String,
    pub ram: String,
    pub disk: String,
    pub last_updated: String,
}

impl Default for WidgetView {
    fn default() -> Self {
        Self {
            state: PresentationState::Offline,
            badge: None,
            footer_offline: true,
            footer_text: PLACEHOLDER.into(),
            uptime: PLACEHOLDER.into(),
            cpu: PLACEHOLDER.into(),
            ram: PLACEHOLDER.into(),
            disk: PLACEHOLDER.into(),
            last_updated: PLACEHOLDER.into(),
        }
    }
}

impl WidgetView {
    pub fn text(&self, target: DisplayTarget) -> &str {
        match target {
            DisplayTarget::Uptime => &self.uptime,
            DisplayTarget::Cpu => &self.cpu,
            DisplayTarget::Ram => &self.ram,
            DisplayTarget::Disk => &self.disk,
            DisplayTarget::LastUpdated => &self.last_updated,
            DisplayTarget::FooterText => &self.footer_text,
        }
    }

    pub fn text_mut(&mut self, target: DisplayTarget) -> &mut String {
        match target {
            DisplayTarget::Uptime => &mut self.uptime,
            DisplayTarget::Cpu => &mut self.cpu,
            DisplayTarget::Ram => &mut self.ram,
            DisplayTarget::Disk => &mut self.disk,
            DisplayTarget::LastUpdated => &mut self.last_updated,
            DisplayTarget::FooterText => &mut self.footer_text,
        }
    }
}
