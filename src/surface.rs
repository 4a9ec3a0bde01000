// Rendering surface the poller writes into

use std::sync::Mutex;
use tokio::sync::broadcast;

use crate::models::{Accent, Badge, DisplayTarget, PresentationState, WidgetView};

/// Named display targets of the status widget.
///
/// Implementations only store what they are told; all state-machine logic lives in the poller.
pub trait StatusSurface: Send + Sync {
    /// Whether the root status widget exists. When false the poller never starts.
    fn has_widget(&self) -> bool;
    fn set_text(&self, target: DisplayTarget, text: &str);
    fn set_badge(&self, label: &str, accent: Accent);
    fn set_footer_offline(&self, offline: bool);
    /// Called once at the end of every poll cycle.
    fn publish(&self);
}

/// In-process widget model: holds the current [`WidgetView`] and broadcasts it on publish.
pub struct WidgetSurface {
    attached: bool,
    view: Mutex<WidgetView>,
    tx: broadcast::Sender<WidgetView>,
}

impl WidgetSurface {
    /// Widget present; `capacity` bounds the view broadcast for slow subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            attached: true,
            view: Mutex::new(WidgetView::default()),
            tx,
        }
    }

    /// A surface without the status widget.
    pub fn detached() -> Self {
        Self {
            attached: false,
            ..Self::new(1)
        }
    }

    /// Copy of the current view.
    pub fn view(&self) -> WidgetView {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetView> {
        self.tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WidgetView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusSurface for WidgetSurface {
    fn has_widget(&self) -> bool {
        self.attached
    }

    fn set_text(&self, target: DisplayTarget, text: &str) {
        let mut view = self.lock();
        let slot = view.text_mut(target);
        slot.clear();
        slot.push_str(text);
    }

    fn set_badge(&self, label: &str, accent: Accent) {
        let mut view = self.lock();
        view.state = match accent {
            Accent::Live => PresentationState::Online,
            Accent::Offline => PresentationState::Offline,
        };
        view.badge = Some(Badge {
            label: label.to_string(),
            accent,
        });
    }

    fn set_footer_offline(&self, offline: bool) {
        self.lock().footer_offline = offline;
    }

    fn publish(&self) {
        let view = self.view();
        if self.tx.send(view).is_err() {
            tracing::trace!(operation = "publish_view", "no view subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_placeholders() {
        let surface = WidgetSurface::new(4);
        let view = surface.view();
        assert!(surface.has_widget());
        assert!(view.badge.is_none());
        for target in DisplayTarget::METRICS {
            assert_eq!(view.text(target), crate::format::PLACEHOLDER);
        }
    }

    #[test]
    fn detached_surface_has_no_widget() {
        assert!(!WidgetSurface::detached().has_widget());
    }

    #[tokio::test]
    async fn publish_broadcasts_current_view() {
        let surface = WidgetSurface::new(4);
        let mut rx = surface.subscribe();
        surface.set_text(DisplayTarget::Cpu, "12.3%");
        surface.set_badge("LIVE", Accent::Live);
        surface.publish();
        let view = rx.recv().await.unwrap();
        assert_eq!(view.cpu, "12.3%");
        assert_eq!(view.state, PresentationState::Online);
    }
}
