// Domain models: endpoint payload and widget presentation

mod snapshot;
mod widget;

pub use snapshot::ServerStatusSnapshot;
pub use widget::{Accent, Badge, DisplayTarget, PresentationState, WidgetView};
