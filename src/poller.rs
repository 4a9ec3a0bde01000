// Live status poller: keeps the widget in sync with the homeserver stats endpoint.
// Failures never leave the poll loop; they only flip the widget to Offline.

use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval, interval_at};
use tracing::Instrument;

use crate::client::StatusClient;
use crate::error::PollError;
use crate::format::{PLACEHOLDER, format_percent, format_uptime, last_updated_label};
use crate::models::{Accent, DisplayTarget, PresentationState, ServerStatusSnapshot};
use crate::surface::StatusSurface;

/// Homeserver stats endpoint polled by the widget.
pub const STATUS_ENDPOINT: &str = "https://stats.gowshik.online/api/homeserver";
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

pub const LIVE_LABEL: &str = "LIVE";
pub const OFFLINE_LABEL: &str = "OFFLINE";
pub const FOOTER_ONLINE: &str = "Server online";
pub const FOOTER_OFFLINE: &str = "Server unreachable";
/// Shown in the "last updated" display while offline.
pub const LAST_UPDATED_OFFLINE: &str = "Server offline";

/// Where and how often to poll. The binary always runs with [`PollerSettings::default`].
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub endpoint: String,
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            endpoint: STATUS_ENDPOINT.to_string(),
            interval: POLL_INTERVAL,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Running counters, logged periodically by the poll loop.
#[derive(Debug, Default)]
pub struct PollStats {
    pub polls_ok: AtomicU64,
    pub polls_failed: AtomicU64,
    pub transitions: AtomicU64,
}

pub struct StatusPoller {
    client: StatusClient,
    surface: Arc<dyn StatusSurface>,
    interval: Duration,
    stats: Arc<PollStats>,
    /// Last applied presentation state and when it began.
    current: Mutex<Option<(PresentationState, Instant)>>,
    /// Every metric seen so far; restores absent fields after an outage.
    last_known: Mutex<ServerStatusSnapshot>,
}

impl StatusPoller {
    /// Returns `Ok(None)` when the surface has no status widget; the poller is then never started.
    pub fn new(
        surface: Arc<dyn StatusSurface>,
        settings: PollerSettings,
    ) -> anyhow::Result<Option<Self>> {
        if !surface.has_widget() {
            tracing::debug!("status widget absent; poller not started");
            return Ok(None);
        }
        anyhow::ensure!(!settings.interval.is_zero(), "poll interval must be > 0");
        anyhow::ensure!(!settings.timeout.is_zero(), "request timeout must be > 0");
        let client = StatusClient::new(settings.endpoint, settings.timeout)?;
        Ok(Some(Self {
            client,
            surface,
            interval: settings.interval,
            stats: Arc::new(PollStats::default()),
            current: Mutex::new(None),
            last_known: Mutex::new(ServerStatusSnapshot::default()),
        }))
    }

    pub fn stats(&self) -> Arc<PollStats> {
        self.stats.clone()
    }

    /// Current presentation state, `None` before the first poll completes.
    pub fn state(&self) -> Option<PresentationState> {
        let current = *self.lock_current();
        current.map(|(state, _)| state)
    }

    /// One poll cycle: fetch, apply, publish. Returns the resulting presentation state.
    pub async fn poll_once(&self) -> PresentationState {
        let state = match self.client.fetch().await {
            Ok(snapshot) => {
                self.stats.polls_ok.fetch_add(1, Ordering::Relaxed);
                if snapshot.status.is_some() || snapshot.timestamp.is_some() {
                    tracing::debug!(
                        server_status = snapshot.status.as_deref().unwrap_or(""),
                        server_timestamp = snapshot.timestamp.as_deref().unwrap_or(""),
                        "status payload received"
                    );
                }
                let merged = self.remember(&snapshot);
                self.apply_snapshot(&merged);
                self.set_online(true);
                PresentationState::Online
            }
            Err(e) => {
                self.stats.polls_failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    operation = "poll_status",
                    "status poll failed"
                );
                self.render_state(false, Some(&e));
                PresentationState::Offline
            }
        };
        self.surface.publish();
        state
    }

    /// Folds `snapshot` into the last-known metrics and returns the result.
    ///
    /// Offline resets the displays to the placeholder, so a field the server omits on
    /// the first poll after an outage is rendered from its pre-outage value.
    fn remember(&self, snapshot: &ServerStatusSnapshot) -> ServerStatusSnapshot {
        let mut last_known = self
            .last_known
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        last_known.merge_from(snapshot);
        last_known.clone()
    }

    /// Writes every metric present in `snapshot`; absent ones keep their current text.
    pub fn apply_snapshot(&self, snapshot: &ServerStatusSnapshot) {
        if let Some(uptime) = snapshot.uptime {
            self.surface
                .set_text(DisplayTarget::Uptime, &format_uptime(uptime));
        }
        let percents = [
            (DisplayTarget::Cpu, snapshot.cpu_percent),
            (DisplayTarget::Ram, snapshot.ram_percent),
            (DisplayTarget::Disk, snapshot.disk_percent),
        ];
        for (target, value) in percents {
            if let Some(v) = value {
                self.surface.set_text(target, &format_percent(v));
            }
        }
        self.surface
            .set_text(DisplayTarget::LastUpdated, &last_updated_label(Local::now()));
    }

    /// Renders the Online or Offline presentation. Offline also clears every metric.
    pub fn set_online(&self, online: bool) {
        self.render_state(online, None);
    }

    /// `cause` is the failure that triggered Offline, attached to the transition log.
    fn render_state(&self, online: bool, cause: Option<&PollError>) {
        if online {
            self.surface.set_badge(LIVE_LABEL, Accent::Live);
            self.surface.set_footer_offline(false);
            self.surface.set_text(DisplayTarget::FooterText, FOOTER_ONLINE);
        } else {
            self.surface.set_badge(OFFLINE_LABEL, Accent::Offline);
            self.surface.set_footer_offline(true);
            self.surface.set_text(DisplayTarget::FooterText, FOOTER_OFFLINE);
            for target in DisplayTarget::METRICS {
                self.surface.set_text(target, PLACEHOLDER);
            }
            self.surface
                .set_text(DisplayTarget::LastUpdated, LAST_UPDATED_OFFLINE);
        }
        let next = if online {
            PresentationState::Online
        } else {
            PresentationState::Offline
        };
        self.record_transition(next, cause);
    }

    fn record_transition(&self, next: PresentationState, cause: Option<&PollError>) {
        let mut current = self.lock_current();
        let now = Instant::now();
        match *current {
            Some((prev, _)) if prev == next => return,
            Some((PresentationState::Offline, since)) => {
                self.stats.transitions.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    endpoint = self.client.endpoint(),
                    outage_secs = now.duration_since(since).as_secs(),
                    "status endpoint back online"
                );
            }
            Some((PresentationState::Online, since)) => {
                self.stats.transitions.fetch_add(1, Ordering::Relaxed);
                let error = cause.map(ToString::to_string).unwrap_or_default();
                tracing::warn!(
                    endpoint = self.client.endpoint(),
                    online_secs = now.duration_since(since).as_secs(),
                    error = %error,
                    kind = cause.map_or("", PollError::kind),
                    "status endpoint went offline"
                );
            }
            None => {
                tracing::info!(
                    endpoint = self.client.endpoint(),
                    state = ?next,
                    "first status poll completed"
                );
            }
        }
        *current = Some((next, now));
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<(PresentationState, Instant)>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Polls immediately, then every interval until `shutdown_rx` fires.
    ///
    /// Polls are serialized: a tick that lands while a request is in flight is skipped,
    /// so there is never more than one outstanding request.
    pub fn start(
        self,
        mut shutdown_rx: oneshot::Receiver<()>,
        stats_log_interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let poller_span = tracing::span!(
            tracing::Level::DEBUG,
            "poller",
            interval_ms = self.interval.as_millis() as u64
        );
        tokio::spawn(
            async move {
                let mut tick = interval(self.interval);
                tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
                let mut stats_log_tick =
                    interval_at(Instant::now() + stats_log_interval, stats_log_interval);
                stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    tokio::select! {
                        _ = tick.tick() => {
                            self.poll_once().await;
                        }
                        _ = stats_log_tick.tick() => {
                            tracing::info!(
                                polls_ok = self.stats.polls_ok.load(Ordering::Relaxed),
                                polls_failed = self.stats.polls_failed.load(Ordering::Relaxed),
                                transitions = self.stats.transitions.load(Ordering::Relaxed),
                                state = ?self.state(),
                                "poller stats"
                            );
                        }
                        _ = &mut shutdown_rx => {
                            tracing::debug!("Poller shutting down");
                            break;
                        }
                    }
                }
            }
            .instrument(poller_span),
        )
    }
}
