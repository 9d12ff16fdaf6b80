//! Joystick controller - pointer state machine and reporting lifecycle
//!
//! The controller owns the button position and the live reporting session.
//! It is a single-owner object: every method takes `&mut self` and is meant
//! to run on the context that handles pointer input. Periodic ticks from the
//! scheduler come back through [`JoystickController::on_tick`] on that same
//! context, so listener calls and redraw requests never race with pointer
//! handling.
//!
//! ```text
//!          pointer_down                     pointer_move
//!   Idle ───────────────▶ Active ◀──────────────┘
//!    ▲                      │  ▲ pointer_down (restart session)
//!    └──────────────────────┘  └──┘
//!          pointer_up
//! ```

pub mod session;


use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::{JoystickError, Result};
use crate::geometry::{self, Circle, Point, PolarReading};
use crate::layout::Layout;
use crate::render::{Frame, RendererRef};

pub use session::{
    ManualTickScheduler, ReportingSession, SessionId, SessionTick, TickScheduler,
    TokioTickScheduler,
};

/// Reporting interval used when none is given
pub const DEFAULT_LOOP_INTERVAL: Duration = Duration::from_millis(50);

/// Listener callback receiving each reading
///
/// Must be Send + Sync so the owning task can live on any runtime thread.
pub type ListenerFn = Arc<dyn Fn(PolarReading) + Send + Sync>;

/// Whether the pointer is currently pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickState {
    Idle,
    Active,
}

/// Validate a reporting interval given in milliseconds
pub fn interval_from_millis(millis: u64) -> Result<Duration> {
    if millis == 0 {
        return Err(JoystickError::InvalidInterval(millis));
    }
    Ok(Duration::from_millis(millis))
}

/// Pointer-to-polar state machine
pub struct JoystickController {
    circle: Option<Circle>,
    button_radius: f64,
    position: Point,
    state: JoystickState,

    listener: Option<ListenerFn>,
    interval: Duration,
    default_interval: Duration,

    session: Option<ReportingSession>,
    next_session_id: u64,
    scheduler: Box<dyn TickScheduler>,

    renderer: Option<RendererRef>,
}

impl JoystickController {
    /// Create an idle controller with no geometry yet
    pub fn new(scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            circle: None,
            button_radius: 0.0,
            position: Point::default(),
            state: JoystickState::Idle,
            listener: None,
            interval: DEFAULT_LOOP_INTERVAL,
            default_interval: DEFAULT_LOOP_INTERVAL,
            session: None,
            next_session_id: 0,
            scheduler,
            renderer: None,
        }
    }

    /// Attach the host's redraw hook
    pub fn with_renderer(mut self, renderer: RendererRef) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Interval used by [`set_listener`](Self::set_listener)
    pub fn with_default_interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self.interval = interval;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> JoystickState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == JoystickState::Active
    }

    pub fn circle(&self) -> Option<Circle> {
        self.circle
    }

    /// Current (clamped) button position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Interval of the current binding
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    /// Id of the live reporting session, if any
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(ReportingSession::id)
    }

    /// Reading at the current position, once geometry is known
    pub fn reading(&self) -> Option<PolarReading> {
        self.circle
            .as_ref()
            .map(|circle| geometry::reading(self.position, circle))
    }

    /// Paint snapshot, once geometry is known
    pub fn frame(&self) -> Option<Frame> {
        self.circle.map(|circle| Frame {
            circle,
            position: self.position,
            button_radius: self.button_radius,
        })
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Apply a freshly derived layout (border circle and button radius)
    pub fn on_layout(&mut self, layout: Layout) {
        self.button_radius = layout.button_radius;
        self.on_circle_changed(layout.border);
    }

    /// Replace the bounding circle
    ///
    /// While idle the button snaps to the new center. During a drag the
    /// offset is rescaled into the new circle so the reported angle and
    /// strength stay the same.
    pub fn on_circle_changed(&mut self, circle: Circle) {
        let previous = self.circle.replace(circle);

        self.position = match (self.state, previous) {
            (JoystickState::Active, Some(old)) => {
                let scale = circle.radius() / old.radius();
                let old_center = old.center();
                let new_center = circle.center();
                geometry::clamp(
                    Point::new(
                        new_center.x + (self.position.x - old_center.x) * scale,
                        new_center.y + (self.position.y - old_center.y) * scale,
                    ),
                    &circle,
                )
            }
            _ => circle.center(),
        };

        debug!(
            center_x = circle.center().x,
            center_y = circle.center().y,
            radius = circle.radius(),
            "Joystick circle changed"
        );
        self.request_redraw();
    }

    // =========================================================================
    // Pointer events
    // =========================================================================

    /// Press: start tracking, (re)start reporting and notify once
    ///
    /// Ignored until a valid circle has been supplied.
    pub fn on_pointer_down(&mut self, raw: Point) {
        let Some(circle) = self.circle else {
            debug!("Pointer down ignored: joystick has no geometry yet");
            return;
        };
        if !raw.is_finite() {
            warn!(x = raw.x, y = raw.y, "Pointer down ignored: non-finite coordinates");
            return;
        }

        self.position = geometry::clamp(raw, &circle);
        self.state = JoystickState::Active;

        self.restart_session();
        self.notify();
        self.request_redraw();
    }

    /// Drag: move the button, clamped to the circle; no notification
    pub fn on_pointer_move(&mut self, raw: Point) {
        if self.state != JoystickState::Active {
            trace!("Pointer move ignored while idle");
            return;
        }
        let Some(circle) = self.circle else {
            return;
        };
        if !raw.is_finite() {
            warn!(x = raw.x, y = raw.y, "Pointer move ignored: non-finite coordinates");
            return;
        }

        self.position = geometry::clamp(raw, &circle);
        self.request_redraw();
    }

    /// Release: recenter, stop reporting and notify the resting reading
    pub fn on_pointer_up(&mut self) {
        if self.state != JoystickState::Active {
            trace!("Pointer up ignored while idle");
            return;
        }
        let Some(circle) = self.circle else {
            return;
        };

        self.position = circle.center();
        self.state = JoystickState::Idle;

        self.stop_session();
        self.notify();
        self.request_redraw();
    }

    /// Deliver a periodic notification if the tick belongs to the live session
    ///
    /// Returns whether the listener was invoked. Ticks from cancelled or
    /// superseded sessions are dropped silently.
    pub fn on_tick(&mut self, tick: SessionTick) -> bool {
        let current = self
            .session
            .as_ref()
            .filter(|s| s.is_live())
            .map(ReportingSession::id);

        if self.state != JoystickState::Active || current != Some(tick.session) {
            trace!(session = tick.session.0, "Stale session tick dropped");
            return false;
        }

        self.notify()
    }

    // =========================================================================
    // Listener binding
    // =========================================================================

    /// Bind a listener at the default interval
    ///
    /// Always the configured default (50 ms unless overridden), regardless of
    /// any interval an earlier binding used.
    pub fn set_listener(&mut self, listener: ListenerFn) {
        let interval = self.default_interval;
        self.bind(listener, interval);
    }

    /// Bind a listener reporting every `interval_millis` while pressed
    ///
    /// If a press is in progress the session restarts immediately at the
    /// new interval.
    pub fn set_listener_with_interval(&mut self, listener: ListenerFn, interval_millis: u64) -> Result<()> {
        let interval = interval_from_millis(interval_millis)?;
        self.bind(listener, interval);
        Ok(())
    }

    /// Drop the listener; a running session keeps ticking but reports nothing
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    fn bind(&mut self, listener: ListenerFn, interval: Duration) {
        let interval_changed = interval != self.interval;
        self.listener = Some(listener);
        self.interval = interval;

        let interval_ms = interval.as_millis() as u64;
        debug!(interval_ms, "Joystick listener bound");

        if self.is_active() && interval_changed {
            self.restart_session();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn restart_session(&mut self) {
        self.stop_session();

        self.next_session_id += 1;
        let id = SessionId(self.next_session_id);
        self.session = Some(self.scheduler.start(id, self.interval));
    }

    fn stop_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
        }
    }

    fn notify(&self) -> bool {
        let (Some(listener), Some(reading)) = (self.listener.as_ref(), self.reading()) else {
            return false;
        };

        trace!(angle = reading.angle, strength = reading.strength, "Joystick notify");
        listener(reading);
        true
    }

    fn request_redraw(&self) {
        if let (Some(renderer), Some(frame)) = (self.renderer.as_ref(), self.frame()) {
            renderer.request_redraw(&frame);
        }
    }
}

impl Drop for JoystickController {
    fn drop(&mut self) {
        self.stop_session();
    }
}

impl std::fmt::Debug for JoystickController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoystickController")
            .field("circle", &self.circle)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("interval", &self.interval)
            .field("default_interval", &self.default_interval)
            .field("session", &self.session)
            .finish()
    }
}
