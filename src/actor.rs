//! JoystickActor - single-owner event loop around the controller
//!
//! Pointer events, layout changes and reporting ticks all funnel into one
//! tokio task that owns the [`JoystickController`]. This serializes every
//! state mutation, listener call and redraw request without locks:
//!
//! ```text
//!   JoystickHandle ──commands──▶ ┌──────────────────────┐
//!                                │      JoystickActor    │──▶ listener
//!   session task ───ticks──────▶ │  (owns controller)    │──▶ renderer
//!                                └──────────────────────┘
//! ```
//!
//! A tick that races a pointer-up lands in the actor after the up has been
//! processed and is discarded by the controller's session check.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::JoystickConfig;
use crate::controller::{
    interval_from_millis, JoystickController, ListenerFn, SessionTick, TokioTickScheduler,
};
use crate::error::{JoystickError, Result};
use crate::geometry::{Circle, Point, PolarReading};
use crate::layout::LayoutPolicy;
use crate::render::{Frame, RendererRef};
use crate::style::JoystickStyle;

/// Commands accepted by the actor
pub enum JoystickCommand {
    // -------------------------------------------------------------------------
    // Input (fire and forget)
    // -------------------------------------------------------------------------
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,

    // -------------------------------------------------------------------------
    // Layout and configuration (fire and forget)
    // -------------------------------------------------------------------------
    /// View resized; circle and button radius are derived from the size
    Resize { width: u32, height: u32 },
    /// Supply the bounding circle directly
    SetCircle(Circle),
    /// Bind a listener; `None` uses the configured default interval
    SetListener { listener: ListenerFn, interval_millis: Option<u64> },
    ClearListener,
    SetStyle(JoystickStyle),

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------
    GetFrame { response: oneshot::Sender<Option<Frame>> },
    GetReading { response: oneshot::Sender<Option<PolarReading>> },
    IsActive { response: oneshot::Sender<bool> },
    GetStyle { response: oneshot::Sender<JoystickStyle> },

    Shutdown,
}

/// Owner of the controller; runs until shut down or every handle is dropped
pub struct JoystickActor {
    controller: JoystickController,
    policy: LayoutPolicy,
    style: JoystickStyle,
    command_rx: mpsc::UnboundedReceiver<JoystickCommand>,
    tick_rx: mpsc::UnboundedReceiver<SessionTick>,
}

impl JoystickActor {
    /// Spawn the actor on the current tokio runtime
    pub fn spawn(config: &JoystickConfig, renderer: Option<RendererRef>) -> JoystickHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (scheduler, tick_rx) = TokioTickScheduler::channel();

        let mut controller =
            JoystickController::new(Box::new(scheduler)).with_default_interval(config.interval());
        if let Some(renderer) = renderer {
            controller = controller.with_renderer(renderer);
        }

        let actor = Self {
            controller,
            policy: config.layout_policy(),
            style: config.style,
            command_rx,
            tick_rx,
        };

        let task = tokio::spawn(actor.run());

        JoystickHandle {
            command_tx,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    async fn run(mut self) {
        info!("Joystick actor started");

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(JoystickCommand::Shutdown) | None => break,
                        Some(command) => self.handle(command),
                    }
                }
                Some(tick) = self.tick_rx.recv() => {
                    self.controller.on_tick(tick);
                }
            }
        }

        // Dropping the controller cancels any live session
        info!("Joystick actor stopped");
    }

    fn handle(&mut self, command: JoystickCommand) {
        match command {
            JoystickCommand::PointerDown(point) => self.controller.on_pointer_down(point),
            JoystickCommand::PointerMove(point) => self.controller.on_pointer_move(point),
            JoystickCommand::PointerUp => self.controller.on_pointer_up(),

            JoystickCommand::Resize { width, height } => match self.policy.layout(width, height) {
                Some(layout) => self.controller.on_layout(layout),
                None => warn!("Ignoring resize to empty view {}x{}", width, height),
            },
            JoystickCommand::SetCircle(circle) => self.controller.on_circle_changed(circle),
            JoystickCommand::SetListener { listener, interval_millis } => match interval_millis {
                Some(millis) => {
                    if let Err(e) = self.controller.set_listener_with_interval(listener, millis) {
                        warn!("Listener rejected: {}", e);
                    }
                }
                None => self.controller.set_listener(listener),
            },
            JoystickCommand::ClearListener => self.controller.clear_listener(),
            JoystickCommand::SetStyle(style) => {
                debug!("Joystick style updated");
                self.style = style;
            }

            JoystickCommand::GetFrame { response } => {
                let _ = response.send(self.controller.frame());
            }
            JoystickCommand::GetReading { response } => {
                let _ = response.send(self.controller.reading());
            }
            JoystickCommand::IsActive { response } => {
                let _ = response.send(self.controller.is_active());
            }
            JoystickCommand::GetStyle { response } => {
                let _ = response.send(self.style);
            }

            // Handled by the run loop
            JoystickCommand::Shutdown => {}
        }
    }
}

/// Cloneable handle to a running [`JoystickActor`]
///
/// Input and configuration methods are fire-and-forget and fail only if the
/// actor has stopped. Queries await a oneshot reply.
#[derive(Clone)]
pub struct JoystickHandle {
    command_tx: mpsc::UnboundedSender<JoystickCommand>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl JoystickHandle {
    fn send(&self, command: JoystickCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| JoystickError::ActorClosed)
    }

    async fn query<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> JoystickCommand) -> Result<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(build(response_tx))?;
        response_rx.await.map_err(|_| JoystickError::ActorClosed)
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn pointer_down(&self, x: f64, y: f64) -> Result<()> {
        self.send(JoystickCommand::PointerDown(Point::new(x, y)))
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Result<()> {
        self.send(JoystickCommand::PointerMove(Point::new(x, y)))
    }

    pub fn pointer_up(&self) -> Result<()> {
        self.send(JoystickCommand::PointerUp)
    }

    // =========================================================================
    // Layout and configuration
    // =========================================================================

    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        self.send(JoystickCommand::Resize { width, height })
    }

    pub fn set_circle(&self, circle: Circle) -> Result<()> {
        self.send(JoystickCommand::SetCircle(circle))
    }

    /// Bind a listener at the configured default interval
    pub fn set_listener(&self, listener: ListenerFn) -> Result<()> {
        self.send(JoystickCommand::SetListener {
            listener,
            interval_millis: None,
        })
    }

    /// Bind a listener reporting every `interval_millis` while pressed
    pub fn set_listener_with_interval(&self, listener: ListenerFn, interval_millis: u64) -> Result<()> {
        interval_from_millis(interval_millis)?;
        self.send(JoystickCommand::SetListener {
            listener,
            interval_millis: Some(interval_millis),
        })
    }

    pub fn clear_listener(&self) -> Result<()> {
        self.send(JoystickCommand::ClearListener)
    }

    pub fn set_style(&self, style: JoystickStyle) -> Result<()> {
        self.send(JoystickCommand::SetStyle(style))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn frame(&self) -> Result<Option<Frame>> {
        self.query(|response| JoystickCommand::GetFrame { response }).await
    }

    pub async fn reading(&self) -> Result<Option<PolarReading>> {
        self.query(|response| JoystickCommand::GetReading { response }).await
    }

    pub async fn is_active(&self) -> Result<bool> {
        self.query(|response| JoystickCommand::IsActive { response }).await
    }

    pub async fn style(&self) -> Result<JoystickStyle> {
        self.query(|response| JoystickCommand::GetStyle { response }).await
    }

    /// Stop the actor and wait for it to finish
    ///
    /// Any live reporting session is cancelled before this returns.
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(JoystickCommand::Shutdown);
        let task = self.task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    type Recorded = Arc<Mutex<Vec<PolarReading>>>;

    fn recording_listener() -> (ListenerFn, Recorded) {
        let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: ListenerFn = Arc::new(move |reading: PolarReading| sink.lock().push(reading));
        (listener, seen)
    }

    fn spawn_sized() -> JoystickHandle {
        let handle = JoystickActor::spawn(&JoystickConfig::default(), None);
        // 200x200 view: center (100, 100), border radius 75
        handle.resize(200, 200).unwrap();
        handle
    }

    #[tokio::test]
    async fn test_resize_establishes_geometry() {
        let handle = spawn_sized();

        let frame = handle.frame().await.unwrap().unwrap();
        assert_eq!(frame.circle.center(), Point::new(100.0, 100.0));
        assert_eq!(frame.circle.radius(), 75.0);
        assert_eq!(frame.button_radius, 25.0);
        assert_eq!(frame.position, Point::new(100.0, 100.0));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_resize_keeps_joystick_inert() {
        let handle = JoystickActor::spawn(&JoystickConfig::default(), None);
        handle.resize(0, 0).unwrap();
        handle.pointer_down(10.0, 10.0).unwrap();

        assert_eq!(handle.frame().await.unwrap(), None);
        assert!(!handle.is_active().await.unwrap());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_press_reports_periodically_then_stops() {
        let handle = spawn_sized();
        let (listener, seen) = recording_listener();
        handle.set_listener_with_interval(listener, 10).unwrap();

        // 30px east of center on a 75px radius: 40%
        handle.pointer_down(130.0, 100.0).unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        handle.pointer_up().unwrap();
        assert!(!handle.is_active().await.unwrap());

        let after_up = seen.lock().clone();
        assert!(after_up.len() >= 3, "expected edge + periodic reports, got {:?}", after_up);
        assert_eq!(after_up[0], PolarReading { angle: 0, strength: 40 });
        assert_eq!(*after_up.last().unwrap(), PolarReading::CENTERED);

        // Nothing may arrive once the release has been processed
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(seen.lock().len(), after_up.len());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_move_is_reported_by_next_tick() {
        let handle = spawn_sized();
        let (listener, seen) = recording_listener();
        handle.set_listener_with_interval(listener, 10).unwrap();

        handle.pointer_down(130.0, 100.0).unwrap();
        handle.pointer_move(100.0, 25.0).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(seen.lock().contains(&PolarReading { angle: 90, strength: 100 }));
        assert_eq!(handle.reading().await.unwrap(), Some(PolarReading { angle: 90, strength: 100 }));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_queries_fail_after_shutdown() {
        let handle = spawn_sized();
        handle.shutdown().await;

        assert_eq!(handle.pointer_up(), Err(JoystickError::ActorClosed));
        assert_eq!(handle.is_active().await, Err(JoystickError::ActorClosed));
    }

    #[tokio::test]
    async fn test_shutdown_while_pressed_silences_listener() {
        let handle = spawn_sized();
        let (listener, seen) = recording_listener();
        handle.set_listener_with_interval(listener, 5).unwrap();

        handle.pointer_down(160.0, 100.0).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.shutdown().await;

        let count = seen.lock().len();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(seen.lock().len(), count);
    }

    #[tokio::test]
    async fn test_style_round_trip() {
        let handle = spawn_sized();
        let mut style = JoystickStyle::default();
        style.set_border_width(7);
        handle.set_style(style).unwrap();

        assert_eq!(handle.style().await.unwrap().border_width, 7);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_default_bind_uses_configured_interval() {
        let config = JoystickConfig {
            interval_ms: 10,
            ..JoystickConfig::default()
        };
        let handle = JoystickActor::spawn(&config, None);
        handle.resize(200, 200).unwrap();
        let (slow, _) = recording_listener();
        handle.set_listener_with_interval(slow, 1000).unwrap();
        let (listener, seen) = recording_listener();
        handle.set_listener(listener).unwrap();

        handle.pointer_down(130.0, 100.0).unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(seen.lock().len() >= 3, "expected 10 ms reports, got {:?}", seen.lock());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_interval_rejected_before_sending() {
        let handle = spawn_sized();
        let (listener, _) = recording_listener();

        assert_eq!(handle.set_listener_with_interval(listener, 0), Err(JoystickError::InvalidInterval(0)));
        handle.shutdown().await;
    }
}
