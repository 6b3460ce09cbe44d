//! Autonomous mode controller
//!
//! Binds the drawing surface, the route compiler, the command scheduler and
//! the realtime store together, and turns every outcome into application
//! events and user notices on the event bus.

use anyhow::Context;
use async_trait::async_trait;
use cleanbot_communication::{
    ActuatorGateway, CancellationToken, CommandScheduler, ExecutionListener,
    ExecutionListenerHandle, ExecutionOutcome, ExecutionPlan, ExecutionState, RealtimeStore,
    RouteRepository, StoreActuatorGateway, TriggerPaths,
};
use cleanbot_core::constants::EXPORT_FILE_NAME;
use cleanbot_core::event_bus::{
    AppEvent, DrawingEvent, EventBus, ExecutionEvent, NoticeEvent, RouteEvent, SettingsEvent,
};
use cleanbot_core::{
    thread_safe_rw, CommandCode, Error, ExecutionError, Point, Result, RobotSpeed, RouteError,
    Segment, ThreadSafeRw,
};
use cleanbot_designer::{
    write_export, Canvas, Instruction, RouteCompiler, RouteRecord, RouteStats, StrokePreview,
};
use cleanbot_settings::{Config, SettingsResult, TimingForm};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Forwards scheduler callbacks to the event bus.
struct ExecutionEventBridge {
    bus: Arc<EventBus>,
}

#[async_trait]
impl ExecutionListener for ExecutionEventBridge {
    async fn on_started(&self, instructions: usize) {
        self.bus
            .publish(AppEvent::Execution(ExecutionEvent::Started { instructions }));
    }

    async fn on_progress(&self, percent: u8) {
        self.bus
            .publish(AppEvent::Execution(ExecutionEvent::Progress { percent }));
    }

    async fn on_position(&self, position: Point, heading_degrees: u16) {
        self.bus.publish(AppEvent::Execution(ExecutionEvent::Position {
            position,
            heading: heading_degrees,
        }));
    }

    async fn on_finished(&self, outcome: ExecutionOutcome) {
        self.bus.publish(AppEvent::Execution(ExecutionEvent::Finished {
            cancelled: outcome == ExecutionOutcome::Cancelled,
        }));
    }

    async fn on_error(&self, error: &ExecutionError) {
        self.bus.publish(AppEvent::Execution(ExecutionEvent::Failed {
            reason: error.to_string(),
        }));
    }
}

/// Facade behind the autonomous mode screen.
///
/// Owns the canvas and the user configuration; the scheduler and store are
/// shared with whoever else talks to the robot.
pub struct AutonomousController {
    canvas: ThreadSafeRw<Canvas>,
    config: ThreadSafeRw<Config>,
    scheduler: Arc<CommandScheduler>,
    routes: RouteRepository,
    bus: Arc<EventBus>,
    bridge: ExecutionListenerHandle,
}

impl AutonomousController {
    /// Controller that drives the robot through the trigger keys of `store`.
    pub fn new(store: Arc<dyn RealtimeStore>, config: Config, bus: Arc<EventBus>) -> Self {
        let gateway = Arc::new(StoreActuatorGateway::new(
            store.clone(),
            TriggerPaths::under(&config.store.root),
        ));
        Self::with_gateway(gateway, store, config, bus)
    }

    /// Controller with a custom actuator gateway; routes still live in `store`.
    pub fn with_gateway(
        gateway: Arc<dyn ActuatorGateway>,
        store: Arc<dyn RealtimeStore>,
        config: Config,
        bus: Arc<EventBus>,
    ) -> Self {
        let routes = RouteRepository::new(
            store,
            &config.store.root,
            &config.store.routes_namespace,
        );
        let scheduler = Arc::new(CommandScheduler::new(gateway));
        let bridge = scheduler.register_listener(Arc::new(ExecutionEventBridge { bus: bus.clone() }));

        Self {
            canvas: thread_safe_rw(Canvas::new()),
            config: thread_safe_rw(config),
            scheduler,
            routes,
            bus,
            bridge,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn scheduler(&self) -> &Arc<CommandScheduler> {
        &self.scheduler
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    fn notify(&self, notice: NoticeEvent) {
        self.bus.publish(AppEvent::Notice(notice));
    }

    // ---- robot link ----

    /// Stops the robot when the screen attaches to it.
    pub async fn attach(&self) -> Result<()> {
        self.scheduler.send_command(CommandCode::Stop).await?;
        tracing::info!("Attached to robot");
        Ok(())
    }

    /// Cancels any run and leaves the robot stopped.
    pub async fn shutdown(&self) -> Result<()> {
        if self.scheduler.is_running() {
            self.scheduler.cancel().await?;
        } else {
            self.scheduler.send_command(CommandCode::Stop).await?;
        }
        self.scheduler.unregister_listener(&self.bridge);
        tracing::info!("Detached from robot");
        Ok(())
    }

    /// Pushes `speed` to the robot outside of a run.
    ///
    /// The `"speed"` marker command makes the firmware re-read the value.
    pub async fn apply_speed(&self, speed: RobotSpeed) -> Result<()> {
        self.config.write().robot.speed = speed;
        self.bus.publish(AppEvent::Settings(SettingsEvent::SpeedChanged {
            speed: speed.value(),
        }));
        self.publish_stats();

        let sent = match self.scheduler.send_speed(speed.value()).await {
            Ok(()) => self.scheduler.send_command(CommandCode::SpeedMarker).await,
            Err(e) => Err(e),
        };
        match sent {
            Ok(()) => {
                self.notify(NoticeEvent::success(format!(
                    "Speed updated to: {}",
                    speed.value()
                )));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Speed update failed: {}", e);
                self.notify(NoticeEvent::error(format!("Failed to update speed: {}", e)));
                Err(e.into())
            }
        }
    }

    // ---- drawing surface ----

    pub fn segments(&self) -> Vec<Segment> {
        self.canvas.read().segments().to_vec()
    }

    pub fn waypoints(&self) -> Vec<Point> {
        self.canvas.read().waypoints().to_vec()
    }

    pub fn is_drawing(&self) -> bool {
        self.canvas.read().is_drawing()
    }

    pub fn toggle_drawing_mode(&self) -> bool {
        let drawing = self.canvas.write().toggle_drawing_mode();
        self.bus
            .publish(AppEvent::Drawing(DrawingEvent::ModeChanged { drawing }));
        drawing
    }

    pub fn begin_stroke(&self, point: Point) -> bool {
        self.canvas.write().begin_stroke(point)
    }

    pub fn extend_stroke(&self, point: Point) -> Option<Point> {
        self.canvas.write().extend_stroke(point)
    }

    pub fn commit_point(&self, point: Point) -> Option<Segment> {
        let segment = self.canvas.write().commit_point(point)?;
        self.segments_changed();
        Some(segment)
    }

    /// Starts a stroke, or commits the snapped point if one is active.
    pub fn press(&self, point: Point) -> Option<Segment> {
        let segment = self.canvas.write().press(point)?;
        self.segments_changed();
        Some(segment)
    }

    pub fn finish_stroke(&self) {
        self.canvas.write().finish_stroke();
        self.bus
            .publish(AppEvent::Drawing(DrawingEvent::ModeChanged { drawing: false }));
    }

    pub fn preview(&self) -> Option<StrokePreview> {
        self.canvas.read().preview()
    }

    pub fn toggle_select(&self, index: usize) -> Option<usize> {
        let selected = self.canvas.write().toggle_select(index);
        self.bus
            .publish(AppEvent::Drawing(DrawingEvent::SelectionChanged { index: selected }));
        selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.canvas.read().selected_index()
    }

    pub fn delete_selected(&self) -> Option<Segment> {
        let removed = self.canvas.write().delete_selected()?;
        self.segments_changed();
        Some(removed)
    }

    pub fn clear(&self) {
        self.canvas.write().clear();
        self.segments_changed();
    }

    fn segments_changed(&self) {
        let count = self.canvas.read().segment_count();
        self.bus
            .publish(AppEvent::Drawing(DrawingEvent::SegmentsChanged { count }));
        self.publish_stats();
    }

    /// Resting spot of the robot marker: the centre of the canvas.
    pub fn idle_position(&self, width: f64, height: f64) -> Point {
        let centre = Point::new(width / 2.0, height / 2.0);
        self.scheduler.set_idle_position(centre);
        centre
    }

    // ---- compilation ----

    fn compiler(&self) -> RouteCompiler {
        let config = self.config.read();
        RouteCompiler::new(
            config.timing,
            config.robot.speed,
            config.canvas.pixels_per_cm,
        )
    }

    /// Instructions for the route currently on the canvas.
    pub fn compile(&self) -> Vec<Instruction> {
        let segments = self.segments();
        self.compiler().compile(&segments)
    }

    pub fn stats(&self) -> RouteStats {
        let segments = self.segments();
        let config = self.config.read();
        RouteStats::compute(
            &segments,
            &config.timing,
            config.robot.speed,
            config.canvas.pixels_per_cm,
        )
    }

    fn publish_stats(&self) {
        let stats = self.stats();
        self.bus.publish(AppEvent::Route(RouteEvent::StatsUpdated {
            total_distance_cm: stats.total_distance_cm,
            estimated_seconds: stats.estimated_seconds,
        }));
    }

    // ---- execution ----

    pub fn execution_state(&self) -> ExecutionState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Compiles the canvas and runs it to completion, cancellation or failure.
    ///
    /// Timing and speed are copied here; later edits do not reach this run.
    pub async fn start(&self) -> Result<ExecutionOutcome> {
        let (segments, origin) = {
            let canvas = self.canvas.read();
            (canvas.segments().to_vec(), canvas.waypoints().first().copied())
        };
        if segments.is_empty() {
            tracing::warn!("Start requested with an empty canvas");
            self.notify(NoticeEvent::error("Please draw a route first."));
            return Err(RouteError::Empty.into());
        }

        let (timing, speed) = {
            let config = self.config.read();
            (config.timing, config.robot.speed)
        };
        let instructions = self.compiler().compile(&segments);
        let mut plan = ExecutionPlan::new(instructions, timing, speed);
        if let Some(origin) = origin {
            plan = plan.with_origin(origin);
        }

        match self.scheduler.run(plan, CancellationToken::new()).await {
            Ok(ExecutionOutcome::Completed) => {
                self.notify(NoticeEvent::success("Route completed successfully!"));
                Ok(ExecutionOutcome::Completed)
            }
            Ok(ExecutionOutcome::Cancelled) => Ok(ExecutionOutcome::Cancelled),
            Err(ExecutionError::AlreadyRunning) => {
                self.notify(NoticeEvent::info("A route is already running"));
                Err(ExecutionError::AlreadyRunning.into())
            }
            Err(e) => {
                let message = match &e {
                    ExecutionError::Gateway(_) => e.to_string(),
                    other => format!("Error executing route: {}", other),
                };
                self.notify(NoticeEvent::error(message));
                Err(e.into())
            }
        }
    }

    /// Stops the robot immediately and ends the current run.
    pub async fn cancel(&self) -> Result<()> {
        let stopped = self.scheduler.cancel().await;
        self.notify(NoticeEvent::info("Bot movement stopped"));
        stopped.map_err(Error::from)
    }

    // ---- saved routes ----

    pub async fn save_route(&self, name: &str) -> Result<()> {
        let (segments, waypoints) = {
            let canvas = self.canvas.read();
            (canvas.segments().to_vec(), canvas.waypoints().to_vec())
        };
        let count = segments.len();
        let record = RouteRecord::new(segments, waypoints, self.stats());

        match self.routes.save(name, &record).await {
            Ok(()) => {
                self.bus.publish(AppEvent::Route(RouteEvent::Saved {
                    name: name.to_string(),
                    segments: count,
                }));
                self.notify(NoticeEvent::success(format!("Route saved as \"{}\"", name)));
                Ok(())
            }
            Err(e) => {
                let message = if e.is_empty_route() {
                    "Cannot save empty route".to_string()
                } else {
                    format!("Failed to save route: {}", e)
                };
                tracing::warn!("Save of '{}' rejected: {}", name, e);
                self.notify(NoticeEvent::error(message));
                Err(e)
            }
        }
    }

    /// Replaces the canvas with the named route. Selection is cleared.
    pub async fn load_route(&self, name: &str) -> Result<()> {
        let record = match self.routes.load(name).await {
            Ok(record) => record,
            Err(e) => {
                let message = if e.is_not_found() {
                    e.to_string()
                } else {
                    format!("Failed to load route: {}", e)
                };
                tracing::warn!("Load of '{}' failed: {}", name, e);
                self.notify(NoticeEvent::error(message));
                return Err(e);
            }
        };

        let count = record.segments.len();
        self.canvas.write().load(record.segments, record.waypoints);
        self.bus.publish(AppEvent::Route(RouteEvent::Loaded {
            name: name.to_string(),
            segments: count,
        }));
        self.segments_changed();
        self.notify(NoticeEvent::success(format!(
            "Route \"{}\" loaded successfully",
            name
        )));
        Ok(())
    }

    pub async fn list_routes(&self) -> Result<Vec<String>> {
        self.routes.list().await
    }

    /// Writes the compiled route to `dir/route_esp32.json` for offline playback.
    pub fn export_route(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let instructions = self.compile();
        if instructions.is_empty() {
            self.notify(NoticeEvent::error("Please draw a route first."));
            return Err(Error::from(RouteError::Empty)).context("Nothing to export");
        }

        let path = dir.join(EXPORT_FILE_NAME);
        write_export(&path, &instructions)?;
        self.bus.publish(AppEvent::Route(RouteEvent::Exported {
            path: path.clone(),
            instructions: instructions.len(),
        }));
        self.notify(NoticeEvent::success("Route downloaded for ESP32"));
        Ok(path)
    }

    // ---- settings ----

    /// Form pre-filled with the current timing constants.
    pub fn timing_form(&self) -> TimingForm {
        TimingForm::from_config(&self.config.read().timing)
    }

    /// Validates and applies the form. Runs already in flight keep their timing.
    pub fn apply_timing(&self, form: &TimingForm) -> SettingsResult<()> {
        let applied = form.apply(&mut self.config.write().timing);
        if let Err(e) = applied {
            self.notify(NoticeEvent::error(e.to_string()));
            return Err(e);
        }
        self.bus.publish(AppEvent::Settings(SettingsEvent::TimingChanged));
        self.publish_stats();
        Ok(())
    }

    /// Restores the default timing constants and returns the refreshed form.
    pub fn reset_timing(&self) -> TimingForm {
        let mut form = self.timing_form();
        form.reset_to_defaults(&mut self.config.write().timing);
        self.bus.publish(AppEvent::Settings(SettingsEvent::TimingChanged));
        self.publish_stats();
        form
    }

    /// Replaces timing, speed and canvas scale from a config file.
    ///
    /// Store paths are fixed for the life of the controller.
    pub fn load_settings(&self, path: &Path) -> SettingsResult<()> {
        let loaded = Config::load_from_file(path)?;
        {
            let mut config = self.config.write();
            config.timing = loaded.timing;
            config.robot = loaded.robot;
            config.canvas = loaded.canvas;
        }
        self.bus.publish(AppEvent::Settings(SettingsEvent::Loaded {
            path: path.to_path_buf(),
        }));
        self.publish_stats();
        Ok(())
    }

    pub fn save_settings(&self, path: &Path) -> SettingsResult<()> {
        self.config().save_to_file(path)?;
        self.bus.publish(AppEvent::Settings(SettingsEvent::Saved {
            path: path.to_path_buf(),
        }));
        Ok(())
    }
}
