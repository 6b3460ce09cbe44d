//! Fixed constants shared by the designer, the scheduler and the firmware.

/// Canvas resolution: this many pixels make up one centimetre on the floor.
pub const PIXELS_PER_CM: f64 = 5.0;

/// Edge length of one grid square, in centimetres.
pub const BOX_SIZE_CM: f64 = 10.0;

/// Maximum number of grid squares along the canvas height.
pub const GRID_SIZE: u32 = 20;

/// Pause after pushing the speed, before the first instruction is sent.
pub const SETTLING_DELAY_MS: u64 = 500;

/// Number of interpolation steps used to animate one forward move.
pub const MOVE_ANIMATION_STEPS: u32 = 20;

/// Denominator used to normalise speed for per-instruction durations.
pub const DURATION_SPEED_BASE: f64 = 255.0;

/// Denominator used to normalise speed for the aggregate route estimate.
pub const ESTIMATE_SPEED_BASE: f64 = 128.0;

/// Default realtime store root shared with the firmware.
pub const DEFAULT_STORE_ROOT: &str = "esp32_cleaning_bot";

/// Namespace under the store root where named routes are kept.
pub const DEFAULT_ROUTES_NAMESPACE: &str = "saved_routes";

/// Route name pre-filled in the save/load form.
pub const DEFAULT_ROUTE_NAME: &str = "default_route";

/// File name used when exporting instructions for offline playback.
pub const EXPORT_FILE_NAME: &str = "route_esp32.json";
