pub mod bindings;
pub mod debug_overlay;
pub mod help_overlay;
pub mod picker;

pub use bindings::{parse_key, Action};
pub use debug_overlay::draw_debug;
pub use help_overlay::HelpOverlay;
pub use picker::{draw_device_search, draw_scene_picker, DeviceSearch, ScenePicker};
