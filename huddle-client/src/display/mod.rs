mod display_surface;
mod logging_target;
mod render_target;

pub use display_surface::*;
pub use logging_target::*;
pub use render_target::*;
