mod frame;
mod local_media;

pub use frame::*;
pub use local_media::*;
