pub mod block;
pub mod macros;
pub mod palette;
pub mod sample;
pub mod summary;

pub use block::*;
pub use palette::*;
pub use sample::*;
pub use summary::*;
