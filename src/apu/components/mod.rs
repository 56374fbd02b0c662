//! Common APU components shared by the channels

pub mod envelope;
pub mod frame_counter;
pub mod length_counter;
pub mod linear_counter;
pub mod sweep;
pub mod timer;

pub use envelope::Envelope;
pub use frame_counter::{FrameCounter, FrameEvent, FrameMode};
pub use length_counter::LengthCounter;
pub use linear_counter::LinearCounter;
pub use sweep::Sweep;
pub use timer::Timer;
