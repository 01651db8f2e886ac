pub mod controller;
pub mod scheduler;

pub use controller::{ControllerError, GameController, PendingTask};
pub use scheduler::{ImmediateScheduler, PacedScheduler, Pause, RecordingScheduler, Scheduler};
