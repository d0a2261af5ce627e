//! Sensor module - feed interfaces, event generators and simulations

mod acoustic;
mod audio;
mod camera_trap;
mod environmental;
mod manager;
mod satellite;
mod simulator;
mod traits;

pub use acoustic::*;
pub use audio::{AudioCapture, CaptureSession, SimulatedCapture};
pub use camera_trap::*;
pub use environmental::*;
pub use manager::{GeneratorTask, SensorManager};
pub use satellite::*;
pub use simulator::SensorSimulator;
pub use traits::{EventGenerator, GeneratorHealth, RuleTable, SensorEventGenerator, SensorKind, SensorSource, TickReport};
