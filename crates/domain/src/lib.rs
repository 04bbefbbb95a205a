#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod body;
mod error;
mod exercise;
mod formula;
mod measure;
mod progress;
mod service;
mod settings;
mod warmup;
mod workout_set;

pub use body::*;
pub use error::*;
pub use exercise::*;
pub use formula::*;
pub use measure::*;
pub use progress::*;
pub use service::*;
pub use settings::*;
pub use warmup::*;
pub use workout_set::*;
