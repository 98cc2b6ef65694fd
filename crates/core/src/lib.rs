#![forbid(unsafe_code)]

mod model;
mod patch;
mod validate;

pub use model::{Priority, Status, Task};
pub use patch::Patch;
pub use validate::{PayloadMode, TaskPayload, validate};
