//! Domain model for canonical tasks and boards.
//!
//! The canonical model is the single representation every backend adapter
//! translates to and from. Relationships between tasks are stored as
//! identifier references only, so the model never contains cycles.

mod activity;
mod board;
mod context;
pub mod duration_secs;
mod error;
mod filter;
mod ids;
mod kind;
mod priority;
mod status;
mod task;
mod time_tracking;

pub use activity::{Attachment, Comment};
pub use board::{AutomationRule, Board, BoardColumn, BoardKind, Swimlane};
pub use context::ContextDefaults;
pub use error::ParseVocabularyError;
pub use filter::{DateRange, TaskFilter};
pub use ids::TaskId;
pub use kind::TaskKind;
pub use priority::Priority;
pub use status::{StatusCategory, TaskStatus};
pub use task::{Task, TaskRelations};
pub use time_tracking::TimeTracking;
