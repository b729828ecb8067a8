pub mod subtask;
pub mod tag;
pub mod task;
pub mod user;

pub use subtask::{Subtask, SubtaskInput, SubtaskSummary, SubtaskUpdateInput, SubtaskWithTask};
pub use tag::{Tag, TagInput, TagSummary, TagUpdateInput, TagWithTasks};
pub use task::{Task, TaskInput, TaskQuery, TaskRef, TaskStatus, TaskUpdateInput, TaskWithRelations};
pub use user::{RegisterRequest, User};
