pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{Credential, User};
