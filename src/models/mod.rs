pub mod task;
pub mod user;

pub use task::{
    AddAssigneeRequest, Assignee, ChangeStatusRequest, CreateTaskRequest, RemoveAssigneeRequest,
    Task, TaskStatus,
};
pub use user::User;
