pub mod forms;
pub mod notification;
