pub mod reminder_scheduler;
pub mod task_runner;
