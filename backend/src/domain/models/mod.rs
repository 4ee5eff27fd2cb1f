pub mod kid;
pub mod chore;
pub mod assignment;
pub mod display_task;
