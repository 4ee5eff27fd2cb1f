//! Conversions between shared DTOs and domain models.

pub mod assignment_mapper;
pub mod chore_mapper;
pub mod kid_mapper;
pub mod task_mapper;

pub use assignment_mapper::AssignmentMapper;
pub use chore_mapper::ChoreMapper;
pub use kid_mapper::KidMapper;
pub use task_mapper::TaskMapper;
