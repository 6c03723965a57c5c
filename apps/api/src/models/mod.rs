pub mod course;
pub mod learning_plan;
pub mod user;
