// Read-only course catalog: published courses and lessons, with listing
// filters, pagination and in-course lesson navigation.

pub mod handlers;
pub mod models;
pub mod queries;
