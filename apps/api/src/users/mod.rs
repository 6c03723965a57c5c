// Users: profile records that supply plan defaults, and resume upload.
// Authentication is out of scope; handlers take the user id directly.

pub mod handlers;
pub mod queries;
pub mod resume;
