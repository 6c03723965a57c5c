// Learning Plan Generator and the plan lifecycle around it:
// provider call, parse and validate, fallback, then one stored plan per user.
// Provider I/O goes through llm_client only.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod regeneration;
pub mod store;
