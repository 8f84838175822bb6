pub mod exec;
pub mod helm;
pub mod repo;
