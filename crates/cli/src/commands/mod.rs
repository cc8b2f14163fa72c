pub mod interactive;
pub mod plan;
pub mod profile;
