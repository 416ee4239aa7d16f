pub mod authorization;
pub mod client;
pub mod consent;
pub mod errors;
