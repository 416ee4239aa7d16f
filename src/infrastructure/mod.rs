pub mod clients;
pub mod security;
pub mod time;
