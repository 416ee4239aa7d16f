// src/application/ports/mod.rs
pub mod flows;
pub mod security;
pub mod time;
