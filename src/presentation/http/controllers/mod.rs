// src/presentation/http/controllers/mod.rs
pub mod authorize;
pub mod clients;
pub mod consent;
