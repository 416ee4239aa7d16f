// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod security;
pub mod time;

pub use security::{BrokenHasher, CountingHasher, PlainHasher, SlowHasher};
pub use time::{FixedClock, fixed_now};
