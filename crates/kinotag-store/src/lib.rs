//! Kinotag store — durable keyed movie storage plus bitwise ranked search.

#![doc = include_str!("../README.md")]

pub mod store;

pub use store::{MovieStore, SearchHit};
