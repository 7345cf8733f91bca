#![doc = include_str!("../README.md")]

pub mod analyze;
pub mod describe;
pub mod detect;
pub mod domain;
pub mod models;
pub mod ocr;
pub mod read;
pub mod tag;
