#![allow(dead_code)]

pub mod utils;
