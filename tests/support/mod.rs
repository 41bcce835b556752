#![allow(dead_code)]

pub mod archive;
pub mod rating;
pub mod store;
