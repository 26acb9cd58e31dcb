//! Browser runtime support.

pub mod data;
