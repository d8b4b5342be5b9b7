//! Nether and Overworld coordinate converter
//!
//! A small form that converts block positions between the two dimensions
//! (horizontal axes scale by 8, height is unchanged), with field validation
//! and a simulated processing delay.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod logging;
pub mod ui;
