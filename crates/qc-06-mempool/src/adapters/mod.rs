//! # Adapters Module

pub mod bus;
