//! # IO Layer
//!
//! Interfaces that expose the domain to the outside world. The board only
//! speaks HTTP/JSON.

pub mod rest;
