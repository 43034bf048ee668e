//! # IO Layer
//!
//! Interfaces that expose the domain to the outside world. Today that is the
//! JSON REST API in [`rest`].

pub mod rest;
