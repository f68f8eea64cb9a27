//! Integration tests for the qlog crates.
//!
//! These tests run whole images through file I/O and the pixel converter
//! together, the way the `qlog` binary does.
