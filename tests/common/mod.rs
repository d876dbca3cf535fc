//! Common test utilities for hpxtools.
//!
//! This module provides shared utilities for the end-to-end tests.

#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
