//! spacetraveling blog library.
//!
//! A blog front end over a headless content API: a paginated post listing,
//! post detail pages with reading-time estimates, static site generation and
//! a server that regenerates stale pages on demand.

#![allow(clippy::needless_raw_string_hashes)]

pub mod components;
pub mod config;
pub mod constants;
pub mod content;
pub mod generate;
pub mod listing;
pub mod reading_time;
pub mod web;
