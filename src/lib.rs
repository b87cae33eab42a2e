//! ZEEFAX - a teletext-style news aggregator.
//!
//! Fetches RSS/Atom headlines for each configured topic category, caches
//! the merged results for 15 minutes, and composes 40x24 teletext pages
//! served as JSON row data for a renderer to draw.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod fetcher;
pub mod grid;
pub mod model;
pub mod nav;
pub mod pages;
pub mod routes;
