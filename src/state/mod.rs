//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the scheduler's lifecycle (running, draining, cancelled, done)

mod crawl_state;

pub use crawl_state::CrawlState;
