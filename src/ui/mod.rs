//! UI components for PoolWatch Desktop.
//!
//! This module contains reusable UI components and windows.

pub mod feed_panel;
pub mod status_card;

pub use feed_panel::FeedPanel;
pub use status_card::StatusCard;
