//! scanq - client for the PDF scanning service
//!
//! This library provides the core functionality of the scanq CLI tool:
//! submitting PDFs, tracking the scan task lifecycle through polling,
//! and retrieving scan reports once they are stored.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod poller;
pub mod render;
pub mod report;
pub mod store;
pub mod upload;
