//! Security-hardening core for an Expat-style XML parser: per-instance
//! hash-seed entropy, bounded parse-context retention, and the configuration
//! surface gating both. The tokenizer and grammar machinery consume these
//! pieces; they are not implemented here.

#![warn(unused_imports)]
#![warn(unused_mut)]
#![warn(unused_variables)]

pub mod config;
pub mod context;
pub mod entropy;
pub mod hash;
pub mod parser;
