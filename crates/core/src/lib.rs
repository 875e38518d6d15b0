//! Kiyone Core - Shared content types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! - `storefront` - Server-rendered brand, blog and catalog site
//! - `integration-tests` - End-to-end tests against a fake content store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Content
//! documents are owned by the headless content store; these types describe
//! the read-only copies the storefront works with.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document ids, slugs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
