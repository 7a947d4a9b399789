//! sussyos-lib: Core types and logic for SussyOS
//!
//! This crate provides the pieces the `sussy` shell dispatches to:
//! - `archive`: the zip-backed virtual file store ("memory")
//! - `script`: the sandboxed Lua engine and the program line editor
//! - `web`: search, page scraping and downloads
//! - `launch`: opening extracted files with the host's default program

pub mod archive;
pub mod consts;
pub mod launch;
pub mod platform;
pub mod script;
pub mod web;
