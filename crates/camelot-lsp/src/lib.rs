//! camelot Language Server Protocol implementation.
//!
//! This crate provides the LSP server that surfaces camelot findings as
//! diagnostics, wrapping `camelot-lsp-core` with the tower-lsp framework.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         camelot-lsp                            │
//! │   tower-lsp wrapper, JSON-RPC/stdio, `camelot-lsp` binary      │
//! │                                                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────┐  ┌──────────┐  │
//! │  │  server.rs  │  │ convert.rs  │  │ tasks.rs │  │document.rs│ │
//! │  │LanguageServer│ │Core ↔ LSP  │  │ in-flight│  │open docs │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────┘  └──────────┘  │
//! │         │                │                                     │
//! │         └────────────────┴──────────────────┐                  │
//! │                                             │                  │
//! │  ┌──────────────────────────────────────────▼───────────────┐  │
//! │  │                    camelot-lsp-core                       │  │
//! │  │      (invoke camelot, parse, normalize, filter)           │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! camelot-lsp --analyzer /path/to/camelot lsp
//! ```
//!
//! Or programmatically:
//!
//! ```rust,ignore
//! camelot_lsp::run_server(ServerOptions::default()).await;
//! ```

pub mod capabilities;
pub mod convert;
pub mod document;
pub mod server;
pub mod tasks;

pub use server::{ServerOptions, run_server};
