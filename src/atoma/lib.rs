//! # Atoma Architecture
//!
//! Atoma is a **UI-agnostic outlining library**. This is not a CLI
//! application that happens to have some library code — it's a library that
//! happens to have a CLI client, and the same core could drive a GUI or a
//! touch surface unchanged.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, interactive.rs)               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (selectors → node ids)                 │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic over the outline                     │
//! │  - Operates on Rust types, returns Rust types               │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract StateStore trait                                │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Outline
//!
//! The document is one flat ordered sequence of nodes; indentation levels
//! encode the tree positionally. [`outline`] owns that representation and
//! every pure operation over it — the interesting invariants live there.
//!
//! ## Input Handling
//!
//! [`nav`] is the interaction state machine: one tagged-union mode instead
//! of a pile of UI flags, canonical input events in, outline effects out.
//! [`gesture`] decodes raw touch samples into those same canonical events,
//! so keyboard-first and touch-first frontends share one model.
//!
//! ## Concurrency Model
//!
//! There is none, deliberately. Every operation is synchronous and runs to
//! completion on the calling event; the outline is replaced wholesale on
//! each mutation and mirrored to the store before the next event. A
//! concurrent host must route all mutations through one owner to keep that
//! guarantee.
//!
//! ## Testing Strategy
//!
//! 1. **Outline / nav / gesture / document**: thorough unit tests next to
//!    the code. This is where the lion's share of testing lives.
//! 2. **Commands** (`commands/*.rs`): behavior against `InMemoryStore`.
//! 3. **CLI**: integration tests driving the built binary in a sandbox
//!    (`tests/cli_integration.rs`).
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade — entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`outline`]: The outline model and its pure operations
//! - [`nav`]: The navigation state machine
//! - [`gesture`]: Touch gesture decoding into canonical input events
//! - [`document`]: Serialization: markdown/html/json renditions + import
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Node`, `Theme`)
//! - [`index`]: Display indexing and selectors
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod gesture;
pub mod index;
pub mod model;
pub mod nav;
pub mod outline;
pub mod store;
