//! # Dura
//!
//! Storage core of a versioned backup archive:
//! - An archive is a directory of bands, one per backup run
//! - Each band holds sequentially numbered, write-once blocks
//! - Bands are finished exactly once and are immutable afterwards
//! - Band numbers grow without bound and always sort numerically
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        dura CLI                              │
//! │          (init / describe / versions / dump / backup)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Archive                                │
//! │        (marker file, band allocation, band listing)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ BandWriter  │          │ BandReader  │
//!   │ (one/band)  │          │   (many)    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────────────────────────────┐
//!   │        Blocks (framed files)        │
//!   └─────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! One writer per band, any number of readers alongside it. Nothing on disk
//! locks a band: keeping to a single writer is the deployment's job, as is
//! serializing `create_band` across processes when the default scan-based
//! allocator is used.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod allocator;
pub mod archive;
pub mod band;
pub mod block;
pub mod dump;

mod io;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use allocator::{BandAllocator, ScanAllocator};
pub use archive::Archive;
pub use band::{BandInfo, BandNumber, BandProblem, BandReader, BandState, BandWriter};
pub use block::BlockNumber;
pub use config::{Config, SyncStrategy};
pub use dump::BlockDump;
pub use error::{DuraError, Result};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Dura
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
