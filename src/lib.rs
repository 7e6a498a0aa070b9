// Library Lending System - Core Library
// Exposes all modules for use in the CLI and tests

pub mod command;
pub mod config;
pub mod engine;      // Command replay: borrow / return / pay / display
pub mod entities;    // Items and members
pub mod error;
pub mod parser;      // Record decoding for the three input files
pub mod report;
pub mod rules;       // Per-category eligibility policy table
pub mod sink;
pub mod store;
pub mod system;      // One full run: load, replay, write

// Re-export commonly used types
pub use command::Command;
pub use config::LendingConfig;
pub use engine::{LendingEngine, Outcome, Rejection, ReplaySummary};
pub use entities::{
    CategoryTag, Item, ItemId, ItemKind,
    Member, MemberCategory, MemberId, MemberProfile,
};
pub use error::{LendingError, ParseError, StoreError};
pub use parser::{
    load_records, CommandParser, ItemParser, MemberParser, RecordParser, SourceKind,
};
pub use rules::{policy_for, EligibilityPolicy};
pub use sink::{FileSink, MemorySink, OutputSink};
pub use store::RecordStore;
pub use system::{exit_code, run, RunPaths};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
