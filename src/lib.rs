//! voice-notes - record, browse and play back short voice notes
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording metadata, the collection, capture and playback
//!   state machines, formatters and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, file storage)
//! - **CLI**: Argument parsing, the interactive screen and app runners

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
