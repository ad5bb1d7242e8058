//! nastenka-core – domain logic for the message board.
//!
//! - [`store`]: the append-only message log ([`MessageStore`]) and its SQLite
//!   implementation.
//! - [`render`]: lays out records onto a fixed-width canvas and encodes PNG.
//! - [`board`]: submission validation and the [`MessageBoard`] service that
//!   ties a store to a renderer.

pub mod board;
pub mod error;
pub mod record;
pub mod render;
pub mod store;

pub use board::{MessageBoard, SubmitMessage};
pub use error::{BoardError, RenderError};
pub use record::MessageRecord;
pub use render::{BoardRenderer, FontSet, RenderOptions};
pub use store::sqlite::SqliteStore;
pub use store::MessageStore;
