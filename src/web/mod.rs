//! Browser front-end for the river game.
//!
//! ## Usage
//!
//! Build with web feature:
//! ```sh
//! cargo build --features web
//! ```
//!
//! Run the server:
//! ```sh
//! ./target/debug/riverbear serve              # Default port 3000
//! ./target/debug/riverbear serve --port 8080  # Custom port
//! ```
//!
//! Then open http://localhost:3000 in your browser.

#[cfg(feature = "web")]
mod backend;

#[cfg(feature = "web")]
mod server;

#[cfg(feature = "web")]
pub use backend::BroadcastSink;

#[cfg(feature = "web")]
pub use server::{parse_command, serve, ClientCommand};
