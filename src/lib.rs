//! Trust-list enumeration against an external OpenPGP engine.
//!
//! This crate reimplements the stateful "start query / fetch next"
//! trust-list protocol as an explicit state machine. The engine (GnuPG)
//! is treated as an opaque collaborator: it is asked to begin an
//! enumeration for a pattern and to hand back one trust record at a
//! time, and its colon-delimited output is parsed into Rust types.
//!
//! # Example
//!
//! ```no_run
//! use trustlist::{EngineConfig, GpgEngine, TrustQuery};
//!
//! #[tokio::main]
//! async fn main() -> trustlist::Result<()> {
//!     let engine = GpgEngine::open(EngineConfig::default()).await?;
//!
//!     let mut query = TrustQuery::new(engine);
//!     query.start("alice", 0).await?;
//!     while let Some(item) = query.next().await? {
//!         println!("{item}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Protocol
//!
//! A query moves `Idle -> Active -> Exhausted`. `next` before `start`
//! is a protocol violation; once the `None` sentinel has been returned
//! it is returned forever, and only a fresh `start` on the same handle
//! begins a new enumeration. Calls are synchronous request/response:
//! each one awaits the engine's reply, and nothing runs concurrently
//! inside the crate.

mod engine;
mod error;
mod parse;
mod query;
mod types;
mod validation;

pub use engine::{GpgEngine, TrustEngine};
pub use error::{Error, Result};
pub use query::TrustQuery;
pub use types::{EngineConfig, ItemKind, OwnerTrust, Protocol, TrustItem, Validity};
