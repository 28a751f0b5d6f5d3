//! Utilities for exercising the [`fedicom`] client against scripted
//! suppliers during tests.
//!
//! [`ReplyBuilder`] assembles supplier replies line by line and
//! [`spawn_supplier`] serves one of them from a loopback TCP listener.
//!
//! ```rust,no_run
//! use fedicom_testing::{ReplyBuilder, SupplierMode, spawn_supplier};
//!
//! # async fn example() -> std::io::Result<()> {
//! let reply = ReplyBuilder::new().ack().close().build();
//! let supplier = spawn_supplier(SupplierMode::Reply(reply)).await?;
//! let port = supplier.port();
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

pub mod replies;
pub mod supplier;

pub use replies::{ReplyBuilder, fixed_timestamp, test_credentials};
pub use supplier::{MockSupplier, SupplierMode, spawn_supplier, unused_listener};
