//! `guestlog` - a front-desk guest sign-in log kept on a single device
//!
//! Guests sign in with their name, agency and reason for visiting, and sign
//! out by typing their name again. The whole log is one JSON array under one
//! key in a local key-value store. Visits left open are closed automatically
//! after a fixed number of hours, evaluated whenever the log is touched.
//!
//! Every time-sensitive operation takes the current time as a parameter.
//!
//! ```
//! use chrono::Utc;
//! use guestlog::{AutoClosePolicy, MemoryStore, RecordStore, SignInRequest, VisitLedger, VisitReason};
//!
//! let ledger = VisitLedger::new(
//!     RecordStore::new(MemoryStore::new(), "guestLog"),
//!     AutoClosePolicy::default(),
//! );
//! let request = SignInRequest {
//!     first_name: "Jane".into(),
//!     last_name: "Doe".into(),
//!     agency: "Acme".into(),
//!     reason: VisitReason::Meeting,
//!     other_details: String::new(),
//! };
//! ledger.sign_in(&request, Utc::now())?;
//! let closed = ledger.sign_out("jane doe", Utc::now())?;
//! assert!(!closed.auto_signed_out);
//! # Ok::<(), guestlog::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod autoclose;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod store;

pub use autoclose::AutoClosePolicy;
pub use config::Config;
pub use error::{Error, Result};
pub use export::export_csv;
pub use ledger::{LedgerSummary, VisitLedger};
pub use logging::init_logging;
pub use normalize::{make_key, normalize};
pub use record::{SignInRequest, VisitReason, VisitRecord};
pub use store::{KeyValueStore, MemoryStore, RecordStore, SqliteStore};
