// Application layer: batch billing over a loaded dataset.
// The CLI only talks to `BillingService`; the domain stays free of I/O.

pub mod error;
pub mod output;
pub mod service;

pub use error::*;
pub use output::*;
pub use service::*;
