mod billing;
mod car;
mod commission;
mod ledger;
mod money;
mod options;
mod pricing;
mod rental;

pub use billing::*;
pub use car::*;
pub use commission::*;
pub use ledger::*;
pub use money::{format_cents, parse_cents, Cents, ParseCentsError};
pub use options::*;
pub use pricing::*;
pub use rental::*;
