pub mod alert;
pub mod check;
pub mod entity;
pub mod error;
pub mod expiry;
pub mod metrics;
pub mod probe;
pub mod status;
pub mod store;

pub use check::{CheckError, CheckOptions, CheckReport, Checker};
pub use error::{DomwatchError, Result};
pub use probe::{HttpProber, ProbeConfig, Prober};
pub use status::DomainStatus;
pub use store::{DbDomainStore, DomainStore};
