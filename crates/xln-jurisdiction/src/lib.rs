//! Jurisdiction-side data for the inspection panels: on-chain insurance lines
//! and the fetch tracker that keeps a late response from overwriting the
//! panel after the user has moved on to another entity.

pub mod error;
pub mod fetcher;
pub mod file;
pub mod source;
pub mod tracker;

pub use error::FetchError;
pub use fetcher::InsuranceFetcher;
pub use file::{FileInsuranceSource, FileJurisdiction};
pub use source::{InsuranceLine, InsuranceSource, Jurisdiction, StaticInsurance};
pub use tracker::{FetchTicket, InsuranceTracker, InsuranceView};
