//! `bloodportal` - Record blood donors and their donations
//!
//! This library keeps a local view of a remote blood donation API in step
//! with the server: it lists donors and donations, submits the "add donor"
//! and "record donation" forms, deletes donors, and reloads the affected list
//! after every successful write.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod portal;
pub mod render;

pub use api::{DonorApi, HttpApi};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Donation, Donor, DonorRef, DonorSummary, NewDonation, NewDonor, StatusReply};
pub use portal::{DonationForm, DonorForm, DonorOption, FormState, Portal};
