//! NextGCore NGAP Protocol Library
//!
//! This crate builds NGAP (NG Application Protocol) messages for the gNB side
//! of the N2 interface, as defined in 3GPP TS 38.413.
//!
//! # Architecture
//!
//! The library is layered on top of `ogs-per` which provides the ASN.1 PER
//! ALIGNED encoders. This crate adds:
//!
//! - **Strongly-typed NGAP types** (`types`) with their constraints
//! - **IE helpers** (`ie`) for encoding individual Information Elements
//! - **Builder functions** (`builder`) to construct APER-encoded NGAP PDUs
//! - **gNB configuration** (`config`) loaded from YAML
//!
//! # Example
//!
//! ```no_run
//! use ogs_ngap::{builder, GnbConfig};
//!
//! let config = GnbConfig::from_file("gnb.yaml").unwrap();
//! let request = config.to_ng_setup_request().unwrap();
//! let bytes = builder::build_ng_setup_request(&request).unwrap();
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod ie;
pub mod types;

// Re-export key types for convenience
pub use builder::build_ng_setup_request;
pub use config::GnbConfig;
pub use error::{NgapError, NgapResult};
pub use types::*;
