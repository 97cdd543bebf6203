//! Export packages: an archive sealed under a null-key inner layer, signed
//! together with its export time and owner, and encrypted to a
//! brainpoolP256r1 recipient.

pub mod builder;
pub mod config;
pub mod error;
pub mod open;
pub mod package;
pub mod record;
pub mod types;

pub use builder::{
    build_export_package, build_export_package_b64, build_export_package_with, ExportInputs,
};
pub use config::ExportOptions;
pub use error::ExportError;
pub use open::open_export_package;
pub use package::{decode_package, encode_package};
pub use record::{build_signed_message, decode_record, encode_record, ExportRecord};
pub use types::{
    ExportTimestamp, MIN_PACKAGE_LENGTH, PACKAGE_FORMAT_TAG, RECORD_FORMAT_VERSION,
};
