//! Assembles spectral time series from correlator files made of
//! interleaved VDIF headers and correlator blocks.
//!
//! ```no_run
//! use std::path::Path;
//! use vdif_spectra::{UnitLayout, get_spectra};
//!
//! let spectra = get_spectra(Path::new("scan.vdif"), UnitLayout::default())?;
//! println!("{} spectra of {} channels", spectra.len(), spectra.channels());
//! # Ok::<(), vdif_spectra::SpectraError>(())
//! ```

pub mod error;
pub mod layout;
pub mod reader;
pub mod spectra;

#[cfg(test)]
mod fixtures;

pub use error::SpectraError;
pub use layout::UnitLayout;
pub use reader::{Unit, UnitReader, correlator_spectrum};
pub use spectra::{Spectra, SpectraSummary, get_spectra, read_spectra};
