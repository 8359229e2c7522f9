//! Container formats understood by the redactor.
//!
//! Hamamatsu NDPI, Aperio SVS and generic slide TIFFs all share the classic
//! TIFF directory structure, so a single walker covers them. Vendor-specific
//! metadata is not interpreted.

pub mod tiff;
