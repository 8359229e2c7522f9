//! Page redaction.
//!
//! - [`PageSelector`] decides which pages are redacted
//! - [`OutputPlan`] decides where the redacted bytes go
//! - [`Redactor`] overwrites each selected page's strip with a placeholder
//! - [`SlideSummary`] lists pages without modifying anything

mod engine;
mod output;
mod policy;
mod summary;

pub use engine::{redact_macro, RedactedPage, RedactionReport, Redactor, NO_COMPRESSION};
pub use output::{OutputPlan, StorePair};
pub use policy::{ExplicitPages, MacroPage, PageSelector};
pub use summary::{PageSummary, SlideSummary};
