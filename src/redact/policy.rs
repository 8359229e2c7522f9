//! Page selection policies.
//!
//! A policy maps the ordered directory list to the set of page indices to
//! redact. The engine treats the result as opaque and iterates it in
//! ascending order.

use std::collections::BTreeSet;

use crate::format::tiff::Ifd;

/// Chooses which pages get redacted.
pub trait PageSelector {
    fn select(&self, directories: &[Ifd]) -> BTreeSet<usize>;
}

impl<F> PageSelector for F
where
    F: Fn(&[Ifd]) -> BTreeSet<usize>,
{
    fn select(&self, directories: &[Ifd]) -> BTreeSet<usize> {
        self(directories)
    }
}

/// The macro photograph of scanners such as Hamamatsu NDPI: the
/// second-to-last page, when there are more than two.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroPage;

impl PageSelector for MacroPage {
    fn select(&self, directories: &[Ifd]) -> BTreeSet<usize> {
        let count = directories.len();
        if count > 2 {
            BTreeSet::from([count - 2])
        } else {
            BTreeSet::new()
        }
    }
}

/// A fixed set of page indices.
#[derive(Debug, Clone, Default)]
pub struct ExplicitPages(pub BTreeSet<usize>);

impl ExplicitPages {
    pub fn new(pages: impl IntoIterator<Item = usize>) -> Self {
        Self(pages.into_iter().collect())
    }
}

impl PageSelector for ExplicitPages {
    fn select(&self, _directories: &[Ifd]) -> BTreeSet<usize> {
        self.0.clone()
    }
}
