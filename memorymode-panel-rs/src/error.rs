//! Error types for the panel state crate.

use core::fmt;

/// Errors raised by [`PatchCatalog`](crate::catalog::PatchCatalog) access.
///
/// Every variant except [`NameTooLong`](CatalogError::NameTooLong) points
/// at a broken catalog invariant or a caller bug; none are recovered
/// silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogError {
    /// The catalog holds no records.
    EmptyCatalog,
    /// Position or program number lies outside the catalog.
    OutOfRange,
    /// No record carries the requested program number.
    UnknownPatch,
    /// Deleting would take the catalog below [`DELETE_FLOOR`](crate::DELETE_FLOOR).
    DeleteFloor,
    /// The catalog already holds [`MAX_PATCHES`](crate::MAX_PATCHES) records.
    CatalogFull,
    /// Patch name longer than [`PATCH_NAME_MAX_LEN`](crate::PATCH_NAME_MAX_LEN) bytes.
    NameTooLong,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogError::EmptyCatalog => write!(f, "patch catalog is empty"),
            CatalogError::OutOfRange => write!(f, "catalog position out of range"),
            CatalogError::UnknownPatch => write!(f, "no patch with that program number"),
            CatalogError::DeleteFloor => write!(f, "refusing to delete the last remaining patch"),
            CatalogError::CatalogFull => write!(f, "patch catalog is full"),
            CatalogError::NameTooLong => write!(f, "patch name too long"),
        }
    }
}

/// Errors raised by the panel context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// A raw page byte outside the [`Page`](crate::page::Page) enumeration.
    UnknownPage(u8),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PanelError::UnknownPage(b) => write!(f, "unknown page value {}", b),
        }
    }
}
