//! Single-file filtering shared by every symbol category.
//!
//! Every query re-filters from the package's authoritative collections;
//! there is no cached filtered view.

use std::path::Path;

use crate::docs::Location;

/// File that holds package-level documentation by convention.
pub const DOC_FILE: &str = "doc.go";

/// Anything declared at a source location.
pub trait Located {
    fn location(&self) -> Location;
}

/// `true` when no filter is set or the location's file is exactly `filter`.
pub fn matches(location: &Location, filter: Option<&str>) -> bool {
    filter.map_or(true, |f| location.filepath == f)
}

/// Keep the items declared in the filtered file, preserving order.
pub fn in_file<T, I>(items: I, filter: Option<&str>) -> Vec<T>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .filter(|item| matches(&item.location(), filter))
        .collect()
}

/// Package-level documentation and examples have no single location; they
/// pass only when no filter is set or the filter names the conventional
/// documentation file. Only the file name is compared, not the path.
pub fn is_doc_file(filter: Option<&str>) -> bool {
    filter.map_or(true, |f| {
        Path::new(f).file_name().and_then(|n| n.to_str()) == Some(DOC_FILE)
    })
}
