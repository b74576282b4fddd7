//! Response assembly from entries. No filesystem access, no caching.

use crate::models::{Entry, Response};

/// Builds the response for a single file.
///
/// A non-regular file carries no size and is reported with size 0.
pub fn file_response(entry: Entry) -> Response {
    Response::File {
        size: entry.size.unwrap_or(0),
        mtime: entry.mtime,
    }
}

/// Builds the response for a directory from its immediate children.
pub fn dir_response(children: Vec<Entry>) -> Response {
    Response::Dir { contents: children }
}
