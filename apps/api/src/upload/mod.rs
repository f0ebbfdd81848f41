// Upload handling: multipart parsing, extension allow-list, scratch staging.
// Everything is validated in memory before a single byte reaches disk.

pub mod artifact;
pub mod form;
pub mod scratch;
