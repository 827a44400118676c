//! IpToCountry dataset decoding.
//!
//! Turns a decompressed snapshot into [`IpRangeRecord`](crate::storage::models::IpRangeRecord)s
//! ready for `DatasetStore::replace_table`.

mod parse;

pub use parse::parse_dataset;
