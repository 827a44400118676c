//! Query result rendering.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Printed in place of an empty result set.
pub const NO_RESULT: &str = "No result found.";

/// Renders `rows` as a JSON array indented by four spaces, or [`NO_RESULT`]
/// when there is nothing to show.
pub fn render<T: Serialize>(rows: &[T]) -> String {
    if rows.is_empty() {
        return NO_RESULT.to_string();
    }

    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    match rows.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(e) => {
            log::error!("Failed to serialize query result: {e}");
            NO_RESULT.to_string()
        }
    }
}

/// Heading printed above the result of an IP lookup.
pub fn ip_heading(ip: &str) -> String {
    format!("Search result for {ip}:")
}

/// Heading printed above a top-N ranking.
pub fn top_heading(top_count: u32) -> String {
    format!("Search result for top {top_count}:")
}
