//! IPv4 dotted-quad codec.
//!
//! The dataset stores addresses as plain integers (`a*256^3 + b*256^2 + c*256 + d`);
//! these helpers convert between that form and the textual form users type.

/// Returns true iff `text` is exactly four dot-separated decimal octets in `0..=255`.
///
/// Leading zeros (`"01"`), signs, whitespace and empty octets are rejected.
pub fn validate(text: &str) -> bool {
    let mut count = 0;
    for octet in text.split('.') {
        count += 1;
        if count > 4 || parse_octet(octet).is_none() {
            return false;
        }
    }
    count == 4
}

/// Converts a validated dotted quad into its numeric form.
///
/// Callers must check [`validate`] first; tokens that do not parse count as zero.
pub fn to_numeric(text: &str) -> u32 {
    text.split('.')
        .take(4)
        .fold(0u32, |acc, octet| {
            (acc << 8) | u32::from(octet.parse::<u8>().unwrap_or(0))
        })
}

/// Converts a numeric address back into dotted-quad form.
pub fn to_dotted(value: u32) -> String {
    let octet1 = value / (1 << 24);
    let octet2 = (value % (1 << 24)) / (1 << 16);
    let octet3 = (value % (1 << 16)) / (1 << 8);
    let octet4 = value % (1 << 8);
    format!("{octet1}.{octet2}.{octet3}.{octet4}")
}

/// Validates and converts in one step.
pub fn parse(text: &str) -> Option<u32> {
    validate(text).then(|| to_numeric(text))
}

fn parse_octet(octet: &str) -> Option<u8> {
    if octet.is_empty()
        || octet.len() > 3
        || !octet.bytes().all(|b| b.is_ascii_digit())
        || (octet.len() > 1 && octet.starts_with('0'))
    {
        return None;
    }
    octet.parse().ok()
}
