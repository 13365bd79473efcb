//! Request types and extraction fields used when none are configured

/// Request types an incoming email is classified into
pub const DEFAULT_REQUEST_TYPES: [&str; 7] = [
    "Adjustment",
    "Fee Payment",
    "AU Transfer",
    "Money Movement-Outbound",
    "Commitment Change",
    "Money Movement-Inbound",
    "Closing Notice",
];

/// Fields pulled out of an email once its request type is known
pub const DEFAULT_EXTRACT_FIELDS: [&str; 3] = ["Deal Name", "Amount", "Expiration Date"];

/// Owned copy of [`DEFAULT_REQUEST_TYPES`]
pub fn default_request_types() -> Vec<String> {
    DEFAULT_REQUEST_TYPES.iter().map(|s| s.to_string()).collect()
}

/// Owned copy of [`DEFAULT_EXTRACT_FIELDS`]
pub fn default_extract_fields() -> Vec<String> {
    DEFAULT_EXTRACT_FIELDS.iter().map(|s| s.to_string()).collect()
}

/// Find the request type a free-text classification names
///
/// Returns the configured type whose name appears earliest in the text
/// (case-insensitive). On a tie the longer name wins, so
/// "Money Movement-Inbound" is not shadowed by a shorter prefix.
pub fn find_request_type<'a>(classification: &str, request_types: &'a [String]) -> Option<&'a str> {
    let haystack = classification.to_lowercase();

    request_types
        .iter()
        .filter_map(|rt| {
            haystack
                .find(&rt.to_lowercase())
                .map(|pos| (pos, rt.as_str()))
        })
        .min_by(|(pos_a, a), (pos_b, b)| pos_a.cmp(pos_b).then(b.len().cmp(&a.len())))
        .map(|(_, rt)| rt)
}
