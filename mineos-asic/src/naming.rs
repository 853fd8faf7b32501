/// Short display name of a rig, derived from its MAC address.
///
/// The last three octets in lower-case hex, e.g. `00:1A:2B:3C:4D:5E` →
/// `3c4d5e`. Accepts `:` or `-` separated and bare 12-digit forms so names
/// agree across vendors that print MACs differently. Returns `None` for
/// anything that is not a 48-bit MAC.
pub fn short_name(mac: &str) -> Option<String> {
    let digits: String = mac
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect();

    if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(digits[6..].to_ascii_lowercase())
}
