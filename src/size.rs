const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

/// Renders a byte count with a base-1024 unit, rounded to two decimals.
///
/// Counts below 1024 are printed as a bare integer (`"512B"`). Anything at or
/// above 1024 PB stays in PB.
pub fn humanize_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut tier = 0usize;
    for index in 0..UNITS.len() {
        tier = index;
        value /= 1024.0;
        if value < 1.0 {
            break;
        }
    }
    value *= 1024.0;

    if tier == 0 {
        return format!("{bytes}B");
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}{}", UNITS[tier])
}

/// Parses a decimal byte count as found in `submitted_bytes` and humanizes it.
pub fn humanize_str(bytes: &str) -> Option<String> {
    bytes.trim().parse::<u64>().ok().map(humanize_bytes)
}
