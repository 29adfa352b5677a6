//! Region list and validation

/// Regions scanned when neither the CLI nor the config file names any
pub const DEFAULT_REGIONS: &[&str] = &[
    // North America
    "us-east-2",
    "us-east-1",
    "us-west-1",
    "us-west-2",
    // Africa
    "af-south-1",
    // Asia Pacific
    "ap-east-1",
    "ap-southeast-3",
    "ap-south-1",
    "ap-northeast-3",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    // Canada
    "ca-central-1",
    // Europe
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-south-1",
    "eu-west-3",
    "eu-north-1",
    // Middle East
    "me-south-1",
    // South America
    "sa-east-1",
];

/// List the built-in regions
pub fn list_regions() -> Vec<String> {
    DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
}

/// Validate a region name such as `us-east-1` or `us-gov-west-1`.
/// Lowercase letters, digits and hyphens; starts with a letter, ends with a digit.
pub fn validate_region(region: &str) -> bool {
    let mut chars = region.chars();

    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    if !region.ends_with(|c: char| c.is_ascii_digit()) || !region.contains('-') {
        return false;
    }

    region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
