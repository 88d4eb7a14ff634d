//! Value parsers for CLI arguments that clap cannot check on its own.

use std::net::IpAddr;

/// Port in 1..=65535
pub fn validate_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) => Err("port must be between 1 and 65535".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!("'{}' is not a valid port number", value)),
    }
}

/// An IP address or a plausible hostname.
pub fn validate_host(value: &str) -> Result<String, String> {
    let host = value.trim();
    if host.is_empty() {
        return Err("host cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // Dotted digits that failed to parse are a mistyped IPv4 address
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("'{}' is not a valid IPv4 address", host));
    }
    if host.len() > 253 {
        return Err("host is too long (maximum 253 characters)".to_string());
    }
    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !host.split('.').all(valid_label) {
        return Err(format!("'{}' is not a valid hostname", host));
    }
    Ok(host.to_string())
}
