//! Address and prefix parsing with family classification.

use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::IpNetwork;

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Classify an address. IPv4-mapped IPv6 addresses count as IPv4.
    pub fn of(addr: IpAddr) -> Self {
        if as_ipv4(addr).is_some() {
            Family::V4
        } else {
            Family::V6
        }
    }
}

fn as_ipv4(addr: IpAddr) -> Option<Ipv4Addr> {
    match addr {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Parse an address block written as `address/length`.
///
/// A bare address without a length is rejected.
pub fn parse_cidr(s: &str) -> Option<IpNetwork> {
    let (addr, len) = s.split_once('/')?;
    if addr.is_empty() || len.is_empty() {
        return None;
    }
    s.parse().ok()
}

pub fn parse_ip(s: &str) -> Option<IpAddr> {
    s.parse().ok()
}

/// Family of an address block, if `s` is valid CIDR.
pub fn cidr_family(s: &str) -> Option<Family> {
    parse_cidr(s).map(|net| Family::of(net.ip()))
}

pub fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cidr_family() {
        assert_eq!(cidr_family("192.0.2.0/24"), Some(Family::V4));
        assert_eq!(cidr_family("2001:db8::/32"), Some(Family::V6));
        assert_eq!(cidr_family("::ffff:192.0.2.0/120"), Some(Family::V4));
        assert_eq!(cidr_family("0.0.0.0/0"), Some(Family::V4));
        assert_eq!(cidr_family("::/0"), Some(Family::V6));
    }

    #[test]
    fn test_parse_cidr_rejects_malformed() {
        assert!(parse_cidr("192.0.2.0").is_none());
        assert!(parse_cidr("192.0.2.0/").is_none());
        assert!(parse_cidr("192.0.2.0/33").is_none());
        assert!(parse_cidr("2001:db8::/129").is_none());
        assert!(parse_cidr("not-a-prefix/24").is_none());
    }

    #[test]
    fn test_parse_cidr_keeps_host_bits() {
        let net = parse_cidr("192.0.2.1/24").unwrap();
        assert_eq!(net.ip().to_string(), "192.0.2.1");
        assert_eq!(net.prefix(), 24);
    }

    #[test]
    fn test_parse_ip() {
        assert!(parse_ip("203.0.113.1").is_some());
        assert!(parse_ip("2001:db8::1").is_some());
        assert!(parse_ip("203.0.113.0/24").is_none());
        assert!(parse_ip("").is_none());
    }

    #[test]
    fn test_is_ipv4() {
        assert!(is_ipv4("10.0.0.1"));
        assert!(!is_ipv4("2001:db8::1"));
        assert!(!is_ipv4("10.0.0"));
    }
}
