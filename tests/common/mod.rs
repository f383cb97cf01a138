//! Shared fixtures for integration tests.

use std::io::Write;

use tempfile::NamedTempFile;

/// A document touching every entity.
pub const FULL_YAML: &str = r#"
asn: 65001
router-id: 192.0.2.1
prefixes:
  - 192.0.2.0/24
  - 2001:db8::/32
communities: ["65001:100"]
rtr-port: 3323
keep-filtered: true

peers:
  transit:
    asn: 174
    neighbors: [203.0.113.1, "2001:db8:ffff::1"]
    local-pref: 80
    remove-private-as: false
    pre-import: "bgp_community.add((65001, 666));"
  customer:
    asn: 64512
    neighbors: [198.51.100.2]
    prefixes: [198.51.100.0/24, "2001:db8:c0::/48"]

interfaces:
  lo:
    dummy: true
    addresses: [192.0.2.1/32]
  eth0:
    mtu: 9000

vrrp:
  - state: primary
    interface: eth0
    vrid: 1
    priority: 255
    vips: [192.0.2.254/24, "2001:db8::254/64"]
  - state: backup
    interface: eth0
    vrid: 2
    priority: 100
    vips: [198.51.100.254/24]

augments:
  accept4: [static4]
  statics:
    "10.0.0.0/8": 192.0.2.10
    "2001:db8:1::/48": "fe80::1"
"#;

/// Write `content` to a temporary file with the given extension.
#[allow(dead_code)]
pub fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
