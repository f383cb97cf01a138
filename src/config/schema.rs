//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files and
//! reject unknown keys at every level.
//!
//! Fields that carry a declared default are `Option<T>`: `None` means the key
//! was absent from the document, `Some(_)` means the operator set it, even to
//! `0` or `false`. The defaulting pass only ever touches `None`. After a
//! successful [`load`](crate::config::loader::load) every defaulted field is
//! `Some`.
//!
//! Derived fields (`prefixes4`, `vips6`, `statics4`, ...) are skipped on
//! deserialization and filled by the normalizer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Autonomous System Number.
    pub asn: Option<u32>,

    /// Prefixes originated by this router.
    pub prefixes: Vec<String>,

    /// RFC1997 communities.
    pub communities: Vec<String>,

    /// RFC8092 large communities.
    pub large_communities: Vec<String>,

    /// Router ID in dotted quad notation.
    pub router_id: String,

    pub irr_server: Option<String>,
    pub rtr_server: Option<String>,
    pub rtr_port: Option<u16>,
    pub keep_filtered: Option<bool>,
    pub merge_paths: Option<bool>,
    pub source4: String,
    pub source6: String,
    pub accept_default: Option<bool>,

    // Runtime
    pub bird_directory: Option<String>,
    pub bird_socket: Option<String>,
    pub keepalived_config: Option<String>,
    pub web_ui_file: Option<String>,
    /// Seconds.
    pub peeringdb_query_timeout: Option<u64>,
    /// Seconds.
    pub irr_query_timeout: Option<u64>,

    /// BGP peer groups keyed by name.
    pub peers: BTreeMap<String, Peer>,

    /// Interfaces keyed by name.
    pub interfaces: BTreeMap<String, Interface>,

    /// VRRP instances in document order.
    pub vrrp: Vec<VrrpInstance>,

    pub augments: Augments,

    #[serde(skip_deserializing)]
    pub prefixes4: Vec<String>,

    #[serde(skip_deserializing)]
    pub prefixes6: Vec<String>,
}

/// A BGP session group: one or more neighbors sharing the same policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Peer {
    pub description: String,
    pub disabled: bool,

    // Session attributes
    pub asn: Option<u32>,
    pub neighbors: Vec<String>,
    pub prepends: Option<u32>,
    pub local_pref: Option<u32>,
    pub multihop: Option<bool>,
    pub listen: String,
    pub local_port: Option<u16>,
    pub neighbor_port: Option<u16>,
    pub passive: Option<bool>,
    pub next_hop_self: Option<bool>,
    pub bfd: Option<bool>,
    pub communities: Vec<String>,
    pub large_communities: Vec<String>,
    pub password: String,
    pub rs_client: Option<bool>,
    pub rr_client: Option<bool>,
    pub remove_private_as: Option<bool>,
    pub mp_unicast_46: Option<bool>,

    // Filtering
    pub as_set: String,
    pub import_limit4: Option<u32>,
    pub import_limit6: Option<u32>,
    pub enforce_first_as: Option<bool>,
    pub enforce_peer_nexthop: Option<bool>,
    pub max_prefix_action: Option<String>,
    pub allow_blackhole_community: Option<bool>,
    pub filter_irr: Option<bool>,
    pub filter_rpki: Option<bool>,
    pub filter_max_prefix: Option<bool>,
    pub filter_bogons: Option<bool>,
    pub filter_tier1_asns: Option<bool>,
    pub auto_import_limits: Option<bool>,
    pub auto_as_set: Option<bool>,

    /// Allow-list of prefixes accepted from this peer.
    pub prefixes: Vec<String>,

    // Export
    pub announce_default: Option<bool>,
    pub announce_specifics: Option<bool>,

    // Opaque daemon fragments, passed through untouched.
    pub session_global: String,
    pub pre_import: String,
    pub pre_export: String,
    pub pre_import_final: String,
    pub pre_export_final: String,

    #[serde(skip_deserializing)]
    pub prefix_set4: Vec<String>,

    #[serde(skip_deserializing)]
    pub prefix_set6: Vec<String>,
}

/// Canonical VRRP state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VrrpState {
    Master,
    Backup,
}

impl VrrpState {
    /// Map an operator-facing token (`primary` / `backup`) to its state.
    /// Matching is case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "primary" => Some(Self::Master),
            "backup" => Some(Self::Backup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "MASTER",
            Self::Backup => "BACKUP",
        }
    }
}

impl std::fmt::Display for VrrpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A virtual router redundancy group.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct VrrpInstance {
    /// `primary` or `backup` on input, `MASTER` or `BACKUP` once loaded.
    pub state: String,

    pub interface: String,

    /// RFC3768 virtual router ID.
    pub vrid: Option<u8>,

    /// RFC3768 priority.
    pub priority: Option<u8>,

    /// Virtual addresses in CIDR notation.
    pub vips: Vec<String>,

    #[serde(skip_deserializing)]
    pub vips4: Vec<String>,

    #[serde(skip_deserializing)]
    pub vips6: Vec<String>,

    #[serde(skip_deserializing)]
    pub role: Option<VrrpState>,
}

/// Free-form supplementary routing configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Augments {
    pub accept4: Vec<String>,
    pub accept6: Vec<String>,
    pub reject4: Vec<String>,
    pub reject6: Vec<String>,

    /// Static routes: prefix → next hop.
    pub statics: BTreeMap<String, String>,

    #[serde(skip_deserializing)]
    pub statics4: BTreeMap<String, String>,

    #[serde(skip_deserializing)]
    pub statics6: BTreeMap<String, String>,
}

/// Per-interface attributes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Interface {
    pub mtu: Option<u32>,
    pub xdprtr: Option<bool>,
    pub addresses: Vec<String>,
    pub dummy: Option<bool>,
    pub down: Option<bool>,
}

/// The view a template renderer gets for one BGP session group.
#[derive(Debug, Clone, Copy)]
pub struct PeerContext<'a> {
    pub name: &'a str,
    pub peer: &'a Peer,
    pub config: &'a Config,
}

impl Config {
    /// Iterate the peers in name order, each paired with the root config.
    pub fn peer_contexts(&self) -> impl Iterator<Item = PeerContext<'_>> {
        self.peers.iter().map(move |(name, peer)| PeerContext {
            name,
            peer,
            config: self,
        })
    }
}
