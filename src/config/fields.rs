//! Field metadata for every schema entity.
//!
//! # Responsibilities
//! - Declare, per field: wire key, type name, default literal, validation
//!   rules, description
//! - Link entity-typed fields to the entity they contain
//!
//! # Design Decisions
//! - One static table is the single source for validation, defaulting and
//!   documentation
//! - Rows appear in struct declaration order
//! - A description of [`HIDDEN`] marks a derived field that is left out of
//!   the generated reference

use crate::config::schema::{Augments, Config, Interface, Peer, VrrpInstance};

/// Description sentinel for fields omitted from documentation.
pub const HIDDEN: &str = "-";

/// A validation rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-zero number, non-empty string or non-empty list.
    Required,
    /// Every value is an IP address.
    Ip,
    /// Every value is an IPv4 address.
    Ipv4,
    /// Every value is an address block in CIDR notation.
    Cidr,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Ip => "ip",
            Rule::Ipv4 => "ipv4",
            Rule::Cidr => "cidr",
        }
    }
}

/// Metadata for one field of an entity.
#[derive(Debug)]
pub struct Field {
    pub key: &'static str,
    pub ty: &'static str,
    pub default: Option<&'static str>,
    pub rules: &'static [Rule],
    pub description: &'static str,
    /// Entity contained by this field, directly or as a map/sequence element.
    pub nested: Option<&'static Entity>,
}

impl Field {
    pub const fn new(key: &'static str, ty: &'static str, description: &'static str) -> Self {
        Self {
            key,
            ty,
            default: None,
            rules: &[],
            description,
            nested: None,
        }
    }

    pub const fn defaults_to(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    pub const fn rules(mut self, rules: &'static [Rule]) -> Self {
        self.rules = rules;
        self
    }

    pub const fn nested(mut self, entity: &'static Entity) -> Self {
        self.nested = Some(entity);
        self
    }

    /// Rules rendered the way they are written in the reference, e.g. `required,ip`.
    pub fn rule_string(&self) -> String {
        self.rules
            .iter()
            .map(Rule::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn is_hidden(&self) -> bool {
        self.description == HIDDEN
    }
}

/// A named schema entity and its fields.
#[derive(Debug)]
pub struct Entity {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Entity {
    pub fn field(&self, key: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Ties a schema type to its metadata table.
pub trait Schema {
    fn entity() -> &'static Entity;
}

impl Schema for Config {
    fn entity() -> &'static Entity {
        &CONFIG
    }
}

impl Schema for Peer {
    fn entity() -> &'static Entity {
        &PEER
    }
}

impl Schema for VrrpInstance {
    fn entity() -> &'static Entity {
        &VRRP_INSTANCE
    }
}

impl Schema for Augments {
    fn entity() -> &'static Entity {
        &AUGMENTS
    }
}

impl Schema for Interface {
    fn entity() -> &'static Entity {
        &INTERFACE
    }
}

const REQUIRED: &[Rule] = &[Rule::Required];

pub static CONFIG: Entity = Entity {
    name: "Config",
    fields: &[
        Field::new("asn", "u32", "Autonomous System Number").rules(REQUIRED),
        Field::new("prefixes", "Vec<String>", "List of prefixes to announce"),
        Field::new("communities", "Vec<String>", "List of RFC1997 BGP communities"),
        Field::new("large-communities", "Vec<String>", "List of RFC8092 large BGP communities"),
        Field::new("router-id", "String", "Router ID (dotted quad notation)")
            .rules(&[Rule::Required, Rule::Ipv4]),
        Field::new("irr-server", "String", "Internet routing registry server").defaults_to("rr.ntt.net"),
        Field::new("rtr-server", "String", "RPKI-to-router server").defaults_to("rtr.rpki.cloudflare.com"),
        Field::new("rtr-port", "u16", "RPKI-to-router port").defaults_to("8282"),
        Field::new("keep-filtered", "bool", "Should filtered routes be kept in memory?").defaults_to("false"),
        Field::new(
            "merge-paths",
            "bool",
            "Should best and equivalent non-best routes be imported for ECMP?",
        )
        .defaults_to("false"),
        Field::new("source4", "String", "Source IPv4 address"),
        Field::new("source6", "String", "Source IPv6 address"),
        Field::new("accept-default", "bool", "Should default routes be added to the bogon list?")
            .defaults_to("false"),
        Field::new("bird-directory", "String", "Directory to store BIRD configs").defaults_to("/etc/bird/"),
        Field::new("bird-socket", "String", "UNIX control socket for BIRD").defaults_to("/run/bird/bird.ctl"),
        Field::new("keepalived-config", "String", "Configuration file for keepalived")
            .defaults_to("/etc/keepalived.conf"),
        Field::new("web-ui-file", "String", "File to write web UI to").defaults_to("/run/wireframe.html"),
        Field::new("peeringdb-query-timeout", "u64", "PeeringDB query timeout in seconds").defaults_to("10"),
        Field::new("irr-query-timeout", "u64", "IRR query timeout in seconds").defaults_to("30"),
        Field::new("peers", "BTreeMap<String, Peer>", "BGP peer configuration").nested(&PEER),
        Field::new("interfaces", "BTreeMap<String, Interface>", "Network interface configuration")
            .nested(&INTERFACE),
        Field::new("vrrp", "Vec<VrrpInstance>", "List of VRRP instances").nested(&VRRP_INSTANCE),
        Field::new("augments", "Augments", "Custom configuration options").nested(&AUGMENTS),
        Field::new("prefixes4", "Vec<String>", HIDDEN),
        Field::new("prefixes6", "Vec<String>", HIDDEN),
    ],
};

pub static PEER: Entity = Entity {
    name: "Peer",
    fields: &[
        Field::new("description", "String", "Peer description"),
        Field::new("disabled", "bool", "Should the sessions be disabled?"),
        Field::new("asn", "u32", "Local ASN").rules(REQUIRED),
        Field::new("neighbors", "Vec<String>", "List of neighbor IPs").rules(&[Rule::Required, Rule::Ip]),
        Field::new("prepends", "u32", "Number of times to prepend local AS on export").defaults_to("0"),
        Field::new("local-pref", "u32", "BGP local preference").defaults_to("100"),
        Field::new("multihop", "bool", "Should BGP multihop be enabled? (255 max hops)").defaults_to("false"),
        Field::new("listen", "String", "BGP listen address"),
        Field::new("local-port", "u16", "Local TCP port").defaults_to("179"),
        Field::new("neighbor-port", "u16", "Neighbor TCP port").defaults_to("179"),
        Field::new("passive", "bool", "Should we listen passively?").defaults_to("false"),
        Field::new("next-hop-self", "bool", "Should BGP next-hop-self be enabled?").defaults_to("false"),
        Field::new("bfd", "bool", "Should BFD be enabled?").defaults_to("false"),
        Field::new("communities", "Vec<String>", "List of communities to add on export"),
        Field::new("large-communities", "Vec<String>", "List of large communities to add on export"),
        Field::new("password", "String", "BGP MD5 password"),
        Field::new("rs-client", "bool", "Should this peer be a route server client?").defaults_to("false"),
        Field::new("rr-client", "bool", "Should this peer be a route reflector client?").defaults_to("false"),
        Field::new(
            "remove-private-as",
            "bool",
            "Should private ASNs be removed from path before exporting?",
        )
        .defaults_to("true"),
        Field::new(
            "mp-unicast-46",
            "bool",
            "Should this peer be configured with multiprotocol IPv4 and IPv6 unicast?",
        )
        .defaults_to("false"),
        Field::new("as-set", "String", "Peer's as-set for filtering"),
        Field::new("import-limit4", "u32", "Maximum number of IPv4 prefixes to import").defaults_to("1000000"),
        Field::new("import-limit6", "u32", "Maximum number of IPv6 prefixes to import").defaults_to("100000"),
        Field::new(
            "enforce-first-as",
            "bool",
            "Should we only accept routes who's first AS is equal to the configured peer address?",
        )
        .defaults_to("true"),
        Field::new(
            "enforce-peer-nexthop",
            "bool",
            "Should we only accept routes with a next hop equal to the configured neighbor address?",
        )
        .defaults_to("true"),
        Field::new(
            "max-prefix-action",
            "String",
            "What action should be taken when the max prefix limit is tripped?",
        )
        .defaults_to("disable"),
        Field::new(
            "allow-blackhole-community",
            "bool",
            "Should this peer be allowed to send routes with the blackhole community?",
        )
        .defaults_to("false"),
        Field::new("filter-irr", "bool", "Should IRR filtering be applied?").defaults_to("true"),
        Field::new("filter-rpki", "bool", "Should RPKI invalids be rejected?").defaults_to("true"),
        Field::new("filter-max-prefix", "bool", "Should max prefix filtering be applied?").defaults_to("true"),
        Field::new("filter-bogons", "bool", "Should bogon prefixes be rejected?").defaults_to("true"),
        Field::new(
            "filter-tier1-asns",
            "bool",
            "Should paths containing 'Tier 1' ASNs be rejected (Peerlock Lite)?",
        )
        .defaults_to("false"),
        Field::new("auto-import-limits", "bool", "Get import limits automatically from PeeringDB?")
            .defaults_to("false"),
        Field::new("auto-as-set", "bool", "Get as-set automatically from PeeringDB?").defaults_to("false"),
        Field::new("prefixes", "Vec<String>", "Prefixes to accept"),
        Field::new("announce-default", "bool", "Should a default route be exported to this peer?")
            .defaults_to("false"),
        Field::new("announce-specifics", "bool", "Should more specific routes be exported to this peer?")
            .defaults_to("true"),
        Field::new(
            "session-global",
            "String",
            "Configuration to add to each session before any defined BGP protocols",
        ),
        Field::new("pre-import", "String", "Configuration to add at the beginning of the import filter"),
        Field::new("pre-export", "String", "Configuration to add at the beginning of the export filter"),
        Field::new(
            "pre-import-final",
            "String",
            "Configuration to add immediately before the final accept/reject on import",
        ),
        Field::new(
            "pre-export-final",
            "String",
            "Configuration to add immediately before the final accept/reject on export",
        ),
        Field::new("prefix-set4", "Vec<String>", HIDDEN),
        Field::new("prefix-set6", "Vec<String>", HIDDEN),
    ],
};

pub static INTERFACE: Entity = Entity {
    name: "Interface",
    fields: &[
        Field::new("mtu", "u32", "Interface MTU (Maximum Transmission Unit)").defaults_to("1500"),
        Field::new("xdprtr", "bool", "Should XDPRTR be loaded on this interface?").defaults_to("false"),
        Field::new("addresses", "Vec<String>", "List of addresses to add to this interface"),
        Field::new(
            "dummy",
            "bool",
            "Should a new dummy interface be created with this configuration?",
        )
        .defaults_to("false"),
        Field::new("down", "bool", "Should the interface be set to a down state?").defaults_to("false"),
    ],
};

pub static VRRP_INSTANCE: Entity = Entity {
    name: "VrrpInstance",
    fields: &[
        Field::new("state", "String", "VRRP instance state ('primary' or 'backup')").rules(REQUIRED),
        Field::new("interface", "String", "Interface to send VRRP packets on").rules(REQUIRED),
        Field::new("vrid", "u8", "RFC3768 VRRP Virtual Router ID (1-255)").rules(REQUIRED),
        Field::new("priority", "u8", "RFC3768 VRRP Priority").rules(REQUIRED),
        Field::new("vips", "Vec<String>", "List of virtual IPs").rules(&[Rule::Required, Rule::Cidr]),
        Field::new("vips4", "Vec<String>", HIDDEN),
        Field::new("vips6", "Vec<String>", HIDDEN),
        Field::new("role", "VrrpState", HIDDEN),
    ],
};

pub static AUGMENTS: Entity = Entity {
    name: "Augments",
    fields: &[
        Field::new("accept4", "Vec<String>", "List of BIRD protocols to import into the IPv4 table"),
        Field::new("accept6", "Vec<String>", "List of BIRD protocols to import into the IPv6 table"),
        Field::new("reject4", "Vec<String>", "List of BIRD protocols to not import into the IPv4 table"),
        Field::new("reject6", "Vec<String>", "List of BIRD protocols to not import into the IPv6 table"),
        Field::new("statics", "BTreeMap<String, String>", "List of static routes to include in BIRD"),
        Field::new("statics4", "BTreeMap<String, String>", HIDDEN),
        Field::new("statics6", "BTreeMap<String, String>", HIDDEN),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeSet;

    fn serialized_keys<T: Serialize>(value: &T) -> BTreeSet<String> {
        match serde_json::to_value(value).unwrap() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("expected an object, got {other}"),
        }
    }

    fn table_keys(entity: &Entity) -> BTreeSet<String> {
        entity.fields.iter().map(|f| f.key.to_string()).collect()
    }

    #[test]
    fn test_tables_cover_every_serialized_key() {
        assert_eq!(table_keys(&CONFIG), serialized_keys(&Config::default()));
        assert_eq!(table_keys(&PEER), serialized_keys(&Peer::default()));
        assert_eq!(table_keys(&INTERFACE), serialized_keys(&Interface::default()));
        assert_eq!(table_keys(&VRRP_INSTANCE), serialized_keys(&VrrpInstance::default()));
        assert_eq!(table_keys(&AUGMENTS), serialized_keys(&Augments::default()));
    }

    #[test]
    fn test_every_field_is_described() {
        for entity in [&CONFIG, &PEER, &INTERFACE, &VRRP_INSTANCE, &AUGMENTS] {
            for field in entity.fields {
                assert!(!field.description.is_empty(), "{}.{}", entity.name, field.key);
            }
        }
    }

    #[test]
    fn test_rule_string() {
        let neighbors = PEER.field("neighbors").unwrap();
        assert_eq!(neighbors.rule_string(), "required,ip");
        assert_eq!(PEER.field("password").unwrap().rule_string(), "");
    }

    #[test]
    fn test_nested_entities() {
        let nested: Vec<&str> = CONFIG
            .fields
            .iter()
            .filter_map(|f| f.nested.map(|e| e.name))
            .collect();
        assert_eq!(nested, vec!["Peer", "Interface", "VrrpInstance", "Augments"]);
    }
}
