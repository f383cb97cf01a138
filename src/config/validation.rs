//! Configuration validation.
//!
//! # Responsibilities
//! - Enforce the per-field rules declared in the field tables
//!   (`required`, `ip`, `ipv4`, `cidr`)
//! - Walk the whole graph: root, every peer, every VRRP instance, every
//!   interface
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), ValidationErrors>
//! - Runs after deserialization and before defaults are filled, so
//!   `required` sees exactly what the operator wrote

use std::fmt;

use crate::config::family;
use crate::config::fields::{Rule, Schema};
use crate::config::schema::{Augments, Config, Interface, Peer, VrrpInstance};

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `peers.transit.neighbors[1]`.
    pub field: String,
    pub rule: Rule,
    /// Offending value for format rules.
    pub value: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.rule, &self.value) {
            (Rule::Required, _) | (_, None) => write!(f, "{} is required", self.field),
            (Rule::Ip, Some(v)) => write!(f, "{}: '{}' is not a valid IP address", self.field, v),
            (Rule::Ipv4, Some(v)) => write!(f, "{}: '{}' is not a valid IPv4 address", self.field, v),
            (Rule::Cidr, Some(v)) => write!(f, "{}: '{}' is not a valid CIDR block", self.field, v),
        }
    }
}

/// Every violation found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True if some violation names `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A field value the rules can inspect.
pub trait Checked {
    /// Whether the value satisfies `required`.
    fn is_present(&self) -> bool;

    /// String values subject to format rules.
    fn strings(&self) -> Vec<&str>;

    fn is_list(&self) -> bool {
        false
    }
}

macro_rules! checked_number {
    ($($t:ty),*) => {
        $(
            impl Checked for Option<$t> {
                fn is_present(&self) -> bool {
                    matches!(self, Some(n) if *n != 0)
                }

                fn strings(&self) -> Vec<&str> {
                    Vec::new()
                }
            }
        )*
    };
}

checked_number!(u8, u16, u32, u64);

impl Checked for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }

    fn strings(&self) -> Vec<&str> {
        if self.is_empty() {
            Vec::new()
        } else {
            vec![self.as_str()]
        }
    }
}

impl Checked for Vec<String> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }

    fn strings(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }

    fn is_list(&self) -> bool {
        true
    }
}

/// Binds an entity's ruled fields to their values.
pub trait Validate: Schema {
    /// The value behind `key`, for every field that declares rules.
    fn checked(&self, key: &str) -> Option<&dyn Checked>;
}

impl Validate for Config {
    fn checked(&self, key: &str) -> Option<&dyn Checked> {
        match key {
            "asn" => Some(&self.asn),
            "router-id" => Some(&self.router_id),
            _ => None,
        }
    }
}

impl Validate for Peer {
    fn checked(&self, key: &str) -> Option<&dyn Checked> {
        match key {
            "asn" => Some(&self.asn),
            "neighbors" => Some(&self.neighbors),
            _ => None,
        }
    }
}

impl Validate for VrrpInstance {
    fn checked(&self, key: &str) -> Option<&dyn Checked> {
        match key {
            "state" => Some(&self.state),
            "interface" => Some(&self.interface),
            "vrid" => Some(&self.vrid),
            "priority" => Some(&self.priority),
            "vips" => Some(&self.vips),
            _ => None,
        }
    }
}

impl Validate for Interface {
    fn checked(&self, _key: &str) -> Option<&dyn Checked> {
        None
    }
}

impl Validate for Augments {
    fn checked(&self, _key: &str) -> Option<&dyn Checked> {
        None
    }
}

fn path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn format_ok(rule: Rule, value: &str) -> bool {
    match rule {
        Rule::Required => true,
        Rule::Ip => family::parse_ip(value).is_some(),
        Rule::Ipv4 => family::is_ipv4(value),
        Rule::Cidr => family::parse_cidr(value).is_some(),
    }
}

/// Apply the declared rules of one entity, appending violations to `errors`.
pub fn validate_entity<T: Validate>(value: &T, prefix: &str, errors: &mut Vec<ValidationError>) {
    for field in T::entity().fields.iter().filter(|f| !f.rules.is_empty()) {
        let Some(checked) = value.checked(field.key) else {
            continue;
        };
        let field_path = path(prefix, field.key);

        if !checked.is_present() {
            if field.rules.contains(&Rule::Required) {
                errors.push(ValidationError {
                    field: field_path,
                    rule: Rule::Required,
                    value: None,
                });
            }
            continue;
        }

        for (i, s) in checked.strings().into_iter().enumerate() {
            let Some(rule) = field.rules.iter().copied().find(|r| !format_ok(*r, s)) else {
                continue;
            };
            let item_path = if checked.is_list() {
                format!("{}[{}]", field_path, i)
            } else {
                field_path.clone()
            };
            errors.push(ValidationError {
                field: item_path,
                rule,
                value: Some(s.to_string()),
            });
        }
    }
}

/// Validate the whole configuration graph.
pub fn validate_config(config: &Config) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    validate_entity(config, "", &mut errors);
    for (name, peer) in &config.peers {
        validate_entity(peer, &format!("peers.{}", name), &mut errors);
    }
    for (name, iface) in &config.interfaces {
        validate_entity(iface, &format!("interfaces.{}", name), &mut errors);
    }
    for (i, instance) in config.vrrp.iter().enumerate() {
        validate_entity(instance, &format!("vrrp[{}]", i), &mut errors);
    }
    validate_entity(&config.augments, "augments", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(violations = errors.len(), "Configuration failed validation");
        Err(ValidationErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fields::{AUGMENTS, CONFIG, INTERFACE, PEER, VRRP_INSTANCE};

    fn minimal() -> Config {
        Config {
            asn: Some(65001),
            router_id: "192.0.2.1".into(),
            ..Default::default()
        }
    }

    fn peer(asn: Option<u32>, neighbors: &[&str]) -> Peer {
        Peer {
            asn,
            neighbors: neighbors.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_ruled_field_is_bound() {
        fn assert_bound<T: Validate + Default>(entity: &crate::config::fields::Entity) {
            let value = T::default();
            for field in entity.fields.iter().filter(|f| !f.rules.is_empty()) {
                assert!(value.checked(field.key).is_some(), "{}.{}", entity.name, field.key);
            }
        }
        assert_bound::<Config>(&CONFIG);
        assert_bound::<Peer>(&PEER);
        assert_bound::<VrrpInstance>(&VRRP_INSTANCE);
        assert_bound::<Interface>(&INTERFACE);
        assert_bound::<Augments>(&AUGMENTS);
    }

    #[test]
    fn test_minimal_config_passes() {
        assert!(validate_config(&minimal()).is_ok());
    }

    #[test]
    fn test_missing_root_fields_reported_together() {
        let errors = validate_config(&Config::default()).unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert!(errors.mentions("asn"));
        assert!(errors.mentions("router-id"));
    }

    #[test]
    fn test_zero_asn_is_missing() {
        let mut config = minimal();
        config.asn = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.mentions("asn"));
    }

    #[test]
    fn test_router_id_must_be_dotted_quad() {
        let mut config = minimal();
        config.router_id = "2001:db8::1".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.0[0].rule, Rule::Ipv4);
        assert_eq!(errors.0[0].value.as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_peer_missing_asn_and_neighbors() {
        let mut config = minimal();
        config.peers.insert("transit".into(), peer(None, &[]));

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.mentions("peers.transit.asn"));
        assert!(errors.mentions("peers.transit.neighbors"));
    }

    #[test]
    fn test_peer_invalid_neighbor_named() {
        let mut config = minimal();
        config
            .peers
            .insert("transit".into(), peer(Some(174), &["203.0.113.1", "bogus"]));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].field, "peers.transit.neighbors[1]");
        assert_eq!(
            errors.to_string(),
            "peers.transit.neighbors[1]: 'bogus' is not a valid IP address"
        );
    }

    #[test]
    fn test_vrrp_rules() {
        let mut config = minimal();
        config.vrrp.push(VrrpInstance {
            state: "primary".into(),
            interface: "eth0".into(),
            vrid: Some(1),
            priority: None,
            vips: vec!["192.0.2.254".into()],
            ..Default::default()
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.mentions("vrrp[0].priority"));
        assert!(errors.mentions("vrrp[0].vips[0]"));
        assert_eq!(errors.0.len(), 2);
    }

    #[test]
    fn test_errors_across_entities_are_collected() {
        let mut config = Config::default();
        config.peers.insert("a".into(), peer(None, &["10.0.0.1"]));
        config.peers.insert("b".into(), peer(Some(1), &["x"]));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.0.len(), 4);
    }
}
