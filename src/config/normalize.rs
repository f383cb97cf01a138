//! Post-load normalization.
//!
//! # Responsibilities
//! - Split origin prefixes, peer prefix lists, VRRP VIPs and static routes
//!   by address family
//! - Check static route next hops
//! - Canonicalize VRRP state tokens
//!
//! # Design Decisions
//! - IPv4 values go to the `*4` field, IPv6 values to the `*6` field
//! - Derived collections are written back into the owning entity
//! - Every error carries the offending value verbatim

use thiserror::Error;

use crate::config::family::{self, Family};
use crate::config::schema::{Augments, Config, Peer, VrrpInstance, VrrpState};

/// A value that passed validation but cannot be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid origin prefix: {0}")]
    OriginPrefix(String),

    #[error("invalid static prefix: {0}")]
    StaticPrefix(String),

    #[error("invalid static nexthop: {0}")]
    StaticNexthop(String),

    #[error("invalid VIP: {0}")]
    Vip(String),

    #[error("VRRP state must be 'primary' or 'backup', unexpected {0}")]
    VrrpState(String),

    #[error("invalid prefix: {prefix} (peer {peer})")]
    PeerPrefix { peer: String, prefix: String },
}

/// Append each CIDR in `values` to `v4` or `v6` by family.
fn partition<E>(
    values: &[String],
    v4: &mut Vec<String>,
    v6: &mut Vec<String>,
    err: impl Fn(&str) -> E,
) -> Result<(), E> {
    for value in values {
        match family::cidr_family(value) {
            Some(Family::V4) => v4.push(value.clone()),
            Some(Family::V6) => v6.push(value.clone()),
            None => return Err(err(value)),
        }
    }
    Ok(())
}

fn normalize_statics(augments: &mut Augments) -> Result<(), NormalizeError> {
    augments.statics4.clear();
    augments.statics6.clear();

    for (prefix, nexthop) in &augments.statics {
        let fam = family::cidr_family(prefix)
            .ok_or_else(|| NormalizeError::StaticPrefix(prefix.clone()))?;
        if family::parse_ip(nexthop).is_none() {
            return Err(NormalizeError::StaticNexthop(nexthop.clone()));
        }

        let target = match fam {
            Family::V4 => &mut augments.statics4,
            Family::V6 => &mut augments.statics6,
        };
        target.insert(prefix.clone(), nexthop.clone());
    }
    Ok(())
}

fn normalize_vrrp(instance: &mut VrrpInstance) -> Result<(), NormalizeError> {
    partition(
        &instance.vips,
        &mut instance.vips4,
        &mut instance.vips6,
        |v| NormalizeError::Vip(v.to_string()),
    )?;

    let role = VrrpState::from_token(&instance.state)
        .ok_or_else(|| NormalizeError::VrrpState(instance.state.clone()))?;
    instance.state = role.as_str().to_string();
    instance.role = Some(role);
    Ok(())
}

fn normalize_peer(name: &str, peer: &mut Peer) -> Result<(), NormalizeError> {
    partition(
        &peer.prefixes,
        &mut peer.prefix_set4,
        &mut peer.prefix_set6,
        |p| NormalizeError::PeerPrefix {
            peer: name.to_string(),
            prefix: p.to_string(),
        },
    )
}

/// Fill every derived field of a validated, defaulted config.
pub fn normalize(config: &mut Config) -> Result<(), NormalizeError> {
    partition(
        &config.prefixes,
        &mut config.prefixes4,
        &mut config.prefixes6,
        |p| NormalizeError::OriginPrefix(p.to_string()),
    )?;

    normalize_statics(&mut config.augments)?;

    for instance in config.vrrp.iter_mut() {
        normalize_vrrp(instance)?;
    }

    for (name, peer) in config.peers.iter_mut() {
        normalize_peer(name, peer)?;
    }

    tracing::debug!(
        prefixes4 = config.prefixes4.len(),
        prefixes6 = config.prefixes6.len(),
        statics4 = config.augments.statics4.len(),
        statics6 = config.augments.statics6.len(),
        vrrp = config.vrrp.len(),
        "Normalized configuration"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn vrrp(state: &str, vips: &[&str]) -> VrrpInstance {
        VrrpInstance {
            state: state.into(),
            interface: "eth0".into(),
            vrid: Some(10),
            priority: Some(100),
            vips: strings(vips),
            ..Default::default()
        }
    }

    // Pins the family direction: IPv4 literals land in the *4 fields.
    #[test]
    fn test_origin_prefix_family_golden() {
        let mut config = Config {
            prefixes: strings(&["192.0.2.0/24", "2001:db8::/32", "198.51.100.0/24"]),
            ..Default::default()
        };
        normalize(&mut config).unwrap();

        assert_eq!(config.prefixes4, strings(&["192.0.2.0/24", "198.51.100.0/24"]));
        assert_eq!(config.prefixes6, strings(&["2001:db8::/32"]));
    }

    #[test]
    fn test_invalid_origin_prefix() {
        let mut config = Config {
            prefixes: strings(&["192.0.2.0/24", "192.0.2.0"]),
            ..Default::default()
        };
        let err = normalize(&mut config).unwrap_err();
        assert_eq!(err, NormalizeError::OriginPrefix("192.0.2.0".into()));
        assert_eq!(err.to_string(), "invalid origin prefix: 192.0.2.0");
    }

    #[test]
    fn test_statics_always_initialized() {
        let mut config = Config::default();
        normalize(&mut config).unwrap();
        assert!(config.augments.statics4.is_empty());
        assert!(config.augments.statics6.is_empty());
    }

    #[test]
    fn test_statics_split_by_prefix_family() {
        let mut config = Config::default();
        let statics = &mut config.augments.statics;
        statics.insert("10.0.0.0/8".into(), "192.0.2.1".into());
        statics.insert("2001:db8:1::/48".into(), "fe80::1".into());
        statics.insert("172.16.0.0/12".into(), "2001:db8::1".into());
        normalize(&mut config).unwrap();

        let augments = &config.augments;
        assert_eq!(augments.statics4.len(), 2);
        assert_eq!(augments.statics6.len(), 1);
        assert_eq!(augments.statics4["172.16.0.0/12"], "2001:db8::1");
        assert_eq!(augments.statics6["2001:db8:1::/48"], "fe80::1");
        assert_eq!(augments.statics4.len() + augments.statics6.len(), augments.statics.len());
    }

    #[test]
    fn test_invalid_static_prefix_and_nexthop() {
        let mut config = Config::default();
        config.augments.statics.insert("10.0.0.0".into(), "192.0.2.1".into());
        assert_eq!(
            normalize(&mut config).unwrap_err(),
            NormalizeError::StaticPrefix("10.0.0.0".into())
        );

        let mut config = Config::default();
        config.augments.statics.insert("10.0.0.0/8".into(), "192.0.2.1/32".into());
        assert_eq!(
            normalize(&mut config).unwrap_err(),
            NormalizeError::StaticNexthop("192.0.2.1/32".into())
        );
    }

    #[test]
    fn test_vrrp_written_back() {
        let mut config = Config::default();
        config.vrrp.push(vrrp("primary", &["192.0.2.254/24", "2001:db8::254/64"]));
        config.vrrp.push(vrrp("backup", &["198.51.100.1/24"]));
        normalize(&mut config).unwrap();

        let first = &config.vrrp[0];
        assert_eq!(first.state, "MASTER");
        assert_eq!(first.role, Some(VrrpState::Master));
        assert_eq!(first.vips4, strings(&["192.0.2.254/24"]));
        assert_eq!(first.vips6, strings(&["2001:db8::254/64"]));

        let second = &config.vrrp[1];
        assert_eq!(second.state, "BACKUP");
        assert!(second.vips6.is_empty());
    }

    #[test]
    fn test_vrrp_state_rejected() {
        let mut config = Config::default();
        config.vrrp.push(vrrp("Primary", &["192.0.2.254/24"]));
        let err = normalize(&mut config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "VRRP state must be 'primary' or 'backup', unexpected Primary"
        );
    }

    #[test]
    fn test_invalid_vip() {
        let mut config = Config::default();
        config.vrrp.push(vrrp("backup", &["192.0.2.254"]));
        assert_eq!(
            normalize(&mut config).unwrap_err(),
            NormalizeError::Vip("192.0.2.254".into())
        );
    }

    #[test]
    fn test_peer_prefix_sets() {
        let mut config = Config::default();
        config.peers.insert(
            "customer".into(),
            Peer {
                prefixes: strings(&["203.0.113.0/24", "2001:db8:beef::/48"]),
                ..Default::default()
            },
        );
        normalize(&mut config).unwrap();

        let peer = &config.peers["customer"];
        assert_eq!(peer.prefix_set4, strings(&["203.0.113.0/24"]));
        assert_eq!(peer.prefix_set6, strings(&["2001:db8:beef::/48"]));
    }

    #[test]
    fn test_invalid_peer_prefix_names_value() {
        let mut config = Config::default();
        config.peers.insert(
            "customer".into(),
            Peer {
                prefixes: strings(&["not-a-prefix"]),
                ..Default::default()
            },
        );
        let err = normalize(&mut config).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::PeerPrefix {
                peer: "customer".into(),
                prefix: "not-a-prefix".into()
            }
        );
    }
}
