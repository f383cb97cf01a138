//! Declared default values.
//!
//! # Responsibilities
//! - Fill every absent field that declares a default in the field tables
//! - Default the root, each peer and each interface independently
//!
//! # Design Decisions
//! - Only `None` is filled. An explicit `false` or `0` stays as written
//! - Default literals are parsed with `FromStr` into the field's type, so
//!   a literal that does not fit is reported instead of silently skipped

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::config::fields::Schema;
use crate::config::schema::{Config, Interface, Peer};

/// Failure to apply a declared default. Always a schema authoring mistake.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefaultError {
    #[error("{entity}.{key} declares a default but is not bound to a field")]
    Unbound { entity: &'static str, key: &'static str },

    #[error("{entity}.{key}: default '{literal}' is invalid: {reason}")]
    Literal {
        entity: &'static str,
        key: &'static str,
        literal: &'static str,
        reason: String,
    },
}

/// A field that can receive a default value.
pub trait DefaultSlot {
    /// Parse `literal` into the field if it is unset. Returns whether the
    /// field was filled.
    fn fill(&mut self, literal: &str) -> Result<bool, String>;
}

impl<T> DefaultSlot for Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn fill(&mut self, literal: &str) -> Result<bool, String> {
        if self.is_some() {
            return Ok(false);
        }
        let value = literal.parse::<T>().map_err(|e| e.to_string())?;
        *self = Some(value);
        Ok(true)
    }
}

/// Binds an entity's defaulted fields to their storage.
pub trait Defaults: Schema {
    fn slot(&mut self, key: &str) -> Option<&mut dyn DefaultSlot>;
}

impl Defaults for Config {
    fn slot(&mut self, key: &str) -> Option<&mut dyn DefaultSlot> {
        match key {
            "irr-server" => Some(&mut self.irr_server),
            "rtr-server" => Some(&mut self.rtr_server),
            "rtr-port" => Some(&mut self.rtr_port),
            "keep-filtered" => Some(&mut self.keep_filtered),
            "merge-paths" => Some(&mut self.merge_paths),
            "accept-default" => Some(&mut self.accept_default),
            "bird-directory" => Some(&mut self.bird_directory),
            "bird-socket" => Some(&mut self.bird_socket),
            "keepalived-config" => Some(&mut self.keepalived_config),
            "web-ui-file" => Some(&mut self.web_ui_file),
            "peeringdb-query-timeout" => Some(&mut self.peeringdb_query_timeout),
            "irr-query-timeout" => Some(&mut self.irr_query_timeout),
            _ => None,
        }
    }
}

impl Defaults for Peer {
    fn slot(&mut self, key: &str) -> Option<&mut dyn DefaultSlot> {
        match key {
            "prepends" => Some(&mut self.prepends),
            "local-pref" => Some(&mut self.local_pref),
            "multihop" => Some(&mut self.multihop),
            "local-port" => Some(&mut self.local_port),
            "neighbor-port" => Some(&mut self.neighbor_port),
            "passive" => Some(&mut self.passive),
            "next-hop-self" => Some(&mut self.next_hop_self),
            "bfd" => Some(&mut self.bfd),
            "rs-client" => Some(&mut self.rs_client),
            "rr-client" => Some(&mut self.rr_client),
            "remove-private-as" => Some(&mut self.remove_private_as),
            "mp-unicast-46" => Some(&mut self.mp_unicast_46),
            "import-limit4" => Some(&mut self.import_limit4),
            "import-limit6" => Some(&mut self.import_limit6),
            "enforce-first-as" => Some(&mut self.enforce_first_as),
            "enforce-peer-nexthop" => Some(&mut self.enforce_peer_nexthop),
            "max-prefix-action" => Some(&mut self.max_prefix_action),
            "allow-blackhole-community" => Some(&mut self.allow_blackhole_community),
            "filter-irr" => Some(&mut self.filter_irr),
            "filter-rpki" => Some(&mut self.filter_rpki),
            "filter-max-prefix" => Some(&mut self.filter_max_prefix),
            "filter-bogons" => Some(&mut self.filter_bogons),
            "filter-tier1-asns" => Some(&mut self.filter_tier1_asns),
            "auto-import-limits" => Some(&mut self.auto_import_limits),
            "auto-as-set" => Some(&mut self.auto_as_set),
            "announce-default" => Some(&mut self.announce_default),
            "announce-specifics" => Some(&mut self.announce_specifics),
            _ => None,
        }
    }
}

impl Defaults for Interface {
    fn slot(&mut self, key: &str) -> Option<&mut dyn DefaultSlot> {
        match key {
            "mtu" => Some(&mut self.mtu),
            "xdprtr" => Some(&mut self.xdprtr),
            "dummy" => Some(&mut self.dummy),
            "down" => Some(&mut self.down),
            _ => None,
        }
    }
}

/// Fill the declared defaults of one entity. Returns the number of fields
/// that were filled.
pub fn apply_entity<T: Defaults>(value: &mut T) -> Result<usize, DefaultError> {
    let entity = T::entity();
    let mut filled = 0;

    for field in entity.fields {
        let Some(literal) = field.default else {
            continue;
        };
        let slot = value.slot(field.key).ok_or(DefaultError::Unbound {
            entity: entity.name,
            key: field.key,
        })?;
        let was_filled = slot.fill(literal).map_err(|reason| DefaultError::Literal {
            entity: entity.name,
            key: field.key,
            literal,
            reason,
        })?;
        if was_filled {
            filled += 1;
        }
    }

    Ok(filled)
}

/// Fill defaults on the root config, every peer and every interface.
pub fn apply_defaults(config: &mut Config) -> Result<(), DefaultError> {
    let mut filled = apply_entity(config)?;
    for peer in config.peers.values_mut() {
        filled += apply_entity(peer)?;
    }
    for iface in config.interfaces.values_mut() {
        filled += apply_entity(iface)?;
    }

    tracing::debug!(filled, "Applied configuration defaults");
    Ok(())
}
