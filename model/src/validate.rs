//! Field and cross-field checks on desired-state records.
//!
//! [`validate`] never talks to the engine. It either rejects a record with
//! the first rule it breaks or returns the canonical [`ContainerModel`] with
//! the image tagged, the restart policy normalized and ports expanded to one
//! entry per port with the default protocol stripped.

use crate::error::ValidationError;
use crate::reference::normalize_image;
use crate::types::{ContainerModel, DesiredRecord, Ensure, NetworkMode, RestartPolicy, normalize_port};
use serde_json::Value;
use std::collections::BTreeMap;

pub fn validate(record: &DesiredRecord) -> Result<ContainerModel, ValidationError> {
    validate_name(&record.name)?;

    let image = match &record.image {
        Some(image) if image.is_empty() => return Err(ValidationError::Empty("image")),
        Some(image) => Some(normalize_image(image)?),
        None if record.ensure == Ensure::Present => return Err(ValidationError::MissingImage),
        None => None,
    };

    let env = record
        .env
        .as_ref()
        .map(|v| parse_mapping("env", v))
        .transpose()?;
    let links = record
        .links
        .as_ref()
        .map(|v| parse_mapping("links", v))
        .transpose()?;

    let volumes = match &record.volumes {
        Some(volumes) => {
            if volumes.iter().any(String::is_empty) {
                return Err(ValidationError::Empty("volumes"));
            }
            Some(volumes.clone())
        }
        None => None,
    };

    let hostname = non_empty("hostname", record.hostname.as_deref())?;

    let ports = match &record.ports {
        Some(ports) => {
            let mut expanded = Vec::with_capacity(ports.len());
            for port in ports {
                let entries =
                    expand_port_spec(port).ok_or_else(|| ValidationError::InvalidPort(port.clone()))?;
                expanded.extend(entries);
            }
            Some(expanded)
        }
        None => None,
    };

    let user = non_empty("user", record.user.as_deref())?;
    let restart = record.restart.as_deref().map(parse_restart).transpose()?;
    let network = record.network.as_deref().map(parse_network).transpose()?;

    check_compatibility(network.as_ref(), links.as_ref(), hostname.as_deref())?;

    Ok(ContainerModel {
        name: record.name.clone(),
        ensure: record.ensure,
        image,
        env,
        links,
        volumes,
        hostname,
        ports,
        user,
        restart,
        network,
    })
}

pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        }
        _ => false,
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName(name.to_string()))
    }
}

fn non_empty(field: &'static str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value {
        Some("") => Err(ValidationError::Empty(field)),
        Some(v) => Ok(Some(v.to_string())),
        None => Ok(None),
    }
}

fn parse_mapping(
    field: &'static str,
    value: &Value,
) -> Result<BTreeMap<String, String>, ValidationError> {
    let Value::Object(map) = value else {
        return Err(ValidationError::NotAMapping(field));
    };

    map.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                // Configuration files like to write `PORT: 8080`.
                Value::Number(n) if field == "env" => n.to_string(),
                Value::Bool(b) if field == "env" => b.to_string(),
                _ => {
                    return Err(ValidationError::InvalidMappingValue {
                        field,
                        key: key.clone(),
                    });
                }
            };
            Ok((key.clone(), value))
        })
        .collect()
}

pub fn parse_restart(policy: &str) -> Result<RestartPolicy, ValidationError> {
    let invalid = || ValidationError::InvalidRestart(policy.to_string());
    match policy {
        "no" => Ok(RestartPolicy::No),
        "always" => Ok(RestartPolicy::Always),
        "on-failure" => Ok(RestartPolicy::OnFailure(0)),
        other => {
            let count = other.strip_prefix("on-failure:").ok_or_else(invalid)?;
            if count.is_empty() || !count.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            count
                .parse()
                .map(RestartPolicy::OnFailure)
                .map_err(|_| invalid())
        }
    }
}

pub fn parse_network(mode: &str) -> Result<NetworkMode, ValidationError> {
    match mode {
        "bridge" => Ok(NetworkMode::Bridge),
        "host" => Ok(NetworkMode::Host),
        "none" => Ok(NetworkMode::None),
        other => match other.strip_prefix("container:") {
            Some(target) if is_valid_name(target) => Ok(NetworkMode::Container(target.to_string())),
            _ => Err(ValidationError::InvalidNetwork(mode.to_string())),
        },
    }
}

fn check_compatibility(
    network: Option<&NetworkMode>,
    links: Option<&BTreeMap<String, String>>,
    hostname: Option<&str>,
) -> Result<(), ValidationError> {
    let has_links = links.is_some_and(|l| !l.is_empty());
    let has_hostname = hostname.is_some_and(|h| !h.is_empty());

    match network {
        Some(NetworkMode::Host) if has_links => Err(ValidationError::HostNetworkWithLinks),
        Some(NetworkMode::Host) if has_hostname => Err(ValidationError::HostNetworkWithHostname),
        Some(NetworkMode::Container(_)) if has_links => {
            Err(ValidationError::ContainerNetworkWithLinks)
        }
        Some(NetworkMode::Container(_)) if has_hostname => {
            Err(ValidationError::ContainerNetworkWithHostname)
        }
        Some(NetworkMode::None) if has_links => Err(ValidationError::NoneNetworkWithLinks),
        _ => Ok(()),
    }
}

/// Expands a port mapping into the entries the engine reports back for it:
/// one per port, `/tcp` dropped. `None` when the mapping is malformed.
///
/// A bound host IP needs an explicit host port, since the engine reports an
/// `ip::port` binding without its empty segment. Ranges must have the same
/// length on both sides.
fn expand_port_spec(spec: &str) -> Option<Vec<String>> {
    let (body, proto) = match spec.rsplit_once('/') {
        Some((body, proto)) if matches!(proto, "tcp" | "udp" | "sctp") => (body, Some(proto)),
        Some(_) => return None,
        None => (spec, None),
    };

    let mut parts = body.rsplitn(3, ':');
    let container_ports = port_range(parts.next()?)?;
    let host_ports = parts.next().map(port_range);
    let host_ip = parts.next();

    let host_ports = match (host_ip, host_ports) {
        (_, Some(None)) => return None,
        (Some(ip), _) if ip.is_empty() => return None,
        (ip, Some(Some(range))) => {
            if range.len() != container_ports.len() {
                return None;
            }
            Some((ip, range))
        }
        (_, None) => None,
    };

    let entries = container_ports
        .iter()
        .enumerate()
        .map(|(i, container_port)| {
            let mut entry = String::new();
            if let Some((ip, range)) = &host_ports {
                if let Some(ip) = ip {
                    entry.push_str(ip);
                    entry.push(':');
                }
                entry.push_str(&range[i].to_string());
                entry.push(':');
            }
            entry.push_str(&container_port.to_string());
            if let Some(proto) = proto {
                entry.push('/');
                entry.push_str(proto);
            }
            normalize_port(&entry)
        })
        .collect();
    Some(entries)
}

fn port_range(s: &str) -> Option<Vec<u16>> {
    let port = |p: &str| p.parse::<u16>().ok();
    match s.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (port(start)?, port(end)?);
            if start > end {
                return None;
            }
            Some((start..=end).collect())
        }
        None => Some(vec![port(s)?]),
    }
}
