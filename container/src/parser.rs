//! Turns raw engine output into observed [`ContainerModel`]s.
//!
//! Two inputs are combined: the `ps` table, which supplies each container's
//! id and image as the user asked for it, and the `inspect` JSON array, which
//! supplies everything else.

use crate::error::ParseError;
use berth_model::{ContainerModel, Ensure, NetworkMode, RestartPolicy, normalize_image, normalize_port};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedContainer {
    pub id: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectRecord {
    id: String,
    name: String,
    config: InspectConfig,
    host_config: InspectHostConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    env: Option<Vec<String>>,
    hostname: Option<String>,
    domainname: Option<String>,
    volumes: Option<BTreeMap<String, serde_json::Value>>,
    user: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectHostConfig {
    links: Option<Vec<String>>,
    binds: Option<Vec<String>>,
    port_bindings: Option<BTreeMap<String, Option<Vec<HostBinding>>>>,
    restart_policy: Option<InspectRestartPolicy>,
    network_mode: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostBinding {
    host_ip: Option<String>,
    host_port: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectRestartPolicy {
    #[serde(default)]
    name: String,
    #[serde(default)]
    maximum_retry_count: u32,
}

/// Parses the `ps --all --no-trunc` table. The header row is discarded.
pub fn parse_list(raw: &str) -> Result<Vec<ListedContainer>, ParseError> {
    raw.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut columns = line.split_whitespace();
            match (columns.next(), columns.next()) {
                (Some(id), Some(image)) => Ok(ListedContainer {
                    id: id.to_string(),
                    image: image.to_string(),
                }),
                _ => Err(ParseError::MalformedRow(line.to_string())),
            }
        })
        .collect()
}

pub fn parse_inspect(
    raw: &str,
    listed: &[ListedContainer],
) -> Result<Vec<ContainerModel>, ParseError> {
    let records: Vec<InspectRecord> = serde_json::from_str(raw)?;
    let images: HashMap<&str, &str> = listed
        .iter()
        .map(|c| (c.id.as_str(), c.image.as_str()))
        .collect();

    records
        .into_iter()
        .map(|record| {
            let image = images
                .get(record.id.as_str())
                .map(|image| image.to_string())
                .or_else(|| record.config.image.clone())
                .unwrap_or_default();
            to_model(record, image)
        })
        .collect()
}

/// Parses both outputs. An empty list yields no models and `inspect_raw` is
/// not looked at.
pub fn parse_containers(
    list_raw: &str,
    inspect_raw: &str,
) -> Result<Vec<ContainerModel>, ParseError> {
    let listed = parse_list(list_raw)?;
    if listed.is_empty() {
        return Ok(Vec::new());
    }
    parse_inspect(inspect_raw, &listed)
}

fn to_model(record: InspectRecord, image: String) -> Result<ContainerModel, ParseError> {
    let name = last_segment(&record.name).to_string();
    let config = record.config;
    let host_config = record.host_config;

    let env = config
        .env
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (entry, String::new()),
        })
        .collect();

    let links = host_config
        .links
        .unwrap_or_default()
        .iter()
        .map(|link| match link.split_once(':') {
            Some((target, alias)) => {
                Ok((last_segment(alias).to_string(), last_segment(target).to_string()))
            }
            None => Err(ParseError::MalformedLink {
                container: name.clone(),
                link: link.clone(),
            }),
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let mut volumes = host_config.binds.unwrap_or_default();
    volumes.extend(config.volumes.unwrap_or_default().into_keys());

    let mut hostname = config.hostname.unwrap_or_default();
    if let Some(domain) = config.domainname.filter(|d| !d.is_empty()) {
        hostname.push('.');
        hostname.push_str(&domain);
    }

    let ports = host_config
        .port_bindings
        .unwrap_or_default()
        .into_iter()
        .flat_map(|(container_port, bindings)| {
            let container_port = normalize_port(&container_port);
            bindings
                .unwrap_or_default()
                .into_iter()
                .map(move |binding| port_spec(binding, &container_port))
        })
        .collect();

    let user = config
        .user
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "root".to_string());

    let policy = host_config.restart_policy.unwrap_or_default();
    let restart = match policy.name.as_str() {
        "" | "no" => RestartPolicy::No,
        "always" => RestartPolicy::Always,
        "on-failure" => RestartPolicy::OnFailure(policy.maximum_retry_count),
        "unless-stopped" => RestartPolicy::UnlessStopped,
        other => {
            return Err(ParseError::UnknownRestartPolicy {
                container: name,
                policy: other.to_string(),
            });
        }
    };

    let network = NetworkMode::from_engine(&host_config.network_mode.unwrap_or_default());

    Ok(ContainerModel {
        image: Some(normalize_image(&image).unwrap_or(image)),
        env: Some(env),
        links: Some(links),
        volumes: Some(volumes),
        hostname: Some(hostname),
        ports: Some(ports),
        user: Some(user),
        restart: Some(restart),
        network: Some(network),
        ensure: Ensure::Present,
        name,
    })
}

fn port_spec(binding: HostBinding, container_port: &str) -> String {
    [binding.host_ip, binding.host_port]
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty())
        .chain(std::iter::once(container_port.to_string()))
        .collect::<Vec<_>>()
        .join(":")
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
