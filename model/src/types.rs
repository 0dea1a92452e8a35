use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    No,
    Always,
    OnFailure(u32),
    /// Only ever reported by the engine; not accepted in a desired record.
    UnlessStopped,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPolicy::No => write!(f, "no"),
            RestartPolicy::Always => write!(f, "always"),
            RestartPolicy::OnFailure(retries) => write!(f, "on-failure:{}", retries),
            RestartPolicy::UnlessStopped => write!(f, "unless-stopped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMode {
    Bridge,
    Host,
    None,
    Container(String),
    /// Any other mode the engine reports, e.g. a user-defined network.
    Named(String),
}

impl NetworkMode {
    /// Maps an engine-reported mode string without rejecting anything.
    pub fn from_engine(mode: &str) -> Self {
        match mode {
            "bridge" => NetworkMode::Bridge,
            "host" => NetworkMode::Host,
            "none" => NetworkMode::None,
            other => match other.strip_prefix("container:") {
                Some(target) => NetworkMode::Container(target.to_string()),
                None => NetworkMode::Named(other.to_string()),
            },
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Bridge => write!(f, "bridge"),
            NetworkMode::Host => write!(f, "host"),
            NetworkMode::None => write!(f, "none"),
            NetworkMode::Container(name) => write!(f, "container:{}", name),
            NetworkMode::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A desired-state record as handed over by the configuration front end.
///
/// Nothing here is trusted; [`crate::validate()`] turns it into a
/// [`ContainerModel`]. `env` and `links` stay untyped so that a value which is
/// not a mapping can be reported as such instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredRecord {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    pub image: Option<String>,
    pub env: Option<serde_json::Value>,
    pub links: Option<serde_json::Value>,
    pub volumes: Option<Vec<String>>,
    pub hostname: Option<String>,
    pub ports: Option<Vec<String>>,
    pub user: Option<String>,
    pub restart: Option<String>,
    pub network: Option<String>,
}

impl DesiredRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Names of other containers this record has to be created after.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps = Vec::new();
        if let Some(serde_json::Value::Object(links)) = &self.links {
            deps.extend(links.values().filter_map(|v| v.as_str()).map(str::to_string));
        }
        if let Some(target) = self
            .network
            .as_deref()
            .and_then(|n| n.strip_prefix("container:"))
        {
            deps.push(target.to_string());
        }
        deps.sort();
        deps.dedup();
        deps
    }
}

/// Canonical container state, either desired or observed.
///
/// Observed models carry every field. In a desired model a `None` field was
/// not declared and is left unmanaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerModel {
    pub name: String,
    pub ensure: Ensure,
    pub image: Option<String>,
    pub env: Option<BTreeMap<String, String>>,
    pub links: Option<BTreeMap<String, String>>,
    pub volumes: Option<Vec<String>>,
    pub hostname: Option<String>,
    pub ports: Option<Vec<String>>,
    pub user: Option<String>,
    pub restart: Option<RestartPolicy>,
    pub network: Option<NetworkMode>,
}

impl ContainerModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ensure: Ensure::Present,
            image: None,
            env: None,
            links: None,
            volumes: None,
            hostname: None,
            ports: None,
            user: None,
            restart: None,
            network: None,
        }
    }
}

/// The mutable fields of a [`ContainerModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Image,
    Env,
    Links,
    Volumes,
    Hostname,
    Ports,
    User,
    Restart,
    Network,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Image,
        Field::Env,
        Field::Links,
        Field::Volumes,
        Field::Hostname,
        Field::Ports,
        Field::User,
        Field::Restart,
        Field::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Image => "image",
            Field::Env => "env",
            Field::Links => "links",
            Field::Volumes => "volumes",
            Field::Hostname => "hostname",
            Field::Ports => "ports",
            Field::User => "user",
            Field::Restart => "restart",
            Field::Network => "network",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops the engine's default `/tcp` protocol suffix from a port mapping.
pub fn normalize_port(spec: &str) -> String {
    spec.strip_suffix("/tcp").unwrap_or(spec).to_string()
}
