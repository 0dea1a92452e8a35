use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid container name '{0}': must match [A-Za-z0-9][A-Za-z0-9_.-]*")]
    InvalidName(String),

    #[error("'image' is required when ensure is 'present'")]
    MissingImage,

    #[error("invalid value '{0}' for 'image'")]
    InvalidImage(String),

    #[error("parameter '{0}' must be a mapping")]
    NotAMapping(&'static str),

    #[error("parameter '{field}' has a non-string value for key '{key}'")]
    InvalidMappingValue { field: &'static str, key: String },

    #[error("parameter '{0}' must not be empty")]
    Empty(&'static str),

    #[error("invalid value '{0}' for 'restart': must be one of 'no', 'always', 'on-failure[:N]'")]
    InvalidRestart(String),

    #[error(
        "invalid value '{0}' for 'network': must be one of 'none', 'bridge', 'host', 'container:<name>'"
    )]
    InvalidNetwork(String),

    #[error("invalid value '{0}' for 'ports': expected [hostIp:][hostPort:]containerPort[/protocol]")]
    InvalidPort(String),

    #[error("'network' host is incompatible with 'links'")]
    HostNetworkWithLinks,

    #[error("'network' host is incompatible with 'hostname'")]
    HostNetworkWithHostname,

    #[error("'network' container:<name> is incompatible with 'links'")]
    ContainerNetworkWithLinks,

    #[error("'network' container:<name> is incompatible with 'hostname'")]
    ContainerNetworkWithHostname,

    #[error("'network' none is incompatible with 'links'")]
    NoneNetworkWithLinks,
}

impl ValidationError {
    /// The model field the failure is about, if it concerns a single one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::InvalidName(_) => Some("name"),
            ValidationError::MissingImage | ValidationError::InvalidImage(_) => Some("image"),
            ValidationError::NotAMapping(field)
            | ValidationError::InvalidMappingValue { field, .. }
            | ValidationError::Empty(field) => Some(*field),
            ValidationError::InvalidRestart(_) => Some("restart"),
            ValidationError::InvalidNetwork(_) => Some("network"),
            ValidationError::InvalidPort(_) => Some("ports"),
            _ => None,
        }
    }
}
