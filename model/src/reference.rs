use crate::error::ValidationError;

pub const DEFAULT_TAG: &str = "latest";

/// An image reference of the form `[registry[:port]/][namespace/]repository[:tag]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub registry: Option<String>,
    pub namespace: Option<String>,
    pub repository: String,
    pub tag: Option<String>,
}

impl ImageReference {
    pub fn parse(reference: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidImage(reference.to_string());

        let segments: Vec<&str> = reference.split('/').collect();
        if segments.len() > 3 {
            return Err(invalid());
        }

        let last = segments[segments.len() - 1];
        let (repository, tag) = match last.split_once(':') {
            Some((repository, tag)) => (repository, Some(tag)),
            None => (last, None),
        };
        if !is_word(repository) {
            return Err(invalid());
        }
        if let Some(tag) = tag {
            if !is_word(tag) {
                return Err(invalid());
            }
        }

        let (registry, namespace) = match segments.len() {
            1 => (None, None),
            2 => {
                let first = segments[0];
                if is_registry(first) {
                    (Some(first), None)
                } else if is_namespace(first) {
                    (None, Some(first))
                } else {
                    return Err(invalid());
                }
            }
            _ => {
                if !is_registry(segments[0]) || !is_namespace(segments[1]) {
                    return Err(invalid());
                }
                (Some(segments[0]), Some(segments[1]))
            }
        };

        Ok(Self {
            registry: registry.map(str::to_string),
            namespace: namespace.map(str::to_string),
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
        })
    }

    pub fn tag_or_default(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_TAG)
    }

    /// The reference with its tag made explicit.
    pub fn full_name(&self) -> String {
        let mut name = String::new();
        if let Some(registry) = &self.registry {
            name.push_str(registry);
            name.push('/');
        }
        if let Some(namespace) = &self.namespace {
            name.push_str(namespace);
            name.push('/');
        }
        name.push_str(&self.repository);
        name.push(':');
        name.push_str(self.tag_or_default());
        name
    }
}

/// Parses `reference` and returns it with an explicit tag.
pub fn normalize_image(reference: &str) -> Result<String, ValidationError> {
    ImageReference::parse(reference).map(|r| r.full_name())
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_word_char)
}

fn is_namespace(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_word_char(c) || c == '+')
}

fn is_registry(s: &str) -> bool {
    match s.split_once(':') {
        Some((host, port)) => {
            is_word(host) && !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())
        }
        None => is_word(s),
    }
}
