use berth_model::{ContainerModel, Ensure, Field};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The set of fields whose observed value does not satisfy the desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drift {
    fields: BTreeSet<Field>,
}

impl Drift {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }
}

impl FromIterator<Field> for Drift {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(Field::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoOp,
    Create,
    Recreate(Drift),
    Destroy,
}

impl Decision {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Decision::NoOp)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::NoOp => write!(f, "in sync"),
            Decision::Create => write!(f, "create"),
            Decision::Recreate(drift) => write!(f, "recreate ({})", drift),
            Decision::Destroy => write!(f, "destroy"),
        }
    }
}

/// Compares every managed field of `desired` against `observed`.
///
/// Fields the desired model leaves as `None` are not compared. `env` and
/// `links` only require the desired entries to be present in the observed
/// mapping, since the engine injects entries of its own (`PATH`, links set up
/// by other containers). `volumes` and `ports` must match as sets.
pub fn diff(desired: &ContainerModel, observed: &ContainerModel) -> Drift {
    Field::ALL
        .into_iter()
        .filter(|field| !in_sync(*field, desired, observed))
        .collect()
}

pub fn decide(desired: &ContainerModel, observed: Option<&ContainerModel>) -> Decision {
    match (desired.ensure, observed) {
        (Ensure::Absent, Some(_)) => Decision::Destroy,
        (Ensure::Absent, None) => Decision::NoOp,
        (Ensure::Present, None) => Decision::Create,
        (Ensure::Present, Some(observed)) => {
            let drift = diff(desired, observed);
            if drift.is_empty() {
                Decision::NoOp
            } else {
                Decision::Recreate(drift)
            }
        }
    }
}

fn in_sync(field: Field, desired: &ContainerModel, observed: &ContainerModel) -> bool {
    match field {
        Field::Image => scalar_in_sync(&desired.image, &observed.image),
        Field::Env => mapping_in_sync(&desired.env, &observed.env),
        Field::Links => mapping_in_sync(&desired.links, &observed.links),
        Field::Volumes => set_in_sync(&desired.volumes, &observed.volumes),
        Field::Hostname => scalar_in_sync(&desired.hostname, &observed.hostname),
        Field::Ports => set_in_sync(&desired.ports, &observed.ports),
        Field::User => scalar_in_sync(&desired.user, &observed.user),
        Field::Restart => scalar_in_sync(&desired.restart, &observed.restart),
        Field::Network => scalar_in_sync(&desired.network, &observed.network),
    }
}

fn scalar_in_sync<T: PartialEq>(desired: &Option<T>, observed: &Option<T>) -> bool {
    match desired {
        Some(desired) => observed.as_ref() == Some(desired),
        None => true,
    }
}

fn mapping_in_sync(
    desired: &Option<BTreeMap<String, String>>,
    observed: &Option<BTreeMap<String, String>>,
) -> bool {
    let Some(desired) = desired else {
        return true;
    };
    desired.iter().all(|(key, value)| {
        observed
            .as_ref()
            .and_then(|observed| observed.get(key))
            .is_some_and(|observed| observed == value)
    })
}

fn set_in_sync(desired: &Option<Vec<String>>, observed: &Option<Vec<String>>) -> bool {
    let Some(desired) = desired else {
        return true;
    };
    let mut desired = desired.clone();
    let mut observed = observed.clone().unwrap_or_default();
    desired.sort();
    observed.sort();
    desired == observed
}
