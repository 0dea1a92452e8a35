use crate::diff::{Decision, Drift};
use crate::error::ReconcileError;
use berth_model::ContainerModel;
use std::fmt;

/// What a reconciliation would do for one record, without doing it.
#[derive(Debug, Clone)]
pub struct Plan {
    pub desired: ContainerModel,
    pub decision: Decision,
}

/// What a reconciliation did for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InSync,
    Created { id: String },
    Recreated { id: String, drift: Drift },
    Destroyed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InSync => write!(f, "in sync"),
            Outcome::Created { id } => write!(f, "created {}", short_id(id)),
            Outcome::Recreated { id, drift } => {
                write!(f, "recreated {} ({})", short_id(id), drift)
            }
            Outcome::Destroyed => write!(f, "destroyed"),
        }
    }
}

fn short_id(id: &str) -> &str {
    id.char_indices().nth(12).map_or(id, |(end, _)| &id[..end])
}

/// Per-record results of one reconciliation pass, in processing order.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<(String, Result<Outcome, ReconcileError>)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ReconcileError)> {
        self.results
            .iter()
            .filter_map(|(name, result)| result.as_ref().err().map(|e| (name.as_str(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_shortens_ids() {
        let created = Outcome::Created {
            id: "0123456789abcdef".to_string(),
        };
        assert_eq!(created.to_string(), "created 0123456789ab");

        let short = Outcome::Created { id: "abc".to_string() };
        assert_eq!(short.to_string(), "created abc");

        let wide = Outcome::Created {
            id: "ééééééééééééé".to_string(),
        };
        assert_eq!(wide.to_string(), "created éééééééééééé");
    }
}
