use crate::error::OrderError;
use berth_model::DesiredRecord;
use std::collections::{HashMap, HashSet};

/// Orders `records` so that every record comes after the records it links to
/// or shares a network stack with.
///
/// Records keep their relative input order wherever dependencies allow it.
/// Dependencies on containers outside the batch are ignored.
pub fn dependency_order(records: &[DesiredRecord]) -> Result<Vec<&DesiredRecord>, OrderError> {
    let mut index = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        if index.insert(record.name.as_str(), i).is_some() {
            return Err(OrderError::DuplicateName(record.name.clone()));
        }
    }

    let deps: Vec<Vec<usize>> = records
        .iter()
        .map(|record| {
            record
                .dependencies()
                .iter()
                .filter_map(|dep| index.get(dep.as_str()).copied())
                .collect()
        })
        .collect();

    let mut placed = HashSet::new();
    let mut ordered = Vec::with_capacity(records.len());

    while ordered.len() < records.len() {
        let next = (0..records.len())
            .find(|i| !placed.contains(i) && deps[*i].iter().all(|d| placed.contains(d)));

        match next {
            Some(i) => {
                placed.insert(i);
                ordered.push(&records[i]);
            }
            None => {
                let stuck = (0..records.len())
                    .filter(|i| !placed.contains(i))
                    .map(|i| records[i].name.clone())
                    .collect();
                return Err(OrderError::Cycle(stuck));
            }
        }
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names<'a>(records: &[&'a DesiredRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn linked(name: &str, targets: &[&str]) -> DesiredRecord {
        let links: serde_json::Map<_, _> = targets
            .iter()
            .map(|t| (format!("{}-alias", t), json!(t)))
            .collect();
        DesiredRecord {
            links: Some(serde_json::Value::Object(links)),
            ..DesiredRecord::new(name)
        }
    }

    #[test]
    fn test_independent_records_keep_input_order() {
        let records = vec![DesiredRecord::new("b"), DesiredRecord::new("a")];
        assert_eq!(names(&dependency_order(&records).unwrap()), ["b", "a"]);
    }

    #[test]
    fn test_link_targets_come_first() {
        let records = vec![
            linked("web", &["db", "cache"]),
            DesiredRecord::new("cache"),
            linked("db", &[]),
        ];
        assert_eq!(
            names(&dependency_order(&records).unwrap()),
            ["cache", "db", "web"]
        );
    }

    #[test]
    fn test_container_network_is_a_dependency() {
        let sidecar = DesiredRecord {
            network: Some("container:app".to_string()),
            ..DesiredRecord::new("sidecar")
        };
        let records = vec![sidecar, DesiredRecord::new("app")];
        assert_eq!(
            names(&dependency_order(&records).unwrap()),
            ["app", "sidecar"]
        );
    }

    #[test]
    fn test_external_dependencies_are_ignored() {
        let records = vec![linked("web", &["managed-elsewhere"])];
        assert_eq!(names(&dependency_order(&records).unwrap()), ["web"]);
    }

    #[test]
    fn test_cycles_are_reported() {
        let records = vec![
            linked("a", &["b"]),
            linked("b", &["a"]),
            DesiredRecord::new("c"),
        ];
        assert_eq!(
            dependency_order(&records).unwrap_err(),
            OrderError::Cycle(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let records = vec![DesiredRecord::new("web"), DesiredRecord::new("web")];
        assert_eq!(
            dependency_order(&records).unwrap_err(),
            OrderError::DuplicateName("web".to_string())
        );
    }
}
