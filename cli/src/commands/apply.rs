use berth_container::{Reconciler, dependency_order};
use berth_shim::Shim;
use std::path::Path;

use crate::utils::load_records;

pub async fn apply<S: Shim>(shim: S, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(file)?;
    let ordered = dependency_order(&records)?;

    let mut reconciler = Reconciler::new(shim);
    let report = reconciler
        .reconcile_all(ordered)
        .await
        .map_err(|e| format!("Reconciliation aborted: {}", e))?;

    for (name, result) in &report.results {
        match result {
            Ok(outcome) => println!("{}: {}", name, outcome),
            Err(e) => eprintln!("{}: failed: {}", name, e),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(format!("{} of {} containers failed", failed, report.results.len()).into());
    }

    Ok(())
}

pub async fn plan<S: Shim>(shim: S, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(file)?;
    let ordered = dependency_order(&records)?;

    let mut reconciler = Reconciler::new(shim);
    reconciler
        .prefetch()
        .await
        .map_err(|e| format!("Failed to read engine state: {}", e))?;

    let mut invalid = 0;
    let mut changes = 0;
    for record in ordered {
        match reconciler.plan(record) {
            Ok(plan) => {
                if plan.decision.is_mutation() {
                    changes += 1;
                }
                println!("{}: {}", record.name, plan.decision);
            }
            Err(e) => {
                invalid += 1;
                eprintln!("{}: invalid: {}", record.name, e);
            }
        }
    }

    if invalid > 0 {
        return Err(format!("{} of {} records are invalid", invalid, records.len()).into());
    }

    println!("{} of {} containers would change", changes, records.len());
    Ok(())
}
