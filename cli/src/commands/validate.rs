use berth_container::dependency_order;
use berth_model::validate;
use std::path::Path;

use crate::utils::load_records;

pub fn validate_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(file)?;

    let mut invalid = 0;
    for record in &records {
        if let Err(e) = validate(record) {
            invalid += 1;
            eprintln!("{}: {}", record.name, e);
        }
    }
    dependency_order(&records)?;

    if invalid > 0 {
        return Err(format!("{} of {} records are invalid", invalid, records.len()).into());
    }

    println!("{} records OK", records.len());
    Ok(())
}
