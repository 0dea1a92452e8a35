use berth_container::Reconciler;
use berth_shim::Shim;

use crate::utils::truncate;

pub async fn list_containers<S: Shim>(shim: S) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconciler = Reconciler::new(shim);
    reconciler
        .prefetch()
        .await
        .map_err(|e| format!("Failed to list containers: {}", e))?;

    let containers = reconciler.observed_all();
    if containers.is_empty() {
        println!("No containers found");
        return Ok(());
    }

    println!(
        "{:<20} {:<30} {:<15} {:<15} {:<30}",
        "NAME", "IMAGE", "RESTART", "NETWORK", "PORTS"
    );

    for container in containers {
        let image = container.image.as_deref().unwrap_or_default();
        let restart = container
            .restart
            .map(|r| r.to_string())
            .unwrap_or_default();
        let network = container
            .network
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_default();
        let ports = container
            .ports
            .as_deref()
            .map(|p| p.join(", "))
            .unwrap_or_default();

        println!(
            "{:<20} {:<30} {:<15} {:<15} {:<30}",
            truncate(&container.name, 20),
            truncate(image, 30),
            restart,
            truncate(&network, 15),
            truncate(&ports, 30)
        );
    }

    Ok(())
}
