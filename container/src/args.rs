use berth_model::ContainerModel;
use berth_shim::RunRequest;

/// Options for the engine's create-and-run call.
///
/// Emission order is fixed: env, links, volumes, hostname, ports, user,
/// restart, network. Absent or empty fields emit nothing.
pub fn create_args(desired: &ContainerModel) -> Vec<String> {
    let mut args = Vec::new();

    for (key, value) in desired.env.iter().flatten() {
        push(&mut args, "-e", format!("{}={}", key, value));
    }
    // The engine spells a link as `<container>:<alias>`.
    for (alias, target) in desired.links.iter().flatten() {
        push(&mut args, "--link", format!("{}:{}", target, alias));
    }
    for volume in desired.volumes.iter().flatten() {
        push(&mut args, "-v", volume.clone());
    }
    if let Some(hostname) = desired.hostname.as_ref().filter(|h| !h.is_empty()) {
        push(&mut args, "-h", hostname.clone());
    }
    for port in desired.ports.iter().flatten() {
        push(&mut args, "-p", port.clone());
    }
    if let Some(user) = desired.user.as_ref().filter(|u| !u.is_empty()) {
        push(&mut args, "-u", user.clone());
    }
    if let Some(restart) = &desired.restart {
        push(&mut args, "--restart", restart.to_string());
    }
    if let Some(network) = &desired.network {
        push(&mut args, "--net", network.to_string());
    }

    args
}

/// The full create call for `desired`, or `None` when it names no image.
pub fn run_request(desired: &ContainerModel) -> Option<RunRequest> {
    let image = desired.image.as_deref()?;
    Some(RunRequest::new(&desired.name, create_args(desired), image))
}

fn push(args: &mut Vec<String>, flag: &str, value: String) {
    args.push(flag.to_string());
    args.push(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Decision, decide};
    use crate::parser::parse_inspect;
    use berth_model::{DesiredRecord, NetworkMode, RestartPolicy, validate};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_model() -> ContainerModel {
        ContainerModel {
            image: Some("nginx:latest".to_string()),
            env: Some(map(&[("A", "1"), ("B", "x=y")])),
            links: Some(map(&[("database", "db")])),
            volumes: Some(vec!["/srv:/srv:ro".to_string()]),
            hostname: Some("web.local".to_string()),
            ports: Some(vec!["8080:80".to_string(), "53/udp".to_string()]),
            user: Some("www-data".to_string()),
            restart: Some(RestartPolicy::OnFailure(3)),
            network: Some(NetworkMode::Bridge),
            ..ContainerModel::new("web")
        }
    }

    #[test]
    fn test_fixed_emission_order() {
        assert_eq!(
            create_args(&full_model()),
            [
                "-e", "A=1", "-e", "B=x=y", "--link", "db:database", "-v", "/srv:/srv:ro",
                "-h", "web.local", "-p", "8080:80", "-p", "53/udp", "-u", "www-data",
                "--restart", "on-failure:3", "--net", "bridge",
            ]
        );
    }

    #[test]
    fn test_absent_and_empty_fields_emit_nothing() {
        let model = ContainerModel {
            image: Some("nginx:latest".to_string()),
            env: Some(BTreeMap::new()),
            volumes: Some(vec![]),
            ..ContainerModel::new("web")
        };
        assert!(create_args(&model).is_empty());
    }

    #[test]
    fn test_multiplicity_is_preserved() {
        let model = ContainerModel {
            env: Some(map(&[("A", "1"), ("B", "2"), ("C", "3")])),
            ..ContainerModel::new("web")
        };
        assert_eq!(
            create_args(&model),
            ["-e", "A=1", "-e", "B=2", "-e", "C=3"]
        );
    }

    #[test]
    fn test_run_request() {
        let request = run_request(&full_model()).unwrap();
        assert_eq!(request.name, "web");
        assert_eq!(request.image, "nginx:latest");
        assert_eq!(request.options, create_args(&full_model()));

        assert!(run_request(&ContainerModel::new("web")).is_none());
    }

    // Feed the emitted flags through the shape the engine reports them in and
    // check the parser recovers the original mappings.
    #[test]
    fn test_parser_recovers_env_and_links() {
        let model = full_model();
        let args = create_args(&model);

        let values = |flag: &str| -> Vec<String> {
            args.chunks(2)
                .filter(|pair| pair[0] == flag)
                .map(|pair| pair[1].clone())
                .collect()
        };
        let links: Vec<String> = values("--link")
            .iter()
            .map(|link| {
                let (target, alias) = link.split_once(':').unwrap();
                format!("/{}:/{}/{}", target, model.name, alias)
            })
            .collect();

        let inspect = json!([{
            "Id": "abc",
            "Name": "/web",
            "Config": {"Env": values("-e"), "Hostname": "web", "Image": "nginx"},
            "HostConfig": {"Links": links}
        }]);
        let parsed = parse_inspect(&inspect.to_string(), &[]).unwrap().remove(0);

        assert_eq!(parsed.env, model.env);
        assert_eq!(parsed.links, model.links);
    }

    // Published ports come back from the engine one binding per port.
    #[test]
    fn test_published_ports_converge() {
        let record = DesiredRecord {
            image: Some("nginx".to_string()),
            ports: Some(vec![
                "8080:80".to_string(),
                "127.0.0.1:8000-8001:9000-9001".to_string(),
                "53/udp".to_string(),
            ]),
            ..DesiredRecord::new("web")
        };
        let desired = validate(&record).unwrap();
        assert_eq!(
            create_args(&desired),
            [
                "-p", "8080:80", "-p", "127.0.0.1:8000:9000", "-p", "127.0.0.1:8001:9001",
                "-p", "53/udp",
            ]
        );

        let inspect = json!([{
            "Id": "abc",
            "Name": "/web",
            "Config": {"Image": "nginx"},
            "HostConfig": {
                "PortBindings": {
                    "80/tcp": [{"HostIp": "", "HostPort": "8080"}],
                    "9000/tcp": [{"HostIp": "127.0.0.1", "HostPort": "8000"}],
                    "9001/tcp": [{"HostIp": "127.0.0.1", "HostPort": "8001"}],
                    "53/udp": [{"HostIp": "", "HostPort": ""}]
                }
            }
        }]);
        let observed = parse_inspect(&inspect.to_string(), &[]).unwrap().remove(0);

        assert_eq!(decide(&desired, Some(&observed)), Decision::NoOp);
    }
}
