use crate::args::run_request;
use crate::diff::{Decision, decide};
use crate::error::ReconcileError;
use crate::parser::{parse_inspect, parse_list};
use crate::types::*;
use berth_model::{ContainerModel, DesiredRecord, ValidationError, validate};
use berth_shim::Shim;
use std::collections::HashMap;

/// Converges engine state towards desired records, one container at a time.
///
/// The cached observed state is filled by [`Reconciler::prefetch`] and kept
/// current afterwards from the records that were applied, without asking
/// the engine again.
pub struct Reconciler<S> {
    shim: S,
    observed: HashMap<String, ContainerModel>,
}

impl<S: Shim> Reconciler<S> {
    pub fn new(shim: S) -> Self {
        Self {
            shim,
            observed: HashMap::new(),
        }
    }

    pub fn shim(&self) -> &S {
        &self.shim
    }

    pub fn observed(&self, name: &str) -> Option<&ContainerModel> {
        self.observed.get(name)
    }

    /// All cached observed models, sorted by name.
    pub fn observed_all(&self) -> Vec<&ContainerModel> {
        let mut models: Vec<_> = self.observed.values().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    /// Replaces the cache with one `list` and one batched `inspect` call.
    pub async fn prefetch(&mut self) -> Result<usize, ReconcileError> {
        let listed = parse_list(&self.shim.list().await?)?;

        let models = if listed.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<String> = listed.iter().map(|c| c.id.clone()).collect();
            let raw = self.shim.inspect(&ids).await?;
            parse_inspect(&raw, &listed)?
        };

        tracing::debug!("Prefetched {} containers", models.len());
        self.observed = models.into_iter().map(|m| (m.name.clone(), m)).collect();
        Ok(self.observed.len())
    }

    /// Validates `record` and decides what reconciling it would do.
    pub fn plan(&self, record: &DesiredRecord) -> Result<Plan, ReconcileError> {
        let desired = validate(record).map_err(|source| ReconcileError::Validation {
            name: record.name.clone(),
            source,
        })?;
        let decision = decide(&desired, self.observed.get(&desired.name));
        Ok(Plan { desired, decision })
    }

    pub async fn reconcile(&mut self, record: &DesiredRecord) -> Result<Outcome, ReconcileError> {
        let Plan { desired, decision } = self.plan(record)?;
        let name = desired.name.clone();

        let outcome = match decision {
            Decision::NoOp => {
                tracing::debug!("Container {} is in sync", name);
                Outcome::InSync
            }
            Decision::Create => {
                tracing::info!("Creating container: {}", name);
                let id = self.create(&desired).await?;
                Outcome::Created { id }
            }
            Decision::Recreate(drift) => {
                tracing::info!("Container {} is out of sync on {}, recreating", name, drift);
                self.destroy(&name).await?;
                self.observed.remove(&name);
                let id = self.create(&desired).await?;
                Outcome::Recreated { id, drift }
            }
            Decision::Destroy => {
                tracing::info!("Destroying container: {}", name);
                self.destroy(&name).await?;
                self.observed.remove(&name);
                return Ok(Outcome::Destroyed);
            }
        };

        self.refresh(desired);
        Ok(outcome)
    }

    /// Prefetches once, then reconciles each record in the given order.
    ///
    /// A failure confined to one record is recorded in the report and the
    /// pass moves on; failing to read engine state aborts the pass.
    pub async fn reconcile_all<'a, I>(&mut self, records: I) -> Result<Report, ReconcileError>
    where
        I: IntoIterator<Item = &'a DesiredRecord>,
    {
        self.prefetch().await?;

        let mut report = Report::default();
        for record in records {
            let result = self.reconcile(record).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to reconcile container {}: {}", record.name, e);
            }
            report.results.push((record.name.clone(), result));
        }
        Ok(report)
    }

    async fn create(&self, desired: &ContainerModel) -> Result<String, ReconcileError> {
        let request = run_request(desired).ok_or_else(|| ReconcileError::Validation {
            name: desired.name.clone(),
            source: ValidationError::MissingImage,
        })?;
        self.shim
            .run(&request)
            .await
            .map_err(|source| ReconcileError::Engine {
                name: desired.name.clone(),
                source,
            })
    }

    async fn destroy(&self, name: &str) -> Result<(), ReconcileError> {
        let engine = |source| ReconcileError::Engine {
            name: name.to_string(),
            source,
        };
        self.shim.stop(name).await.map_err(engine)?;
        self.shim.remove(name, true).await.map_err(engine)
    }

    // Declared fields replace the cached ones; undeclared ones keep whatever
    // the engine last reported.
    fn refresh(&mut self, desired: ContainerModel) {
        let Some(cached) = self.observed.get_mut(&desired.name) else {
            self.observed.insert(desired.name.clone(), desired);
            return;
        };

        let ContainerModel {
            name: _,
            ensure,
            image,
            env,
            links,
            volumes,
            hostname,
            ports,
            user,
            restart,
            network,
        } = desired;

        cached.ensure = ensure;
        cached.image = image.or(cached.image.take());
        cached.env = env.or(cached.env.take());
        cached.links = links.or(cached.links.take());
        cached.volumes = volumes.or(cached.volumes.take());
        cached.hostname = hostname.or(cached.hostname.take());
        cached.ports = ports.or(cached.ports.take());
        cached.user = user.or(cached.user.take());
        cached.restart = restart.or(cached.restart.take());
        cached.network = network.or(cached.network.take());
    }
}
