//! Fluent builder for constructing a [`Sim`].

use gs_spatial::{DijkstraRouter, Router};

use crate::{NetworkRegistry, RunConfig, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`RunConfig`]: seed, networks, profiles
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                        |
/// |------------------|------------------------------------------------|
/// | `.router(r)`     | [`DijkstraRouter`]                             |
/// | `.registry(reg)` | Built from `config.networks` on `build()`      |
///
/// # Example
///
/// ```rust,ignore
/// let config = RunConfig::load(Path::new("run.toml"))?;
/// let sim = SimBuilder::new(config).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router + Clone = DijkstraRouter> {
    config:   RunConfig,
    registry: Option<NetworkRegistry>,
    router:   R,
}

impl SimBuilder<DijkstraRouter> {
    pub fn new(config: RunConfig) -> Self {
        Self { config, registry: None, router: DijkstraRouter }
    }
}

impl<R: Router + Clone> SimBuilder<R> {
    /// Route with `router` instead of the default.
    pub fn router<R2: Router + Clone>(self, router: R2) -> SimBuilder<R2> {
        SimBuilder { config: self.config, registry: self.registry, router }
    }

    /// Supply prebuilt networks instead of building `config.networks`.
    ///
    /// Every profile's network must be present in `registry`.
    pub fn registry(mut self, registry: NetworkRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validate the configuration, build the networks if none were supplied,
    /// and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        let registry = match self.registry {
            Some(registry) => {
                validate_profiles(&self.config, &registry)?;
                registry
            }
            None => {
                self.config.validate()?;
                NetworkRegistry::build(&self.config.networks, self.config.seed)?
            }
        };

        if self.config.total_users() > u32::MAX as u64 {
            return Err(SimError::Config(format!(
                "{} users exceed the id space",
                self.config.total_users()
            )));
        }

        Ok(Sim {
            seed: self.config.seed,
            profiles: self.config.profiles,
            registry,
            router: self.router,
        })
    }
}

/// Profile checks of [`RunConfig::validate`], against a supplied registry.
fn validate_profiles(config: &RunConfig, registry: &NetworkRegistry) -> SimResult<()> {
    if config.profiles.is_empty() {
        return Err(SimError::Config("no profiles configured".to_owned()));
    }
    for p in &config.profiles {
        if !registry.contains(&p.network) {
            return Err(SimError::UnknownNetwork(p.network.clone()));
        }
        if p.num_users == 0 {
            return Err(SimError::Config(format!("profile `{}` has no users", p.name)));
        }
        p.validate()?;
    }
    Ok(())
}
