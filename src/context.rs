use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};
use tracing::info;

/// Where numeric work runs. Only the CPU backend exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

/// Run-wide state handed explicitly to every component that needs it: the
/// compute device and the single random source behind weight initialization
/// and shuffling.
#[derive(Debug, Clone)]
pub struct Context {
    pub device: Device,
    seed: u64,
    rng: StdRng,
}

impl Context {
    pub fn new(seed: u64) -> Context {
        let device = Device::default();
        info!("Using {} device", device);
        Context::with_device(device, seed)
    }

    pub fn with_device(device: Device, seed: u64) -> Context {
        Context { device, seed, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// A new generator seeded from this context, for components that keep
    /// their own stream (e.g. a loader reshuffling every epoch).
    pub fn fork_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_stream() {
        let mut a = Context::with_device(Device::Cpu, 42);
        let mut b = Context::with_device(Device::Cpu, 42);
        let xs: Vec<u64> = (0..4).map(|_| a.rng().gen()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.rng().gen()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn forks_diverge_from_each_other() {
        let mut ctx = Context::with_device(Device::Cpu, 1);
        let mut f1 = ctx.fork_rng();
        let mut f2 = ctx.fork_rng();
        assert_ne!(f1.gen::<u64>(), f2.gen::<u64>());
    }
}
