//! Simulator test harness.
//!
//! `TestContext` builds a small machine (64 Ki words of memory, generous step
//! budget), places hand-assembled programs at the default load address and
//! exposes the debug reads tests assert on.

use std::sync::Once;

use socsim_core::Simulator;
use socsim_core::common::constants::DEFAULT_LOAD_ADDRESS;
use socsim_core::config::Config;
use socsim_core::sim::SimOutcome;
use socsim_core::soc::memory::WriteStrobe;

static TRACING: Once = Once::new();

/// Routes library logs through the test writer; `RUST_LOG` selects the level.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Configuration used by most simulator tests.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.memory.words = 64 * 1024;
    config.general.cycle_budget = 1_000_000;
    config
}

pub struct TestContext {
    pub sim: Simulator,
    pub config: Config,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let sim = Simulator::from_config(&config).expect("test configuration is valid");
        Self { sim, config }
    }

    /// Writes `words` to memory starting at byte address `addr`.
    pub fn load_at(mut self, addr: u32, words: &[u32]) -> Self {
        let memory = self.sim.bus_mut().memory_mut();
        for (i, word) in words.iter().enumerate() {
            memory.write(addr + (i as u32) * 4, *word, WriteStrobe::ALL);
        }
        self
    }

    /// Writes a program at the reset vector.
    pub fn load_program(self, words: &[u32]) -> Self {
        self.load_at(DEFAULT_LOAD_ADDRESS, words)
    }

    /// Commits `n` CPU rising edges outside reset.
    pub fn run_cycles(&mut self, n: u64) -> Option<SimOutcome> {
        self.sim.run_cycles(n)
    }

    pub fn reg(&self, index: usize) -> u32 {
        self.sim.debug_read_register(index)
    }

    pub fn csr(&self, address: u32) -> u32 {
        self.sim.debug_read_csr(address)
    }

    pub fn mem(&self, addr: u32) -> u32 {
        self.sim.memory_port().read_word(addr)
    }

    pub fn pc(&self) -> u32 {
        use socsim_core::CpuCore;
        self.sim.core().instruction_address()
    }
}
