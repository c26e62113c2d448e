//! Uniquely named FIFO special files in a temp directory.
//!
//! Names are `prefix` followed by a nine-digit pseudo-random suffix. A name
//! that already exists is retried with a fresh suffix, up to a fixed number
//! of attempts.

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Default number of names tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Default number of collisions tolerated before reseeding on each further one
pub const DEFAULT_RESEED_AFTER: usize = 10;

/// Multiplier and increment from Numerical Recipes
const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

static DEFAULT_FIFO: TempFifo = TempFifo::new();

/// Reports whether named pipes can be created on this platform.
pub const fn fifo_supported() -> bool {
    cfg!(unix)
}

/// Linear congruential generator for name suffixes.
///
/// The state sits behind its own mutex, so one generator can be shared by
/// concurrent callers. A zero state is seeded from the clock on first use.
#[derive(Debug)]
pub struct SuffixGenerator {
    state: Mutex<u32>,
}

impl Default for SuffixGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixGenerator {
    /// Creates a generator seeded lazily from the clock and process id
    pub const fn new() -> Self {
        Self::with_seed(0)
    }

    /// Creates a generator with a fixed seed (0 means seed lazily)
    pub const fn with_seed(seed: u32) -> Self {
        Self {
            state: Mutex::new(seed),
        }
    }

    /// Advances the generator and returns the next nine-digit suffix
    pub fn next_suffix(&self) -> String {
        let mut state = self.lock();
        if *state == 0 {
            *state = clock_seed();
        }
        *state = state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        format!("{:09}", *state % 1_000_000_000)
    }

    /// Replaces the state with a fresh clock seed
    pub fn reseed(&self) {
        *self.lock() = clock_seed();
    }

    fn lock(&self) -> MutexGuard<'_, u32> {
        // A plain integer cannot be left half-written
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos.wrapping_add(u64::from(std::process::id())) as u32
}

/// Configuration for FIFO allocation
#[derive(Debug, Clone)]
pub struct TempFifoConfig {
    /// Directory to create FIFOs in (`None` = system temp directory)
    pub dir: Option<PathBuf>,
    /// Maximum number of names to try
    pub max_attempts: usize,
    /// Collisions tolerated before the generator is reseeded
    pub reseed_after: usize,
}

impl Default for TempFifoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TempFifoConfig {
    /// Creates a new config with default values
    pub const fn new() -> Self {
        Self {
            dir: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            reseed_after: DEFAULT_RESEED_AFTER,
        }
    }

    /// Sets the directory FIFOs are created in
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Sets the maximum number of attempts
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the collision count after which the generator is reseeded
    pub fn reseed_after(mut self, collisions: usize) -> Self {
        self.reseed_after = collisions;
        self
    }

    fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// FIFO allocator owning its suffix generator
#[derive(Debug, Default)]
pub struct TempFifo {
    config: TempFifoConfig,
    suffixes: SuffixGenerator,
}

impl TempFifo {
    /// Creates an allocator with default configuration
    pub const fn new() -> Self {
        Self {
            config: TempFifoConfig::new(),
            suffixes: SuffixGenerator::new(),
        }
    }

    /// Creates an allocator with custom configuration
    pub fn with_config(config: TempFifoConfig) -> Self {
        Self {
            config,
            suffixes: SuffixGenerator::new(),
        }
    }

    /// Replaces the suffix generator
    pub fn with_generator(mut self, suffixes: SuffixGenerator) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Returns the active configuration
    pub fn config(&self) -> &TempFifoConfig {
        &self.config
    }

    /// Create a new FIFO named `prefix` plus a unique suffix, mode `0600`.
    pub fn create(&self, prefix: &str) -> Result<PathBuf> {
        if !fifo_supported() {
            return Err(Error::Unsupported("TempFifo"));
        }

        let dir = self.config.resolved_dir();
        let mut collisions = 0;
        for _ in 0..self.config.max_attempts {
            let path = dir.join(format!("{}{}", prefix, self.suffixes.next_suffix()));
            match make_fifo(&path) {
                Ok(()) => {
                    debug!("Created fifo {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    collisions += 1;
                    trace!("Fifo name taken: {}", path.display());
                    if collisions > self.config.reseed_after {
                        self.suffixes.reseed();
                    }
                }
                Err(e) => return Err(Error::fifo_create(path, e)),
            }
        }

        Err(Error::FifoExhausted {
            dir,
            attempts: self.config.max_attempts,
        })
    }
}

/// Create a FIFO named `prefix` plus a unique suffix in the system temp directory.
///
/// Calls share one process-wide generator.
pub fn create_temp_fifo(prefix: &str) -> Result<PathBuf> {
    DEFAULT_FIFO.create(prefix)
}

#[cfg(unix)]
fn make_fifo(path: &Path) -> io::Result<()> {
    use nix::sys::stat::Mode;
    nix::unistd::mkfifo(path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn make_fifo(_path: &Path) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}
