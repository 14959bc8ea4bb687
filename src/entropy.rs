//! Seed acquisition for the randomized name-hashing of the parser core.
//!
//! Hash tables keyed by element and attribute names are attacker-facing, so
//! every parser instance randomizes its hash function with a seed obtained
//! here. Acquisition walks an ordered chain of platform strategies and takes
//! the first one that succeeds; a deterministic time/pid/address mix closes
//! the chain so the call as a whole cannot fail. The chain runs once per
//! instance and the seed is immutable afterwards, otherwise keys already
//! hashed into a table would go stale.

use std::{
    fmt,
    sync::OnceLock,
    time::{SystemTime, UNIX_EPOCH},
};

const SEED_BYTES: usize = size_of::<usize>();

/// Upper bound on retries within a single kernel strategy before the chain
/// moves on (EINTR, partial reads).
const MAX_STRATEGY_ATTEMPTS: usize = 8;

#[cfg(all(feature = "dev-urandom", unix))]
const ENTROPY_DEVICE: &str = "/dev/urandom";

/// A hash-function seed, fixed for the lifetime of one parser instance.
///
/// Uniqueness across instances is not guaranteed; unpredictability from the
/// outside is the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(usize);

impl Seed {
    pub fn value(self) -> usize {
        self.0
    }
}

/// How trustworthy the acquired seed is.
///
/// `Weak` marks the deterministic fallback mix. It is diagnostic data, not an
/// error: parsing proceeds normally either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedQuality {
    Strong,
    Weak,
}

impl fmt::Display for SeedQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Weak => write!(f, "weak"),
        }
    }
}

/// The strategy that produced a seed, in chain priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropySource {
    FastRng,
    Getrandom,
    GetrandomSyscall,
    UrandomDevice,
    TimePidMix,
}

impl fmt::Display for EntropySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FastRng => write!(f, "fast-rng"),
            Self::Getrandom => write!(f, "getrandom"),
            Self::GetrandomSyscall => write!(f, "syscall(SYS_getrandom)"),
            Self::UrandomDevice => write!(f, "/dev/urandom"),
            Self::TimePidMix => write!(f, "time/pid mix"),
        }
    }
}

/// Outcome of one acquisition, including which strategy was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub seed: Seed,
    pub quality: SeedQuality,
    pub source: EntropySource,
}

/// Which entropy strategies this build/platform can attempt.
///
/// Resolved once per process from cargo features and the target platform,
/// mirroring the capability macros of a configure-generated header. Tests
/// inject hand-built tables to exercise the chain ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntropyCaps {
    pub fast_rng: bool,
    pub getrandom: bool,
    pub syscall_getrandom: bool,
    pub urandom_device: bool,
}

impl EntropyCaps {
    pub fn detect() -> Self {
        Self {
            fast_rng: cfg!(feature = "fast-rng"),
            getrandom: cfg!(all(
                feature = "getrandom",
                any(target_os = "linux", target_os = "android")
            )),
            syscall_getrandom: cfg!(all(
                feature = "syscall-getrandom",
                any(target_os = "linux", target_os = "android")
            )),
            urandom_device: cfg!(all(feature = "dev-urandom", unix)),
        }
    }

    /// A table with every strategy disabled; acquisition degrades to the
    /// deterministic fallback.
    pub fn none() -> Self {
        Self {
            fast_rng: false,
            getrandom: false,
            syscall_getrandom: false,
            urandom_device: false,
        }
    }
}

fn cached_caps() -> &'static EntropyCaps {
    static CAPS: OnceLock<EntropyCaps> = OnceLock::new();
    CAPS.get_or_init(EntropyCaps::detect)
}

/// Acquire a seed using the capabilities detected for this build.
///
/// Total by construction: the fallback mix cannot fail. Callers that care
/// which strategy was taken use [`acquire_seed_report`] instead.
pub fn acquire_seed() -> Seed {
    acquire_seed_report().seed
}

/// Like [`acquire_seed`], but keeps the strategy and quality tags.
pub fn acquire_seed_report() -> SeedReport {
    acquire_seed_report_with(cached_caps())
}

/// Walk the strategy chain under an explicit capability table.
///
/// Strategies are attempted in priority order and the first success wins;
/// per-strategy failures are not surfaced, they advance the chain.
pub fn acquire_seed_report_with(caps: &EntropyCaps) -> SeedReport {
    if caps.fast_rng {
        if let Some(value) = fetch_fast_rng() {
            return strong(value, EntropySource::FastRng);
        }
    }
    if caps.getrandom {
        if let Some(value) = fetch_getrandom() {
            return strong(value, EntropySource::Getrandom);
        }
    }
    if caps.syscall_getrandom {
        if let Some(value) = fetch_getrandom_syscall() {
            return strong(value, EntropySource::GetrandomSyscall);
        }
    }
    if caps.urandom_device {
        if let Some(value) = fetch_urandom() {
            return strong(value, EntropySource::UrandomDevice);
        }
    }
    SeedReport {
        seed: Seed(fallback_mix()),
        quality: SeedQuality::Weak,
        source: EntropySource::TimePidMix,
    }
}

fn strong(value: usize, source: EntropySource) -> SeedReport {
    SeedReport {
        seed: Seed(value),
        quality: SeedQuality::Strong,
        source,
    }
}

/// Userspace generator kept seeded by the runtime. Cheapest path, no
/// syscall per acquisition.
#[cfg(feature = "fast-rng")]
fn fetch_fast_rng() -> Option<usize> {
    // The generator hands out fixed-width integers; truncate to the
    // pointer-width seed on 32-bit targets.
    Some(rand::random::<u64>() as usize)
}

#[cfg(not(feature = "fast-rng"))]
fn fetch_fast_rng() -> Option<usize> {
    None
}

#[cfg(all(
    feature = "getrandom",
    any(target_os = "linux", target_os = "android")
))]
fn fetch_getrandom() -> Option<usize> {
    let mut buf = [0u8; SEED_BYTES];
    let mut filled = 0;
    let mut attempts = 0;
    while filled < buf.len() && attempts < MAX_STRATEGY_ATTEMPTS {
        attempts += 1;
        let res = unsafe {
            libc::getrandom(
                buf[filled..].as_mut_ptr() as *mut libc::c_void,
                buf.len() - filled,
                libc::GRND_NONBLOCK,
            )
        };
        if res < 0 {
            if std::io::Error::last_os_error().kind() != std::io::ErrorKind::Interrupted {
                return None;
            }
        } else {
            filled += res as usize;
        }
    }
    (filled == buf.len()).then(|| usize::from_ne_bytes(buf))
}

#[cfg(not(all(
    feature = "getrandom",
    any(target_os = "linux", target_os = "android")
)))]
fn fetch_getrandom() -> Option<usize> {
    None
}

/// Same kernel source as [`fetch_getrandom`] but reached by raw syscall
/// number, for libc builds that lack the wrapper.
#[cfg(all(
    feature = "syscall-getrandom",
    any(target_os = "linux", target_os = "android")
))]
fn fetch_getrandom_syscall() -> Option<usize> {
    let mut buf = [0u8; SEED_BYTES];
    let mut filled = 0;
    let mut attempts = 0;
    while filled < buf.len() && attempts < MAX_STRATEGY_ATTEMPTS {
        attempts += 1;
        let res = unsafe {
            libc::syscall(
                libc::SYS_getrandom,
                buf[filled..].as_mut_ptr() as *mut libc::c_void,
                buf.len() - filled,
                libc::GRND_NONBLOCK,
            )
        };
        if res < 0 {
            if std::io::Error::last_os_error().kind() != std::io::ErrorKind::Interrupted {
                return None;
            }
        } else {
            filled += res as usize;
        }
    }
    (filled == buf.len()).then(|| usize::from_ne_bytes(buf))
}

#[cfg(not(all(
    feature = "syscall-getrandom",
    any(target_os = "linux", target_os = "android")
)))]
fn fetch_getrandom_syscall() -> Option<usize> {
    None
}

/// Scoped read from the OS entropy device.
///
/// The descriptor lives only for this call and is released when `file`
/// drops, on the failure paths included. The device is never held open as
/// process-wide state.
#[cfg(all(feature = "dev-urandom", unix))]
fn fetch_urandom() -> Option<usize> {
    use std::{fs::File, io::Read};

    let mut file = File::open(ENTROPY_DEVICE).ok()?;
    let mut buf = [0u8; SEED_BYTES];
    file.read_exact(&mut buf).ok()?;
    Some(usize::from_ne_bytes(buf))
}

#[cfg(not(all(feature = "dev-urandom", unix)))]
fn fetch_urandom() -> Option<usize> {
    None
}

/// Last-resort mix of always-available low-entropy signals: wall clock at
/// nanosecond resolution, process id, and the address of a stack local,
/// stirred through a splitmix64 finisher. Well distributed, not
/// cryptographic; callers see it tagged [`SeedQuality::Weak`].
fn fallback_mix() -> usize {
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let pid = std::process::id() as u64;
    let marker = 0u8;
    let stack = &marker as *const u8 as usize as u64;

    let mut mixed = clock;
    mixed ^= pid.rotate_left(32);
    mixed ^= stack.rotate_left(17);
    mixed = mixed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^= mixed >> 31;
    mixed as usize
}
