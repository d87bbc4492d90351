//! Engine configuration
//!
//! Defaults are adjusted at runtime through UCI `setoption`.

/// Tunable engine settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes
    pub hash_mb: usize,
    /// Worker threads for parallel perft
    pub threads: usize,
    /// Remaining depth at or below which perft stops forking tasks
    pub perft_split_depth: u32,
}

impl EngineConfig {
    pub const MIN_HASH_MB: usize = 1;
    pub const MAX_HASH_MB: usize = 4096;
    pub const MAX_THREADS: usize = 256;

    /// Apply a UCI option by name. Returns false for unknown options or bad values.
    pub fn set_option(&mut self, name: &str, value: &str) -> bool {
        let opt = name.to_lowercase().replace([' ', '_'], "");
        let value = value.trim();
        match opt.as_str() {
            "hash" => match value.parse::<usize>() {
                Ok(mb) => {
                    self.hash_mb = mb.clamp(Self::MIN_HASH_MB, Self::MAX_HASH_MB);
                    true
                }
                Err(_) => false,
            },
            "threads" => match value.parse::<usize>() {
                Ok(n) => {
                    self.threads = n.clamp(1, Self::MAX_THREADS);
                    true
                }
                Err(_) => false,
            },
            "perftsplitdepth" => match value.parse::<u32>() {
                Ok(d) => {
                    self.perft_split_depth = d;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            hash_mb: 64,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            perft_split_depth: 2,
        }
    }
}
