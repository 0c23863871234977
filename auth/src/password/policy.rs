use super::record::Algorithm;

pub const SALT_LEN: usize = 16;

pub const ARGON2_MEMORY_KIB: u32 = 19 * 1024;
pub const ARGON2_TIME_COST: u32 = 2;
pub const ARGON2_PARALLELISM: u32 = 1;

/// scrypt CPU/memory cost, N = 2^17
pub const SCRYPT_LOG_N: u8 = 17;
pub const SCRYPT_BLOCK_SIZE: u32 = 8;
pub const SCRYPT_PARALLELISM: u32 = 1;
pub const SCRYPT_KEY_LEN: usize = 64;

pub const BCRYPT_COST: u32 = 10;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const PBKDF2_KEY_LEN: usize = 32;

/// Algorithm selection and cost parameters for password hashing.
///
/// In regulated mode every new credential is PBKDF2-HMAC-SHA256 and the
/// preference list is ignored. Otherwise algorithms are tried in
/// `preference` order until one succeeds.
///
/// Cost parameters also drive verification of scrypt and PBKDF2 records,
/// whose encodings do not embed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingPolicy {
    regulated: bool,
    preference: Vec<Algorithm>,
    pub(crate) argon2_memory_kib: u32,
    pub(crate) argon2_time_cost: u32,
    pub(crate) argon2_parallelism: u32,
    pub(crate) scrypt_log_n: u8,
    pub(crate) scrypt_block_size: u32,
    pub(crate) scrypt_parallelism: u32,
    pub(crate) bcrypt_cost: u32,
    pub(crate) pbkdf2_iterations: u32,
}

impl HashingPolicy {
    /// Create the default policy: Argon2id, then scrypt, then bcrypt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable regulated (PBKDF2-only) mode.
    pub fn regulated(mut self, regulated: bool) -> Self {
        self.regulated = regulated;
        self
    }

    /// Replace the fallback chain used outside regulated mode.
    pub fn with_preference(mut self, preference: Vec<Algorithm>) -> Self {
        self.preference = preference;
        self
    }

    /// Override the bcrypt work factor.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Override Argon2id memory (KiB), time cost and parallelism.
    pub fn with_argon2_params(mut self, memory_kib: u32, time_cost: u32, parallelism: u32) -> Self {
        self.argon2_memory_kib = memory_kib;
        self.argon2_time_cost = time_cost;
        self.argon2_parallelism = parallelism;
        self
    }

    /// Override the scrypt cost exponent (N = 2^log_n).
    pub fn with_scrypt_log_n(mut self, log_n: u8) -> Self {
        self.scrypt_log_n = log_n;
        self
    }

    /// Override the PBKDF2 iteration count.
    pub fn with_pbkdf2_iterations(mut self, iterations: u32) -> Self {
        self.pbkdf2_iterations = iterations;
        self
    }

    pub fn is_regulated(&self) -> bool {
        self.regulated
    }

    pub fn preference(&self) -> &[Algorithm] {
        &self.preference
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

impl Default for HashingPolicy {
    fn default() -> Self {
        Self {
            regulated: false,
            preference: vec![Algorithm::Argon2id, Algorithm::Scrypt, Algorithm::Bcrypt],
            argon2_memory_kib: ARGON2_MEMORY_KIB,
            argon2_time_cost: ARGON2_TIME_COST,
            argon2_parallelism: ARGON2_PARALLELISM,
            scrypt_log_n: SCRYPT_LOG_N,
            scrypt_block_size: SCRYPT_BLOCK_SIZE,
            scrypt_parallelism: SCRYPT_PARALLELISM,
            bcrypt_cost: BCRYPT_COST,
            pbkdf2_iterations: PBKDF2_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = HashingPolicy::new();

        assert!(!policy.is_regulated());
        assert_eq!(
            policy.preference(),
            &[Algorithm::Argon2id, Algorithm::Scrypt, Algorithm::Bcrypt]
        );
        assert_eq!(policy.bcrypt_cost(), 10);
        assert_eq!(policy.pbkdf2_iterations, 600_000);
        assert_eq!(policy.argon2_memory_kib, 19_456);
    }

    #[test]
    fn test_builder_overrides() {
        let policy = HashingPolicy::new()
            .regulated(true)
            .with_preference(vec![Algorithm::Bcrypt])
            .with_bcrypt_cost(12)
            .with_scrypt_log_n(14);

        assert!(policy.is_regulated());
        assert_eq!(policy.preference(), &[Algorithm::Bcrypt]);
        assert_eq!(policy.bcrypt_cost(), 12);
        assert_eq!(policy.scrypt_log_n, 14);
    }
}
