//! `ncarray` global configuration options.
//!
//! See [`Config`] for the list of options.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the `ncarray` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Transfer Tracing
/// > default: [`false`]
///
/// If enabled, every transfer between a variable and its store is logged at the `debug` level with the hyperslab and the number of bytes moved.
///
/// ## Scalar Length One
/// > default: [`true`]
///
/// If enabled, [`Variable::read_scalar`](crate::variable::Variable::read_scalar) and [`Variable::write_scalar`](crate::variable::Variable::write_scalar) also accept a one-dimensional variable with a length of one.
/// Otherwise, only zero-dimensional variables can be read and written as a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    trace_transfers: bool,
    scalar_length_one: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_transfers: false,
            scalar_length_one: true,
        }
    }
}

impl Config {
    /// Get the [transfer tracing](#transfer-tracing) configuration.
    #[must_use]
    pub fn trace_transfers(&self) -> bool {
        self.trace_transfers
    }

    /// Set the [transfer tracing](#transfer-tracing) configuration.
    pub fn set_trace_transfers(&mut self, trace_transfers: bool) -> &mut Self {
        self.trace_transfers = trace_transfers;
        self
    }

    /// Get the [scalar length one](#scalar-length-one) configuration.
    #[must_use]
    pub fn scalar_length_one(&self) -> bool {
        self.scalar_length_one
    }

    /// Set the [scalar length one](#scalar-length-one) configuration.
    pub fn set_scalar_length_one(&mut self, scalar_length_one: bool) -> &mut Self {
        self.scalar_length_one = scalar_length_one;
        self
    }
}

static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(Config::default()));

/// Returns a reference to the global `ncarray` configuration.
#[must_use]
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(PoisonError::into_inner)
}

/// Returns a mutable reference to the global `ncarray` configuration.
#[must_use]
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn config_scalar_length_one() {
        assert!(global_config().scalar_length_one());
        global_config_mut().set_scalar_length_one(false);
        assert!(!global_config().scalar_length_one());
        global_config_mut().set_scalar_length_one(true);
    }

    #[test]
    fn config_default() {
        let mut config = Config::default();
        assert!(!config.trace_transfers());
        config.set_trace_transfers(true).set_scalar_length_one(false);
        assert!(config.trace_transfers());
        assert!(!config.scalar_length_one());
    }
}
