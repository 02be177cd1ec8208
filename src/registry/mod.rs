//! Public registry availability checks.
//!
//! A name is *available* when the public registry has no package under it,
//! meaning anyone could publish one. The [`RegistryOracle`] trait is the seam
//! between the scanner and the network; [`PublicRegistry`] is the HTTP
//! implementation against npm and PyPI.
//!
//! # Example
//!
//! ```no_run
//! use dustilock::config::RegistryConfig;
//! use dustilock::registry::{PublicRegistry, RegistryOracle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = PublicRegistry::new(&RegistryConfig::default())?;
//!     if registry.is_npm_package_available("some-internal-name").await? {
//!         println!("anyone can publish some-internal-name");
//!     }
//!     Ok(())
//! }
//! ```

mod public;

pub use public::{availability_from_status, PublicRegistry};

use crate::error::OracleError;
use crate::model::Ecosystem;
use async_trait::async_trait;

/// Answers whether a package name is unclaimed on its public registry.
///
/// Implementations must not retry; a failed query is reported as an error
/// and ends the scan.
#[async_trait]
pub trait RegistryOracle: Send + Sync {
    /// Returns true if no package named `name` exists on the npm registry.
    async fn is_npm_package_available(&self, name: &str) -> Result<bool, OracleError>;

    /// Returns true if no project named `name` exists on PyPI.
    async fn is_pypi_package_available(&self, name: &str) -> Result<bool, OracleError>;

    async fn is_available(&self, ecosystem: Ecosystem, name: &str) -> Result<bool, OracleError> {
        match ecosystem {
            Ecosystem::Node => self.is_npm_package_available(name).await,
            Ecosystem::Python => self.is_pypi_package_available(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyNpm;

    #[async_trait]
    impl RegistryOracle for OnlyNpm {
        async fn is_npm_package_available(&self, _name: &str) -> Result<bool, OracleError> {
            Ok(true)
        }

        async fn is_pypi_package_available(&self, _name: &str) -> Result<bool, OracleError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_is_available_dispatches_by_ecosystem() {
        let oracle = OnlyNpm;
        assert!(oracle.is_available(Ecosystem::Node, "x").await.unwrap());
        assert!(!oracle.is_available(Ecosystem::Python, "x").await.unwrap());
    }
}
