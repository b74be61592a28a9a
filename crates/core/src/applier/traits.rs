//! Trait definitions for the applier module.

use async_trait::async_trait;

use crate::feed::StagedRelease;

use super::error::ApplyError;

/// Installs staged release payloads.
///
/// The orchestrator calls `apply` once per staged release, lowest version
/// first, so delta payloads land before the final target. Implementations
/// must leave the previous install intact when they fail.
#[async_trait]
pub trait Applier: Send + Sync {
    /// Returns the name of this applier implementation.
    fn name(&self) -> &str;

    /// Install one staged release payload.
    async fn apply(&self, staged: &StagedRelease) -> Result<(), ApplyError>;
}
