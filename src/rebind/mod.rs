pub mod binding;
pub mod executor;

pub use binding::{update_message, BindingLocation, CertificateBinding, CertificateId, ResourceKind};
pub use executor::{bulk_rebind, bulk_update, dry_run_banner, locate_bindings};

use crate::utils::errors::Result;
use async_trait::async_trait;

/// A kind of AWS resource that presents certificates through listeners or distributions
#[async_trait]
pub trait ResourceAdapter {
    fn kind(&self) -> ResourceKind;

    /// Every certificate binding of this kind, in provider listing order
    async fn bindings(&self) -> Result<Vec<CertificateBinding>>;

    /// Point a single binding at `dest`
    async fn rebind(&self, binding: &CertificateBinding, dest: &CertificateId) -> Result<()>;
}
