use crate::rebind::{update_message, CertificateBinding, CertificateId, ResourceAdapter};
use crate::utils::errors::Result;

pub fn dry_run_banner() -> Vec<String> {
    vec!["# Dry run mode".to_string(), String::new()]
}

/// Bindings of the adapter's kind currently presenting `source`.
/// An empty `source` keeps every binding.
pub async fn locate_bindings<A>(adapter: &A, source: &str) -> Result<Vec<CertificateBinding>>
where
    A: ResourceAdapter + ?Sized,
{
    let all = adapter.bindings().await?;
    let total = all.len();

    let matched: Vec<_> = all
        .into_iter()
        .filter(|b| b.certificate.matches(source))
        .collect();

    tracing::debug!(
        "{}: {} of {total} bindings match '{source}'",
        adapter.kind(),
        matched.len()
    );
    Ok(matched)
}

/// Rebind each binding to `dest` in order, or only describe the changes in dry-run mode.
///
/// The first failing rebind aborts the run. Bindings already switched stay switched.
pub async fn bulk_rebind<A>(
    adapter: &A,
    bindings: &[CertificateBinding],
    dest: &CertificateId,
    dry_run: bool,
) -> Result<Vec<String>>
where
    A: ResourceAdapter + ?Sized,
{
    let mut updates = Vec::with_capacity(bindings.len() + 2);
    if dry_run {
        updates.extend(dry_run_banner());
    }

    for binding in bindings {
        let msg = update_message(binding, binding.certificate.as_str(), dest.as_str());
        if !dry_run {
            tracing::info!("Rebinding {} to {dest}", binding.label());
            adapter.rebind(binding, dest).await?;
        }
        updates.push(msg);
    }

    Ok(updates)
}

pub async fn bulk_update<A>(
    adapter: &A,
    source: &str,
    dest: &CertificateId,
    dry_run: bool,
) -> Result<Vec<String>>
where
    A: ResourceAdapter + ?Sized,
{
    let bindings = locate_bindings(adapter, source).await?;
    bulk_rebind(adapter, &bindings, dest, dry_run).await
}
