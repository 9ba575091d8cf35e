use crate::aws::iam::{IamAdapter, IamDescription};
use crate::aws::Pagination;
use crate::rebind::{
    update_message, CertificateBinding, CertificateId, ResourceAdapter, ResourceKind,
};
use crate::utils::errors::{CertUtilsError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudfront::types::{Aliases, DistributionSummary, ViewerCertificate};
use aws_sdk_cloudfront::Client;
use std::collections::HashMap;

/// Distribution row shown by `cloudfront list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionDescription {
    pub id: String,
    pub domain: String,
    /// ACM ARN, or `<iam id> | <iam name>` for IAM certificates
    pub cert: String,
    pub aliases: Vec<String>,
}

pub const TABLE_HEADERS: [&str; 3] = ["Distribution ID", "Aliases", "SSL Certificate"];

impl DistributionDescription {
    fn new(
        binding: &CertificateBinding,
        domain: String,
        iam_certs: &HashMap<String, IamDescription>,
    ) -> Self {
        let cert = match &binding.certificate {
            CertificateId::Arn(arn) => arn.clone(),
            CertificateId::IamId(id) => {
                let name = iam_certs.get(id).map(|d| d.name.as_str()).unwrap_or_default();
                format!("{id} | {name}")
            }
        };

        Self {
            id: binding.resource.clone(),
            domain,
            cert,
            aliases: binding.aliases().to_vec(),
        }
    }

    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.aliases
            .iter()
            .map(|alias| vec![self.id.clone(), alias.clone(), self.cert.clone()])
            .collect()
    }
}

/// Certificate a viewer certificate config points at, if it is not the CloudFront default
pub fn viewer_certificate_id(vc: &ViewerCertificate) -> Option<CertificateId> {
    if let Some(arn) = vc.acm_certificate_arn().filter(|a| !a.is_empty()) {
        return Some(CertificateId::Arn(arn.to_string()));
    }
    vc.iam_certificate_id()
        .filter(|id| !id.is_empty())
        .map(|id| CertificateId::IamId(id.to_string()))
}

/// Copy of `current` pointing at `dest`, keeping protocol version and SSL support method
pub fn replace_viewer_certificate(current: &ViewerCertificate, dest: &CertificateId) -> ViewerCertificate {
    let builder = ViewerCertificate::builder()
        .cloud_front_default_certificate(false)
        .set_minimum_protocol_version(current.minimum_protocol_version().cloned())
        .set_ssl_support_method(current.ssl_support_method().cloned());

    match dest {
        CertificateId::Arn(arn) => builder.acm_certificate_arn(arn),
        CertificateId::IamId(id) => builder.iam_certificate_id(id),
    }
    .build()
}

fn distribution_binding(
    id: &str,
    aliases: Option<&Aliases>,
    viewer_certificate: Option<&ViewerCertificate>,
) -> Option<CertificateBinding> {
    let certificate = viewer_certificate.and_then(viewer_certificate_id)?;
    let aliases = aliases.map(|a| a.items().to_vec()).unwrap_or_default();

    Some(CertificateBinding::distribution(id, aliases, certificate))
}

fn summary_binding(summary: &DistributionSummary) -> Option<CertificateBinding> {
    distribution_binding(
        summary.id(),
        summary.aliases(),
        summary.viewer_certificate(),
    )
}

/// Certificate filter is an exact match, alias filter a substring match on the
/// space-joined aliases. A distribution without aliases never matches a non-empty
/// alias filter.
fn matches_filters(binding: &CertificateBinding, cert_filter: &str, aliases_filter: &str) -> bool {
    if !binding.certificate.matches(cert_filter) {
        return false;
    }
    aliases_filter.is_empty() || binding.aliases().join(" ").contains(aliases_filter)
}

pub struct CloudFrontAdapter {
    client: Client,
    iam: IamAdapter,
    page: Pagination,
}

impl CloudFrontAdapter {
    /// `config` must target the global endpoint region
    pub fn new(config: &SdkConfig, page: Pagination) -> Self {
        Self {
            client: Client::new(config),
            iam: IamAdapter::new(config),
            page,
        }
    }

    async fn summaries(&self) -> Result<Vec<DistributionSummary>> {
        let mut result = Vec::new();
        let mut marker = self.page.marker.clone();

        loop {
            let out = self
                .client
                .list_distributions()
                .set_marker(marker.take())
                .set_max_items(self.page.max_items)
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("ListDistributions", e))?;

            let Some(list) = out.distribution_list() else {
                break;
            };
            result.extend(list.items().iter().cloned());

            if self.page.max_items.is_some() {
                break;
            }
            match list.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        tracing::debug!("Listed {} distributions", result.len());
        Ok(result)
    }

    /// Distributions matching the certificate and alias filters.
    /// The alias filter is a substring match and drops distributions without aliases.
    pub async fn list(
        &self,
        cert_filter: &str,
        aliases_filter: &str,
    ) -> Result<Vec<DistributionDescription>> {
        let summaries = self.summaries().await?;
        let iam_certs = self.iam.by_id().await?;

        let descs = summaries
            .iter()
            .filter_map(|summary| {
                let binding = summary_binding(summary)
                    .filter(|b| matches_filters(b, cert_filter, aliases_filter))?;
                Some(DistributionDescription::new(
                    &binding,
                    summary.domain_name().to_string(),
                    &iam_certs,
                ))
            })
            .collect();

        Ok(descs)
    }

    /// Point distribution `id` at `dest`
    pub async fn update(&self, id: &str, dest: &CertificateId) -> Result<String> {
        let binding = self.apply(id, dest).await?;
        Ok(update_message(
            &binding,
            binding.certificate.as_str(),
            dest.as_str(),
        ))
    }

    /// Fetch the live config and ETag, swap the viewer certificate and write it back
    async fn apply(&self, id: &str, dest: &CertificateId) -> Result<CertificateBinding> {
        let out = self
            .client
            .get_distribution()
            .id(id)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("GetDistribution", e))?;

        let etag = out
            .e_tag()
            .ok_or_else(|| CertUtilsError::Provider(format!("GetDistribution: no ETag for {id}")))?;
        let mut config = out
            .distribution()
            .and_then(|d| d.distribution_config())
            .cloned()
            .ok_or_else(|| CertUtilsError::NotFound(format!("Distribution {id} not found")))?;

        let current = config.viewer_certificate.clone().unwrap_or_else(|| {
            ViewerCertificate::builder()
                .cloud_front_default_certificate(true)
                .build()
        });
        let source = viewer_certificate_id(&current)
            .unwrap_or_else(|| CertificateId::Arn(String::new()));
        let aliases = config
            .aliases
            .as_ref()
            .map(|a| a.items().to_vec())
            .unwrap_or_default();

        config.viewer_certificate = Some(replace_viewer_certificate(&current, dest));

        tracing::info!("Updating viewer certificate of {id} to {dest}");
        self.client
            .update_distribution()
            .id(id)
            .if_match(etag)
            .distribution_config(config)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("UpdateDistribution", e))?;

        Ok(CertificateBinding::distribution(id, aliases, source))
    }
}

#[async_trait]
impl ResourceAdapter for CloudFrontAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CloudFront
    }

    async fn bindings(&self) -> Result<Vec<CertificateBinding>> {
        Ok(self
            .summaries()
            .await?
            .iter()
            .filter_map(summary_binding)
            .collect())
    }

    async fn rebind(&self, binding: &CertificateBinding, dest: &CertificateId) -> Result<()> {
        self.apply(&binding.resource, dest).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudfront::types::{MinimumProtocolVersion, SslSupportMethod};

    fn viewer_cert(acm: Option<&str>, iam: Option<&str>) -> ViewerCertificate {
        ViewerCertificate::builder()
            .set_acm_certificate_arn(acm.map(str::to_string))
            .set_iam_certificate_id(iam.map(str::to_string))
            .minimum_protocol_version(MinimumProtocolVersion::from("TLSv1.2_2021"))
            .ssl_support_method(SslSupportMethod::from("sni-only"))
            .build()
    }

    #[test]
    fn test_viewer_certificate_id() {
        assert_eq!(
            viewer_certificate_id(&viewer_cert(Some("arn:acm"), None)),
            Some(CertificateId::Arn("arn:acm".to_string()))
        );
        assert_eq!(
            viewer_certificate_id(&viewer_cert(Some(""), Some("ASCA1"))),
            Some(CertificateId::IamId("ASCA1".to_string()))
        );
        assert_eq!(viewer_certificate_id(&viewer_cert(None, None)), None);
    }

    #[test]
    fn test_replace_viewer_certificate_keeps_settings() {
        let current = viewer_cert(Some("arn:old"), None);

        let replaced = replace_viewer_certificate(&current, &CertificateId::IamId("ASCA1".into()));

        assert_eq!(replaced.iam_certificate_id(), Some("ASCA1"));
        assert_eq!(replaced.acm_certificate_arn(), None);
        assert_eq!(replaced.cloud_front_default_certificate(), Some(false));
        assert_eq!(
            replaced.minimum_protocol_version(),
            Some(&MinimumProtocolVersion::from("TLSv1.2_2021"))
        );
        assert_eq!(replaced.ssl_support_method(), Some(&SslSupportMethod::from("sni-only")));
    }

    fn aliases(items: &[&str]) -> Aliases {
        let mut builder = Aliases::builder().quantity(items.len() as i32);
        for item in items {
            builder = builder.items(*item);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_default_certificate_is_skipped() {
        let default_cert = ViewerCertificate::builder()
            .cloud_front_default_certificate(true)
            .build();
        let names = aliases(&["www.example.com"]);

        assert!(distribution_binding("E1", Some(&names), Some(&default_cert)).is_none());
        assert!(distribution_binding("E1", Some(&names), None).is_none());

        let binding =
            distribution_binding("E1", Some(&names), Some(&viewer_cert(Some("arn:acm"), None)))
                .unwrap();
        assert_eq!(binding.label(), "E1 www.example.com");
    }

    #[test]
    fn test_alias_filter_is_substring_match() {
        let names = aliases(&["www.example.com", "api.example.com"]);
        let binding =
            distribution_binding("E1", Some(&names), Some(&viewer_cert(Some("arn:acm"), None)))
                .unwrap();

        assert!(matches_filters(&binding, "", ""));
        assert!(matches_filters(&binding, "", "api.exa"));
        assert!(matches_filters(&binding, "", "com api"));
        assert!(!matches_filters(&binding, "", "shop.example.com"));
        assert!(matches_filters(&binding, "arn:acm", "www"));
        assert!(!matches_filters(&binding, "arn:other", "www"));
    }

    #[test]
    fn test_alias_filter_excludes_distributions_without_aliases() {
        let cert = viewer_cert(None, Some("ASCA1"));
        let binding = distribution_binding("E2", None, Some(&cert)).unwrap();
        assert!(binding.aliases().is_empty());

        assert!(matches_filters(&binding, "ASCA1", ""));
        assert!(!matches_filters(&binding, "ASCA1", "example"));

        let binding = distribution_binding("E3", Some(&aliases(&[])), Some(&cert)).unwrap();
        assert!(!matches_filters(&binding, "", "example"));
    }

    #[test]
    fn test_description_shows_iam_name() {
        let binding = CertificateBinding::distribution(
            "E123",
            vec!["a.example.com".into(), "b.example.com".into()],
            CertificateId::IamId("ASCA1".into()),
        );
        let mut iam = HashMap::new();
        iam.insert(
            "ASCA1".to_string(),
            IamDescription {
                name: "wildcard-2024".to_string(),
                id: "ASCA1".to_string(),
                path: "/cloudfront/".to_string(),
                arn: "arn:aws:iam::123456789012:server-certificate/wildcard-2024".to_string(),
            },
        );

        let desc = DistributionDescription::new(&binding, "d1.cloudfront.net".into(), &iam);

        assert_eq!(desc.cert, "ASCA1 | wildcard-2024");
        assert_eq!(
            desc.table_rows(),
            vec![
                vec!["E123", "a.example.com", "ASCA1 | wildcard-2024"],
                vec!["E123", "b.example.com", "ASCA1 | wildcard-2024"],
            ]
        );
    }
}
