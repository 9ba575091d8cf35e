use crate::aws::Pagination;
use crate::cert::CertificateMaterial;
use crate::utils::errors::{CertUtilsError, Result};
use crate::utils::validation::split_statuses;
use aws_config::SdkConfig;
use aws_sdk_acm::primitives::Blob;
use aws_sdk_acm::types::{CertificateDetail, CertificateStatus, Tag};
use aws_sdk_acm::Client;
use chrono::{DateTime, Utc};
use ordermap::OrderMap;

const NAME_TAG: &str = "Name";

/// ACM certificate as shown by `acm list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcmDescription {
    pub arn: String,
    pub name_tag: String,
    pub status: String,
    pub in_use_by: Vec<String>,
    pub not_after: Option<DateTime<Utc>>,
    pub domain_name: String,
    pub subject_alternative_names: Vec<String>,
}

pub const TABLE_HEADERS: [&str; 6] = [
    "Name tag",
    "Domain Name",
    "Additional Name",
    "In Use?",
    "Not After",
    "Certificate Arn",
];

impl AcmDescription {
    fn from_detail(detail: &CertificateDetail, name_tag: String) -> Self {
        let not_after = detail
            .not_after()
            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));

        Self {
            arn: detail.certificate_arn().unwrap_or_default().to_string(),
            name_tag,
            status: detail
                .status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            in_use_by: detail.in_use_by().to_vec(),
            not_after,
            domain_name: detail.domain_name().unwrap_or_default().to_string(),
            subject_alternative_names: detail.subject_alternative_names().to_vec(),
        }
    }

    pub fn in_use(&self) -> bool {
        !self.in_use_by.is_empty()
    }

    /// `[name tag] arn`, the label offered by the delete prompt
    pub fn choice_label(&self) -> String {
        format!("[{}] {}", self.name_tag, self.arn)
    }

    /// One row per additional name; the primary domain is not repeated.
    /// A certificate without additional names still gets a row.
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        let in_use = if self.in_use() { "Yes" } else { "No" };
        let not_after = self
            .not_after
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();

        let mut additional: Vec<&str> = self
            .subject_alternative_names
            .iter()
            .map(String::as_str)
            .filter(|name| *name != self.domain_name)
            .collect();
        if additional.is_empty() {
            additional.push("");
        }

        additional
            .into_iter()
            .map(|name| {
                vec![
                    self.name_tag.clone(),
                    self.domain_name.clone(),
                    name.to_string(),
                    in_use.to_string(),
                    not_after.clone(),
                    self.arn.clone(),
                ]
            })
            .collect()
    }
}

pub struct AcmAdapter {
    client: Client,
}

impl AcmAdapter {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    async fn list_arns(&self, statuses: &str, page: &Pagination) -> Result<Vec<String>> {
        let statuses: Vec<CertificateStatus> = split_statuses(statuses)
            .iter()
            .map(|s| CertificateStatus::from(s.as_str()))
            .collect();

        let mut arns = Vec::new();
        let mut next_token = page.marker.clone();

        loop {
            let out = self
                .client
                .list_certificates()
                .set_certificate_statuses(Some(statuses.clone()).filter(|s| !s.is_empty()))
                .set_max_items(page.max_items)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("ListCertificates", e))?;

            arns.extend(
                out.certificate_summary_list()
                    .iter()
                    .filter_map(|s| s.certificate_arn())
                    .map(str::to_string),
            );

            if page.max_items.is_some() {
                break;
            }
            match out.next_token() {
                Some(next) if !next.is_empty() => next_token = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(arns)
    }

    /// Value of the `Name` tag, empty when the certificate has none
    async fn name_tag(&self, arn: &str) -> Result<String> {
        let out = self
            .client
            .list_tags_for_certificate()
            .certificate_arn(arn)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("ListTagsForCertificate", e))?;

        Ok(out
            .tags()
            .iter()
            .find(|tag| tag.key().eq_ignore_ascii_case(NAME_TAG))
            .and_then(|tag| tag.value())
            .unwrap_or_default()
            .to_string())
    }

    /// Describe every certificate with one of `statuses`
    pub async fn list(&self, statuses: &str, page: &Pagination) -> Result<Vec<AcmDescription>> {
        let arns = self.list_arns(statuses, page).await?;
        let mut descs = Vec::with_capacity(arns.len());

        for arn in arns {
            let out = self
                .client
                .describe_certificate()
                .certificate_arn(&arn)
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("DescribeCertificate", e))?;

            let Some(detail) = out.certificate() else {
                tracing::warn!("No details returned for {arn}");
                continue;
            };

            let name_tag = match self.name_tag(&arn).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::debug!("Could not read tags of {arn}: {e}");
                    String::new()
                }
            };

            descs.push(AcmDescription::from_detail(detail, name_tag));
        }

        Ok(descs)
    }

    /// Choice labels for the delete prompt, mapped to the ARN they stand for
    pub async fn delete_targets(
        &self,
        statuses: &str,
        page: &Pagination,
    ) -> Result<OrderMap<String, String>> {
        Ok(self
            .list(statuses, page)
            .await?
            .into_iter()
            .map(|d| (d.choice_label(), d.arn))
            .collect())
    }

    /// Import a certificate, tagging it with `name` when one is given.
    /// Returns the new ARN and the message to print.
    pub async fn import(
        &self,
        material: &CertificateMaterial,
        name: Option<&str>,
    ) -> Result<(String, String)> {
        let out = self
            .client
            .import_certificate()
            .certificate(Blob::new(material.cert.clone()))
            .set_certificate_chain(material.chain.clone().map(Blob::new))
            .private_key(Blob::new(material.private_key.clone()))
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("ImportCertificate", e))?;

        let arn = out
            .certificate_arn()
            .ok_or_else(|| {
                CertUtilsError::Provider("ImportCertificate: no certificate ARN returned".into())
            })?
            .to_string();

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.add_name_tag(&arn, name).await?;
        }

        let msg = format!("Imported {arn}");
        Ok((arn, msg))
    }

    async fn add_name_tag(&self, arn: &str, name: &str) -> Result<()> {
        let tag = Tag::builder()
            .key(NAME_TAG)
            .value(name)
            .build()
            .map_err(|e| CertUtilsError::usage(format!("Invalid tag: {e}")))?;

        self.client
            .add_tags_to_certificate()
            .certificate_arn(arn)
            .tags(tag)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("AddTagsToCertificate", e))?;

        Ok(())
    }

    pub async fn delete(&self, arn: &str) -> Result<String> {
        self.client
            .delete_certificate()
            .certificate_arn(arn)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("DeleteCertificate", e))?;

        Ok(format!("Deleted {arn}"))
    }
}
