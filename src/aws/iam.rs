use crate::aws::Pagination;
use crate::cert::CertificateMaterial;
use crate::utils::errors::{CertUtilsError, Result};
use aws_config::SdkConfig;
use aws_sdk_iam::types::ServerCertificateMetadata;
use aws_sdk_iam::Client;
use std::collections::HashMap;

/// Server certificate stored in IAM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IamDescription {
    pub name: String,
    pub id: String,
    pub path: String,
    pub arn: String,
}

impl From<&ServerCertificateMetadata> for IamDescription {
    fn from(meta: &ServerCertificateMetadata) -> Self {
        Self {
            name: meta.server_certificate_name().to_string(),
            id: meta.server_certificate_id().to_string(),
            path: meta.path().to_string(),
            arn: meta.arn().to_string(),
        }
    }
}

pub const TABLE_HEADERS: [&str; 4] = ["Name", "ID", "Path", "Arn"];

impl IamDescription {
    pub fn table_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.id.clone(),
            self.path.clone(),
            self.arn.clone(),
        ]
    }
}

pub struct IamAdapter {
    client: Client,
}

impl IamAdapter {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Server certificates under `path_prefix`.
    /// With `max_items` set only that single page is fetched.
    pub async fn list(&self, page: &Pagination, path_prefix: &str) -> Result<Vec<IamDescription>> {
        let mut descs = Vec::new();
        let mut marker = page.marker.clone();

        loop {
            let out = self
                .client
                .list_server_certificates()
                .set_marker(marker.take())
                .set_max_items(page.max_items)
                .set_path_prefix(Some(path_prefix.to_string()).filter(|p| !p.is_empty()))
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("ListServerCertificates", e))?;

            descs.extend(
                out.server_certificate_metadata_list()
                    .iter()
                    .map(IamDescription::from),
            );

            if page.max_items.is_some() || !out.is_truncated() {
                break;
            }
            match out.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        tracing::debug!("Listed {} IAM server certificates", descs.len());
        Ok(descs)
    }

    pub async fn names(&self, page: &Pagination, path_prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .list(page, path_prefix)
            .await?
            .into_iter()
            .map(|d| d.name)
            .collect())
    }

    /// Every server certificate keyed by its ID
    pub async fn by_id(&self) -> Result<HashMap<String, IamDescription>> {
        Ok(self
            .list(&Pagination::default(), "")
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect())
    }

    pub async fn upload(
        &self,
        material: &CertificateMaterial,
        path: &str,
        name: &str,
    ) -> Result<String> {
        let out = self
            .client
            .upload_server_certificate()
            .path(path)
            .server_certificate_name(name)
            .certificate_body(material.cert_str()?)
            .private_key(material.private_key_str()?)
            .set_certificate_chain(material.chain_str()?.map(str::to_string))
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("UploadServerCertificate", e))?;

        let arn = out
            .server_certificate_metadata()
            .map(|m| m.arn())
            .unwrap_or_default();

        Ok(format!("Uploaded {name} {arn}"))
    }

    /// Rename and/or move a server certificate
    pub async fn update(
        &self,
        name: &str,
        new_name: Option<&str>,
        new_path: Option<&str>,
    ) -> Result<String> {
        let new_name = new_name.filter(|n| !n.is_empty());
        let new_path = new_path.filter(|p| !p.is_empty());
        if new_name.is_none() && new_path.is_none() {
            return Err(CertUtilsError::usage("--new-name or --new-path is required."));
        }

        self.client
            .update_server_certificate()
            .server_certificate_name(name)
            .set_new_server_certificate_name(new_name.map(str::to_string))
            .set_new_path(new_path.map(str::to_string))
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("UpdateServerCertificate", e))?;

        Ok(format!("Updated {name} -> {}", new_name.unwrap_or(name)))
    }

    pub async fn delete(&self, name: &str) -> Result<String> {
        self.client
            .delete_server_certificate()
            .server_certificate_name(name)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("DeleteServerCertificate", e))?;

        Ok(format!("Deleted {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::BehaviorVersion;

    fn offline_adapter() -> IamAdapter {
        IamAdapter::new(
            &SdkConfig::builder()
                .behavior_version(BehaviorVersion::latest())
                .build(),
        )
    }

    #[tokio::test]
    async fn test_update_needs_new_name_or_path() {
        let iam = offline_adapter();

        let err = iam.update("wildcard-2024", None, None).await.unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "--new-name or --new-path is required.");

        let err = iam
            .update("wildcard-2024", Some(""), Some(""))
            .await
            .unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_table_row() {
        let desc = IamDescription {
            name: "wildcard-2024".to_string(),
            id: "ASCA1".to_string(),
            path: "/cloudfront/".to_string(),
            arn: "arn:aws:iam::123456789012:server-certificate/cloudfront/wildcard-2024"
                .to_string(),
        };
        assert_eq!(desc.table_row().len(), TABLE_HEADERS.len());
        assert_eq!(desc.table_row()[2], "/cloudfront/");
    }
}
