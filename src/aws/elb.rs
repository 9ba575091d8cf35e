use crate::rebind::{
    update_message, CertificateBinding, CertificateId, ResourceAdapter, ResourceKind,
};
use crate::utils::errors::{CertUtilsError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_elasticloadbalancing::types::LoadBalancerDescription;
use aws_sdk_elasticloadbalancing::Client;

/// Classic load balancers
pub struct ElbAdapter {
    client: Client,
}

impl ElbAdapter {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    async fn describe(&self, names: Option<Vec<String>>) -> Result<Vec<LoadBalancerDescription>> {
        let mut result = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let out = self
                .client
                .describe_load_balancers()
                .set_load_balancer_names(names.clone())
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("DescribeLoadBalancers", e))?;

            result.extend(out.load_balancer_descriptions().iter().cloned());

            match out.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        tracing::debug!("Described {} classic load balancers", result.len());
        Ok(result)
    }

    pub async fn list(&self, cert_filter: &str) -> Result<Vec<CertificateBinding>> {
        crate::rebind::locate_bindings(self, cert_filter).await
    }

    /// Rebind the listener on `port` of load balancer `name`
    pub async fn update(&self, name: &str, port: i32, dest: &str) -> Result<String> {
        let descriptions = self.describe(Some(vec![name.to_string()])).await?;

        let binding = description_bindings(&descriptions)
            .into_iter()
            .find(|b| b.port() == Some(port))
            .ok_or_else(|| CertUtilsError::NotFound("Listener not found".to_string()))?;

        let dest = CertificateId::Arn(dest.to_string());
        self.rebind(&binding, &dest).await?;

        Ok(update_message(&binding, binding.certificate.as_str(), dest.as_str()))
    }
}

/// Listeners that carry an SSL certificate, one binding each
pub fn description_bindings(descriptions: &[LoadBalancerDescription]) -> Vec<CertificateBinding> {
    let mut bindings = Vec::new();

    for desc in descriptions {
        let Some(name) = desc.load_balancer_name() else {
            continue;
        };
        for listener in desc
            .listener_descriptions()
            .iter()
            .filter_map(|ld| ld.listener())
        {
            let Some(cert) = listener.ssl_certificate_id().filter(|c| !c.is_empty()) else {
                continue;
            };
            bindings.push(CertificateBinding::listener(
                ResourceKind::Elb,
                name,
                listener.load_balancer_port(),
                None,
                CertificateId::Arn(cert.to_string()),
            ));
        }
    }

    bindings
}

#[async_trait]
impl ResourceAdapter for ElbAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Elb
    }

    async fn bindings(&self) -> Result<Vec<CertificateBinding>> {
        Ok(description_bindings(&self.describe(None).await?))
    }

    async fn rebind(&self, binding: &CertificateBinding, dest: &CertificateId) -> Result<()> {
        let CertificateId::Arn(dest_arn) = dest else {
            return Err(CertUtilsError::usage(
                "classic load balancers need a certificate ARN",
            ));
        };
        let port = binding.port().ok_or_else(|| {
            CertUtilsError::NotFound(format!("No listener port for {}", binding.label()))
        })?;

        self.client
            .set_load_balancer_listener_ssl_certificate()
            .load_balancer_name(&binding.resource)
            .load_balancer_port(port)
            .ssl_certificate_id(dest_arn)
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("SetLoadBalancerListenerSSLCertificate", e))?;

        Ok(())
    }
}
