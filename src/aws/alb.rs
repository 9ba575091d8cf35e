use crate::rebind::{
    update_message, BindingLocation, CertificateBinding, CertificateId, ResourceAdapter,
    ResourceKind,
};
use crate::utils::errors::{CertUtilsError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_elasticloadbalancingv2::types::{Certificate, Listener, LoadBalancer};
use aws_sdk_elasticloadbalancingv2::Client;

/// Application load balancers (Elastic Load Balancing v2)
pub struct AlbAdapter {
    client: Client,
}

impl AlbAdapter {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    async fn load_balancers(&self, names: Option<Vec<String>>) -> Result<Vec<LoadBalancer>> {
        let mut result = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let out = self
                .client
                .describe_load_balancers()
                .set_names(names.clone())
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("DescribeLoadBalancers", e))?;

            result.extend(out.load_balancers().iter().cloned());

            match out.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(result)
    }

    async fn listeners(&self, lb_arn: &str) -> Result<Vec<Listener>> {
        let mut result = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let out = self
                .client
                .describe_listeners()
                .load_balancer_arn(lb_arn)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| CertUtilsError::provider("DescribeListeners", e))?;

            result.extend(out.listeners().iter().cloned());

            match out.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(result)
    }

    async fn bindings_for(&self, names: Option<Vec<String>>) -> Result<Vec<CertificateBinding>> {
        let mut bindings = Vec::new();

        for lb in self.load_balancers(names).await? {
            let (Some(name), Some(arn)) = (lb.load_balancer_name(), lb.load_balancer_arn()) else {
                continue;
            };
            tracing::debug!("Describing listeners of {name}");
            let listeners = self.listeners(arn).await?;
            bindings.extend(listener_bindings(name, &listeners));
        }

        Ok(bindings)
    }

    /// Listeners whose certificate matches `cert_filter` (everything when empty)
    pub async fn list(&self, cert_filter: &str) -> Result<Vec<CertificateBinding>> {
        crate::rebind::locate_bindings(self, cert_filter).await
    }

    /// Rebind one listener of load balancer `name`.
    /// Without a port the first listener presenting a certificate is used.
    pub async fn update(&self, name: &str, port: Option<i32>, dest: &str) -> Result<String> {
        let bindings = self.bindings_for(Some(vec![name.to_string()])).await?;

        let binding = bindings
            .iter()
            .find(|b| port.is_none() || b.port() == port)
            .ok_or_else(|| CertUtilsError::NotFound("Listener not found".to_string()))?;

        let dest = CertificateId::Arn(dest.to_string());
        self.rebind(binding, &dest).await?;

        Ok(update_message(binding, binding.certificate.as_str(), dest.as_str()))
    }
}

/// One binding per certificate attached to each listener
pub fn listener_bindings(lb_name: &str, listeners: &[Listener]) -> Vec<CertificateBinding> {
    let mut bindings = Vec::new();

    for listener in listeners {
        let port = listener.port().unwrap_or_default();
        for cert in listener.certificates() {
            let Some(cert_arn) = cert.certificate_arn() else {
                continue;
            };
            bindings.push(CertificateBinding::listener(
                ResourceKind::Alb,
                lb_name,
                port,
                listener.listener_arn().map(str::to_string),
                CertificateId::Arn(cert_arn.to_string()),
            ));
        }
    }

    bindings
}

#[async_trait]
impl ResourceAdapter for AlbAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Alb
    }

    async fn bindings(&self) -> Result<Vec<CertificateBinding>> {
        self.bindings_for(None).await
    }

    async fn rebind(&self, binding: &CertificateBinding, dest: &CertificateId) -> Result<()> {
        let CertificateId::Arn(dest_arn) = dest else {
            return Err(CertUtilsError::usage(
                "application load balancers need a certificate ARN",
            ));
        };
        let BindingLocation::Listener {
            listener_arn: Some(listener_arn),
            ..
        } = &binding.location
        else {
            return Err(CertUtilsError::NotFound(format!(
                "No listener ARN for {}",
                binding.label()
            )));
        };

        self.client
            .modify_listener()
            .listener_arn(listener_arn)
            .certificates(Certificate::builder().certificate_arn(dest_arn).build())
            .send()
            .await
            .map_err(|e| CertUtilsError::provider("ModifyListener", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener(arn: &str, port: i32, certs: &[&str]) -> Listener {
        let mut builder = Listener::builder().listener_arn(arn).port(port);
        for cert in certs {
            builder = builder.certificates(Certificate::builder().certificate_arn(*cert).build());
        }
        builder.build()
    }

    #[test]
    fn test_listener_bindings() {
        let listeners = vec![
            listener("arn:listener/https", 443, &["arn:cert/a"]),
            listener("arn:listener/http", 80, &[]),
            listener("arn:listener/alt", 8443, &["arn:cert/a", "arn:cert/b"]),
        ];

        let bindings = listener_bindings("web", &listeners);

        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].label(), "web:443");
        assert_eq!(bindings[0].kind, ResourceKind::Alb);
        assert_eq!(
            bindings[0].location,
            BindingLocation::Listener {
                port: 443,
                listener_arn: Some("arn:listener/https".to_string()),
            }
        );
        assert_eq!(bindings[2].certificate.as_str(), "arn:cert/b");
        assert_eq!(bindings[2].label(), "web:8443");
    }

    #[test]
    fn test_listener_table_rows() {
        let listeners = vec![listener("arn:listener/https", 443, &["arn:cert/a"])];
        let rows = crate::aws::listener_table_rows(&listener_bindings("web", &listeners));
        assert_eq!(rows, vec![vec!["web", "443", "arn:cert/a"]]);
    }
}
