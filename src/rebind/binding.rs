use crate::utils::errors::{CertUtilsError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Alb,
    Elb,
    CloudFront,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Alb => "alb",
            ResourceKind::Elb => "elb",
            ResourceKind::CloudFront => "cloudfront",
        };
        write!(f, "{name}")
    }
}

/// How a certificate is referenced by the resource presenting it.
/// Load balancers always use an ARN; CloudFront takes either an ACM ARN or an IAM certificate ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateId {
    Arn(String),
    IamId(String),
}

impl CertificateId {
    pub fn as_str(&self) -> &str {
        match self {
            CertificateId::Arn(id) | CertificateId::IamId(id) => id,
        }
    }

    /// Build an id from a pair of mutually exclusive flags.
    /// Exactly one of them must be non-empty.
    pub fn from_choice(
        acm_arn: Option<&str>,
        iam_id: Option<&str>,
        acm_flag: &str,
        iam_flag: &str,
    ) -> Result<Self> {
        let acm_arn = acm_arn.filter(|v| !v.is_empty());
        let iam_id = iam_id.filter(|v| !v.is_empty());

        match (acm_arn, iam_id) {
            (Some(arn), None) => Ok(CertificateId::Arn(arn.to_string())),
            (None, Some(id)) => Ok(CertificateId::IamId(id.to_string())),
            (None, None) => Err(CertUtilsError::usage(format!(
                "{acm_flag} or {iam_flag} is required."
            ))),
            (Some(_), Some(_)) => Err(CertUtilsError::usage(format!(
                "{acm_flag} or {iam_flag} but not both."
            ))),
        }
    }

    /// Certificate ARN from a flag that must not be empty
    pub fn required_arn(value: &str, flag: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(CertUtilsError::usage(format!("{flag} is required.")));
        }
        Ok(CertificateId::Arn(value.to_string()))
    }

    pub fn matches(&self, filter: &str) -> bool {
        filter.is_empty() || self.as_str() == filter
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingLocation {
    Listener {
        port: i32,
        /// Present for application load balancers, classic ones address listeners by port
        listener_arn: Option<String>,
    },
    Distribution {
        aliases: Vec<String>,
    },
}

/// A certificate currently presented by one listener or distribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateBinding {
    pub kind: ResourceKind,
    pub resource: String,
    pub location: BindingLocation,
    pub certificate: CertificateId,
}

impl CertificateBinding {
    pub fn listener(
        kind: ResourceKind,
        name: impl Into<String>,
        port: i32,
        listener_arn: Option<String>,
        certificate: CertificateId,
    ) -> Self {
        Self {
            kind,
            resource: name.into(),
            location: BindingLocation::Listener { port, listener_arn },
            certificate,
        }
    }

    pub fn distribution(
        id: impl Into<String>,
        aliases: Vec<String>,
        certificate: CertificateId,
    ) -> Self {
        Self {
            kind: ResourceKind::CloudFront,
            resource: id.into(),
            location: BindingLocation::Distribution { aliases },
            certificate,
        }
    }

    /// `name:port` for listeners, `id alias1 alias2` for distributions
    pub fn label(&self) -> String {
        match &self.location {
            BindingLocation::Listener { port, .. } => format!("{}:{port}", self.resource),
            BindingLocation::Distribution { aliases } => {
                format!("{} {}", self.resource, aliases.join(" "))
            }
        }
    }

    pub fn port(&self) -> Option<i32> {
        match self.location {
            BindingLocation::Listener { port, .. } => Some(port),
            BindingLocation::Distribution { .. } => None,
        }
    }

    pub fn aliases(&self) -> &[String] {
        match &self.location {
            BindingLocation::Distribution { aliases } => aliases,
            BindingLocation::Listener { .. } => &[],
        }
    }
}

pub fn update_message(binding: &CertificateBinding, src: &str, dest: &str) -> String {
    format!("Updated {} {src} -> {dest}", binding.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_choice_exactly_one() {
        let id = CertificateId::from_choice(Some("arn:acm"), None, "--acm-arn", "--iam-id").unwrap();
        assert_eq!(id, CertificateId::Arn("arn:acm".to_string()));

        let id = CertificateId::from_choice(Some(""), Some("ASCA1"), "--acm-arn", "--iam-id")
            .unwrap();
        assert_eq!(id, CertificateId::IamId("ASCA1".to_string()));
    }

    #[test]
    fn test_from_choice_both_or_neither() {
        let err = CertificateId::from_choice(None, None, "--acm-arn", "--iam-id").unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "--acm-arn or --iam-id is required.");

        let err = CertificateId::from_choice(Some("arn"), Some("id"), "--acm-arn", "--iam-id")
            .unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "--acm-arn or --iam-id but not both.");
    }

    #[test]
    fn test_required_arn() {
        assert_eq!(
            CertificateId::required_arn("arn:src", "--source-cert-arn").unwrap(),
            CertificateId::Arn("arn:src".to_string())
        );

        let err = CertificateId::required_arn("", "--source-cert-arn").unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "--source-cert-arn is required.");
    }

    #[test]
    fn test_labels() {
        let listener = CertificateBinding::listener(
            ResourceKind::Elb,
            "lb1",
            443,
            None,
            CertificateId::Arn("arn:src".into()),
        );
        assert_eq!(listener.label(), "lb1:443");
        assert_eq!(
            update_message(&listener, "arn:src", "arn:dest"),
            "Updated lb1:443 arn:src -> arn:dest"
        );

        let dist = CertificateBinding::distribution(
            "E123",
            vec!["a.example.com".into(), "b.example.com".into()],
            CertificateId::IamId("ASCA1".into()),
        );
        assert_eq!(dist.label(), "E123 a.example.com b.example.com");
        assert_eq!(dist.port(), None);
    }

    #[test]
    fn test_matches_empty_filter() {
        let id = CertificateId::Arn("arn:one".into());
        assert!(id.matches(""));
        assert!(id.matches("arn:one"));
        assert!(!id.matches("arn:two"));
    }
}
