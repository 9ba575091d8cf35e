use crate::utils::errors::{CertUtilsError, Result};
use crate::utils::paths::expand_home;
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};

/// IAM and CloudFront are global services served from this region
pub const GLOBAL_SERVICE_REGION: &str = "us-east-1";

const CREDENTIALS_SOURCE: &str = "aws-cert-utils";
const ASSUME_ROLE_SESSION_NAME: &str = "aws-cert-utils";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Acm,
    Iam,
    Alb,
    Elb,
    CloudFront,
}

impl Service {
    pub fn is_global(&self) -> bool {
        matches!(self, Service::Iam | Service::CloudFront)
    }
}

/// Connection settings taken from the global command line flags
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub assume_role_arn: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub config_file: Option<String>,
    pub credentials_file: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl AwsSettings {
    /// Region requests for `service` are sent to
    pub fn region_for(&self, service: Service) -> Option<String> {
        if service.is_global() {
            Some(GLOBAL_SERVICE_REGION.to_string())
        } else {
            non_empty(&self.region).map(str::to_string)
        }
    }

    /// Static credentials from the flags, if any were given
    pub fn static_credentials(&self) -> Result<Option<Credentials>> {
        match (non_empty(&self.access_key), non_empty(&self.secret_key)) {
            (Some(access_key), Some(secret_key)) => Ok(Some(Credentials::new(
                access_key,
                secret_key,
                non_empty(&self.session_token).map(str::to_string),
                None,
                CREDENTIALS_SOURCE,
            ))),
            (None, None) => Ok(None),
            _ => Err(CertUtilsError::usage(
                "--access-key and --secret-key must be given together",
            )),
        }
    }

    fn profile_files(&self) -> Option<EnvConfigFiles> {
        let config = non_empty(&self.config_file);
        let credentials = non_empty(&self.credentials_file);
        if config.is_none() && credentials.is_none() {
            return None;
        }

        let mut builder = EnvConfigFiles::builder();
        builder = match config {
            Some(path) => builder.with_file(EnvConfigFileKind::Config, expand_home(path)),
            None => builder.include_default_config_file(true),
        };
        builder = match credentials {
            Some(path) => builder.with_file(EnvConfigFileKind::Credentials, expand_home(path)),
            None => builder.include_default_credentials_file(true),
        };
        Some(builder.build())
    }

    /// Resolve the SDK configuration for one service
    pub async fn load(&self, service: Service) -> Result<SdkConfig> {
        let credentials = self.static_credentials()?;
        let region = self.region_for(service);
        tracing::debug!("Loading AWS configuration for {service:?} (region: {region:?})");

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = non_empty(&self.profile) {
            loader = loader.profile_name(profile);
        }
        if let Some(files) = self.profile_files() {
            loader = loader.profile_files(files);
        }
        if let Some(credentials) = credentials {
            tracing::debug!("Using static credentials from the command line");
            loader = loader.credentials_provider(credentials);
        }

        let config = loader.load().await;

        let Some(role_arn) = non_empty(&self.assume_role_arn) else {
            return Ok(config);
        };

        tracing::info!("Assuming role {role_arn}");
        let provider = AssumeRoleProvider::builder(role_arn)
            .session_name(ASSUME_ROLE_SESSION_NAME)
            .configure(&config)
            .build()
            .await;

        Ok(config
            .into_builder()
            .credentials_provider(SharedCredentialsProvider::new(provider))
            .build())
    }
}
