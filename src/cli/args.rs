use crate::aws::{AwsSettings, Pagination};
use crate::cert::{read_material, CertificateMaterial};
use crate::utils::errors::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "aws-cert-utils")]
#[command(version)]
#[command(about = "Manage certificates in ACM and IAM and the load balancers and distributions using them")]
#[command(long_about = None)]
pub struct Cli {
    /// AWS access key ID
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Role to assume before calling AWS
    #[arg(long, global = true)]
    pub assume_role_arn: Option<String>,

    /// Session token for temporary credentials
    #[arg(long, global = true, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Region of the regional services (IAM and CloudFront always use us-east-1)
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Named profile from the shared config files
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Shared config file path
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub aws_config: Option<String>,

    /// Shared credentials file path
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub credentials: Option<String>,

    /// Enable verbose logging (repeat for more verbosity: -v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output raw tab-separated values (no header, no alignment)
    #[arg(short, long, global = true)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl From<&Cli> for AwsSettings {
    fn from(cli: &Cli) -> Self {
        Self {
            access_key: cli.access_key.clone(),
            secret_key: cli.secret_key.clone(),
            session_token: cli.token.clone(),
            assume_role_arn: cli.assume_role_arn.clone(),
            region: cli.region.clone(),
            profile: cli.profile.clone(),
            config_file: cli.aws_config.clone(),
            credentials_file: cli.credentials.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// AWS Certificate Manager
    Acm {
        #[command(subcommand)]
        command: AcmCommands,
    },
    /// IAM server certificates
    Iam {
        #[command(subcommand)]
        command: IamCommands,
    },
    /// CloudFront distributions
    #[command(name = "cloudfront")]
    CloudFront {
        #[command(flatten)]
        page: PageArgs,
        #[command(subcommand)]
        command: CloudFrontCommands,
    },
    /// Classic load balancers
    Elb {
        #[command(subcommand)]
        command: ElbCommands,
    },
    /// Application load balancers
    Alb {
        #[command(subcommand)]
        command: AlbCommands,
    },
    /// Generate shell completion scripts
    Completion {
        #[command(subcommand)]
        command: CompletionCommands,
    },
}

/// Paging flags
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Resume listing from this marker
    #[arg(long)]
    pub marker: Option<String>,
    /// Fetch a single page of at most this many items
    #[arg(long)]
    pub max_items: Option<i32>,
}

impl From<&PageArgs> for Pagination {
    fn from(args: &PageArgs) -> Self {
        Pagination::new(args.marker.clone(), args.max_items)
    }
}

/// Certificate, chain and private key, each given inline or as a file
#[derive(Args, Debug, Clone, Default)]
pub struct MaterialArgs {
    /// Certificate PEM
    #[arg(long)]
    pub cert: Option<String>,
    /// Certificate file (takes precedence over --cert)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub cert_path: Option<String>,
    /// Certificate chain PEM
    #[arg(long)]
    pub chain: Option<String>,
    /// Certificate chain file (takes precedence over --chain)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub chain_path: Option<String>,
    /// Private key PEM
    #[arg(long)]
    pub pkey: Option<String>,
    /// Private key file (takes precedence over --pkey)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub pkey_path: Option<String>,
}

impl MaterialArgs {
    pub fn load(&self) -> Result<CertificateMaterial> {
        CertificateMaterial::from_parts(
            read_material(self.cert.as_deref(), self.cert_path.as_deref())?,
            read_material(self.chain.as_deref(), self.chain_path.as_deref())?,
            read_material(self.pkey.as_deref(), self.pkey_path.as_deref())?,
        )
    }
}

#[derive(Subcommand)]
pub enum AcmCommands {
    /// List certificates
    List {
        /// Comma-separated certificate statuses, or ALL
        #[arg(long, default_value = "ALL")]
        cert_statuses: String,
        /// Fetch a single page of at most this many certificates
        #[arg(long)]
        max_items: Option<i32>,
    },
    /// Import a certificate
    Import {
        #[command(flatten)]
        material: MaterialArgs,
        /// Value of the Name tag
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a certificate (prompts when --arn is not given)
    Delete {
        /// Certificate ARN
        #[arg(long)]
        arn: Option<String>,
        /// Comma-separated certificate statuses offered by the prompt, or ALL
        #[arg(long, default_value = "ALL")]
        cert_statuses: String,
        /// Fetch a single page of at most this many certificates
        #[arg(long)]
        max_items: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum IamCommands {
    /// List server certificates
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Only list certificates under this path
        #[arg(long, default_value = "/")]
        path_prefix: String,
    },
    /// Upload a server certificate
    Upload {
        #[command(flatten)]
        material: MaterialArgs,
        /// Path of the server certificate
        #[arg(long, default_value = "/")]
        path: String,
        /// Server certificate name
        #[arg(long)]
        name: String,
    },
    /// Rename or move a server certificate
    Update {
        /// Server certificate name
        #[arg(long)]
        name: String,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        new_path: Option<String>,
    },
    /// Delete a server certificate (prompts when --name is not given)
    Delete {
        /// Server certificate name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        page: PageArgs,
        /// Only offer certificates under this path
        #[arg(long, default_value = "/")]
        path_prefix: String,
    },
}

#[derive(Subcommand)]
pub enum CloudFrontCommands {
    /// List distributions presenting a custom certificate
    List {
        /// Only distributions using this ACM ARN or IAM certificate ID
        #[arg(long, default_value = "")]
        cert: String,
        /// Only distributions whose aliases contain this text
        #[arg(long, default_value = "")]
        aliases: String,
    },
    /// Change the certificate of one distribution
    Update {
        /// Distribution ID
        #[arg(long)]
        dist_id: String,
        #[arg(long)]
        acm_arn: Option<String>,
        #[arg(long)]
        iam_id: Option<String>,
    },
    /// Move every distribution from one certificate to another
    BulkUpdate {
        #[arg(long)]
        source_acm_arn: Option<String>,
        #[arg(long)]
        source_iam_id: Option<String>,
        #[arg(long)]
        dest_acm_arn: Option<String>,
        #[arg(long)]
        dest_iam_id: Option<String>,
        /// Apply the changes instead of printing them
        #[arg(long)]
        no_dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum ElbCommands {
    /// List listeners presenting a certificate
    List {
        /// Only listeners using this certificate ARN
        #[arg(long, default_value = "")]
        cert: String,
    },
    /// Change the certificate of one listener
    Update {
        /// Load balancer name
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 443)]
        port: i32,
        #[arg(long)]
        cert_arn: String,
    },
    /// Move every listener from one certificate to another
    BulkUpdate {
        #[arg(long)]
        source_cert_arn: String,
        #[arg(long)]
        dest_cert_arn: String,
        /// Apply the changes instead of printing them
        #[arg(long)]
        no_dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum AlbCommands {
    /// List listeners presenting a certificate
    List {
        /// Only listeners using this certificate ARN
        #[arg(long, default_value = "")]
        cert: String,
    },
    /// Change the certificate of one listener
    Update {
        /// Load balancer name
        #[arg(long)]
        name: String,
        /// Listener port (first HTTPS listener when omitted)
        #[arg(long)]
        port: Option<i32>,
        #[arg(long)]
        cert_arn: String,
    },
    /// Move every listener from one certificate to another
    BulkUpdate {
        #[arg(long)]
        source_cert_arn: String,
        #[arg(long)]
        dest_cert_arn: String,
        /// Apply the changes instead of printing them
        #[arg(long)]
        no_dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum CompletionCommands {
    /// Generate bash completion script
    Bash,
    /// Generate zsh completion script
    Zsh,
    /// Generate fish completion script
    Fish,
    /// Generate PowerShell completion script
    PowerShell,
}

impl CompletionCommands {
    pub fn shell(&self) -> Shell {
        match self {
            CompletionCommands::Bash => Shell::Bash,
            CompletionCommands::Zsh => Shell::Zsh,
            CompletionCommands::Fish => Shell::Fish,
            CompletionCommands::PowerShell => Shell::PowerShell,
        }
    }
}
