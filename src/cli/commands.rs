use crate::aws::{
    acm, cloudfront, iam, listener_table_rows, AcmAdapter, AlbAdapter, AwsSettings,
    CloudFrontAdapter, ElbAdapter, IamAdapter, Pagination, Service, LISTENER_TABLE_HEADERS,
};
use crate::cli::args::*;
use crate::cli::completions::handle_completion_command;
use crate::rebind::{bulk_update, CertificateId};
use crate::utils::errors::Result;
use crate::utils::output::{OutputFormat, Selector, TerminalSelector};
use crate::utils::validation::check_tag_value_pattern;
use std::io;

const SELECTOR_PAGE_SIZE: usize = 20;

pub async fn handle_command(cli: Cli) -> Result<()> {
    // Initialize logging - always to stderr
    if !cli.quiet {
        let log_level = match cli.verbose {
            0 => "aws_cert_utils=warn",
            1 => "aws_cert_utils=info",
            2 => "aws_cert_utils=debug",
            _ => "aws_cert_utils=trace",
        };

        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(log_level)
            .init();
    }

    let output = OutputFormat::new(cli.raw);
    let settings = AwsSettings::from(&cli);

    match cli.command {
        Commands::Acm { command } => handle_acm_command(command, &settings, &output).await,
        Commands::Iam { command } => handle_iam_command(command, &settings, &output).await,
        Commands::CloudFront { page, command } => {
            handle_cloudfront_command(command, Pagination::from(&page), &settings, &output).await
        }
        Commands::Elb { command } => handle_elb_command(command, &settings, &output).await,
        Commands::Alb { command } => handle_alb_command(command, &settings, &output).await,
        Commands::Completion { ref command } => handle_completion_command(command),
    }
}

async fn handle_acm_command(
    command: AcmCommands,
    settings: &AwsSettings,
    output: &OutputFormat,
) -> Result<()> {
    match command {
        AcmCommands::List {
            cert_statuses,
            max_items,
        } => {
            let acm = AcmAdapter::new(&settings.load(Service::Acm).await?);
            let page = Pagination::new(None, max_items);
            let rows: Vec<Vec<String>> = acm
                .list(&cert_statuses, &page)
                .await?
                .iter()
                .flat_map(|d| d.table_rows())
                .collect();
            output.print_table(&acm::TABLE_HEADERS, &rows);
            Ok(())
        }
        AcmCommands::Import { material, name } => {
            let name = name.unwrap_or_default();
            check_tag_value_pattern(&name)?;
            let material = material.load()?;
            material.check_private_key_bit_len()?;

            let acm = AcmAdapter::new(&settings.load(Service::Acm).await?);
            let (_, msg) = acm.import(&material, Some(&name)).await?;
            output.print_list(&[msg]);
            Ok(())
        }
        AcmCommands::Delete {
            arn,
            cert_statuses,
            max_items,
        } => {
            let acm = AcmAdapter::new(&settings.load(Service::Acm).await?);

            let arn = match arn.filter(|a| !a.is_empty()) {
                Some(arn) => arn,
                None => {
                    let page = Pagination::new(None, max_items);
                    let targets = acm.delete_targets(&cert_statuses, &page).await?;
                    let labels: Vec<String> = targets.keys().cloned().collect();
                    let choice = TerminalSelector::new(SELECTOR_PAGE_SIZE)
                        .select("Choose the certificate you want to delete : ", &labels)?;
                    match choice.and_then(|label| targets.get(&label).cloned()) {
                        Some(arn) => arn,
                        None => return Ok(()),
                    }
                }
            };

            let msg = acm.delete(&arn).await?;
            output.print_list(&[msg]);
            Ok(())
        }
    }
}

async fn handle_iam_command(
    command: IamCommands,
    settings: &AwsSettings,
    output: &OutputFormat,
) -> Result<()> {
    let iam = IamAdapter::new(&settings.load(Service::Iam).await?);

    match command {
        IamCommands::List { page, path_prefix } => {
            let rows: Vec<Vec<String>> = iam
                .list(&Pagination::from(&page), &path_prefix)
                .await?
                .iter()
                .map(|d| d.table_row())
                .collect();
            output.print_table(&iam::TABLE_HEADERS, &rows);
            Ok(())
        }
        IamCommands::Upload {
            material,
            path,
            name,
        } => {
            let material = material.load()?;
            material.check_private_key_bit_len()?;
            let msg = iam.upload(&material, &path, &name).await?;
            output.print_list(&[msg]);
            Ok(())
        }
        IamCommands::Update {
            name,
            new_name,
            new_path,
        } => {
            let msg = iam
                .update(&name, new_name.as_deref(), new_path.as_deref())
                .await?;
            output.print_list(&[msg]);
            Ok(())
        }
        IamCommands::Delete {
            name,
            page,
            path_prefix,
        } => {
            let name = match name.filter(|n| !n.is_empty()) {
                Some(name) => name,
                None => {
                    let names = iam.names(&Pagination::from(&page), &path_prefix).await?;
                    let choice = TerminalSelector::new(SELECTOR_PAGE_SIZE).select(
                        "Choose the server certificate you want to delete : ",
                        &names,
                    )?;
                    match choice.filter(|n| !n.is_empty()) {
                        Some(name) => name,
                        None => return Ok(()),
                    }
                }
            };

            let msg = iam.delete(&name).await?;
            output.print_list(&[msg]);
            Ok(())
        }
    }
}

async fn handle_cloudfront_command(
    command: CloudFrontCommands,
    page: Pagination,
    settings: &AwsSettings,
    output: &OutputFormat,
) -> Result<()> {
    match command {
        CloudFrontCommands::List { cert, aliases } => {
            let cf = CloudFrontAdapter::new(&settings.load(Service::CloudFront).await?, page);
            let rows: Vec<Vec<String>> = cf
                .list(&cert, &aliases)
                .await?
                .iter()
                .flat_map(|d| d.table_rows())
                .collect();
            output.print_table(&cloudfront::TABLE_HEADERS, &rows);
            Ok(())
        }
        CloudFrontCommands::Update {
            dist_id,
            acm_arn,
            iam_id,
        } => {
            let dest = CertificateId::from_choice(
                acm_arn.as_deref(),
                iam_id.as_deref(),
                "--acm-arn",
                "--iam-id",
            )?;
            let cf = CloudFrontAdapter::new(&settings.load(Service::CloudFront).await?, page);
            let msg = cf.update(&dist_id, &dest).await?;
            output.print_list(&[msg]);
            Ok(())
        }
        CloudFrontCommands::BulkUpdate {
            source_acm_arn,
            source_iam_id,
            dest_acm_arn,
            dest_iam_id,
            no_dry_run,
        } => {
            let source = CertificateId::from_choice(
                source_acm_arn.as_deref(),
                source_iam_id.as_deref(),
                "--source-acm-arn",
                "--source-iam-id",
            )?;
            let dest = CertificateId::from_choice(
                dest_acm_arn.as_deref(),
                dest_iam_id.as_deref(),
                "--dest-acm-arn",
                "--dest-iam-id",
            )?;
            let cf = CloudFrontAdapter::new(&settings.load(Service::CloudFront).await?, page);
            let updates = bulk_update(&cf, source.as_str(), &dest, !no_dry_run).await?;
            output.print_list(&updates);
            Ok(())
        }
    }
}

async fn handle_elb_command(
    command: ElbCommands,
    settings: &AwsSettings,
    output: &OutputFormat,
) -> Result<()> {
    match command {
        ElbCommands::List { cert } => {
            let elb = ElbAdapter::new(&settings.load(Service::Elb).await?);
            let rows = listener_table_rows(&elb.list(&cert).await?);
            output.print_table(&LISTENER_TABLE_HEADERS, &rows);
            Ok(())
        }
        ElbCommands::Update {
            name,
            port,
            cert_arn,
        } => {
            let dest = CertificateId::required_arn(&cert_arn, "--cert-arn")?;
            let elb = ElbAdapter::new(&settings.load(Service::Elb).await?);
            let msg = elb.update(&name, port, dest.as_str()).await?;
            output.print_list(&[msg]);
            Ok(())
        }
        ElbCommands::BulkUpdate {
            source_cert_arn,
            dest_cert_arn,
            no_dry_run,
        } => {
            let source = CertificateId::required_arn(&source_cert_arn, "--source-cert-arn")?;
            let dest = CertificateId::required_arn(&dest_cert_arn, "--dest-cert-arn")?;
            let elb = ElbAdapter::new(&settings.load(Service::Elb).await?);
            let updates = bulk_update(&elb, source.as_str(), &dest, !no_dry_run).await?;
            output.print_list(&updates);
            Ok(())
        }
    }
}

async fn handle_alb_command(
    command: AlbCommands,
    settings: &AwsSettings,
    output: &OutputFormat,
) -> Result<()> {
    match command {
        AlbCommands::List { cert } => {
            let alb = AlbAdapter::new(&settings.load(Service::Alb).await?);
            let rows = listener_table_rows(&alb.list(&cert).await?);
            output.print_table(&LISTENER_TABLE_HEADERS, &rows);
            Ok(())
        }
        AlbCommands::Update {
            name,
            port,
            cert_arn,
        } => {
            let dest = CertificateId::required_arn(&cert_arn, "--cert-arn")?;
            let alb = AlbAdapter::new(&settings.load(Service::Alb).await?);
            let msg = alb.update(&name, port, dest.as_str()).await?;
            output.print_list(&[msg]);
            Ok(())
        }
        AlbCommands::BulkUpdate {
            source_cert_arn,
            dest_cert_arn,
            no_dry_run,
        } => {
            let source = CertificateId::required_arn(&source_cert_arn, "--source-cert-arn")?;
            let dest = CertificateId::required_arn(&dest_cert_arn, "--dest-cert-arn")?;
            let alb = AlbAdapter::new(&settings.load(Service::Alb).await?);
            let updates = bulk_update(&alb, source.as_str(), &dest, !no_dry_run).await?;
            output.print_list(&updates);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AwsSettings {
        AwsSettings {
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_elb_bulk_update_rejects_empty_source() {
        let command = ElbCommands::BulkUpdate {
            source_cert_arn: String::new(),
            dest_cert_arn: "arn:dest".to_string(),
            no_dry_run: true,
        };

        let err = handle_elb_command(command, &settings(), &OutputFormat::new(true))
            .await
            .unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "--source-cert-arn is required.");
    }

    #[tokio::test]
    async fn test_alb_bulk_update_rejects_empty_certificates() {
        let command = AlbCommands::BulkUpdate {
            source_cert_arn: String::new(),
            dest_cert_arn: "arn:dest".to_string(),
            no_dry_run: true,
        };
        let err = handle_alb_command(command, &settings(), &OutputFormat::new(true))
            .await
            .unwrap_err();
        assert!(err.is_usage());

        let command = AlbCommands::BulkUpdate {
            source_cert_arn: "arn:src".to_string(),
            dest_cert_arn: String::new(),
            no_dry_run: true,
        };
        let err = handle_alb_command(command, &settings(), &OutputFormat::new(true))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "--dest-cert-arn is required.");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_destination() {
        let command = ElbCommands::Update {
            name: "web".to_string(),
            port: 443,
            cert_arn: String::new(),
        };
        let err = handle_elb_command(command, &settings(), &OutputFormat::new(true))
            .await
            .unwrap_err();
        assert!(err.is_usage());
    }
}
