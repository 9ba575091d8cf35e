use crate::cli::args::{Cli, CompletionCommands};
use crate::utils::errors::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io::{self, Write};

const APP_NAME: &str = "aws-cert-utils";

pub fn handle_completion_command(command: &CompletionCommands) -> Result<()> {
    io::stdout().write_all(&completion_script(command))?;
    Ok(())
}

/// Completion script for the shell named by `command`
pub fn completion_script(command: &CompletionCommands) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(command.shell(), &mut cmd, APP_NAME, &mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_mentions_subcommands() {
        let script = String::from_utf8(completion_script(&CompletionCommands::Bash)).unwrap();
        assert!(script.contains("aws-cert-utils"));
        assert!(script.contains("cloudfront"));
        assert!(script.contains("bulk-update"));
    }
}
