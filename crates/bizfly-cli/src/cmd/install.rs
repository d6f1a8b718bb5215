//! Install command

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use bizfly_core::io::download::http_client;
use bizfly_core::{InstallError, InstallRequest, InstalledBinary};
use bizfly_schema::Formula;
use crossterm::style::Stylize;
use tracing::info;

use crate::InstallArgs;
use crate::ui::Output;
use crate::ui::theme::LABEL_WIDTH;

/// Resolve, download, verify and install the formula's executable
pub async fn install(formula: &Formula, args: &InstallArgs, output: &Output) -> Result<()> {
    let table = formula.artifact_table()?;
    let platform = args.platform.platform(&table)?;
    let dest_dir = bin_dir(args)?;

    if args.dry_run {
        let entry = bizfly_core::resolve(&table, &platform)?;
        let lw = LABEL_WIDTH;
        output.info(&format!("Would install {} {}", formula.name, formula.version));
        println!("  {:<lw$}{}", "platform", platform.to_string().white().bold());
        println!("  {:<lw$}{}", "url", entry.url);
        println!("  {:<lw$}{}", "sha256", entry.sha256);
        println!("  {:<lw$}{}", "dest", dest_dir.join(formula.binary).display());
        return Ok(());
    }

    output.info(&format!("Installing {} {}", formula.name, formula.version));

    let client = http_client(Duration::from_secs(args.timeout)).map_err(InstallError::from)?;
    let InstalledBinary { path, .. } = InstallRequest::new(
        platform,
        &table,
        &dest_dir,
        formula.binary,
        &client,
        output,
    )
    .execute()
    .await?;

    info!(path = %path.display(), "install complete");
    println!("{}", path.display());
    Ok(())
}

fn bin_dir(args: &InstallArgs) -> Result<PathBuf, InstallError> {
    match &args.bin_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_bin_dir(bizfly_core::try_bin_path()),
    }
}

fn default_bin_dir(detected: Option<PathBuf>) -> Result<PathBuf, InstallError> {
    detected.ok_or_else(|| InstallError::Install {
        path: PathBuf::from("~/.bizfly/bin"),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine home directory; set BIZFLY_BIN_DIR or pass --bin-dir",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_home_fails_at_install_stage() {
        let err = default_bin_dir(None).unwrap_err();
        assert_eq!(err.stage(), "install");
        assert!(err.to_string().contains("BIZFLY_BIN_DIR"));
    }

    #[test]
    fn explicit_bin_dir_wins() {
        let args = InstallArgs {
            platform: crate::PlatformArgs::default(),
            bin_dir: Some(PathBuf::from("/opt/bizfly/bin")),
            timeout: 300,
            dry_run: false,
        };
        assert_eq!(bin_dir(&args).unwrap(), PathBuf::from("/opt/bizfly/bin"));
    }
}
