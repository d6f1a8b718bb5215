//! Resolve command

use anyhow::Result;
use bizfly_schema::Formula;
use crossterm::style::Stylize;
use serde::Serialize;

use crate::PlatformArgs;
use crate::ui::theme::LABEL_WIDTH;

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    platform: String,
    target: String,
    url: &'a str,
    sha256: &'a str,
}

/// Print the archive that would be installed for a platform
pub fn resolve(formula: &Formula, args: &PlatformArgs, json: bool) -> Result<()> {
    let table = formula.artifact_table()?;
    let platform = args.platform(&table)?;
    let entry = bizfly_core::resolve(&table, &platform)?;

    if json {
        let out = Resolution {
            platform: platform.to_string(),
            target: entry.target.to_string(),
            url: &entry.url,
            sha256: entry.sha256.as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let lw = LABEL_WIDTH;
    println!("  {:<lw$}{}", "platform", platform.to_string().white().bold());
    println!("  {:<lw$}{}", "target", entry.target);
    println!("  {:<lw$}{}", "url", entry.url);
    println!("  {:<lw$}{}", "sha256", entry.sha256);
    Ok(())
}
