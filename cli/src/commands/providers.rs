// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `duet providers`

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::context::AppContext;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;

    println!("{}", "Providers:".bold());
    for info in ctx.registry.list() {
        let key = if ctx.secrets.contains(info.id) {
            "key set".green()
        } else {
            "no key".red()
        };
        println!(
            "  {:<12} {:<12} {:<28} {}",
            info.id.as_str().bold(),
            info.display_name,
            info.model,
            key
        );
    }

    Ok(())
}
