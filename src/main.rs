// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use pocketledger::{cli, commands, config, db, log};

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let mut conn = db::open_or_init()?;
    let user_flag = matches.get_one::<String>("user").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, sub)?,
        Some((name, sub)) => {
            let user = config::resolve_user(&conn, user_flag)?;
            tracing::debug!(command = name, user = %user.user_id, "dispatching");
            match name {
                "account" => commands::accounts::handle(&conn, &user, sub)?,
                "category" => commands::categories::handle(&conn, &user, sub)?,
                "tx" => commands::transactions::handle(&mut conn, &user, sub)?,
                "transfer" => commands::transfers::handle(&mut conn, &user, sub)?,
                "recurring" => commands::recurring::handle(&conn, &user, sub)?,
                "notify" => commands::notifications::handle(&conn, &user, sub)?,
                "budget" => commands::budgets::handle(&conn, &user, sub)?,
                "export" => commands::exporter::handle(&conn, &user, sub)?,
                "doctor" => commands::doctor::handle(&conn, &user)?,
                other => anyhow::bail!("Unknown command '{}'", other),
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() {
    let matches = cli::build_cli().get_matches();
    log::init_logging(matches.get_flag("verbose"));

    if let Err(e) = run(&matches) {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
