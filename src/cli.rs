// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue))
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("Manage users")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a user")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--currency <CCY> "Default currency").default_value("USD")),
        )
        .subcommand(json_flags(Command::new("list").about("List users")))
        .subcommand(
            Command::new("use")
                .about("Make a user the default for later commands")
                .arg(Arg::new("name").required(true)),
        )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Show or change settings")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Show effective settings"))
        .subcommand(
            Command::new("set")
                .about("Set a setting")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true)),
        )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an account")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--currency <CCY>).required(true))
                .arg(arg!(--balance <AMOUNT> "Opening balance").default_value("0"))
                .arg(arg!(--icon <ICON>).default_value("wallet"))
                .arg(arg!(--color <COLOR>)),
        )
        .subcommand(json_flags(Command::new("list").about("List accounts")))
        .subcommand(
            Command::new("rm")
                .about("Remove an account and its entries")
                .arg(arg!(--name <NAME>).required(true)),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--kind <KIND> "expense or income").default_value("expense"))
                .arg(arg!(--budget <AMOUNT> "Monthly budget"))
                .arg(arg!(--icon <ICON>).default_value("other"))
                .arg(arg!(--color <COLOR>))
                .arg(arg!(--global "Share with every user").action(ArgAction::SetTrue)),
        )
        .subcommand(json_flags(Command::new("list").about("List categories")))
        .subcommand(
            Command::new("rm")
                .about("Remove one of your categories")
                .arg(arg!(--name <NAME>).required(true)),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record expenses and income")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an entry")
                .arg(arg!(--date <DATE>).required(true))
                .arg(arg!(--account <ACCOUNT>).required(true))
                .arg(arg!(--kind <KIND> "expense or income").default_value("expense"))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--category <CATEGORY>))
                .arg(arg!(--note <NOTE>)),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List entries")
                .arg(arg!(--month <YYYYMM> "Filter by month (YYYY-MM)"))
                .arg(arg!(--account <ACCOUNT>))
                .arg(arg!(--category <CATEGORY>))
                .arg(arg!(--limit <N>).value_parser(value_parser!(usize))),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete an entry and undo its balance effect")
                .arg(arg!(--id <ID>).required(true)),
        )
}

fn transfer_cmd() -> Command {
    Command::new("transfer")
        .about("Move money between accounts")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Create a transfer")
                .arg(arg!(--from <ACCOUNT>))
                .arg(arg!(--to <ACCOUNT>))
                .arg(arg!(--amount <AMOUNT> "Amount in the source currency").required(true))
                .arg(arg!(--date <DATE> "Defaults to today"))
                .arg(arg!(--note <NOTE>)),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a transfer; unspecified fields keep their value")
                .arg(arg!(--id <ID>).required(true))
                .arg(arg!(--from <ACCOUNT>))
                .arg(arg!(--to <ACCOUNT>))
                .arg(arg!(--amount <AMOUNT>))
                .arg(arg!(--date <DATE>))
                .arg(arg!(--note <NOTE>)),
        )
        .subcommand(json_flags(Command::new("list").about("List transfers")))
        .subcommand(
            Command::new("rm")
                .about("Delete a transfer record")
                .arg(arg!(--id <ID>).required(true))
                .arg(
                    arg!(--reverse "Also undo the transfer's balance effect")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn recurring_cmd() -> Command {
    let fields = |cmd: Command, required: bool| {
        cmd.arg(arg!(--account <ACCOUNT>).required(required))
            .arg(arg!(--kind <KIND> "expense or income").required(required))
            .arg(arg!(--amount <AMOUNT>).required(required))
            .arg(arg!(--date <DATE> "First occurrence").required(required))
            .arg(arg!(--frequency <FREQ> "daily, weekly or monthly").required(required))
            .arg(arg!(--category <CATEGORY>))
            .arg(arg!(--note <NOTE>))
    };
    Command::new("recurring")
        .about("Manage recurring payment templates")
        .subcommand_required(true)
        .subcommand(fields(Command::new("add").about("Add a template"), true))
        .subcommand(fields(
            Command::new("edit")
                .about("Edit a template; a new date resets the next execution")
                .arg(arg!(--id <ID>).required(true)),
            false,
        ))
        .subcommand(json_flags(Command::new("list").about("List templates")))
        .subcommand(
            Command::new("rm")
                .about("Remove a template")
                .arg(arg!(--id <ID>).required(true)),
        )
        .subcommand(
            Command::new("next")
                .about("Preview upcoming occurrences without executing them")
                .arg(arg!(--id <ID>).required(true))
                .arg(arg!(--until <DATE> "List every occurrence up to this date")),
        )
}

fn notify_cmd() -> Command {
    Command::new("notify")
        .about("Manage reminders")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a reminder")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--message <TEXT>).required(true))
                .arg(arg!(--date <DATETIME> "YYYY-MM-DD HH:MM").required(true))
                .arg(arg!(--frequency <FREQ> "once, daily, monthly or yearly").default_value("once"))
                .arg(arg!(--inactive "Create without scheduling").action(ArgAction::SetTrue)),
        )
        .subcommand(json_flags(Command::new("list").about("List reminders")))
        .subcommand(
            Command::new("toggle")
                .about("Switch a reminder on or off")
                .arg(arg!(--id <ID>).required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a reminder")
                .arg(arg!(--id <ID>).required(true)),
        )
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Monthly category budgets")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Set a category's monthly budget")
                .arg(arg!(--category <CATEGORY>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true)),
        )
        .subcommand(
            Command::new("clear")
                .about("Remove a category's monthly budget")
                .arg(arg!(--category <CATEGORY>).required(true)),
        )
        .subcommand(json_flags(
            Command::new("status")
                .about("Month-to-date progress per budgeted category")
                .arg(arg!(--date <DATE> "Reference day, defaults to today")),
        ))
}

fn fx_cmd() -> Command {
    Command::new("fx")
        .about("Currency conversion")
        .subcommand_required(true)
        .subcommand(
            Command::new("convert")
                .about("Convert at the current spot rate")
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--from <CCY>).required(true))
                .arg(arg!(--to <CCY>).required(true)),
        )
        .subcommand(
            Command::new("currencies")
                .about("List known currencies")
                .arg(arg!(--refresh "Download the list first").action(ArgAction::SetTrue)),
        )
}

fn export_cmd() -> Command {
    let target = |name: &'static str, about: &'static str| {
        Command::new(name)
            .about(about)
            .arg(arg!(--format <FMT> "csv or json").default_value("csv"))
            .arg(arg!(--out <PATH>).required(true))
    };
    Command::new("export")
        .about("Export ledger data")
        .subcommand_required(true)
        .subcommand(target("transactions", "Export entries"))
        .subcommand(target("transfers", "Export transfers"))
}

pub fn build_cli() -> Command {
    Command::new("pocketledger")
        .version(clap::crate_version!())
        .about("Personal finance ledger: accounts, transfers, recurring payments, budgets, reminders")
        .arg(arg!(--user <USER> "Act as this user (name or id)").global(true))
        .arg(
            arg!(-v --verbose "Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(user_cmd())
        .subcommand(config_cmd())
        .subcommand(account_cmd())
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(transfer_cmd())
        .subcommand(recurring_cmd())
        .subcommand(notify_cmd())
        .subcommand(budget_cmd())
        .subcommand(fx_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check ledger integrity"))
}
