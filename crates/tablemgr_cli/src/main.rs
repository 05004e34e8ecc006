//! DDL dump tool for registered table managers.
//!
//! With no arguments the available apps are listed. Settings come from
//! `TABLEMGR_*` environment variables.

mod demo;

use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tablemgr_core::{Apps, Conn, Settings, SqliteConn};

#[derive(Parser, Debug)]
#[command(
    name = "tablemgr_cli",
    version = tablemgr_core::core_version(),
    about = "Print the DDL of registered apps"
)]
struct Cli {
    /// Print the DDL of every app
    #[arg(long)]
    all: bool,

    /// Also create the tables in the configured database
    #[arg(long)]
    apply: bool,

    /// Apps to print; an unknown name lists the available apps
    #[arg(value_name = "APP")]
    names: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("tablemgr_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;
    settings.init_logging()?;

    let sqlite = Arc::new(SqliteConn::new(tablemgr_core::db::open_with_settings(
        &settings.database,
    )?));
    let conn: Arc<dyn Conn> = sqlite.clone();

    let apps = Apps::new();
    let shop = apps.register(demo::shop_app(&conn)?)?;

    if cli.apply {
        for manager in shop.managers() {
            sqlite.create_table(manager.table())?;
            info!(
                "event=create_table module=cli status=ok table={}",
                manager.table().name()
            );
        }
    }

    let names: Vec<&str> = cli.names.iter().map(String::as_str).collect();
    print!("{}", apps.sql(cli.all, &names));
    Ok(())
}
