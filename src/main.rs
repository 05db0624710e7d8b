use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = smart_todo::cli::Cli::parse();
    let config = smart_todo::config::from_cli(&cli)?;
    smart_todo::logging::init_tracing(&config, cli.log_filter.as_deref())?;

    match cli.command.clone() {
        Some(smart_todo::cli::CliCommand::Tui) | None => {
            smart_todo::tui::run(config)?;
        }
        Some(command) => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            smart_todo::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
