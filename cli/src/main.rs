mod commands;
mod dot;

use std::process;

use yansi::Color::Red;
use yansi::Paint;

use crate::commands::cli;

const APP_HELP_TEMPLATE: &str = r#"rdfa {version}, a regular expression to minimal DFA compiler.

{author-with-newline}
{before-help}{usage-heading}
  {usage}

{all-args}{after-help}
"#;

const EXIT_ERROR: i32 = 1;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli().get_matches();

    let result = match args.subcommand() {
        Some(("check", args)) => commands::exec_check(args),
        Some(("dot", args)) => commands::exec_dot(args),
        _ => unreachable!(),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "error:".paint(Red).bold(), err);
        process::exit(EXIT_ERROR);
    }

    Ok(())
}
