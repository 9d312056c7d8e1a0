use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{arg, value_parser, ArgMatches, Command};
use itertools::Itertools;
use yansi::Color::{Green, Red};
use yansi::Paint;

use rdfa::{Compilation, Dfa, Nfa};

use crate::dot;

/// Separators between the expression and the test string, tried in order.
const SEPARATORS: [&str; 3] = ["=>", ";", "\t"];

pub fn check() -> Command {
    super::command("check")
        .about("Compile and test the expressions listed in a file")
        .long_about(
            "Compile and test the expressions listed in a file.\n\n\
             Each non-empty line that doesn't start with `#` contains an \
             expression, optionally followed by a separator (`=>`, `;` or a \
             tab) and a test string. A test string that is exactly `@` or \
             `ε` denotes the empty string. Every line is compiled and \
             simulated independently; a failing line is reported and \
             processing continues with the next one.",
        )
        .arg(
            arg!(<EXPRS_PATH>)
                .help("Path to a file with one expression per line")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-d --"dot-dir" <DIR>)
                .help("Write Graphviz DOT files for every automaton into the given directory")
                .value_parser(value_parser!(PathBuf)),
        )
}

pub fn exec_check(args: &ArgMatches) -> anyhow::Result<()> {
    let exprs_path = args.get_one::<PathBuf>("EXPRS_PATH").unwrap();
    let dot_dir = args.get_one::<PathBuf>("dot-dir");

    let src = fs::read_to_string(exprs_path).with_context(|| {
        format!("can not read `{}`", exprs_path.display())
    })?;

    if let Some(dir) = dot_dir {
        fs::create_dir_all(dir).with_context(|| {
            format!("can not create `{}`", dir.display())
        })?;
    }

    for (line_number, line) in src.lines().enumerate() {
        let line_number = line_number + 1;
        let (expression, input) = match split_line(line) {
            Some(pair) => pair,
            None => continue,
        };

        println!();
        println!("line {}: `{}`", line_number, expression);
        if input.is_empty() {
            println!("  input: (empty)");
        } else {
            println!("  input: `{}`", input);
        }

        let compilation = match rdfa::compile(expression) {
            Ok(compilation) => compilation,
            Err(err) => {
                println!("  {} {}", "error:".paint(Red).bold(), err);
                continue;
            }
        };

        print_report(&compilation, input);

        if let Some(dir) = dot_dir {
            write_dot_files(dir, line_number, &compilation)?;
        }
    }

    Ok(())
}

/// Splits a line into an expression and a test string.
///
/// Returns `None` for empty lines and `#` comments. A test string that is
/// exactly `@` or `ε` denotes the empty string.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let raw = line.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }
    for separator in SEPARATORS {
        if let Some((expression, input)) = raw.split_once(separator) {
            let input = input.trim();
            let input =
                if input == "@" || input == "ε" { "" } else { input };
            return Some((expression.trim(), input));
        }
    }
    Some((raw, ""))
}

fn print_report(compilation: &Compilation, input: &str) {
    println!("  postfix: {}", compilation.postfix_notation());
    println!("  NFA: {}", nfa_summary(&compilation.nfa));
    println!("  DFA: {}", dfa_summary(&compilation.dfa));
    println!("  minimized DFA: {}", dfa_summary(&compilation.min_dfa));
    println!(
        "  minimization: {} states, {} minimized, {} removed",
        compilation.dfa.state_count(),
        compilation.min_dfa.state_count(),
        compilation.dfa.state_count() - compilation.min_dfa.state_count()
    );
    println!(
        "  NFA simulation: {}",
        verdict(compilation.nfa.matches(input))
    );
    println!(
        "  DFA simulation: {}",
        verdict(compilation.dfa.matches(input))
    );
    println!(
        "  minimized DFA simulation: {}",
        verdict(compilation.min_dfa.matches(input))
    );
}

fn verdict(accepted: bool) -> String {
    if accepted {
        "accepted".paint(Green).to_string()
    } else {
        "rejected".paint(Red).to_string()
    }
}

fn nfa_summary(nfa: &Nfa) -> String {
    format!(
        "{} states, initial {}, accepting {{{}}}, alphabet {{{}}}",
        nfa.state_count(),
        nfa.initial().map_or("none".to_string(), |id| id.to_string()),
        nfa.accepting_states().join(", "),
        nfa.alphabet().join(", "),
    )
}

fn dfa_summary(dfa: &Dfa) -> String {
    format!(
        "{} states, initial {}, accepting {{{}}}, alphabet {{{}}}",
        dfa.state_count(),
        dfa.initial().map_or("none".to_string(), |id| id.to_string()),
        dfa.accepting_states().join(", "),
        dfa.alphabet().join(", "),
    )
}

fn write_dot_files(
    dir: &Path,
    line_number: usize,
    compilation: &Compilation,
) -> anyhow::Result<()> {
    let write = |name: &str, contents: String| -> anyhow::Result<()> {
        let path = dir.join(format!("line_{}.{}.dot", line_number, name));
        fs::write(&path, contents)
            .with_context(|| format!("can not write `{}`", path.display()))
    };
    write("nfa", dot::nfa(&compilation.nfa))?;
    write("dfa", dot::dfa(&compilation.dfa))?;
    write("min", dot::dfa(&compilation.min_dfa))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::split_line;

    #[test]
    fn expression_and_input() {
        assert_eq!(split_line("a|b => ab"), Some(("a|b", "ab")));
        assert_eq!(split_line("a|b ; b"), Some(("a|b", "b")));
        assert_eq!(split_line("a|b\tb"), Some(("a|b", "b")));
    }

    #[test]
    fn only_the_first_separator_splits() {
        assert_eq!(split_line("a;b => x;y"), Some(("a;b", "x;y")));
    }

    #[test]
    fn expression_without_input() {
        assert_eq!(split_line("(a|b)*"), Some(("(a|b)*", "")));
    }

    #[test]
    fn epsilon_input_is_the_empty_string() {
        assert_eq!(split_line("a* => @"), Some(("a*", "")));
        assert_eq!(split_line("a* => ε"), Some(("a*", "")));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert_eq!(split_line(""), None);
        assert_eq!(split_line("   "), None);
        assert_eq!(split_line("# a comment"), None);
    }
}
