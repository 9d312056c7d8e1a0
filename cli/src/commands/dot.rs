use clap::{arg, ArgMatches, Command};

use crate::dot;

pub fn dot() -> Command {
    super::command("dot")
        .about("Print an automaton for an expression in Graphviz DOT format")
        .arg(arg!(<EXPR>).help("The regular expression"))
        .arg(
            arg!(-s --stage <STAGE>)
                .help("Which automaton to print")
                .value_parser(["nfa", "dfa", "min"])
                .default_value("min"),
        )
}

pub fn exec_dot(args: &ArgMatches) -> anyhow::Result<()> {
    let expression = args.get_one::<String>("EXPR").unwrap();
    let stage = args.get_one::<String>("stage").unwrap();

    let compilation = rdfa::compile(expression)?;

    let output = match stage.as_str() {
        "nfa" => dot::nfa(&compilation.nfa),
        "dfa" => dot::dfa(&compilation.dfa),
        _ => dot::dfa(&compilation.min_dfa),
    };
    print!("{}", output);

    Ok(())
}
