//! sqltree CLI - parse a SELECT statement and print its AST
//!
//! Usage: sqltree [QUERY]
//!
//! Parses the query given as an argument, or read from stdin when
//! piped; with neither, a built-in demo query is used. Lexical
//! diagnostics go to stderr, the rendered tree to stdout.

use sqltree::{render, Parser};
use std::env;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

const DEMO_QUERY: &str = "
    select id, age as a, name as n, sur as s, height
        from table
        left join t2 on table.first == t2.second
        cross join t5
        where age > 7
        and age < 10
        and name == test
        and height >= 180
        group by name
        having id > 9
        order by s
";

fn read_query() -> io::Result<String> {
    if let Some(arg) = env::args().nth(1) {
        return Ok(arg);
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(DEMO_QUERY.to_string());
    }

    let mut input = String::new();
    stdin.read_to_string(&mut input)?;
    Ok(input)
}

fn main() -> ExitCode {
    let query = match read_query() {
        Ok(query) => query,
        Err(err) => {
            eprintln!("error reading input: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut parser = match Parser::new(&query) {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in parser.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    match parser.parse_select() {
        Ok(tree) => {
            for line in render(&tree) {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
