mod ast;
mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod lexer;
mod parser;
mod token;
mod value;

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};

use builtins::register_builtins;
use config::{ImportConfig, WELCOME_FOOTER, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use env::Environment;
use eval::eval_program;
use lexer::Lexer;
use parser::parse;
use value::Value;

/// A small statically-typed, tree-walking scripting language.
#[derive(Parser, Debug)]
#[command(name = "april")]
#[command(version = config::VERSION)]
#[command(about = "A statically-typed, tree-walking scripting language")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    let env = Environment::root();
    register_builtins(&env);

    let exit_code = match args.script {
        Some(path) => run_script(&path, &env),
        None => {
            run_repl(&env);
            0
        }
    };
    std::process::exit(exit_code);
}

/// Runs a `.april` script file to completion. Returns the process exit
/// code: `0` on a clean run, `2` on a parse error, `1` on an
/// uncaught runtime error.
fn run_script(path: &PathBuf, env: &Rc<Environment>) -> i32 {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot read {}: {}", path.display(), e);
            return 2;
        }
    };

    let mut lexer = Lexer::new(contents);
    let base_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.to_path_buf())
        .unwrap_or_else(|| ImportConfig::default().base_dir);
    lexer.set_import_config(ImportConfig {
        base_dir,
        ..ImportConfig::default()
    });

    let (program, errors) = parse(lexer);
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("{err}");
        }
        return 2;
    }

    match eval_program(&program, env) {
        Value::Error(msg) => {
            eprintln!("runtime error: {msg}");
            1
        }
        _ => 0,
    }
}

fn run_repl(env: &Rc<Environment>) {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), rustyline::history::DefaultHistory> =
        Editor::with_config(config).expect("failed to initialize line editor");

    let history_file = ".april_history";
    let _ = rl.load_history(history_file);

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");
    println!("{WELCOME_FOOTER}");

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "april> " } else { "....> " };
        match rl.readline(prompt) {
            Ok(line) => {
                if buffer.is_empty() && line.trim().is_empty() {
                    continue;
                }
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);

                if !braces_balanced(&buffer) {
                    continue;
                }

                let source = std::mem::take(&mut buffer);
                let (program, errors) = parse(Lexer::new(source));
                if !errors.is_empty() {
                    for err in &errors {
                        eprintln!("parse error: {err}");
                    }
                    continue;
                }
                match eval_program(&program, env) {
                    Value::Error(msg) => eprintln!("error: {msg}"),
                    Value::Nil => {}
                    value => println!("=> {value}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                eprintln!("readline error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
}

/// Whether `source` has balanced `{`/`}`, ignoring braces written inside
/// string literals. Drives the REPL's multi-line accumulation: a `fn`
/// or `if` header left open keeps prompting on a continuation line
/// instead of handing an incomplete block to the parser.
fn braces_balanced(source: &str) -> bool {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in source.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_balanced_counts_nested_blocks() {
        assert!(braces_balanced("fn f() { if (x) { return 1; } }"));
        assert!(!braces_balanced("fn f() { if (x) {"));
    }

    #[test]
    fn braces_balanced_ignores_braces_in_strings() {
        assert!(braces_balanced(r#"print("{ unbalanced");"#));
    }

    #[test]
    fn run_script_on_missing_file_reports_exit_code_two() {
        let env = Environment::root();
        let code = run_script(&PathBuf::from("/nonexistent/path.april"), &env);
        assert_eq!(code, 2);
    }
}
