#![allow(clippy::module_inception)]

use std::rc::Rc;

use tracing::{debug, info};

use crate::{
    ast::ast::Program,
    compiler::compiler::{encode, TargetProgram},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorTip},
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{semantic_model::SemanticModel, type_checker::type_check},
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod tam;
pub mod type_checker;

extern crate regex;

/// Byte offset into a source file, and the file's name.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Everything produced by one run of the pipeline.
#[derive(Debug)]
pub struct Compilation {
    pub program: Program,
    pub model: SemanticModel,
    pub target: TargetProgram,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    /// Any warning or error makes the object code untrustworthy.
    pub fn is_failed(&self) -> bool {
        self.diagnostics.is_failed()
    }
}

/// Runs the whole pipeline on `source`.
///
/// Syntax errors stop the pipeline and are returned. Checking and encoding
/// always run to completion; their problems are in the returned diagnostics.
pub fn compile(source: &str, file: &str) -> Result<Compilation, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    debug!(tokens = tokens.len(), file, "tokenized");

    let (_, program) = parse(tokens, Rc::new(file.to_string()));
    let program = program?;
    debug!(statements = program.block.body.len(), file, "parsed");

    let mut diagnostics = Diagnostics::new();
    let model = type_check(&program, &mut diagnostics);
    let target = encode(&program, &model, &mut diagnostics);

    info!(
        file,
        instructions = target.len(),
        problems = diagnostics.problem_count(),
        "compiled"
    );

    Ok(Compilation {
        program,
        model,
        target,
        diagnostics,
    })
}

/// Line number (1-based), line text, and column of a byte offset in `content`.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    let mut start = 0;
    for (index, line) in content.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        start = end;
    }

    // An error at the very end of the input points just past the last line.
    let last = content.split_inclusive('\n').count().max(1);
    let line = content.split_inclusive('\n').last().unwrap_or_default();
    (pos == content.len()).then(|| (last, line.to_string(), line.trim_end_matches('\n').len()))
}

/// Renders an error with the offending source line and a caret under it.
pub fn format_error(error: &Error, source: &str) -> String {
    /*
        Error: message
        -> final.sprout
           |
        20 | create int #;
           | -----------^
    */

    let mut out = String::new();
    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}
