use std::{env, fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use sprout::{compile, display_error};

struct Args {
    source: PathBuf,
    output: Option<PathBuf>,
    print_ast: bool,
    disassemble: bool,
}

const USAGE: &str = "usage: sprout <source> [-o <output>] [--ast] [--disassemble]";

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut source = None;
    let mut output = None;
    let mut print_ast = false;
    let mut disassemble = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => match iter.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => return Err(format!("missing path after `{}`", arg)),
            },
            "--ast" => print_ast = true,
            "--disassemble" => disassemble = true,
            flag if flag.starts_with('-') => return Err(format!("unknown option `{}`", flag)),
            path if source.is_none() => source = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument `{}`", extra)),
        }
    }

    Ok(Args {
        source: source.ok_or_else(|| String::from("no source file given"))?,
        output,
        print_ast,
        disassemble,
    })
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let file_name = args
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.source.to_string_lossy().into_owned());

    let source = match read_to_string(&args.source) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to read {}: {}", args.source.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let compilation = match compile(&source, &file_name) {
        Ok(compilation) => compilation,
        Err(error) => {
            display_error(&error, &source);
            return ExitCode::FAILURE;
        }
    };

    println!("Compiled in {:?}", start.elapsed());

    if args.print_ast {
        println!("{}", compilation.program);
    }

    for diagnostic in compilation.diagnostics.entries() {
        eprintln!("{}:", diagnostic.severity);
        display_error(&diagnostic.error, &source);
    }

    if compilation.is_failed() {
        eprintln!(
            "Compilation failed with {} problem(s)",
            compilation.diagnostics.problem_count()
        );
        return ExitCode::FAILURE;
    }

    if args.disassemble {
        print!("{}", compilation.target.disassemble());
    }

    let output = args
        .output
        .unwrap_or_else(|| args.source.with_extension("tam"));
    if let Err(err) = compilation.target.save(&output) {
        eprintln!("Failed to write {}: {}", output.display(), err);
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote {} instructions to {}",
        compilation.target.len(),
        output.display()
    );
    ExitCode::SUCCESS
}
