//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete compilation pipeline works correctly
//! from source code through tokenization, parsing, checking, and TAM encoding.

use sprout::{
    compile,
    compiler::compiler::{encode_with_options, Address, EncoderOptions},
    errors::diagnostics::{Diagnostics, Severity},
    lexer::lexer::tokenize,
    parser::parser::parse,
    tam::{
        instruction::{read_program, Instruction},
        machine::{Opcode, Primitive, Register},
    },
    type_checker::type_checker::type_check,
    Compilation,
};
use std::{fs, rc::Rc};

fn compile_ok(source: &str) -> Compilation {
    compile(source, "test.sprout").expect("source should parse")
}

fn problem_names(compilation: &Compilation) -> Vec<&str> {
    compilation
        .diagnostics
        .entries()
        .iter()
        .filter(|diagnostic| diagnostic.severity >= Severity::Warning)
        .map(|diagnostic| diagnostic.error.get_error_name())
        .collect()
}

fn address(compilation: &Compilation, name: &str) -> Address {
    let symbol = compilation.model.find_symbol(name).unwrap();
    compilation.target.address_of(symbol).unwrap()
}

#[test]
fn test_compile_assign_and_print() {
    let compilation = compile_ok("create int x; x = 10; vomit x;");
    assert!(!compilation.is_failed());

    let expected = vec![
        Instruction::new(Opcode::Jump, 0, Register::CB, 1),
        Instruction::new(Opcode::Push, 0, Register::CB, 1),
        Instruction::new(Opcode::LoadL, 0, Register::CB, 10),
        Instruction::new(Opcode::Store, 1, Register::SB, 0),
        Instruction::new(Opcode::Load, 1, Register::SB, 0),
        Instruction::new(
            Opcode::Call,
            Register::SB as u8,
            Register::PB,
            Primitive::Putint.displacement(),
        ),
        Instruction::new(
            Opcode::Call,
            Register::SB as u8,
            Register::PB,
            Primitive::Puteol.displacement(),
        ),
        Instruction::new(Opcode::Halt, 0, Register::CB, 0),
    ];
    assert_eq!(compilation.target.instructions, expected);
}

#[test]
fn test_compile_out_of_bounds_literal_index() {
    let compilation = compile_ok("create [int, 10] arr; arr[11] = 5;");

    assert_eq!(problem_names(&compilation), vec!["IndexOutOfBounds"]);
    assert_eq!(
        compilation.target.instructions.last().map(|i| i.op),
        Some(Opcode::Halt)
    );
}

#[test]
fn test_compile_arity_mismatch() {
    let compilation = compile_ok("sprout add(int a, int b) { vomit a + b; } add(1, 2, 3);");

    assert_eq!(problem_names(&compilation), vec!["IncorrectArgumentCount"]);

    let entry = address(&compilation, "add");
    let call = compilation
        .target
        .instructions
        .iter()
        .find(|instruction| instruction.op == Opcode::Call && instruction.r == Register::CB)
        .unwrap();
    assert_eq!(call.d, entry.displacement);
}

#[test]
fn test_compile_subroutine_call_statement() {
    let compilation = compile_ok("sprout f(int a){ vomit a; } f(5);");
    assert!(!compilation.is_failed());
    assert_eq!(address(&compilation, "a"), Address::new(1, -1));

    let instructions = &compilation.target.instructions;
    let call_site = instructions.len() - 4;
    assert_eq!(
        instructions[call_site],
        Instruction::new(Opcode::LoadL, 0, Register::CB, 5)
    );
    assert_eq!(
        instructions[call_site + 1],
        Instruction::new(Opcode::Call, Register::SB as u8, Register::CB, 1)
    );
    assert_eq!(
        instructions[call_site + 2],
        Instruction::new(Opcode::Pop, 0, Register::CB, 1)
    );
}

#[test]
fn test_compile_shadowing_program() {
    let source = "
        create int x;
        x = 1;
        si (x > 0) {
            create char x;
            x = 'a';
            vomit x;
        } o sino (x < 0) {
            vomit 0;
        } sino {
            vomit x;
        }
        vomit x;
    ";
    let compilation = compile_ok(source);

    assert!(!compilation.is_failed(), "{:?}", problem_names(&compilation));
    let disassembly = compilation.target.disassemble();
    assert!(disassembly.contains("STORE(1) 1[SB]"));
    assert!(disassembly.contains("CALL put\n"));
}

#[test]
fn test_compile_nested_routines() {
    let source = "
        create int total;
        sprout accumulate(int count) {
            create int step;
            sprout bump(int by) {
                total = total + by;
                step = step + 1;
            }
            repeat count times { bump(2); }
        }
        accumulate(4);
        vomit total;
    ";
    let compilation = compile_ok(source);
    assert!(!compilation.is_failed(), "{:?}", problem_names(&compilation));

    assert_eq!(address(&compilation, "total"), Address::new(0, 0));
    assert_eq!(address(&compilation, "count"), Address::new(1, -1));
    assert_eq!(address(&compilation, "step"), Address::new(1, 3));
    assert_eq!(address(&compilation, "by"), Address::new(2, -1));

    let disassembly = compilation.target.disassemble();
    assert!(disassembly.contains("STORE(1) 0[SB]"));
    assert!(disassembly.contains("STORE(1) 3[L1]"));
    assert!(disassembly.contains("RETURN(1) 1"));
}

#[test]
fn test_compile_collects_every_semantic_problem() {
    let source = "
        create int x;
        create int x;
        x = true;
        vomit !x;
        vomit undefined;
    ";
    let compilation = compile_ok(source);

    assert!(compilation.is_failed());
    let names = problem_names(&compilation);
    assert!(names.contains(&"IdentifierAlreadyDeclared"));
    assert!(names.contains(&"TypeMismatch"));
    assert!(names.contains(&"DisallowedUnaryOperator"));
    assert!(names.contains(&"IdentifierNotDeclared"));
    assert_eq!(
        compilation.target.instructions.last().map(|i| i.op),
        Some(Opcode::Halt)
    );
}

#[test]
fn test_compile_syntax_error_is_fatal() {
    let error = compile("create int x x = 1;", "test.sprout").unwrap_err();

    assert_eq!(error.get_position().1.as_str(), "test.sprout");
}

#[test]
fn test_code_store_exhaustion() {
    let source = "vomit 1; ".repeat(10);
    let tokens = tokenize(source, Some("test.sprout".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.sprout".to_string()));
    let program = program.unwrap();

    let mut diagnostics = Diagnostics::new();
    let model = type_check(&program, &mut diagnostics);
    let target = encode_with_options(
        &program,
        &model,
        &mut diagnostics,
        EncoderOptions { code_capacity: 8 },
    );

    assert_eq!(target.len(), 8);
    assert_eq!(diagnostics.errors().count(), 1);
    assert_eq!(
        diagnostics.errors().next().unwrap().get_error_name(),
        "CodeStoreExhausted"
    );
}

#[test]
fn test_save_and_reload_object_file() {
    let compilation = compile_ok("create [char, 2] s; s[0] = 'h'; s[1] = 'i'; vomit s[0]; vomit s[1];");
    assert!(!compilation.is_failed());

    let dir = std::env::temp_dir().join(format!("sprout-it-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("out.tam");

    compilation.target.save(&path).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), compilation.target.len() * 16);

    let reloaded = read_program(&mut bytes.as_slice()).unwrap();
    assert_eq!(reloaded, compilation.target.instructions);

    fs::remove_dir_all(&dir).unwrap();
}
