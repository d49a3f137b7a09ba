//! Main encoder module.
//!
//! This module contains the `Encoder` state and the block, subroutine and
//! storage layout logic that turns a checked program into TAM code. The
//! statement and expression emitters live in `stmt` and `expr`.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    ast::{
        ast::{Ident, Program, Stmt},
        statements::{BlockStmt, SubroutineDeclStmt},
    },
    errors::{diagnostics::DiagnosticSink, errors::ErrorImpl},
    tam::{
        instruction::Instruction,
        machine::{
            Opcode, Primitive, Register, CODE_STORE_SIZE, LINK_DATA_SIZE, MAX_DISPLACEMENT,
            MAX_OPERAND_COUNT,
        },
    },
    type_checker::semantic_model::{SemanticModel, SymbolId, SymbolKind},
    Position,
};

use super::stmt::gen_statement;

/// Knobs for a single encoding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Number of instruction slots in the code store.
    pub code_capacity: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            code_capacity: CODE_STORE_SIZE,
        }
    }
}

/// Runtime address of an entity: the routine level it was declared at and
/// its displacement in that frame (or its entry point in the code store for
/// subroutines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub level: u32,
    pub displacement: i32,
}

impl Address {
    pub fn new(level: u32, displacement: i32) -> Self {
        Address {
            level,
            displacement,
        }
    }
}

/// Fixed-capacity instruction buffer. Once full, further instructions are
/// dropped and the store remembers that it overflowed.
#[derive(Debug)]
struct CodeStore {
    instructions: Vec<Instruction>,
    capacity: usize,
    exhausted: bool,
}

impl CodeStore {
    fn new(capacity: usize) -> Self {
        CodeStore {
            instructions: Vec::with_capacity(capacity.min(CODE_STORE_SIZE)),
            capacity,
            exhausted: false,
        }
    }

    fn next_address(&self) -> usize {
        self.instructions.len()
    }
}

/// The encoded program together with the storage assigned to each symbol.
#[derive(Debug, Clone, Default)]
pub struct TargetProgram {
    pub instructions: Vec<Instruction>,
    pub addresses: HashMap<SymbolId, Address>,
}

impl TargetProgram {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn address_of(&self, symbol: SymbolId) -> Option<Address> {
        self.addresses.get(&symbol).copied()
    }

    /// Writes every instruction as a 16-byte big-endian record, in order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for instruction in &self.instructions {
            instruction.write(writer)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.instructions
            .iter()
            .flat_map(|instruction| instruction.to_bytes())
            .collect()
    }

    /// Writes the object file, replacing `path` if it exists.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        info!(
            path = %path.as_ref().display(),
            instructions = self.instructions.len(),
            "wrote object file"
        );
        Ok(())
    }

    /// One `address: mnemonic` line per instruction.
    pub fn disassemble(&self) -> String {
        self.instructions
            .iter()
            .enumerate()
            .map(|(address, instruction)| format!("{:>4}: {}\n", address, instruction))
            .collect()
    }
}

/// Encoding state for one program.
pub struct Encoder<'a> {
    pub model: &'a SemanticModel,
    sink: &'a mut dyn DiagnosticSink,
    code: CodeStore,
    pub addresses: HashMap<SymbolId, Address>,

    /// Routine nesting level of the code being emitted; 0 is the program body.
    pub level: u32,
    /// Next free word of the current frame.
    pub frame_top: i32,
    /// Source position diagnostics are attributed to.
    pub position: Position,
}

impl<'a> Encoder<'a> {
    pub fn new(
        model: &'a SemanticModel,
        sink: &'a mut dyn DiagnosticSink,
        options: EncoderOptions,
    ) -> Self {
        Encoder {
            model,
            sink,
            code: CodeStore::new(options.code_capacity),
            addresses: HashMap::new(),
            level: 0,
            frame_top: 0,
            position: Position::null(),
        }
    }

    pub fn error(&mut self, kind: ErrorImpl) {
        self.sink.error(kind, self.position.clone());
    }

    fn warning(&mut self, kind: ErrorImpl) {
        self.sink.warning(kind, self.position.clone());
    }

    fn info(&mut self, kind: ErrorImpl) {
        self.sink.info(kind, self.position.clone());
    }

    /// Address the next emitted instruction will occupy.
    pub fn next_address(&self) -> i32 {
        self.code.next_address() as i32
    }

    /// Appends an instruction and returns its address.
    ///
    /// Operands that do not fit the machine are reported and truncated. When
    /// the code store is full the instruction is dropped; the first drop is
    /// reported, later ones are not.
    pub fn emit(&mut self, op: Opcode, n: i32, r: Register, d: i32) -> usize {
        let n = if (0..=MAX_OPERAND_COUNT).contains(&n) {
            n
        } else {
            self.warning(ErrorImpl::OperandOverflow {
                field: "n",
                value: n,
                limit: MAX_OPERAND_COUNT,
            });
            n.clamp(0, MAX_OPERAND_COUNT)
        };

        let d = if (-MAX_DISPLACEMENT..=MAX_DISPLACEMENT).contains(&d) {
            d
        } else {
            self.warning(ErrorImpl::OperandOverflow {
                field: "d",
                value: d,
                limit: MAX_DISPLACEMENT,
            });
            d.clamp(-MAX_DISPLACEMENT, MAX_DISPLACEMENT)
        };

        let address = self.code.next_address();
        if address >= self.code.capacity {
            if !self.code.exhausted {
                self.code.exhausted = true;
                self.error(ErrorImpl::CodeStoreExhausted {
                    capacity: self.code.capacity,
                });
            }
            return address;
        }

        self.code
            .instructions
            .push(Instruction::new(op, n as u8, r, d));
        address
    }

    /// Calls a primitive routine.
    pub fn emit_primitive(&mut self, primitive: Primitive) {
        self.emit(
            Opcode::Call,
            Register::SB as i32,
            Register::PB,
            primitive.displacement(),
        );
    }

    /// Rewrites the displacement of an emitted jump. Slots dropped because
    /// the code store was full are ignored.
    pub fn patch(&mut self, address: usize, target: i32) {
        if let Some(instruction) = self.code.instructions.get_mut(address) {
            instruction.d = target;
        }
    }

    /// Register through which code at the current level reaches a frame
    /// declared at `level`.
    pub fn display_register(&mut self, level: u32) -> Register {
        if level == 0 {
            return Register::SB;
        }

        match Register::display(self.level.saturating_sub(level)) {
            Some(register) => register,
            None => {
                self.error(ErrorImpl::NestingTooDeep {
                    current: self.level,
                    entity: level,
                });
                Register::L6
            }
        }
    }

    /// Frame address of the variable or parameter `ident` resolved to.
    pub fn variable_address(&mut self, ident: &Ident) -> Address {
        self.address_of_kind(ident, false)
    }

    /// Entry point of the subroutine `ident` resolved to.
    pub fn routine_address(&mut self, ident: &Ident) -> Address {
        self.address_of_kind(ident, true)
    }

    /// A use that resolved to the wrong kind of symbol was already reported
    /// by the checker. It gets the zero address, noted at info level.
    fn address_of_kind(&mut self, ident: &Ident, routine: bool) -> Address {
        let is_routine = self.model.resolve(ident.id).map(|symbol| {
            matches!(self.model.symbol(symbol).kind, SymbolKind::Subroutine { .. })
        });

        if is_routine == Some(!routine) {
            self.info(ErrorImpl::UnresolvedAddress {
                identifier: ident.name.clone(),
            });
            return Address::new(0, 0);
        }

        self.address_of(ident)
    }

    /// Address of the symbol `ident` resolved to.
    ///
    /// A use the checker could not resolve, or one whose declaration never
    /// received storage, is reported and gets the zero address.
    fn address_of(&mut self, ident: &Ident) -> Address {
        let address = self
            .model
            .resolve(ident.id)
            .and_then(|symbol| self.addresses.get(&symbol).copied());

        match address {
            Some(address) => address,
            None => {
                self.error(ErrorImpl::UnresolvedAddress {
                    identifier: ident.name.clone(),
                });
                Address::new(0, 0)
            }
        }
    }

    fn allocate(&mut self, ident: &Ident, address: Address) {
        match self.model.declared_symbol(ident.id) {
            Some(symbol) => {
                self.addresses.insert(symbol, address);
            }
            None => self.error(ErrorImpl::UnresolvedAddress {
                identifier: ident.name.clone(),
            }),
        }
    }

    /// Encodes a block: a jump over nested subroutine code, storage for its
    /// variables, then its statements. Returns the number of words reserved.
    pub fn encode_block(&mut self, block: &BlockStmt) -> i32 {
        let skip = self.emit(Opcode::Jump, 0, Register::CB, 0);
        let base = self.frame_top;

        for stmt in block.iter() {
            match stmt {
                Stmt::VarDecl(decl) => {
                    self.position = decl.span.start.clone();
                    let address = Address::new(self.level, self.frame_top);
                    self.allocate(&decl.name, address);
                    self.frame_top = match decl
                        .type_
                        .size()
                        .and_then(|size| self.frame_top.checked_add(size))
                    {
                        Some(frame_top) => frame_top,
                        None => {
                            self.error(ErrorImpl::FrameTooLarge {
                                identifier: decl.name.name.clone(),
                            });
                            i32::MAX
                        }
                    };
                }
                Stmt::SubroutineDecl(decl) => self.encode_subroutine(decl),
                _ => {}
            }
        }

        let target = self.next_address();
        self.patch(skip, target);

        let size = self.frame_top - base;
        if size > 0 {
            self.emit(Opcode::Push, 0, Register::CB, size);
        }

        for stmt in block.iter().filter(|stmt| !stmt.is_declaration()) {
            gen_statement(self, stmt);
        }

        size
    }

    /// Encodes a block nested in the current frame and releases its storage
    /// afterwards.
    pub fn encode_nested_block(&mut self, block: &BlockStmt) {
        let frame_top = self.frame_top;

        let size = self.encode_block(block);
        if size > 0 {
            self.emit(Opcode::Pop, 0, Register::CB, size);
        }

        self.frame_top = frame_top;
    }

    /// Lays out a subroutine's parameters and encodes its body in a new frame.
    pub fn encode_subroutine(&mut self, decl: &SubroutineDeclStmt) {
        self.position = decl.span.start.clone();

        let entry = self.next_address();
        self.allocate(&decl.name, Address::new(self.level, entry));

        let (level, frame_top) = (self.level, self.frame_top);
        self.level += 1;
        self.frame_top = LINK_DATA_SIZE;

        let count = decl.parameters.len() as i32;
        for (index, parameter) in decl.parameters.iter().enumerate() {
            self.allocate(&parameter.name, Address::new(self.level, index as i32 - count));
        }

        self.encode_block(&decl.body);

        self.emit(Opcode::LoadL, 0, Register::CB, 0);
        self.emit(Opcode::Return, 1, Register::CB, count);

        debug!(name = decl.name.name.as_str(), entry, parameters = count, "encoded subroutine");
        self.level = level;
        self.frame_top = frame_top;
    }

    fn finish(self) -> TargetProgram {
        TargetProgram {
            instructions: self.code.instructions,
            addresses: self.addresses,
        }
    }
}

/// Encodes a checked program with the default code store.
pub fn encode(
    program: &Program,
    model: &SemanticModel,
    sink: &mut dyn DiagnosticSink,
) -> TargetProgram {
    encode_with_options(program, model, sink, EncoderOptions::default())
}

pub fn encode_with_options(
    program: &Program,
    model: &SemanticModel,
    sink: &mut dyn DiagnosticSink,
    options: EncoderOptions,
) -> TargetProgram {
    let mut encoder = Encoder::new(model, sink, options);

    encoder.encode_block(&program.block);
    encoder.emit(Opcode::Halt, 0, Register::CB, 0);

    let target = encoder.finish();
    debug!(
        instructions = target.instructions.len(),
        symbols = target.addresses.len(),
        "encoded program"
    );
    target
}
