use std::fmt::Display;
use std::io::{self, Read, Write};

use thiserror::Error;

use crate::tam::machine::{Opcode, Primitive, Register, MAX_OPERAND_COUNT};

/// Size of one serialized instruction: four big-endian 32-bit words.
pub const RECORD_SIZE: usize = 16;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unknown opcode {0}")]
    UnknownOpcode(i32),
    #[error("unknown register {0}")]
    UnknownRegister(i32),
    #[error("operand count {0} out of range")]
    OperandCountOutOfRange(i32),
    #[error("truncated instruction record: {0} trailing bytes")]
    TruncatedRecord(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub r: Register,
    pub n: u8,
    pub d: i32,
}

impl Instruction {
    pub fn new(op: Opcode, n: u8, r: Register, d: i32) -> Self {
        Instruction { op, r, n, d }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0..4].copy_from_slice(&(self.op as i32).to_be_bytes());
        bytes[4..8].copy_from_slice(&(self.r as i32).to_be_bytes());
        bytes[8..12].copy_from_slice(&(self.n as i32).to_be_bytes());
        bytes[12..16].copy_from_slice(&self.d.to_be_bytes());
        bytes
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Reads the next record, or `None` at a clean end of input.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Instruction>, FormatError> {
        let mut bytes = [0u8; RECORD_SIZE];
        let mut filled = 0;

        while filled < RECORD_SIZE {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }

        match filled {
            0 => Ok(None),
            RECORD_SIZE => Instruction::from_bytes(&bytes).map(Some),
            partial => Err(FormatError::TruncatedRecord(partial)),
        }
    }

    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Result<Instruction, FormatError> {
        let word = |at: usize| {
            i32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        let op = Opcode::try_from(word(0))?;
        let r = Register::try_from(word(4))?;
        let n = word(8);
        if !(0..=MAX_OPERAND_COUNT).contains(&n) {
            return Err(FormatError::OperandCountOutOfRange(n));
        }

        Ok(Instruction {
            op,
            r,
            n: n as u8,
            d: word(12),
        })
    }
}

/// Decodes a whole artifact.
pub fn read_program<R: Read>(reader: &mut R) -> Result<Vec<Instruction>, FormatError> {
    let mut instructions = Vec::new();
    while let Some(instruction) = Instruction::read(reader)? {
        instructions.push(instruction);
    }
    Ok(instructions)
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = self.op.mnemonic();

        match self.op {
            Opcode::Load | Opcode::Store => {
                write!(f, "{}({}) {}[{}]", mnemonic, self.n, self.d, self.r)
            }
            Opcode::LoadA | Opcode::Jump => {
                write!(f, "{} {}[{}]", mnemonic, self.d, self.r)
            }
            Opcode::LoadI | Opcode::StoreI | Opcode::JumpI | Opcode::CallI => {
                write!(f, "{}({})", mnemonic, self.n)
            }
            Opcode::LoadL | Opcode::Push => write!(f, "{} {}", mnemonic, self.d),
            Opcode::Pop | Opcode::Return => write!(f, "{}({}) {}", mnemonic, self.n, self.d),
            Opcode::JumpIf => write!(f, "{}({}) {}[{}]", mnemonic, self.n, self.d, self.r),
            Opcode::Call => match (self.r, Primitive::from_displacement(self.d)) {
                (Register::PB, Some(primitive)) => write!(f, "{} {}", mnemonic, primitive.name()),
                _ => match Register::try_from(self.n as i32) {
                    Ok(link) => write!(f, "{}({}) {}[{}]", mnemonic, link, self.d, self.r),
                    Err(_) => write!(f, "{}({}) {}[{}]", mnemonic, self.n, self.d, self.r),
                },
            },
            Opcode::Halt => write!(f, "{}", mnemonic),
        }
    }
}
