use std::fmt::Display;

use crate::tam::instruction::FormatError;

// Code store layout.
pub const CB: i32 = 0;
pub const PB: i32 = 1024;
pub const PT: i32 = 1052;

/// Default number of instruction slots available to a program.
pub const CODE_STORE_SIZE: usize = PB as usize;

pub const LINK_DATA_SIZE: i32 = 3;
/// Furthest static distance a display register can reach (L1..L6).
pub const MAX_DISPLAY_DISTANCE: u32 = 6;

pub const MAX_OPERAND_COUNT: i32 = 255;
pub const MAX_DISPLACEMENT: i32 = 32767;

pub const FALSE_REP: i32 = 0;
pub const TRUE_REP: i32 = 1;
pub const MAXINT_REP: i32 = 32767;

pub const WORD_SIZE: i32 = 1;
pub const INT_SIZE: i32 = WORD_SIZE;
pub const BOOL_SIZE: i32 = WORD_SIZE;
pub const CHAR_SIZE: i32 = WORD_SIZE;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Load = 0,
    LoadA = 1,
    LoadI = 2,
    LoadL = 3,
    Store = 4,
    StoreI = 5,
    Call = 6,
    CallI = 7,
    Return = 8,
    Push = 10,
    Pop = 11,
    Jump = 12,
    JumpI = 13,
    JumpIf = 14,
    Halt = 15,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Load => "LOAD",
            Opcode::LoadA => "LOADA",
            Opcode::LoadI => "LOADI",
            Opcode::LoadL => "LOADL",
            Opcode::Store => "STORE",
            Opcode::StoreI => "STOREI",
            Opcode::Call => "CALL",
            Opcode::CallI => "CALLI",
            Opcode::Return => "RETURN",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Jump => "JUMP",
            Opcode::JumpI => "JUMPI",
            Opcode::JumpIf => "JUMPIF",
            Opcode::Halt => "HALT",
        }
    }
}

impl TryFrom<i32> for Opcode {
    type Error = FormatError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Opcode::Load,
            1 => Opcode::LoadA,
            2 => Opcode::LoadI,
            3 => Opcode::LoadL,
            4 => Opcode::Store,
            5 => Opcode::StoreI,
            6 => Opcode::Call,
            7 => Opcode::CallI,
            8 => Opcode::Return,
            10 => Opcode::Push,
            11 => Opcode::Pop,
            12 => Opcode::Jump,
            13 => Opcode::JumpI,
            14 => Opcode::JumpIf,
            15 => Opcode::Halt,
            _ => return Err(FormatError::UnknownOpcode(value)),
        })
    }
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    CB = 0,
    CT = 1,
    PB = 2,
    PT = 3,
    SB = 4,
    ST = 5,
    HB = 6,
    HT = 7,
    LB = 8,
    L1 = 9,
    L2 = 10,
    L3 = 11,
    L4 = 12,
    L5 = 13,
    L6 = 14,
    CP = 15,
}

impl Register {
    /// Display register `distance` levels out from the local frame: LB, L1..L6.
    pub fn display(distance: u32) -> Option<Register> {
        if distance > MAX_DISPLAY_DISTANCE {
            return None;
        }

        Some(match distance {
            0 => Register::LB,
            1 => Register::L1,
            2 => Register::L2,
            3 => Register::L3,
            4 => Register::L4,
            5 => Register::L5,
            6 => Register::L6,
            _ => return None,
        })
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TryFrom<i32> for Register {
    type Error = FormatError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Register::CB,
            1 => Register::CT,
            2 => Register::PB,
            3 => Register::PT,
            4 => Register::SB,
            5 => Register::ST,
            6 => Register::HB,
            7 => Register::HT,
            8 => Register::LB,
            9 => Register::L1,
            10 => Register::L2,
            11 => Register::L3,
            12 => Register::L4,
            13 => Register::L5,
            14 => Register::L6,
            15 => Register::CP,
            _ => return Err(FormatError::UnknownRegister(value)),
        })
    }
}

/// Built-in routines, addressed by their displacement from PB.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Id = 1,
    Not = 2,
    And = 3,
    Or = 4,
    Succ = 5,
    Pred = 6,
    Neg = 7,
    Add = 8,
    Sub = 9,
    Mult = 10,
    Div = 11,
    Mod = 12,
    Lt = 13,
    Le = 14,
    Ge = 15,
    Gt = 16,
    Eq = 17,
    Ne = 18,
    Eol = 19,
    Eof = 20,
    Get = 21,
    Put = 22,
    Geteol = 23,
    Puteol = 24,
    Getint = 25,
    Putint = 26,
    New = 27,
    Dispose = 28,
}

impl Primitive {
    const ALL: [Primitive; 28] = [
        Primitive::Id,
        Primitive::Not,
        Primitive::And,
        Primitive::Or,
        Primitive::Succ,
        Primitive::Pred,
        Primitive::Neg,
        Primitive::Add,
        Primitive::Sub,
        Primitive::Mult,
        Primitive::Div,
        Primitive::Mod,
        Primitive::Lt,
        Primitive::Le,
        Primitive::Ge,
        Primitive::Gt,
        Primitive::Eq,
        Primitive::Ne,
        Primitive::Eol,
        Primitive::Eof,
        Primitive::Get,
        Primitive::Put,
        Primitive::Geteol,
        Primitive::Puteol,
        Primitive::Getint,
        Primitive::Putint,
        Primitive::New,
        Primitive::Dispose,
    ];

    pub fn displacement(&self) -> i32 {
        *self as i32
    }

    pub fn from_displacement(displacement: i32) -> Option<Primitive> {
        Primitive::ALL
            .iter()
            .copied()
            .find(|primitive| primitive.displacement() == displacement)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Id => "id",
            Primitive::Not => "not",
            Primitive::And => "and",
            Primitive::Or => "or",
            Primitive::Succ => "succ",
            Primitive::Pred => "pred",
            Primitive::Neg => "neg",
            Primitive::Add => "add",
            Primitive::Sub => "sub",
            Primitive::Mult => "mult",
            Primitive::Div => "div",
            Primitive::Mod => "mod",
            Primitive::Lt => "lt",
            Primitive::Le => "le",
            Primitive::Ge => "ge",
            Primitive::Gt => "gt",
            Primitive::Eq => "eq",
            Primitive::Ne => "ne",
            Primitive::Eol => "eol",
            Primitive::Eof => "eof",
            Primitive::Get => "get",
            Primitive::Put => "put",
            Primitive::Geteol => "geteol",
            Primitive::Puteol => "puteol",
            Primitive::Getint => "getint",
            Primitive::Putint => "putint",
            Primitive::New => "new",
            Primitive::Dispose => "dispose",
        }
    }
}
