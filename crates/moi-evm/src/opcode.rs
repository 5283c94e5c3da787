//! EVM opcode definitions
//!
//! Bytes follow the standard EVM assignment (SDIV = 0x05, EXP = 0x0A), not a
//! compacted numbering, so bytecode from standard toolchains decodes as-is.

use std::fmt;

/// Opcodes understood by the interpreter (standard EVM byte values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    // Arithmetic
    ADD = 0x01,
    MUL = 0x02,
    SDIV = 0x05,
    EXP = 0x0A,

    // Memory
    MSTORE = 0x52,
    MSTORE8 = 0x53,

    // Push Operations
    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,
    PUSH9 = 0x68,
    PUSH10 = 0x69,
    PUSH11 = 0x6A,
    PUSH12 = 0x6B,
    PUSH13 = 0x6C,
    PUSH14 = 0x6D,
    PUSH15 = 0x6E,
    PUSH16 = 0x6F,
    PUSH17 = 0x70,
    PUSH18 = 0x71,
    PUSH19 = 0x72,
    PUSH20 = 0x73,
    PUSH21 = 0x74,
    PUSH22 = 0x75,
    PUSH23 = 0x76,
    PUSH24 = 0x77,
    PUSH25 = 0x78,
    PUSH26 = 0x79,
    PUSH27 = 0x7A,
    PUSH28 = 0x7B,
    PUSH29 = 0x7C,
    PUSH30 = 0x7D,
    PUSH31 = 0x7E,
    PUSH32 = 0x7F,
}

const PUSHES: [Opcode; 32] = [
    Opcode::PUSH1, Opcode::PUSH2, Opcode::PUSH3, Opcode::PUSH4,
    Opcode::PUSH5, Opcode::PUSH6, Opcode::PUSH7, Opcode::PUSH8,
    Opcode::PUSH9, Opcode::PUSH10, Opcode::PUSH11, Opcode::PUSH12,
    Opcode::PUSH13, Opcode::PUSH14, Opcode::PUSH15, Opcode::PUSH16,
    Opcode::PUSH17, Opcode::PUSH18, Opcode::PUSH19, Opcode::PUSH20,
    Opcode::PUSH21, Opcode::PUSH22, Opcode::PUSH23, Opcode::PUSH24,
    Opcode::PUSH25, Opcode::PUSH26, Opcode::PUSH27, Opcode::PUSH28,
    Opcode::PUSH29, Opcode::PUSH30, Opcode::PUSH31, Opcode::PUSH32,
];

impl Opcode {
    /// Try to convert from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::ADD),
            0x02 => Some(Self::MUL),
            0x05 => Some(Self::SDIV),
            0x0A => Some(Self::EXP),
            0x52 => Some(Self::MSTORE),
            0x53 => Some(Self::MSTORE8),
            0x60..=0x7F => Some(PUSHES[(byte - 0x60) as usize]),
            _ => None,
        }
    }

    /// Get PUSH operand size (1-32 for PUSH1-PUSH32, 0 otherwise)
    pub fn push_size(self) -> usize {
        let byte = self as u8;
        if (0x60..=0x7F).contains(&byte) {
            (byte - 0x5F) as usize
        } else {
            0
        }
    }

    /// Check if this is a PUSH opcode
    pub fn is_push(self) -> bool {
        self.push_size() > 0
    }

    /// Mnemonic
    pub fn name(self) -> &'static str {
        match self {
            Self::ADD => "ADD",
            Self::MUL => "MUL",
            Self::SDIV => "SDIV",
            Self::EXP => "EXP",
            Self::MSTORE => "MSTORE",
            Self::MSTORE8 => "MSTORE8",
            Self::PUSH1 => "PUSH1",
            Self::PUSH2 => "PUSH2",
            Self::PUSH3 => "PUSH3",
            Self::PUSH4 => "PUSH4",
            Self::PUSH5 => "PUSH5",
            Self::PUSH6 => "PUSH6",
            Self::PUSH7 => "PUSH7",
            Self::PUSH8 => "PUSH8",
            Self::PUSH9 => "PUSH9",
            Self::PUSH10 => "PUSH10",
            Self::PUSH11 => "PUSH11",
            Self::PUSH12 => "PUSH12",
            Self::PUSH13 => "PUSH13",
            Self::PUSH14 => "PUSH14",
            Self::PUSH15 => "PUSH15",
            Self::PUSH16 => "PUSH16",
            Self::PUSH17 => "PUSH17",
            Self::PUSH18 => "PUSH18",
            Self::PUSH19 => "PUSH19",
            Self::PUSH20 => "PUSH20",
            Self::PUSH21 => "PUSH21",
            Self::PUSH22 => "PUSH22",
            Self::PUSH23 => "PUSH23",
            Self::PUSH24 => "PUSH24",
            Self::PUSH25 => "PUSH25",
            Self::PUSH26 => "PUSH26",
            Self::PUSH27 => "PUSH27",
            Self::PUSH28 => "PUSH28",
            Self::PUSH29 => "PUSH29",
            Self::PUSH30 => "PUSH30",
            Self::PUSH31 => "PUSH31",
            Self::PUSH32 => "PUSH32",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
