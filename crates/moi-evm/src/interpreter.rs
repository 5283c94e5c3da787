//! EVM bytecode interpreter

use crate::config::EvmConfig;
use crate::error::{EvmError, EvmResult, ExecutionResult};
use crate::evm::Evm;
use crate::opcode::Opcode;
use std::fmt;

/// A decoded instruction borrowed from the code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Offset of the opcode byte
    pub offset: usize,
    /// Decoded opcode
    pub opcode: Opcode,
    /// PUSH immediate (empty for other opcodes)
    pub immediate: &'a [u8],
}

impl Instruction<'_> {
    /// Encoded length including the immediate
    pub fn encoded_len(&self) -> usize {
        1 + self.immediate.len()
    }
}

impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}: {}", self.offset, self.opcode)?;
        if !self.immediate.is_empty() {
            write!(f, " 0x")?;
            for byte in self.immediate {
                write!(f, "{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

/// Decode the instruction at `offset`, or `None` past the end of code
fn decode_at(code: &[u8], offset: usize) -> EvmResult<Option<Instruction<'_>>> {
    let Some(&byte) = code.get(offset) else {
        return Ok(None);
    };
    let opcode = Opcode::from_byte(byte).ok_or(EvmError::UnknownOpcode { opcode: byte, offset })?;

    let start = offset + 1;
    let expected = opcode.push_size();
    let immediate = code
        .get(start..start + expected)
        .ok_or(EvmError::TruncatedImmediate {
            offset,
            expected,
            available: code.len() - start,
        })?;

    Ok(Some(Instruction { offset, opcode, immediate }))
}

/// Cursor over bytecode yielding decoded instructions
///
/// Stops after the first decode error.
#[derive(Debug, Clone)]
pub struct InstructionStream<'a> {
    code: &'a [u8],
    cursor: usize,
}

impl<'a> InstructionStream<'a> {
    /// Create a stream positioned at the start of `code`
    pub fn new(code: &'a [u8]) -> Self {
        Self { code, cursor: 0 }
    }

    /// Offset of the next instruction
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for InstructionStream<'a> {
    type Item = EvmResult<Instruction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match decode_at(self.code, self.cursor) {
            Ok(Some(instruction)) => {
                self.cursor += instruction.encoded_len();
                Some(Ok(instruction))
            }
            Ok(None) => None,
            Err(e) => {
                self.cursor = self.code.len();
                Some(Err(e))
            }
        }
    }
}

/// Decode the whole program
pub fn disassemble(code: &[u8]) -> EvmResult<Vec<Instruction<'_>>> {
    InstructionStream::new(code).collect()
}

/// Interpreter state
#[derive(Clone, Debug)]
pub struct Interpreter {
    /// Bytecode being executed
    code: Vec<u8>,
    /// Program counter
    pc: usize,
    /// Engine driven by the decoded instructions
    evm: Evm,
    /// Error that stopped execution
    halted: Option<EvmError>,
}

impl Interpreter {
    /// Create a new interpreter with bytecode and limits
    pub fn new(code: Vec<u8>, config: EvmConfig) -> Self {
        Self {
            code,
            pc: 0,
            evm: Evm::new(config),
            halted: None,
        }
    }

    /// Execute until the end of code or the first error
    pub fn run(&mut self) -> ExecutionResult {
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(pc = self.pc, error = %e, "execution halted");
                    return ExecutionResult::halted(
                        self.evm.gas_used(),
                        self.evm.current_stack(),
                        self.evm.memory().size(),
                        self.pc,
                        e,
                    );
                }
            }
        }

        ExecutionResult::success(
            self.evm.gas_used(),
            self.evm.current_stack(),
            self.evm.memory().size(),
            self.pc,
        )
    }

    /// Execute a single instruction
    ///
    /// Returns `Ok(false)` once the end of code is reached. After an error
    /// the interpreter stays halted and returns that error again.
    pub fn step(&mut self) -> EvmResult<bool> {
        if let Some(e) = &self.halted {
            return Err(e.clone());
        }

        let instruction = match decode_at(&self.code, self.pc) {
            Ok(Some(instruction)) => instruction,
            Ok(None) => return Ok(false),
            Err(e) => {
                self.halted = Some(e.clone());
                return Err(e);
            }
        };

        tracing::trace!(
            pc = self.pc,
            opcode = %instruction.opcode,
            gas_used = self.evm.gas_used(),
            "step"
        );

        let next_pc = self.pc + instruction.encoded_len();
        if let Err(e) = execute(&mut self.evm, &instruction) {
            self.halted = Some(e.clone());
            return Err(e);
        }
        self.pc = next_pc;
        Ok(true)
    }

    /// Engine state
    pub fn engine(&self) -> &Evm {
        &self.evm
    }

    /// Program counter
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Bytecode being executed
    pub fn code(&self) -> &[u8] {
        &self.code
    }
}

/// Dispatch one decoded instruction to the engine
fn execute(evm: &mut Evm, instruction: &Instruction<'_>) -> EvmResult<()> {
    match instruction.opcode {
        Opcode::ADD => evm.add(),
        Opcode::MUL => evm.mul(),
        Opcode::SDIV => evm.sdiv(),
        Opcode::EXP => evm.exp(),
        Opcode::MSTORE => evm.mstore(),
        Opcode::MSTORE8 => evm.mstore8(),
        _ => evm.push(instruction.immediate),
    }
}
