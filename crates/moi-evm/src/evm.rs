//! Execution engine
//!
//! [`Evm`] owns the stack, memory and gas meter and exposes one method per
//! opcode family. It has no control flow of its own: a dispatcher such as
//! [`crate::Interpreter`] calls these methods in program order.
//!
//! Every operation validates its operands, memory growth and gas before
//! touching any state, so a failed call leaves the engine exactly as it was.

use crate::config::EvmConfig;
use crate::error::{EvmError, EvmResult};
use crate::gas::{self, GasMeter};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::stack::Stack;
use crate::word::{self, Word, WORD_BYTES};

/// Stack machine state
#[derive(Clone, Debug)]
pub struct Evm {
    stack: Stack,
    memory: Memory,
    gas: GasMeter,
}

impl Default for Evm {
    fn default() -> Self {
        Self::new(EvmConfig::default())
    }
}

impl Evm {
    /// Create a fresh engine
    pub fn new(config: EvmConfig) -> Self {
        Self {
            stack: Stack::with_limit(config.stack_limit),
            memory: Memory::with_limit(config.memory_limit),
            gas: GasMeter::new(config.gas_limit),
        }
    }

    /// Operand stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Memory
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Current stack, bottom to top
    pub fn current_stack(&self) -> Vec<Word> {
        self.stack.snapshot().to_vec()
    }

    /// Gas consumed so far
    pub fn gas_used(&self) -> u64 {
        self.gas.used()
    }

    /// PUSH1..PUSH32: push a big-endian immediate widened to a word
    pub fn push(&mut self, immediate: &[u8]) -> EvmResult<()> {
        let value = word::from_be_slice(immediate)?;
        self.push_word(value)
    }

    /// Push an already decoded word at PUSH cost
    pub fn push_word(&mut self, value: Word) -> EvmResult<()> {
        self.gas.ensure(gas::cost::VERYLOW)?;
        self.stack.push(value)?;
        self.gas.charge(gas::cost::VERYLOW)
    }

    /// MSTORE: pops value, offset and writes the 32-byte value
    pub fn mstore(&mut self) -> EvmResult<()> {
        let (offset, value) = self.store_operands(WORD_BYTES)?;
        let charge = self.memory.store_word(offset, &value)?;
        self.finish_store(Opcode::MSTORE, charge)
    }

    /// MSTORE8: pops value, offset and writes the low byte of value
    pub fn mstore8(&mut self) -> EvmResult<()> {
        let (offset, value) = self.store_operands(1)?;
        let charge = self.memory.store_byte(offset, value.low_u64() as u8)?;
        self.finish_store(Opcode::MSTORE8, charge)
    }

    /// ADD: pops b, a and pushes (a + b) mod 2^256
    pub fn add(&mut self) -> EvmResult<()> {
        self.binary_op(|a, b| Ok((word::add(a, b), gas::static_gas(Opcode::ADD))))
    }

    /// MUL: pops b, a and pushes (a * b) mod 2^256
    pub fn mul(&mut self) -> EvmResult<()> {
        self.binary_op(|a, b| Ok((word::mul(a, b), gas::static_gas(Opcode::MUL))))
    }

    /// SDIV: pops b, a and pushes the signed quotient a / b
    pub fn sdiv(&mut self) -> EvmResult<()> {
        self.binary_op(|a, b| {
            let quotient = word::sdiv(a, b).ok_or(EvmError::DivisionByZero)?;
            Ok((quotient, gas::static_gas(Opcode::SDIV)))
        })
    }

    /// EXP: pops exponent, base and pushes base^exponent mod 2^256
    ///
    /// Costs 50 gas per significant byte of the result.
    pub fn exp(&mut self) -> EvmResult<()> {
        self.binary_op(|base, exponent| {
            let result = word::exp(base, exponent);
            Ok((result, gas::exp_gas(word::byte_len(&result))))
        })
    }

    /// Shared pop-pop-push for binary operators
    ///
    /// `f` receives `(a, b)` where `b` was on top. Operands are read before
    /// anything is removed so an error leaves the stack intact.
    fn binary_op<F>(&mut self, f: F) -> EvmResult<()>
    where
        F: FnOnce(Word, Word) -> EvmResult<(Word, u64)>,
    {
        self.stack.require(2)?;
        let b = *self.stack.peek(0)?;
        let a = *self.stack.peek(1)?;
        let (result, cost) = f(a, b)?;
        self.gas.ensure(cost)?;

        self.stack.pop()?;
        self.stack.pop()?;
        self.stack.push(result)?;
        self.gas.charge(cost)
    }

    /// Validate a store of `width` bytes and pop its operands
    fn store_operands(&mut self, width: usize) -> EvmResult<(usize, Word)> {
        self.stack.require(2)?;
        let value = *self.stack.peek(0)?;
        let raw_offset = *self.stack.peek(1)?;
        let offset = word::to_usize(&raw_offset)
            .ok_or(EvmError::InvalidMemoryAccess { offset: raw_offset })?;

        let expansion = self.memory.expansion_for(offset, width)?;
        let cost = gas::cost::VERYLOW + expansion.map_or(0, |e| e.charge);
        self.gas.ensure(cost)?;

        self.stack.pop()?;
        self.stack.pop()?;
        Ok((offset, value))
    }

    fn finish_store(&mut self, opcode: Opcode, expansion_charge: u64) -> EvmResult<()> {
        self.gas.charge(gas::static_gas(opcode) + expansion_charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: u64) -> Word {
        Word::from(n)
    }

    fn evm_with(values: &[u64]) -> Evm {
        let mut evm = Evm::default();
        for &v in values {
            evm.push_word(w(v)).unwrap();
        }
        evm
    }

    #[test]
    fn test_push_widths() {
        let mut evm = Evm::default();
        evm.push(&[0x42]).unwrap();
        evm.push(&[0x12, 0x34]).unwrap();
        evm.push(&[0x01, 0x00, 0x00]).unwrap();
        evm.push(&[0xff; 32]).unwrap();
        assert_eq!(
            evm.current_stack(),
            vec![w(0x42), w(0x1234), w(0x010000), Word::MAX]
        );
        assert_eq!(evm.gas_used(), 12);
    }

    #[test]
    fn test_push_too_wide() {
        let mut evm = Evm::default();
        assert_eq!(evm.push(&[0u8; 33]), Err(EvmError::ImmediateTooWide(33)));
        assert_eq!(evm.gas_used(), 0);
    }

    #[test]
    fn test_add_wraparound() {
        let mut evm = Evm::default();
        evm.push(&[0xff; 32]).unwrap();
        evm.push(&[0x02]).unwrap();
        evm.add().unwrap();
        assert_eq!(evm.current_stack(), vec![w(1)]);
        assert_eq!(evm.gas_used(), 9);
    }

    #[test]
    fn test_add_underflow_does_not_mutate() {
        let mut evm = evm_with(&[7]);
        assert_eq!(evm.add(), Err(EvmError::StackUnderflow));
        assert_eq!(evm.current_stack(), vec![w(7)]);
        assert_eq!(evm.gas_used(), 3);
    }

    #[test]
    fn test_mul() {
        let mut evm = evm_with(&[6, 7]);
        evm.mul().unwrap();
        assert_eq!(evm.current_stack(), vec![w(42)]);
        assert_eq!(evm.gas_used(), 6 + 5);
    }

    #[test]
    fn test_sdiv_operand_order() {
        // a below, b on top: 20 / 5
        let mut evm = evm_with(&[20, 5]);
        evm.sdiv().unwrap();
        assert_eq!(evm.current_stack(), vec![w(4)]);
        assert_eq!(evm.gas_used(), 6 + 5);
    }

    #[test]
    fn test_sdiv_negative() {
        let mut evm = Evm::default();
        evm.push_word(word::negate(w(7))).unwrap();
        evm.push_word(w(2)).unwrap();
        evm.sdiv().unwrap();
        assert_eq!(evm.current_stack(), vec![word::negate(w(3))]);
    }

    #[test]
    fn test_sdiv_by_zero() {
        let mut evm = evm_with(&[9, 0]);
        assert_eq!(evm.sdiv(), Err(EvmError::DivisionByZero));
        assert_eq!(evm.current_stack(), vec![w(9), w(0)]);
        assert_eq!(evm.gas_used(), 6);
    }

    #[test]
    fn test_exp_gas_scales_with_result() {
        let mut evm = evm_with(&[2, 10]);
        evm.exp().unwrap();
        assert_eq!(evm.current_stack(), vec![w(1024)]);
        assert_eq!(evm.gas_used(), 6 + 100);
    }

    #[test]
    fn test_exp_zero_result_is_free() {
        let mut evm = evm_with(&[0, 5]);
        evm.exp().unwrap();
        assert_eq!(evm.current_stack(), vec![w(0)]);
        assert_eq!(evm.gas_used(), 6);
    }

    #[test]
    fn test_mstore_charges_expansion_once() {
        let mut evm = evm_with(&[0, 0xAA]);
        evm.mstore().unwrap();
        assert_eq!(evm.gas_used(), 6 + 3 + 3);
        assert_eq!(evm.memory().size(), 32);

        evm.push_word(w(0)).unwrap();
        evm.push_word(w(0xBB)).unwrap();
        evm.mstore().unwrap();
        // second store: pushes + base only
        assert_eq!(evm.gas_used(), 12 + 6 + 3);
        assert_eq!(evm.memory().size(), 32);
        assert_eq!(evm.memory().load_word(0), w(0xBB));
        assert!(evm.stack().is_empty());
    }

    #[test]
    fn test_mstore8_writes_low_byte() {
        let mut evm = evm_with(&[3, 0x1234]);
        evm.mstore8().unwrap();
        assert_eq!(evm.memory().data()[3], 0x34);
        assert_eq!(evm.memory().size(), 32);
        assert_eq!(evm.gas_used(), 6 + 3 + 3);
    }

    #[test]
    fn test_mstore_underflow() {
        let mut evm = evm_with(&[1]);
        assert_eq!(evm.mstore(), Err(EvmError::StackUnderflow));
        assert_eq!(evm.mstore8(), Err(EvmError::StackUnderflow));
        assert_eq!(evm.current_stack(), vec![w(1)]);
        assert_eq!(evm.memory().size(), 0);
    }

    #[test]
    fn test_mstore_huge_offset() {
        let mut evm = Evm::default();
        evm.push_word(Word::MAX).unwrap();
        evm.push_word(w(1)).unwrap();
        assert_eq!(
            evm.mstore(),
            Err(EvmError::InvalidMemoryAccess { offset: Word::MAX })
        );
        assert_eq!(evm.stack().len(), 2);
    }

    #[test]
    fn test_default_engine_stores_past_4mib() {
        let offset = 4 * 1024 * 1024;
        let mut evm = Evm::default();
        evm.push_word(w(offset)).unwrap();
        evm.push_word(w(1)).unwrap();
        evm.mstore().unwrap();
        assert_eq!(evm.memory().size(), offset as usize + 32);
        assert_eq!(evm.memory().load_word(offset as usize), w(1));
        assert!(evm.stack().is_empty());
    }

    #[test]
    fn test_mainnet_caps_memory() {
        let mut evm = Evm::new(EvmConfig::mainnet());
        evm.push_word(w(4 * 1024 * 1024)).unwrap();
        evm.push_word(w(1)).unwrap();
        assert_eq!(
            evm.mstore(),
            Err(EvmError::MemoryLimitExceeded { required: 4 * 1024 * 1024 + 32, limit: 4 * 1024 * 1024 })
        );
        assert_eq!(evm.memory().size(), 0);
    }

    #[test]
    fn test_mstore_memory_limit() {
        let mut evm = Evm::new(EvmConfig::default().with_memory_limit(32));
        evm.push_word(w(1)).unwrap();
        evm.push_word(w(1)).unwrap();
        assert_eq!(
            evm.mstore(),
            Err(EvmError::MemoryLimitExceeded { required: 64, limit: 32 })
        );
        assert_eq!(evm.memory().size(), 0);
    }

    #[test]
    fn test_gas_limit_blocks_operation() {
        let mut evm = Evm::new(EvmConfig::default().with_gas_limit(8));
        evm.push_word(w(1)).unwrap();
        evm.push_word(w(2)).unwrap();
        assert_eq!(
            evm.add(),
            Err(EvmError::OutOfGas { required: 9, limit: 8 })
        );
        assert_eq!(evm.current_stack(), vec![w(1), w(2)]);
        assert_eq!(evm.gas_used(), 6);
    }

    #[test]
    fn test_gas_limit_blocks_expansion() {
        let mut evm = Evm::new(EvmConfig::default().with_gas_limit(10));
        evm.push_word(w(0)).unwrap();
        evm.push_word(w(1)).unwrap();
        // needs 3 + 3 on top of 6
        assert_eq!(
            evm.mstore(),
            Err(EvmError::OutOfGas { required: 12, limit: 10 })
        );
        assert_eq!(evm.memory().size(), 0);
        assert_eq!(evm.stack().len(), 2);
    }

    #[test]
    fn test_stack_limit() {
        let mut evm = Evm::new(EvmConfig::default().with_stack_limit(1));
        evm.push(&[1]).unwrap();
        assert_eq!(evm.push(&[2]), Err(EvmError::StackOverflow { limit: 1 }));
        assert_eq!(evm.gas_used(), 3);
    }
}
