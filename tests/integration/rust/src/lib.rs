//! Integration test suite for the value and coercion core
//!
//! This crate drives `ecma_ops` against the reference `memory_manager::Heap`
//! the way an interpreter would: operand values live on a stack that retains
//! them, and every operator result is pushed back retained.

use core_types::{JsResult, MemoryManager, Value};
use memory_manager::Heap;

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use ecma_ops;
    pub use memory_manager;
}

/// Binary operators the stack machine can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    LooseEquals,
    LooseNotEquals,
    StrictEquals,
    StrictNotEquals,
    In,
    InstanceOf,
}

/// A minimal operand stack over the reference heap.
///
/// Values are retained while they sit on the stack and released when
/// popped, mirroring an interpreter's register discipline.
pub struct Machine {
    pub heap: Heap,
    stack: Vec<Value>,
}

impl Machine {
    pub fn new() -> Self {
        Self::with_heap(Heap::new())
    }

    pub fn with_heap(heap: Heap) -> Self {
        Machine {
            heap,
            stack: Vec::new(),
        }
    }

    /// Push `v`, retaining it.
    pub fn push(&mut self, v: Value) {
        self.heap.inc_ref(v);
        self.stack.push(v);
    }

    /// Push a string literal.
    pub fn push_str(&mut self, text: &str) {
        let s = self.heap.alloc_str(text);
        self.push(Value::string(s));
    }

    /// Pop and release the top of the stack.
    pub fn drop_top(&mut self) {
        if let Some(v) = self.stack.pop() {
            self.heap.dec_ref(v);
        }
    }

    pub fn top(&self) -> Option<Value> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Text of the string on top of the stack.
    pub fn top_text(&self) -> Option<String> {
        self.heap.string_text(self.top()?.as_string()?)
    }

    /// Pop two operands, apply `op`, push the result.
    ///
    /// On error both operands are still released and nothing is pushed.
    pub fn binary(&mut self, op: BinaryOp) -> JsResult<()> {
        let y = self.stack.pop().unwrap_or_else(Value::undefined);
        let x = self.stack.pop().unwrap_or_else(Value::undefined);
        let result = apply(&mut self.heap, op, x, y);
        self.heap.dec_ref(x);
        self.heap.dec_ref(y);
        let v = result?;
        self.push(v);
        Ok(())
    }

    /// Replace the top of the stack with its `typeof` name.
    pub fn type_of(&mut self) -> JsResult<()> {
        let v = self.stack.pop().unwrap_or_else(Value::undefined);
        let result = ecma_ops::type_of(&self.heap, v);
        self.heap.dec_ref(v);
        self.push(Value::string(result?));
        Ok(())
    }

    /// Release everything left on the stack.
    pub fn clear(&mut self) {
        while !self.stack.is_empty() {
            self.drop_top();
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one binary operator to two values.
pub fn apply(heap: &mut Heap, op: BinaryOp, x: Value, y: Value) -> JsResult<Value> {
    use ecma_ops::*;
    Ok(match op {
        BinaryOp::Add => add(heap, x, y)?,
        BinaryOp::Sub => sub(heap, x, y)?,
        BinaryOp::Mul => mul(heap, x, y)?,
        BinaryOp::Div => div(heap, x, y)?,
        BinaryOp::Rem => rem(heap, x, y)?,
        BinaryOp::Less => Value::boolean(less_than(heap, x, y)?),
        BinaryOp::Greater => Value::boolean(greater_than(heap, x, y)?),
        BinaryOp::LessEqual => Value::boolean(less_equal(heap, x, y)?),
        BinaryOp::GreaterEqual => Value::boolean(greater_equal(heap, x, y)?),
        BinaryOp::LooseEquals => Value::boolean(loose_equals(heap, x, y)?),
        BinaryOp::LooseNotEquals => Value::boolean(loose_not_equals(heap, x, y)?),
        BinaryOp::StrictEquals => Value::boolean(strict_equals(heap, x, y)?),
        BinaryOp::StrictNotEquals => Value::boolean(strict_not_equals(heap, x, y)?),
        BinaryOp::In => Value::boolean(in_operator(heap, x, y)?),
        BinaryOp::InstanceOf => Value::boolean(instanceof(heap, x, y)?),
    })
}
