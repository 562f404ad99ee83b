use crate::foundation::error::{ImgOpError, ImgOpResult};
use crate::program::op::{Op, Program};
use crate::raster::store::ImageStore;
use crate::stack::dispatch::{Unsupported, apply_binary, apply_clamp};
use crate::stack::operand::{Operand, OperandSummary};

/// What to do when an operator meets operand kinds with no dispatch entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnsupportedPolicy {
    /// Stop the run with [`ImgOpError::UnsupportedOperands`].
    #[default]
    Fail,
    /// Drop both operands, push nothing, log a warning and record the pair in the report.
    Discard,
}

/// Evaluation options.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalOpts {
    /// Handling of unsupported arithmetic pairs. Clamps always fail.
    pub unsupported: UnsupportedPolicy,
}

/// LIFO operand stack.
#[derive(Clone, Debug, Default)]
pub struct OperandStack {
    items: Vec<Operand>,
}

impl OperandStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operands.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing is on the stack.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push onto the top.
    pub fn push(&mut self, v: impl Into<Operand>) {
        self.items.push(v.into());
    }

    /// Borrow the top operand.
    pub fn peek(&self) -> Option<&Operand> {
        self.items.last()
    }

    /// Operands from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Operand> {
        self.items.iter()
    }

    /// Pop the top operand; `what` names the operator in the underflow error.
    pub fn pop(&mut self, what: &str) -> ImgOpResult<Operand> {
        self.items.pop().ok_or_else(|| {
            ImgOpError::stack_underflow(format!("{what} needs 1 operand, stack is empty"))
        })
    }

    /// Pop `(o1, o2)` where `o2` was on top. Nothing is popped on underflow.
    pub fn pop2(&mut self, what: &str) -> ImgOpResult<(Operand, Operand)> {
        if self.items.len() < 2 {
            return Err(ImgOpError::stack_underflow(format!(
                "{what} needs 2 operands, stack has {}",
                self.items.len()
            )));
        }
        let o2 = self.pop(what)?;
        let o1 = self.pop(what)?;
        Ok((o1, o2))
    }

    /// Take all operands, bottom first, leaving the stack empty.
    pub fn drain(&mut self) -> Vec<Operand> {
        std::mem::take(&mut self.items)
    }
}

/// An unsupported pair dropped under [`UnsupportedPolicy::Discard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DiscardedPair {
    /// Index of the op in the program.
    pub index: usize,
    /// The rejected combination.
    #[serde(flatten)]
    pub pair: Unsupported,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Number of ops executed.
    pub executed: usize,
    /// Pairs dropped under the discard policy, in program order.
    pub discarded: Vec<DiscardedPair>,
    /// Operands left on the stack at the end, bottom first.
    pub residual: Vec<Operand>,
}

impl RunReport {
    /// Pixel-free, serializable view of the report.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            executed: self.executed,
            discarded: self.discarded.clone(),
            residual: self.residual.iter().map(Operand::summary).collect(),
        }
    }
}

/// Serializable form of [`RunReport`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunSummary {
    /// Number of ops executed.
    pub executed: usize,
    /// Pairs dropped under the discard policy.
    pub discarded: Vec<DiscardedPair>,
    /// Residual operands, bottom first.
    pub residual: Vec<OperandSummary>,
}

/// The stack machine: an operand stack plus the image store used by `i` and `o`.
#[derive(Debug)]
pub struct Machine<S> {
    stack: OperandStack,
    store: S,
    opts: EvalOpts,
    discarded: Vec<DiscardedPair>,
}

impl<S: ImageStore> Machine<S> {
    /// Create a machine with an empty stack.
    pub fn new(store: S, opts: EvalOpts) -> Self {
        Self {
            stack: OperandStack::new(),
            store,
            opts,
            discarded: Vec::new(),
        }
    }

    /// Borrow the operand stack.
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// Borrow the image store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the image store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Execute every op in order, stopping at the first error.
    ///
    /// Each run starts from an empty stack. On success the stack is drained into the report's
    /// residual list; after a failure it keeps whatever was left for inspection.
    #[tracing::instrument(skip_all, fields(ops = program.len()))]
    pub fn run(&mut self, program: &Program) -> ImgOpResult<RunReport> {
        tracing::debug!(program = %program, "run");
        self.stack.drain();
        self.discarded.clear();
        for (index, op) in program.ops().iter().enumerate() {
            self.step(index, op)?;
        }

        let report = RunReport {
            executed: program.len(),
            discarded: std::mem::take(&mut self.discarded),
            residual: self.stack.drain(),
        };
        if !report.residual.is_empty() {
            tracing::debug!(
                residual = report.residual.len(),
                "discarding operands left on the stack"
            );
        }
        Ok(report)
    }

    /// Execute a single op. `index` is only used for diagnostics.
    pub fn step(&mut self, index: usize, op: &Op) -> ImgOpResult<()> {
        let name = op.name();
        match op {
            Op::PushScalar(s) => self.stack.push(*s),
            Op::PushVector(v) => self.stack.push(*v),
            Op::PushMatrix(m) => self.stack.push(*m),
            Op::Load(path) => {
                let img = self.store.load(path)?;
                self.stack.push(img);
            }
            Op::Store(path) => {
                let top = self.stack.pop(&at(index, name))?;
                let kind = top.kind();
                let Operand::Image(img) = top else {
                    return Err(ImgOpError::type_mismatch(format!(
                        "op {index}: store expects an image, got {kind}"
                    )));
                };
                self.store.store(path, &img)?;
            }
            Op::Duplicate => {
                let top = self.stack.pop(&at(index, name))?;
                self.stack.push(top.clone());
                self.stack.push(top);
            }
            Op::Swap => {
                let (o1, o2) = self.stack.pop2(&at(index, name))?;
                self.stack.push(o2);
                self.stack.push(o1);
            }
            Op::Clamp(kind) => {
                let (o1, o2) = self.stack.pop2(&at(index, name))?;
                let out = apply_clamp(*kind, o1, o2).map_err(|u| reject(index, u))?;
                self.stack.push(out);
            }
            Op::Binary(bin) => {
                let (o1, o2) = self.stack.pop2(&at(index, name))?;
                match apply_binary(*bin, o1, o2) {
                    Ok(out) => self.stack.push(out),
                    Err(u) => match self.opts.unsupported {
                        UnsupportedPolicy::Fail => return Err(reject(index, u)),
                        UnsupportedPolicy::Discard => {
                            tracing::warn!(index, pair = %u, "discarding unsupported operands");
                            self.discarded.push(DiscardedPair { index, pair: u });
                        }
                    },
                }
            }
        }

        tracing::debug!(index, op = name, depth = self.stack.len(), "step");
        Ok(())
    }
}

fn at(index: usize, name: &str) -> String {
    format!("op {index} ({name})")
}

fn reject(index: usize, u: Unsupported) -> ImgOpError {
    ImgOpError::unsupported(format!("op {index}: {u}"))
}

#[cfg(test)]
#[path = "../../tests/unit/stack/machine.rs"]
mod tests;
