//! Render context
//!
//! The context holds per-render state: the component call stack, the frames
//! of components being executed and the interrupt flag. One context serves
//! exactly one top-level render; it is never shared between concurrent renders.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use nitro_bytecode::{ComponentId, ComponentRange};

use crate::error::{RenderError, RenderResult};

/// Default maximum component nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A component being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Component this frame executes
    pub component: ComponentId,
    /// Next instruction (absolute index)
    pub pc: u32,
    /// End of the component's range
    pub end: u32,
}

impl Frame {
    /// Check if every instruction of the component has run
    #[inline]
    pub fn is_done(&self) -> bool {
        self.pc >= self.end
    }
}

/// Per-render execution state
#[derive(Debug)]
pub struct RenderContext {
    /// Component ids pushed and not yet executed
    call_stack: Vec<ComponentId>,
    /// Components being executed, innermost last
    frames: Vec<Frame>,
    /// Nesting limit
    max_depth: usize,
    /// Interrupt flag for cancellation support
    interrupt_flag: Arc<AtomicBool>,
    /// Render is abandoned once this instant passes
    deadline: Option<Instant>,
}

impl RenderContext {
    /// Create a context with the default depth limit
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create a context with a custom depth limit.
    ///
    /// A limit of 0 admits no component, so every render fails with
    /// [`RenderError::DepthExceeded`].
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            call_stack: Vec::with_capacity(16),
            frames: Vec::with_capacity(16),
            max_depth,
            interrupt_flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Get the interrupt flag for external cancellation
    ///
    /// Call `flag.store(true, Ordering::Relaxed)` to interrupt the render.
    /// The interpreter checks the flag before every instruction.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt_flag)
    }

    /// Set a caller-owned interrupt flag
    pub fn set_interrupt_flag(&mut self, flag: Arc<AtomicBool>) {
        self.interrupt_flag = flag;
    }

    /// Abandon the render once `deadline` passes
    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Check if the render was interrupted or ran past its deadline
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.interrupt_flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Request interruption of the render
    pub fn interrupt(&self) {
        self.interrupt_flag.store(true, Ordering::Relaxed);
    }

    /// Push a component id
    #[inline]
    pub fn push_component(&mut self, id: ComponentId) {
        self.call_stack.push(id);
    }

    /// Pop the most recently pushed component id
    #[inline]
    pub fn pop_component(&mut self) -> Option<ComponentId> {
        self.call_stack.pop()
    }

    /// Pushed ids not yet executed
    #[inline]
    pub fn pending(&self) -> &[ComponentId] {
        &self.call_stack
    }

    /// Discard pushed ids not yet executed, returns how many were dropped
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.call_stack.len();
        self.call_stack.clear();
        dropped
    }

    /// Start executing a component
    pub fn push_frame(&mut self, component: ComponentId, range: ComponentRange) -> RenderResult<()> {
        if self.frames.len() >= self.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.frames.push(Frame {
            component,
            pc: range.start,
            end: range.end,
        });
        Ok(())
    }

    /// Finish the innermost component
    #[inline]
    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Innermost component being executed
    #[inline]
    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Advance the innermost frame to its next instruction
    #[inline]
    pub fn advance_pc(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pc += 1;
        }
    }

    /// Current nesting depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Nesting limit
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
