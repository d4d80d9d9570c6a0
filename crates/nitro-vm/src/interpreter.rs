//! Template interpreter
//!
//! Executes component instructions, streaming bytes straight to the sink.
//! Nested components run on explicit frames held by the [`RenderContext`],
//! so template nesting never grows the native stack.

use std::io::Write;

use nitro_bytecode::{ComponentId, ComponentRange, Instruction, Template};
use tracing::trace;

use crate::context::RenderContext;
use crate::error::{RenderError, RenderResult};

/// The template interpreter
pub struct Interpreter<'t> {
    template: &'t Template,
}

impl<'t> Interpreter<'t> {
    /// Create an interpreter over a loaded template
    pub fn new(template: &'t Template) -> Self {
        Self { template }
    }

    /// Render `component` into `sink`.
    ///
    /// `ExecComponent` pops ids pushed anywhere earlier in this render,
    /// including by enclosing components. A top-level render starts and ends
    /// with an empty call stack. On error the bytes already written stay in
    /// the sink.
    pub fn run<W, D>(
        &self,
        component: ComponentId,
        data: &[D],
        sink: &mut W,
        ctx: &mut RenderContext,
    ) -> RenderResult<()>
    where
        W: Write + ?Sized,
        D: AsRef<[u8]>,
    {
        let base_depth = ctx.depth();
        let top_level = base_depth == 0;
        if top_level {
            // Ids left over from an earlier render on this context
            ctx.clear_pending();
        }

        let range = self.component_range(component)?;
        ctx.push_frame(component, range)?;

        let result = self.run_loop(data, sink, ctx, base_depth);

        // Drop frames left behind by an error so the context can be reused
        while ctx.depth() > base_depth {
            ctx.pop_frame();
        }

        if top_level {
            let residual = ctx.clear_pending();
            if result.is_ok() && residual > 0 {
                trace!(
                    component = component.index(),
                    residual,
                    "render finished with unexecuted pushes"
                );
            }
        }
        result
    }

    /// Main execution loop
    fn run_loop<W, D>(
        &self,
        data: &[D],
        sink: &mut W,
        ctx: &mut RenderContext,
        base_depth: usize,
    ) -> RenderResult<()>
    where
        W: Write + ?Sized,
        D: AsRef<[u8]>,
    {
        while ctx.depth() > base_depth {
            let frame = match ctx.current_frame() {
                Some(frame) => *frame,
                None => break,
            };

            // Check if we've reached the end of the component
            if frame.is_done() {
                ctx.pop_frame();
                continue;
            }

            if ctx.is_interrupted() {
                return Err(RenderError::Interrupted);
            }

            let instruction = self.template.instructions()[frame.pc as usize];
            ctx.advance_pc();

            match instruction {
                Instruction::CopySnippet { snippet } => {
                    let bytes = self.template.snippets().get(snippet).ok_or(
                        RenderError::SnippetOutOfRange {
                            index: snippet.index(),
                            len: self.template.snippets().len(),
                        },
                    )?;
                    sink.write_all(bytes)?;
                }
                Instruction::CopyData { data: index } => {
                    let bytes = data.get(index.index() as usize).ok_or(
                        RenderError::DataOutOfRange {
                            index: index.index(),
                            len: data.len(),
                        },
                    )?;
                    sink.write_all(bytes.as_ref())?;
                }
                Instruction::ExecComponent => {
                    let callee = ctx.pop_component().ok_or(RenderError::StackUnderflow {
                        component: frame.component,
                    })?;
                    let range = self.component_range(callee)?;
                    trace!(
                        caller = frame.component.index(),
                        callee = callee.index(),
                        depth = ctx.depth(),
                        "exec component"
                    );
                    ctx.push_frame(callee, range)?;
                }
                Instruction::PushComponent { component } => {
                    ctx.push_component(component);
                }
            }
        }

        Ok(())
    }

    fn component_range(&self, id: ComponentId) -> RenderResult<ComponentRange> {
        self.template
            .component_range(id)
            .ok_or(RenderError::UnknownComponent(id))
    }
}
