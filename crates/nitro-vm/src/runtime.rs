//! Render runtime - the main entry point
//!
//! The runtime owns the loaded template and creates a fresh context for
//! every render.

use serde::Deserialize;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use nitro_bytecode::{ComponentId, Template};
use tracing::{debug, trace_span};

use crate::context::{DEFAULT_MAX_DEPTH, RenderContext};
use crate::error::RenderResult;
use crate::interpreter::Interpreter;

/// Render configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum component nesting depth, at least 1
    #[serde(deserialize_with = "depth::deserialize")]
    pub max_depth: usize,
    /// Wall-clock budget for a single render
    #[serde(deserialize_with = "millis::deserialize")]
    pub timeout: Option<Duration>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: None,
        }
    }
}

/// `max_depth = 0` would fail every render, so it is rejected up front
mod depth {
    use serde::de::{self, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        match usize::deserialize(deserializer)? {
            0 => Err(de::Error::custom("max_depth must be at least 1")),
            depth => Ok(depth),
        }
    }
}

/// `timeout` is written as milliseconds in config files
mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

/// The template renderer
///
/// This is the entry point request handlers call. It is cheap to clone and
/// `Send + Sync`; every clone shares the same immutable template.
#[derive(Debug, Clone)]
pub struct Renderer {
    template: Arc<Template>,
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer with default configuration
    pub fn new(template: impl Into<Arc<Template>>) -> Self {
        Self::with_config(template, RenderConfig::default())
    }

    /// Create a renderer with custom configuration
    pub fn with_config(template: impl Into<Arc<Template>>, config: RenderConfig) -> Self {
        Self {
            template: template.into(),
            config,
        }
    }

    /// Create a fresh context for one render
    pub fn create_context(&self) -> RenderContext {
        let mut ctx = RenderContext::with_max_depth(self.config.max_depth);
        if let Some(timeout) = self.config.timeout {
            ctx.set_deadline(Instant::now() + timeout);
        }
        ctx
    }

    /// Render a component into `sink`
    pub fn render<W, D>(&self, component: ComponentId, data: &[D], sink: &mut W) -> RenderResult<()>
    where
        W: Write + ?Sized,
        D: AsRef<[u8]>,
    {
        let mut ctx = self.create_context();
        self.render_with_context(component, data, sink, &mut ctx)
    }

    /// Render a component, abandoning it once `flag` is set
    pub fn render_interruptible<W, D>(
        &self,
        component: ComponentId,
        data: &[D],
        sink: &mut W,
        flag: Arc<AtomicBool>,
    ) -> RenderResult<()>
    where
        W: Write + ?Sized,
        D: AsRef<[u8]>,
    {
        let mut ctx = self.create_context();
        ctx.set_interrupt_flag(flag);
        self.render_with_context(component, data, sink, &mut ctx)
    }

    /// Render a component with an existing context
    pub fn render_with_context<W, D>(
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
        let _span = trace_span!("render", component = component.index()).entered();
        let result = Interpreter::new(&self.template).run(component, data, sink, ctx);
        if let Err(e) = &result {
            debug!(component = component.index(), error = %e, "render failed");
        }
        result
    }

    /// Render a component into a new buffer
    pub fn render_to_vec<D: AsRef<[u8]>>(
        &self,
        component: ComponentId,
        data: &[D],
    ) -> RenderResult<Vec<u8>> {
        let mut out = Vec::new();
        self.render(component, data, &mut out)?;
        Ok(out)
    }

    /// Get the loaded template
    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// Get render configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}
