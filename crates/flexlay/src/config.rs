//! Engine-wide policy shared by one or more trees.
//!
//! A [`Config`] is built once, wrapped in an `Arc`, and handed to every node
//! that should follow it. It is read, never written, while a layout pass runs:
//! mutate it only through [`Arc::get_mut`] or by building a replacement.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::error::TreeError;
use crate::instrumentation::MarkerSink;
use crate::tree::{NodeId, Tree};

/// Severity of an engine diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum LogLevel {
    /// A caller contract was violated.
    Error,
    /// Input was sanitized.
    Warn,
    /// Informational.
    Info,
    /// Debugging detail.
    Debug,
    /// Per-step tracing.
    Verbose,
    /// Unrecoverable; still sanitized in this engine.
    Fatal,
}

/// Opt-in algorithm variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum Experiment {
    /// Recompute each child's flex basis once per layout generation instead
    /// of reusing the value from an earlier pass.
    WebFlexBasis,
}

/// Logger that only sees the message.
pub type PlainLogFn = Box<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Logger that also sees the config and the node the message is about.
pub type ContextLogFn = Box<dyn Fn(&Config, Option<NodeId>, LogLevel, &str) + Send + Sync>;

/// Clone hook: `(tree, node, new_owner, child_index)`. Returning `None`
/// falls back to [`Tree::clone_node`].
pub type CloneNodeFn =
    Box<dyn Fn(&mut Tree, NodeId, NodeId, usize) -> Option<NodeId> + Send + Sync>;

/// A registered log sink.
pub enum Logger {
    /// See [`PlainLogFn`].
    Plain(PlainLogFn),
    /// See [`ContextLogFn`].
    WithContext(ContextLogFn),
}

impl Logger {
    /// Wrap a message-only closure.
    pub fn plain(f: impl Fn(LogLevel, &str) + Send + Sync + 'static) -> Self {
        Self::Plain(Box::new(f))
    }

    /// Wrap a closure that wants the config and node too.
    pub fn with_context(
        f: impl Fn(&Config, Option<NodeId>, LogLevel, &str) + Send + Sync + 'static,
    ) -> Self {
        Self::WithContext(Box::new(f))
    }
}

impl Default for Logger {
    /// Forward to the `log` facade under the `flexlay` target.
    fn default() -> Self {
        Self::plain(|level, message| match level {
            LogLevel::Error | LogLevel::Fatal => log::error!(target: "flexlay", "{message}"),
            LogLevel::Warn => log::warn!(target: "flexlay", "{message}"),
            LogLevel::Info => log::info!(target: "flexlay", "{message}"),
            LogLevel::Debug => log::debug!(target: "flexlay", "{message}"),
            LogLevel::Verbose => log::trace!(target: "flexlay", "{message}"),
        })
    }
}

/// Layout policy.
pub struct Config {
    logger: Logger,
    clone_node: Option<CloneNodeFn>,
    experiments: HashSet<Experiment>,
    point_scale_factor: f32,
    use_web_defaults: bool,
    use_legacy_stretch_behaviour: bool,
    markers: Option<Arc<dyn MarkerSink>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger: Logger::default(),
            clone_node: None,
            experiments: HashSet::new(),
            point_scale_factor: 1.0,
            use_web_defaults: false,
            use_legacy_stretch_behaviour: false,
            markers: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("experiments", &self.experiments)
            .field("point_scale_factor", &self.point_scale_factor)
            .field("use_web_defaults", &self.use_web_defaults)
            .field(
                "use_legacy_stretch_behaviour",
                &self.use_legacy_stretch_behaviour,
            )
            .field("has_clone_node_func", &self.clone_node.is_some())
            .field("has_markers", &self.markers.is_some())
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Default policy: logs to `log`, rounds to whole points, no experiments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for `Arc::new(self)`.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Replace the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.set_logger(logger);
        self
    }

    /// Register a clone hook.
    #[must_use]
    pub fn with_clone_node_func(
        mut self,
        f: impl Fn(&mut Tree, NodeId, NodeId, usize) -> Option<NodeId> + Send + Sync + 'static,
    ) -> Self {
        self.clone_node = Some(Box::new(f));
        self
    }

    /// Enable an experiment.
    #[must_use]
    pub fn with_experiment(mut self, experiment: Experiment) -> Self {
        self.set_experiment(experiment, true);
        self
    }

    /// Set the rounding grid.
    #[must_use]
    pub fn with_point_scale_factor(mut self, factor: f32) -> Self {
        self.set_point_scale_factor(factor);
        self
    }

    /// Use browser defaults for new nodes.
    #[must_use]
    pub const fn with_web_defaults(mut self, enabled: bool) -> Self {
        self.use_web_defaults = enabled;
        self
    }

    /// Keep containers with no growing children at their available size.
    #[must_use]
    pub const fn with_legacy_stretch_behaviour(mut self, enabled: bool) -> Self {
        self.use_legacy_stretch_behaviour = enabled;
        self
    }

    /// Report layout phases to `sink`.
    #[must_use]
    pub fn with_marker_sink(mut self, sink: Arc<dyn MarkerSink>) -> Self {
        self.markers = Some(sink);
        self
    }

    /// Replace the logger in place.
    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    /// Remove the clone hook.
    pub fn clear_clone_node_func(&mut self) {
        self.clone_node = None;
    }

    /// Turn an experiment on or off.
    pub fn set_experiment(&mut self, experiment: Experiment, enabled: bool) {
        if enabled {
            let _ = self.experiments.insert(experiment);
        } else {
            let _ = self.experiments.remove(&experiment);
        }
    }

    /// Device pixels per point. Zero disables rounding; negative or NaN
    /// factors are treated as zero.
    pub fn set_point_scale_factor(&mut self, factor: f32) {
        self.point_scale_factor = if factor.is_nan() || factor < 0.0 {
            0.0
        } else {
            factor
        };
    }

    /// Whether an experiment is enabled.
    #[must_use]
    pub fn has_experiment(&self, experiment: Experiment) -> bool {
        self.experiments.contains(&experiment)
    }

    /// The rounding grid; zero means no rounding.
    #[must_use]
    pub const fn point_scale_factor(&self) -> f32 {
        self.point_scale_factor
    }

    /// Whether browser defaults are in effect.
    #[must_use]
    pub const fn use_web_defaults(&self) -> bool {
        self.use_web_defaults
    }

    /// Whether the legacy stretch behaviour is in effect.
    #[must_use]
    pub const fn use_legacy_stretch_behaviour(&self) -> bool {
        self.use_legacy_stretch_behaviour
    }

    /// The registered marker sink.
    #[must_use]
    pub fn markers(&self) -> Option<&Arc<dyn MarkerSink>> {
        self.markers.as_ref()
    }

    /// Send a message to the registered logger.
    pub fn log(&self, node: Option<NodeId>, level: LogLevel, message: &str) {
        match &self.logger {
            Logger::Plain(f) => f(level, message),
            Logger::WithContext(f) => f(self, node, level, message),
        }
    }

    /// Produce a copy of `node` to be adopted by `owner` at `child_index`.
    ///
    /// Uses the registered hook when it returns a live node, and
    /// [`Tree::clone_node`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `node` is not in `tree`.
    pub fn clone_node(
        &self,
        tree: &mut Tree,
        node: NodeId,
        owner: NodeId,
        child_index: usize,
    ) -> Result<NodeId, TreeError> {
        let hooked = self
            .clone_node
            .as_ref()
            .and_then(|hook| hook(tree, node, owner, child_index))
            .filter(|clone| tree.contains(*clone));
        match hooked {
            Some(clone) => Ok(clone),
            None => tree.clone_node(node),
        }
    }
}
