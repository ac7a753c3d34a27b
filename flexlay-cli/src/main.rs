//! flexlay command-line inspector
//!
//! Builds one of a handful of built-in node trees, lays it out and prints
//! the resulting geometry, either as an indented tree or as JSON.
//!
//! Engine diagnostics go through `log`; set `RUST_LOG=flexlay=debug` to see
//! them, or build with `--features layout-trace` for per-node tracing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use flexlay::{
    Align, Config, Direction, DumpOptions, Edge, FlexDirection, Justify, LayoutStats, Marker,
    MarkerSink, MeasureInput, MeasureMode, NodeId, PositionType, Size, StyleValue, Tree, Wrap,
};
use owo_colors::OwoColorize;

/// Lay out a sample flexbox tree and print where everything landed
#[derive(Parser, Debug)]
#[command(name = "flexlay")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Three growing columns in a 300pt row
    flexlay grow

    # Wrapping tiles, right-to-left
    flexlay wrap --width 250 --rtl

    # Text measured against a narrow container, as JSON
    flexlay text --width 120 --json

    # Lay out twice to see the cache at work
    flexlay holy-grail --repeat 2 --stats
"#)]
struct Cli {
    /// Which built-in tree to lay out
    #[arg(value_enum, default_value_t = Scenario::Grow)]
    scenario: Scenario,

    /// Available width (unbounded if omitted)
    #[arg(long)]
    width: Option<f32>,

    /// Available height (unbounded if omitted)
    #[arg(long)]
    height: Option<f32>,

    /// Lay out right-to-left
    #[arg(long)]
    rtl: bool,

    /// Physical pixels per point; 0 disables rounding
    #[arg(long, default_value = "1")]
    scale: f32,

    /// Use browser defaults (row direction, shrink 1)
    #[arg(long)]
    web_defaults: bool,

    /// Print the layout as JSON instead of a tree
    #[arg(long)]
    json: bool,

    /// Include each node's style in JSON output
    #[arg(long, requires = "json")]
    style: bool,

    /// Run the layout this many times
    #[arg(long, default_value = "1")]
    repeat: u32,

    /// Print work counters for the last run
    #[arg(long)]
    stats: bool,
}

/// Built-in trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// A row of children sharing space by grow factor
    Grow,
    /// Fixed-size tiles wrapping onto several lines
    Wrap,
    /// Absolutely positioned badges over a card
    Absolute,
    /// Measured text leaves in a column
    Text,
    /// Header, three columns and footer
    HolyGrail,
}

/// Logs how long each phase took.
struct PhaseTimer {
    started: Mutex<HashMap<(Marker, NodeId), Instant>>,
}

impl MarkerSink for PhaseTimer {
    fn start(&self, marker: Marker, node: NodeId) {
        if let Ok(mut started) = self.started.lock() {
            let _ = started.insert((marker, node), Instant::now());
        }
    }

    fn end(&self, marker: Marker, node: NodeId, stats: &LayoutStats) {
        let Ok(mut started) = self.started.lock() else {
            return;
        };
        if let Some(at) = started.remove(&(marker, node)) {
            if marker == Marker::Layout {
                log::debug!("{marker} on {node:?} took {:?}: {stats:?}", at.elapsed());
            } else {
                log::trace!("{marker} on {node:?} took {:?}", at.elapsed());
            }
        }
    }
}

/// A tree plus a readable name for each node.
struct Scene {
    tree: Tree,
    root: NodeId,
    labels: HashMap<NodeId, String>,
}

impl Scene {
    fn new(config: Arc<Config>) -> Self {
        let mut tree = Tree::with_config(config);
        let root = tree.new_node();
        let labels = HashMap::from([(root, "root".to_owned())]);
        Self { tree, root, labels }
    }

    fn add(&mut self, parent: NodeId, label: impl Into<String>) -> Result<NodeId> {
        let node = self.tree.new_node();
        self.tree.append_child(parent, node)?;
        let _ = self.labels.insert(node, label.into());
        Ok(node)
    }

    fn label(&self, node: NodeId) -> &str {
        self.labels.get(&node).map_or("?", String::as_str)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.scale < 0.0 || cli.scale.is_nan() {
        bail!("--scale must be zero or positive, got {}", cli.scale);
    }

    let config = Config::new()
        .with_point_scale_factor(cli.scale)
        .with_web_defaults(cli.web_defaults)
        .with_marker_sink(Arc::new(PhaseTimer {
            started: Mutex::new(HashMap::new()),
        }))
        .shared();

    let mut scene = build(cli.scenario, config)
        .with_context(|| format!("building the {:?} scenario", cli.scenario))?;
    let direction = if cli.rtl {
        Direction::Rtl
    } else {
        Direction::Ltr
    };

    for run in 0..cli.repeat.max(1) {
        scene.tree.compute_layout(
            scene.root,
            cli.width.unwrap_or(f32::NAN),
            cli.height.unwrap_or(f32::NAN),
            direction,
        )?;
        log::info!("run {run}: {:?}", scene.tree.last_layout_stats());
    }

    if cli.json {
        let dump = scene.tree.dump(
            scene.root,
            DumpOptions {
                style: cli.style,
                ..DumpOptions::default()
            },
        );
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        print_node(&scene, scene.root, 0);
    }

    if cli.stats {
        print_stats(&scene.tree.last_layout_stats());
    }
    Ok(())
}

fn build(scenario: Scenario, config: Arc<Config>) -> Result<Scene> {
    let mut scene = Scene::new(config);
    match scenario {
        Scenario::Grow => grow(&mut scene)?,
        Scenario::Wrap => wrap(&mut scene)?,
        Scenario::Absolute => absolute(&mut scene)?,
        Scenario::Text => text(&mut scene)?,
        Scenario::HolyGrail => holy_grail(&mut scene)?,
    }
    Ok(scene)
}

fn grow(scene: &mut Scene) -> Result<()> {
    let root = scene.root;
    let tree = &mut scene.tree;
    tree.set_flex_direction(root, FlexDirection::Row)?;
    tree.set_width(root, StyleValue::point(300.0))?;
    tree.set_height(root, StyleValue::point(100.0))?;
    tree.set_padding(root, Edge::All, StyleValue::point(10.0))?;

    for (index, grow) in [1.0, 1.0, 2.0].into_iter().enumerate() {
        let child = scene.add(root, format!("grow {grow}"))?;
        let tree = &mut scene.tree;
        tree.set_flex_basis(child, StyleValue::point(0.0))?;
        tree.set_flex_grow(child, grow)?;
        if index > 0 {
            tree.set_margin(child, Edge::Start, StyleValue::point(5.0))?;
        }
    }
    Ok(())
}

fn wrap(scene: &mut Scene) -> Result<()> {
    let root = scene.root;
    let tree = &mut scene.tree;
    tree.set_flex_direction(root, FlexDirection::Row)?;
    tree.set_flex_wrap(root, Wrap::Wrap)?;
    tree.set_align_content(root, Align::SpaceBetween)?;
    tree.set_justify_content(root, Justify::SpaceEvenly)?;
    tree.set_width(root, StyleValue::point(200.0))?;
    tree.set_height(root, StyleValue::point(200.0))?;

    for index in 0..7 {
        let tile = scene.add(root, format!("tile {index}"))?;
        let tree = &mut scene.tree;
        tree.set_width(tile, StyleValue::point(50.0))?;
        tree.set_height(tile, StyleValue::point(40.0))?;
        tree.set_margin(tile, Edge::All, StyleValue::point(2.0))?;
    }
    Ok(())
}

fn absolute(scene: &mut Scene) -> Result<()> {
    let root = scene.root;
    scene.tree.set_width(root, StyleValue::point(240.0))?;
    scene.tree.set_height(root, StyleValue::point(160.0))?;
    scene.tree.set_border(root, Edge::All, 1.0)?;
    scene.tree.set_justify_content(root, Justify::Center)?;
    scene.tree.set_align_items(root, Align::Center)?;

    let body = scene.add(root, "body")?;
    scene.tree.set_width(body, StyleValue::percent(80.0))?;
    scene.tree.set_aspect_ratio(body, 2.0)?;

    let badge = scene.add(root, "badge")?;
    let tree = &mut scene.tree;
    tree.set_position_type(badge, PositionType::Absolute)?;
    tree.set_position(badge, Edge::Top, StyleValue::point(-6.0))?;
    tree.set_position(badge, Edge::End, StyleValue::point(-6.0))?;
    tree.set_width(badge, StyleValue::point(16.0))?;
    tree.set_height(badge, StyleValue::point(16.0))?;

    let overlay = scene.add(root, "overlay")?;
    let tree = &mut scene.tree;
    tree.set_position_type(overlay, PositionType::Absolute)?;
    for edge in [Edge::Left, Edge::Right, Edge::Bottom] {
        tree.set_position(overlay, edge, StyleValue::point(8.0))?;
    }
    tree.set_height(overlay, StyleValue::point(24.0))?;
    Ok(())
}

/// Monospace text: each character is 7pt wide and lines are 16pt tall.
fn measure_text(chars: usize) -> impl Fn(MeasureInput) -> Size + Send + Sync + 'static {
    const CHAR_WIDTH: f32 = 7.0;
    const LINE_HEIGHT: f32 = 16.0;
    let natural = chars as f32 * CHAR_WIDTH;
    move |input| {
        let width = match input.width_mode {
            MeasureMode::Undefined => natural,
            MeasureMode::Exactly => input.width,
            MeasureMode::AtMost => natural.min(input.width),
        };
        let per_line = (width / CHAR_WIDTH).floor().max(1.0);
        let lines = (natural / CHAR_WIDTH / per_line).ceil().max(1.0);
        Size::new(width, lines * LINE_HEIGHT)
    }
}

fn text(scene: &mut Scene) -> Result<()> {
    let root = scene.root;
    scene.tree.set_padding(root, Edge::All, StyleValue::point(8.0))?;
    scene.tree.set_align_items(root, Align::FlexStart)?;

    for (label, chars) in [("title", 12), ("paragraph", 90), ("caption", 30)] {
        let leaf = scene.add(root, label)?;
        scene.tree.set_measure_func(leaf, measure_text(chars))?;
        scene.tree.set_margin(leaf, Edge::Bottom, StyleValue::point(4.0))?;
    }
    Ok(())
}

fn holy_grail(scene: &mut Scene) -> Result<()> {
    let root = scene.root;
    scene.tree.set_width(root, StyleValue::point(400.0))?;
    scene.tree.set_height(root, StyleValue::point(300.0))?;

    let header = scene.add(root, "header")?;
    scene.tree.set_height(header, StyleValue::point(40.0))?;

    let middle = scene.add(root, "middle")?;
    scene.tree.set_flex_direction(middle, FlexDirection::Row)?;
    scene.tree.set_flex_grow(middle, 1.0)?;
    scene.tree.set_layout_boundary(middle, true)?;

    for (label, width) in [("nav", Some(80.0)), ("content", None), ("aside", Some(60.0))] {
        let column = scene.add(middle, label)?;
        match width {
            Some(width) => scene.tree.set_width(column, StyleValue::point(width))?,
            None => scene.tree.set_flex_grow(column, 1.0)?,
        }
    }

    let footer = scene.add(root, "footer")?;
    scene.tree.set_height(footer, StyleValue::point(30.0))?;
    Ok(())
}

fn print_node(scene: &Scene, node: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    let Some(layout) = scene.tree.layout(node) else {
        return;
    };
    let overflow = if layout.had_overflow {
        " overflow".yellow().to_string()
    } else {
        String::new()
    };
    let geometry = format!(
        "x={:.1} y={:.1} w={:.1} h={:.1}",
        layout.left(),
        layout.top(),
        layout.width(),
        layout.height()
    );
    println!(
        "{indent}{} {}{overflow}",
        scene.label(node).cyan().bold(),
        geometry.dimmed()
    );
    for child in scene.tree.children(node) {
        print_node(scene, *child, depth + 1);
    }
}

fn print_stats(stats: &LayoutStats) {
    println!("\n{}", "=== Layout Stats ===".bold());
    println!("  layouts:         {}", stats.layouts);
    println!("  measures:        {}", stats.measures);
    println!("  cache hits:      {}", stats.cache_hits().green());
    println!("  measure calls:   {}", stats.measure_callbacks);
    println!("  cache evictions: {}", stats.cache_evictions);
}
