//! Demonstration program for refract.
//!
//! Registers a handful of sample records and enums, installs the registry
//! globally and prints what the traversal engine sees: per-type field
//! tables, enumerator tables, and optionally JSON renderings of sample
//! instances and a componentwise-dominance matrix.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use refract::json::{EnumRepr, JsonAdapter, JsonOptions};
use refract::{Entry, Enumerated, Reflect, Registry, VisitOptions, Visitable};

/// CLI arguments for the refract demo
#[derive(Parser, Debug)]
#[command(name = "refract-demo")]
#[command(about = "Prints field tables, JSON and comparisons for sample types")]
struct Args {
    /// Print JSON renderings of the sample instances
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Write enum fields as underlying values instead of names
    #[arg(long)]
    enum_values: bool,

    /// Print the dominance matrix of the sample points
    #[arg(long)]
    compare: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================================
// Sample Types
// ============================================================================

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    weight: f64,
}

impl Point {
    fn new(x: i32, y: i32, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

#[derive(Visitable, Debug, Clone, Default)]
struct Shape {
    name: String,
    kind: ShapeKind,
    vertices: [Point; 3],
    tags: Vec<String>,
}

#[derive(Visitable, Debug, Clone, Default)]
struct Entity {
    id: u64,
}

#[derive(Visitable, Debug, Clone, Default)]
struct Named {
    label: String,
    #[visit(base)]
    entity: Entity,
}

/// Has no registry entry, so it contributes no fields to [`Player`].
#[derive(Debug, Clone, Default)]
struct Cache {
    #[allow(dead_code)]
    hits: usize,
}

#[derive(Visitable, Debug, Clone, Default)]
struct Player {
    score: i64,
    level: Level,
    #[visit(base)]
    named: Named,
    #[visit(base)]
    cache: Cache,
}

#[derive(Enumerated, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ShapeKind {
    #[default]
    Triangle,
    Quad,
    Polygon,
}

#[derive(Enumerated, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Level {
    #[default]
    Novice = 1,
    Adept = 5,
    Master = 10,
}

fn build_registry() -> Registry {
    Registry::builder()
        .record::<Point>()
        .record::<Shape>()
        .record::<Entity>()
        .record::<Named>()
        .record::<Player>()
        .enumeration::<ShapeKind>()
        .enumeration::<Level>()
        .build()
}

fn sample_points() -> Vec<(&'static str, Point)> {
    vec![
        ("origin", Point::new(0, 0, 0.0)),
        ("unit", Point::new(1, 1, 1.0)),
        ("right", Point::new(2, 0, 1.0)),
        ("heavy", Point::new(1, 1, 5.0)),
    ]
}

fn sample_shape() -> Shape {
    Shape {
        name: "wedge".to_string(),
        kind: ShapeKind::Triangle,
        vertices: [
            Point::new(0, 0, 1.0),
            Point::new(4, 0, 1.0),
            Point::new(0, 3, 2.5),
        ],
        tags: vec!["sharp".to_string(), "small".to_string()],
    }
}

fn sample_player() -> Player {
    Player {
        score: 1200,
        level: Level::Adept,
        named: Named {
            label: "ada".to_string(),
            entity: Entity { id: 7 },
        },
        cache: Cache { hits: 3 },
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_tables(registry: &Registry) -> Result<()> {
    for entry in registry.entries() {
        match entry {
            Entry::Record(meta) => {
                println!("record {}", meta.name);
                let mut index = 0;
                let mut rows = Vec::new();
                registry
                    .visit_meta(meta, VisitOptions::default(), |name, ty| {
                        rows.push(format!("  {index:>2}  {name:<12} {ty}"));
                        index += 1;
                    })
                    .with_context(|| format!("Failed to walk `{}`", meta.name))?;
                if rows.is_empty() {
                    println!("  (no fields)");
                }
                for row in rows {
                    println!("{row}");
                }
            }
            Entry::Enum(meta) => {
                println!("enum {}", meta.name);
                for enumerator in &meta.enumerators {
                    println!("  {:<12} = {}", enumerator.name, enumerator.value);
                }
            }
        }
        println!();
    }
    Ok(())
}

fn print_json(adapter: &JsonAdapter<'_>, pretty: bool) -> Result<()> {
    let shape = sample_shape();
    let player = sample_player();
    let samples: [(&str, &dyn Reflect); 2] = [("shape", &shape), ("player", &player)];
    for (label, value) in samples {
        let text = if pretty {
            adapter.to_string_pretty(value)
        } else {
            adapter.to_string(value)
        }
        .with_context(|| format!("Failed to encode sample `{label}`"))?;
        println!("{label}: {text}");
    }

    let document = adapter.to_document(&player)?;
    let decoded: Player = adapter
        .from_document(&document)
        .context("Failed to decode the player sample")?;
    debug!("Decoded player: {decoded:?}");
    println!();
    Ok(())
}

fn print_dominance(registry: &Registry) -> Result<()> {
    let points = sample_points();
    print!("{:>8}", "");
    for (name, _) in &points {
        print!("{name:>8}");
    }
    println!();

    for (row_name, row) in &points {
        print!("{row_name:>8}");
        for (_, column) in &points {
            let cell = if registry.equal_to(row, column)? {
                "="
            } else if registry.less_than(row, column)? {
                "<"
            } else if registry.greater_than(row, column)? {
                ">"
            } else {
                "~"
            };
            print!("{cell:>8}");
        }
        println!();
    }
    println!("\n  ~ marks pairs where neither point dominates the other");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let registry = Registry::install(build_registry()).context("Failed to install registry")?;
    info!("Installed registry with {} types", registry.len());

    print_tables(registry)?;

    if args.json {
        let options = JsonOptions {
            enum_repr: if args.enum_values {
                EnumRepr::Value
            } else {
                EnumRepr::Name
            },
        };
        print_json(&JsonAdapter::global()?.with_options(options), args.pretty)?;
    }

    if args.compare {
        print_dominance(registry)?;
    }

    Ok(())
}
