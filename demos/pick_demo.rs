//! Point picking demo
//!
//! Generates a random point cloud, casts a ray from a camera through a
//! cursor position and prints the picked points nearest first.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, error, info};
use pointpick_algorithms::{Raycaster, RaycasterParams};
use pointpick_core::{
    Bounded, Camera, DrawRange, Point3f, PointCloud, PointGeometry, Vector3f,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    VertexList,
    Flat,
    FlatIndexed,
}

/// Pick points of a random cloud with a ray through the cursor.
#[derive(Debug, Parser)]
struct AppOptions {
    /// Verbosity of the command line output.
    #[clap(long, default_value = "info")]
    log_level: log::Level,

    /// Number of points to generate.
    #[clap(long, default_value_t = 10_000)]
    points: usize,

    /// Storage layout of the generated points.
    #[clap(long, value_enum, default_value = "vertex-list")]
    layout: Layout,

    /// Seed for the point generator.
    #[clap(long, default_value_t = 42)]
    seed: u64,

    /// Cursor x in normalized device coordinates.
    #[clap(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f32,

    /// Cursor y in normalized device coordinates.
    #[clap(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f32,

    /// Uniform scale applied to the cloud.
    #[clap(long, default_value_t = 1.0)]
    scale: f32,

    /// JSON file with raycaster parameters.
    #[clap(long)]
    params: Option<PathBuf>,

    /// Picking threshold, overrides the one from `--params`.
    #[clap(long)]
    threshold: Option<f32>,

    /// Skip computing a bounding box for the geometry.
    #[clap(long)]
    no_bounding_box: bool,

    /// Number of hits to print.
    #[clap(long, default_value_t = 10)]
    limit: usize,
}

fn main() -> ExitCode {
    let args = AppOptions::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.to_level_filter())
        .init();

    if let Err(e) = run(args) {
        error!("{e}");
        debug!("{e:?}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(args: AppOptions) -> Result<()> {
    let mut params = match &args.params {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<RaycasterParams>(&json)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => RaycasterParams::default(),
    };
    if let Some(threshold) = args.threshold {
        params.point_cloud.threshold = threshold;
    }

    let mut geometry = generate_geometry(args.layout, args.points, args.seed);
    geometry.validate()?;
    if !args.no_bounding_box {
        geometry.compute_bounding_box();
    }

    let mut cloud = PointCloud::with_geometry(geometry);
    cloud.node.name = format!("{:?} cloud", args.layout);
    cloud.node.scale = Vector3f::repeat(args.scale);
    cloud.node.update_matrix_world(None);
    info!("created {} with {} points", cloud.node.name, cloud.len());

    // look at the cloud from +z, backing off as it grows
    let target = cloud.center().unwrap_or_else(Point3f::origin);
    let camera = Camera::new(
        target + Vector3f::new(0.0, 0.0, 5.0 * args.scale.max(1.0)),
        target,
        Vector3f::y(),
        std::f32::consts::FRAC_PI_4,
        16.0 / 9.0,
        0.1,
        1000.0,
    );
    let raycaster = Raycaster::from_camera(&camera, args.x, args.y)?.with_params(params);
    info!(
        "casting ray from {:?} along {:?} with threshold {}",
        raycaster.ray.origin, raycaster.ray.direction, params.point_cloud.threshold
    );

    let hits = raycaster.intersect_object(&cloud)?;
    println!("{} points picked", hits.len());
    for hit in hits.iter().take(args.limit) {
        println!(
            "  #{:<8} distance {:>8.4}  to ray {:>7.4}  at ({:.3}, {:.3}, {:.3})",
            hit.index, hit.distance, hit.distance_to_ray, hit.point.x, hit.point.y, hit.point.z
        );
    }

    Ok(())
}

/// Random points in the unit cube, stored in the requested layout
fn generate_geometry(layout: Layout, count: usize, seed: u64) -> PointGeometry {
    let mut rng = StdRng::seed_from_u64(seed);
    let points: Vec<Point3f> = (0..count)
        .map(|_| {
            Point3f::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect();

    match layout {
        Layout::VertexList => PointGeometry::from_vertices(points),
        Layout::Flat => {
            PointGeometry::from_flat(points.iter().flat_map(|p| [p.x, p.y, p.z]).collect())
        }
        Layout::FlatIndexed => {
            // two draw ranges, the second addressing its half through a base index
            let half = count / 2;
            let indices: Vec<u32> = (0..half as u32).chain(0..(count - half) as u32).collect();
            PointGeometry::from_flat_indexed(
                points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
                indices,
                vec![DrawRange::new(0, half, 0), DrawRange::new(half, count - half, half)],
            )
        }
    }
}
