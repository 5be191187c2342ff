//! CLI utility for rasterizing OBJ surfaces and finding grid paths over them

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use navgrid::{MeshSurface, OccupancyGrid, Surface, DEFAULT_RAY_HEIGHT, DEFAULT_RAY_LENGTH};
use navgrid_common::TriMesh;
use navgrid_path::{
    create_animation, GridPathfinder, KeyframeTrack, PathFinderRecord, DEFAULT_FRAMES_PER_SECOND,
};

/// Rasterizes 3D surfaces into a traversability grid and finds paths on it
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rasterize surfaces into an occupancy grid
    Rasterize {
        /// Cast surface (OBJ format); repeat for several surfaces
        #[clap(long = "mesh", value_parser, required = true)]
        meshes: Vec<PathBuf>,

        /// Grid resolution, truncated to an integer
        #[clap(long, default_value = "100")]
        size: f32,

        /// Ray start height above the top of the surfaces
        #[clap(long, default_value_t = DEFAULT_RAY_HEIGHT)]
        ray_height: f32,

        /// Maximum ray distance
        #[clap(long, default_value_t = DEFAULT_RAY_LENGTH)]
        ray_length: f32,

        /// Write the occupancy as a grayscale PGM image
        #[clap(long, value_parser)]
        preview: Option<PathBuf>,

        /// Write the configuration record as JSON
        #[clap(long, value_parser)]
        record: Option<PathBuf>,
    },

    /// Find a path between two points on the rasterized surfaces
    FindPath {
        /// Cast surface (OBJ format); repeat for several surfaces
        #[clap(long = "mesh", value_parser, required = true)]
        meshes: Vec<PathBuf>,

        /// Grid resolution, truncated to an integer
        #[clap(long, default_value = "100")]
        size: f32,

        /// Ray start height above the top of the surfaces
        #[clap(long, default_value_t = DEFAULT_RAY_HEIGHT)]
        ray_height: f32,

        /// Maximum ray distance
        #[clap(long, default_value_t = DEFAULT_RAY_LENGTH)]
        ray_length: f32,

        /// Start position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        from: Vec3,

        /// End position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        to: Vec3,

        /// Drop waypoints that are exactly interpolatable
        #[clap(long)]
        optimize: bool,

        /// Move both positions onto the nearest grid sample first
        #[clap(long)]
        snap: bool,

        /// Also emit a keyframe track with this name
        #[clap(long)]
        animation: Option<String>,

        /// Keyframe track playback rate
        #[clap(long, default_value_t = DEFAULT_FRAMES_PER_SECOND)]
        fps: f32,

        /// Output file (JSON); printed to stdout when omitted
        #[clap(long, value_parser)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct PathOutput {
    from: Vec3,
    to: Vec3,
    waypoints: Vec<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    animation: Option<KeyframeTrack>,
}

/// Parse a comma-separated vector
fn parse_vector(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();

    if parts.len() != 3 {
        return Err(format!(
            "Vector must have 3 components, got {}",
            parts.len()
        ));
    }

    let x = parts[0].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = parts[1].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let z = parts[2].trim().parse::<f32>().map_err(|e| e.to_string())?;

    Ok(Vec3::new(x, y, z))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Commands::Rasterize {
            meshes,
            size,
            ray_height,
            ray_length,
            preview,
            record,
        } => rasterize(
            &meshes,
            size,
            ray_height,
            ray_length,
            preview.as_deref(),
            record.as_deref(),
        ),
        Commands::FindPath {
            meshes,
            size,
            ray_height,
            ray_length,
            from,
            to,
            optimize,
            snap,
            animation,
            fps,
            output,
        } => {
            let pathfinder = build_pathfinder(&meshes, size, ray_height, ray_length)?;
            let query = PathQuery {
                from,
                to,
                optimize,
                snap,
                animation,
                fps,
            };
            find_path(&pathfinder, &query, output.as_deref())
        }
    }
}

struct PathQuery {
    from: Vec3,
    to: Vec3,
    optimize: bool,
    snap: bool,
    animation: Option<String>,
    fps: f32,
}

/// Loads OBJ files as named mesh surfaces
fn load_surfaces(paths: &[PathBuf]) -> Result<Vec<Surface>> {
    paths
        .iter()
        .map(|path| {
            let mesh = TriMesh::from_obj(path)
                .with_context(|| format!("Failed to load mesh: {}", path.display()))?;
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| anyhow!("Mesh path has no file name: {}", path.display()))?;

            log::info!(
                "Loaded {}: {} vertices, {} triangles",
                name,
                mesh.vert_count(),
                mesh.tri_count()
            );
            Ok(MeshSurface::new(name, mesh).into())
        })
        .collect()
}

fn build_pathfinder(
    meshes: &[PathBuf],
    size: f32,
    ray_height: f32,
    ray_length: f32,
) -> Result<GridPathfinder> {
    let mut surfaces = load_surfaces(meshes)?;
    let mut pathfinder = GridPathfinder::new(size);
    pathfinder.fill(surfaces.iter_mut(), Some(ray_height), Some(ray_length));

    let grid = pathfinder.grid();
    println!(
        "Grid {}x{}: {} of {} cells traversable",
        grid.width(),
        grid.height(),
        grid.occupied_count(),
        grid.len()
    );
    Ok(pathfinder)
}

/// Rasterize meshes and optionally write the preview and configuration
fn rasterize(
    meshes: &[PathBuf],
    size: f32,
    ray_height: f32,
    ray_length: f32,
    preview: Option<&Path>,
    record: Option<&Path>,
) -> Result<()> {
    let pathfinder = build_pathfinder(meshes, size, ray_height, ray_length)?;

    if let Some(preview_path) = preview {
        write_preview(pathfinder.grid(), preview_path)?;
        println!("Saved preview to {}", preview_path.display());
    }

    if let Some(record_path) = record {
        let cast_meshes = load_names(meshes)?;
        let record = PathFinderRecord {
            size,
            ray_height,
            ray_length,
            cast_meshes,
            ..Default::default()
        };
        let json = record
            .to_json()
            .map_err(|e| anyhow!("Failed to serialize record: {}", e))?;
        std::fs::write(record_path, json)
            .with_context(|| format!("Failed to write record: {}", record_path.display()))?;
        println!("Saved configuration to {}", record_path.display());
    }

    Ok(())
}

fn load_names(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Mesh path has no file name: {}", path.display()))
        })
        .collect()
}

/// Writes the occupancy as a binary PGM (P5) image, one byte per cell
fn write_preview(grid: &OccupancyGrid, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create preview file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "P5\n{} {}\n255\n", grid.width(), grid.height())?;
    let gray: Vec<u8> = grid.preview_rgba().chunks_exact(4).map(|px| px[0]).collect();
    writer.write_all(&gray)?;
    writer.flush()?;
    Ok(())
}

/// Find a path and print or save it
fn find_path(pathfinder: &GridPathfinder, query: &PathQuery, output: Option<&Path>) -> Result<()> {
    let (from, to) = if query.snap {
        let nearest = |point: Vec3| {
            pathfinder
                .find_nearest_point(point)
                .ok_or_else(|| anyhow!("Grid has no traversable cell"))
        };
        (nearest(query.from)?, nearest(query.to)?)
    } else {
        (query.from, query.to)
    };

    println!("Finding path from {:?} to {:?}...", from, to);

    let waypoints = pathfinder
        .from_to(from, to, query.optimize)
        .ok_or_else(|| anyhow!("No path from {:?} to {:?}", from, to))?;

    println!("Found path with {} waypoints", waypoints.len());

    let animation = query
        .animation
        .as_ref()
        .map(|name| create_animation(name.as_str(), &waypoints, query.fps));
    if let Some(track) = &animation {
        log::info!(
            "Animation '{}': {} keys, {:.2}s",
            track.name,
            track.keys.len(),
            track.duration_seconds()
        );
    }

    let result = PathOutput {
        from,
        to,
        waypoints,
        animation,
    };
    let json = serde_json::to_string_pretty(&result).context("Failed to serialize path")?;

    if let Some(output_path) = output {
        println!("Saving path to {}...", output_path.display());
        let mut file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
        writeln!(file, "{}", json)?;
    } else {
        println!("{}", json);
    }

    Ok(())
}
