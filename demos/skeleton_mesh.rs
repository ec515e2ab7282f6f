//! Skeleton mesh demo for metasurf
//!
//! Builds a skeleton from command line flags, extracts its isosurface and logs
//! a summary of the generated buffers. Without any `--sphere` or `--capsule`
//! flag a single node of radius 10 at the origin is meshed.
//!
//! ```text
//! skeleton_mesh --cube-size 0.1 --target 0.1 \
//!     --sphere -1,0,0,1.2 --sphere 1,0,0,1 --capsule -1,0,0,1,0,0,0.8
//! ```
//!
//! Set `RUST_LOG=debug` to see the engine's rebuild logs.

use anyhow::{bail, Context, Result};
use clap::Parser;
use metasurf_core::{CapsuleSource, Drawable, InfluenceSource, Point3f, SphereSource};
use metasurf_isosurface::{Blend, Interpolation, Isosurface, IsosurfaceConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skeleton_mesh", about = "Mesh the implicit surface around a skeleton")]
struct Args {
    /// Edge length of one marching cube
    #[arg(long, default_value_t = 0.2)]
    cube_size: f32,

    /// Potential at which the surface is drawn
    #[arg(long, default_value_t = 0.8)]
    target: f32,

    /// How source contributions combine: sum, max or first
    #[arg(long, default_value_t = Blend::Sum)]
    blend: Blend,

    /// Edge crossing placement: threshold or value-ratio
    #[arg(long, default_value_t = Interpolation::Threshold)]
    interpolation: Interpolation,

    /// Point node as `x,y,z,radius`; repeatable
    #[arg(long, value_parser = parse_sphere, allow_hyphen_values = true)]
    sphere: Vec<SphereSource>,

    /// Bone node as `x1,y1,z1,x2,y2,z2,radius`; repeatable
    #[arg(long, value_parser = parse_capsule, allow_hyphen_values = true)]
    capsule: Vec<CapsuleSource>,

    /// Rebuild once more through `update` after the initial calculation
    #[arg(long)]
    update: bool,
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f32; N]> {
    let numbers = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .with_context(|| format!("invalid number '{}'", part))
        })
        .collect::<Result<Vec<_>>>()?;

    match <[f32; N]>::try_from(numbers) {
        Ok(array) => Ok(array),
        Err(numbers) => bail!("expected {} comma separated numbers, got {}", N, numbers.len()),
    }
}

fn parse_sphere(s: &str) -> std::result::Result<SphereSource, String> {
    let [x, y, z, radius] = parse_numbers::<4>(s).map_err(|e| e.to_string())?;
    if radius <= 0.0 {
        return Err(format!("radius must be positive, got {}", radius));
    }
    Ok(SphereSource::new(Point3f::new(x, y, z), radius))
}

fn parse_capsule(s: &str) -> std::result::Result<CapsuleSource, String> {
    let [x1, y1, z1, x2, y2, z2, radius] = parse_numbers::<7>(s).map_err(|e| e.to_string())?;
    if radius <= 0.0 {
        return Err(format!("radius must be positive, got {}", radius));
    }
    Ok(CapsuleSource::new(
        Point3f::new(x1, y1, z1),
        Point3f::new(x2, y2, z2),
        radius,
    ))
}

fn skeleton(args: &Args) -> Vec<Box<dyn InfluenceSource>> {
    let mut sources: Vec<Box<dyn InfluenceSource>> = Vec::new();
    sources.extend(
        args.sphere
            .iter()
            .map(|&s| Box::new(s) as Box<dyn InfluenceSource>),
    );
    sources.extend(
        args.capsule
            .iter()
            .map(|&c| Box::new(c) as Box<dyn InfluenceSource>),
    );

    if sources.is_empty() {
        sources.push(Box::new(SphereSource::new(Point3f::origin(), 10.0)));
    }
    sources
}

fn report(label: &str, isosurface: &Isosurface) {
    if isosurface.is_empty() {
        warn!("{}: no surface at target {}", label, isosurface.config().target);
        return;
    }

    let mesh = isosurface.to_mesh();
    let bounds = mesh.bounding_box();
    info!(
        "{}: {} vertices, {} triangles, surface spans {:?} around {:?}",
        label,
        isosurface.vertex_count(),
        isosurface.triangle_count(),
        bounds.span(),
        mesh.center()
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = IsosurfaceConfig::new(args.cube_size, args.blend, args.target)
        .with_interpolation(args.interpolation);
    let sources = skeleton(&args);

    info!(
        "Meshing {} sources with cube size {}, target {}, blend {}, interpolation {}",
        sources.len(),
        config.cube_size,
        config.target,
        config.blend,
        config.interpolation
    );

    let mut isosurface = Isosurface::new(config).context("invalid isosurface configuration")?;
    isosurface.calculate(sources.as_slice(), config)?;
    report("calculate", &isosurface);

    if args.update {
        let (vertices, triangles) = (isosurface.vertex_count(), isosurface.triangle_count());
        isosurface.update(sources.as_slice())?;
        report("update", &isosurface);

        if (vertices, triangles) != (isosurface.vertex_count(), isosurface.triangle_count()) {
            bail!("update produced a different mesh for the same skeleton");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sphere() {
        let sphere = parse_sphere("1, -2.5, 0, 3").unwrap();
        assert_eq!(sphere.center, Point3f::new(1.0, -2.5, 0.0));
        assert_eq!(sphere.radius, 3.0);

        assert!(parse_sphere("1,2,3").is_err());
        assert!(parse_sphere("1,2,3,x").is_err());
        assert!(parse_sphere("0,0,0,-1").is_err());
    }

    #[test]
    fn test_parse_capsule() {
        let capsule = parse_capsule("0,0,0,2,0,0,0.5").unwrap();
        assert_eq!(capsule.end, Point3f::new(2.0, 0.0, 0.0));
        assert!(parse_capsule("0,0,0,2,0,0").is_err());
    }

    #[test]
    fn test_default_skeleton() {
        let args = Args::parse_from(["skeleton_mesh"]);
        let sources = skeleton(&args);

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].radius(), 10.0);
        assert_eq!(args.blend, Blend::Sum);
        assert_eq!(args.interpolation, Interpolation::Threshold);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "skeleton_mesh",
            "--blend",
            "max",
            "--interpolation",
            "value-ratio",
            "--sphere",
            "-1,0,0,1",
            "--capsule",
            "0,0,0,1,1,1,0.5",
            "--update",
        ]);

        assert_eq!(args.blend, Blend::Max);
        assert_eq!(args.interpolation, Interpolation::ValueRatio);
        assert_eq!(skeleton(&args).len(), 2);
        assert!(args.update);
    }
}
