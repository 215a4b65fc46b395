use argh::FromArgs;

use rasterkit::grid::{Rect, SampleGrid, TileSize};
use rasterkit::resample::{
    resample_with_config, AffineTransform, BorderPolicy, ExecutionStrategy, Interpolator, Kernel,
    ResampleConfig,
};

#[derive(FromArgs, Debug)]
/// Resample a synthetic grid through a scale and rotation.
struct Args {
    /// interpolation kernel: nearest, bilinear, bicubic, lanczos or lanczosN
    #[argh(option, short = 'k', default = "Kernel::Bilinear")]
    kernel: Kernel,

    /// size of the square source grid
    #[argh(option, short = 's', default = "256")]
    size: usize,

    /// scale factor applied to the source grid
    #[argh(option, default = "2.0")]
    scale: f64,

    /// rotation angle in degrees
    #[argh(option, default = "0.0")]
    angle: f64,

    /// size of the square destination tiles
    #[argh(option, short = 't', default = "128")]
    tile: usize,

    /// value written outside of the source
    #[argh(option, default = "f64::NAN")]
    fill: f64,

    /// extrapolate instead of filling outside of the source
    #[argh(switch)]
    extrapolate: bool,

    /// number of threads to use, 0 for the global pool
    #[argh(option, short = 'n', default = "0")]
    num_threads: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // synthetic source: two bands of interfering waves
    let domain = Rect::from_size(args.size, args.size);
    let source = SampleGrid::<2>::from_fn(domain, |x, y| {
        let (u, v) = (x as f64 / 16.0, y as f64 / 16.0);
        [(u.sin() * v.cos()) * 100.0, (u + v).sin() * 50.0]
    })?;

    // destination to source transform
    let center = (args.size as f64 / 2.0, args.size as f64 / 2.0);
    let forward = AffineTransform::rotation(center, args.angle, 1.0)
        .then(&AffineTransform::scale(args.scale, args.scale));
    let inverse = forward.inverse()?;

    let dst_size = (args.size as f64 * args.scale).ceil() as usize;
    let extent = Rect::from_size(dst_size, dst_size);

    let config = ResampleConfig::default()
        .with_kernel(args.kernel)
        .with_fill_value(args.fill)
        .with_tile_size(Some(TileSize::from([args.tile, args.tile])))
        .with_border(if args.extrapolate {
            BorderPolicy::Extrapolate
        } else {
            BorderPolicy::Fill
        })
        .with_strategy(match args.num_threads {
            0 => ExecutionStrategy::ParallelTiles,
            n => ExecutionStrategy::Fixed(n),
        });

    log::info!("resampling with {:?}", config);

    let start = std::time::Instant::now();
    let (output, stats) = resample_with_config(&source, extent, &inverse, &config)?;
    let elapsed = start.elapsed();

    println!(
        "Resampled {} into {} in {:?}: {} tiles, {} interpolated, {} filled",
        domain, extent, elapsed, stats.tiles, stats.interpolated, stats.filled
    );

    // extrema of the first band of the output
    let output = output.to_sample_grid()?;
    let interpolator = Interpolator::new(&output, Kernel::Nearest)?;
    let mut tracker = interpolator.extrema_tracker();
    match tracker.min_max(None) {
        Ok(extrema) => println!(
            "Band 0 min {:.3} at ({}, {}), max {:.3} at ({}, {})",
            extrema.min, extrema.min_x, extrema.min_y, extrema.max, extrema.max_x, extrema.max_y
        ),
        Err(e) => log::warn!("no extrema: {e}"),
    }

    Ok(())
}
