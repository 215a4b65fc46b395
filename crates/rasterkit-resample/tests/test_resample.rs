use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rasterkit_grid::{DestinationGrid, Rect, SampleAccessor, SampleGrid};
use rasterkit_resample::interpolation::bicubic::cell_bounds;
use rasterkit_resample::interpolation::lanczos::lanczos_weight;
use rasterkit_resample::resample::resample_tile;
use rasterkit_resample::{
    resample, resample_with, resample_with_config, AffineTransform, Interpolator, Kernel,
    ProjectiveTransform, ResampleConfig, ResampleError, ResampleOptions,
};

fn random_grid<const B: usize>(rng: &mut StdRng, domain: Rect) -> SampleGrid<B> {
    let data = (0..domain.area() * B)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();
    SampleGrid::new(domain, data).unwrap()
}

#[test]
fn test_bicubic_bounded_by_cell_extrema() -> Result<(), ResampleError> {
    let mut rng = StdRng::seed_from_u64(7);
    let grid = random_grid::<1>(&mut rng, Rect::from_size(12, 12));
    let interpolator = Interpolator::new(&grid, Kernel::BiCubic)?;

    for _ in 0..2000 {
        let x = rng.random_range(1.0..9.0);
        let y = rng.random_range(1.0..9.0);

        let v = interpolator.interpolate(x, y)?[0];
        let (lo, hi) = cell_bounds(&grid, x, y, 0)?;

        assert!(
            v >= lo - 1e-12 && v <= hi + 1e-12,
            "({x}, {y}) = {v} outside of [{lo}, {hi}]"
        );
    }

    Ok(())
}

#[test]
fn test_lanczos_bounded_by_weight_mass() -> Result<(), ResampleError> {
    let mut rng = StdRng::seed_from_u64(11);
    let grid = random_grid::<1>(&mut rng, Rect::from_size(12, 12));

    for lobes in [1usize, 2, 3] {
        let interpolator = Interpolator::new(&grid, Kernel::Lanczos(lobes))?;
        let range = (lobes - 1) as f64..(12 - lobes) as f64;

        for _ in 0..500 {
            let x: f64 = rng.random_range(range.clone());
            let y: f64 = rng.random_range(range.clone());
            let v = interpolator.interpolate(x, y)?[0];

            let x0 = x.floor() as i64 - (lobes as i64 - 1);
            let y0 = y.floor() as i64 - (lobes as i64 - 1);

            let mut weights = Vec::new();
            let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
            for j in 0..2 * lobes as i64 {
                for i in 0..2 * lobes as i64 {
                    let w = lanczos_weight(x - (x0 + i) as f64, lobes)
                        * lanczos_weight(y - (y0 + j) as f64, lobes);
                    let s = grid.sample(x0 + i, y0 + j, 0)?;
                    weights.push(w);
                    min = min.min(s);
                    max = max.max(s);
                }
            }

            let norm: f64 = weights.iter().sum();
            let positive: f64 = weights.iter().filter(|w| **w > 0.0).sum::<f64>() / norm;
            let negative: f64 = weights.iter().filter(|w| **w < 0.0).sum::<f64>() / norm;

            let lo = min + negative * (max - min);
            let hi = min + positive * (max - min);
            assert!(
                v >= lo - 1e-12 && v <= hi + 1e-12,
                "lanczos{lobes} ({x}, {y}) = {v} outside of [{lo}, {hi}]"
            );
        }
    }

    Ok(())
}

#[test]
fn test_resample_upscale_fill() -> Result<(), ResampleError> {
    let mut rng = StdRng::seed_from_u64(3);
    let src = random_grid::<2>(&mut rng, Rect::from_size(4, 4));
    let transform = AffineTransform::scale(2.0, 2.0).inverse().unwrap();

    for (kernel, interior) in [
        (Kernel::Nearest, 0..=6),
        (Kernel::Bilinear, 0..=5),
        (Kernel::BiCubic, 2..=3),
    ] {
        let interpolator = Interpolator::new(&src, kernel)?;
        let mut dst = DestinationGrid::<2>::new(Rect::from_size(8, 8), Some([3, 5].into()), 0.0)?;
        resample(&interpolator, &mut dst, &transform, f64::NAN)?;

        for (x, y) in dst.extent().pixels() {
            let pixel = dst.pixel(x, y)?;
            if !(interior.contains(&x) && interior.contains(&y)) {
                assert!(pixel.iter().all(|v| v.is_nan()), "{kernel} ({x}, {y})");
                continue;
            }
            if kernel == Kernel::BiCubic {
                continue;
            }

            // contributing samples of the bilinear and nearest kernels
            let (sx, sy) = (x as f64 / 2.0, y as f64 / 2.0);
            for (band, v) in pixel.iter().enumerate() {
                let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
                for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let (px, py) = (sx.floor() as i64 + i, sy.floor() as i64 + j);
                    let s = src.sample(px.min(3), py.min(3), band)?;
                    min = min.min(s);
                    max = max.max(s);
                }
                assert!(*v >= min - 1e-12 && *v <= max + 1e-12, "{kernel} ({x}, {y}) = {v}");
            }
        }
    }

    Ok(())
}

#[test]
fn test_resample_reversed_tiles_identical() -> Result<(), ResampleError> {
    let mut rng = StdRng::seed_from_u64(5);
    let src = random_grid::<2>(&mut rng, Rect::new(-10, -10, 40, 30));
    let transform = ProjectiveTransform::new([0.9, 0.1, -8.0, -0.05, 1.1, -6.0, 0.001, 0.0005, 1.0]);
    let extent = Rect::new(0, 0, 37, 29);

    for kernel in [
        Kernel::Nearest,
        Kernel::Bilinear,
        Kernel::BiCubic,
        Kernel::Lanczos(2),
    ] {
        let interpolator = Interpolator::new(&src, kernel)?;
        let options = ResampleOptions::default();

        let mut forward = DestinationGrid::<2>::new(extent, Some([8, 6].into()), 0.0)?;
        resample_with(&interpolator, &mut forward, &transform, &options)?;

        let mut reversed = DestinationGrid::<2>::new(extent, Some([8, 6].into()), 0.0)?;
        for tile in reversed.tiles_mut().iter_mut().rev() {
            resample_tile(&interpolator, tile, &transform, &options)?;
        }

        let forward = forward.to_sample_grid()?;
        let reversed = reversed.to_sample_grid()?;
        let bits = |g: &SampleGrid<2>| g.as_slice().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&forward), bits(&reversed), "{kernel}");
    }

    Ok(())
}

#[test]
fn test_resample_chained_passes() -> Result<(), ResampleError> {
    let mut rng = StdRng::seed_from_u64(9);
    let src = random_grid::<1>(&mut rng, Rect::from_size(16, 16));
    let config = ResampleConfig::default()
        .with_kernel(Kernel::Nearest)
        .with_tile_size(Some([5, 5].into()));

    // shift by a whole pixel and back
    let shift = AffineTransform::translation(3.0, -2.0);
    let back = shift.inverse().unwrap();
    let extent = Rect::new(-3, 2, 16, 16);

    let (first, stats) = resample_with_config(&src, extent, &shift, &config)?;
    assert_eq!(stats.filled, 0);

    let (second, stats) = resample_with_config(&first, src.domain(), &back, &config)?;
    assert_eq!(stats.filled, 0);
    assert_eq!(second.to_sample_grid()?.as_slice(), src.as_slice());

    Ok(())
}
