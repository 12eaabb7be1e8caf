//! Property checks for the compositing operations over a spread of images.

use approx::assert_relative_eq;
use dualpng_core::{Image, Rect, TRANSPARENT};
use dualpng_ops::merge::takes_first;
use dualpng_ops::resize::{resize, Filter};
use dualpng_ops::{
    create_mask, level_image, merge_images, scale_brightness, LevelRange, MaskMatrix,
};

/// Deterministic pseudo-random image (xorshift), alpha varies too.
fn noise(width: u32, height: u32, seed: u32) -> Image {
    Image::from_fn(width, height, |x, y| {
        let mut s = seed ^ (x.wrapping_mul(73_856_093)) ^ (y.wrapping_mul(19_349_663));
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        let b = s.to_le_bytes();
        [b[0], b[1], b[2], b[3]]
    })
}

fn sizes() -> Vec<(u32, u32)> {
    vec![(1, 1), (2, 2), (3, 7), (16, 9), (33, 1), (1, 20)]
}

#[test]
fn identity_leveling() {
    for (i, (w, h)) in sizes().into_iter().enumerate() {
        let img = noise(w, h, i as u32);
        assert_eq!(level_image(&img, LevelRange::FULL), img);
    }
}

#[test]
fn leveling_stays_in_range_and_keeps_alpha() {
    let img = noise(32, 32, 7);
    for (low, high) in [(0, 230), (230, 255), (100, 200), (0, 0), (255, 255)] {
        let out = level_image(&img, LevelRange::new(low, high).unwrap());
        for (x, y, px) in out.pixels() {
            for c in &px[..3] {
                assert!((low..=high).contains(c), "{c} outside {low}-{high}");
            }
            assert_eq!(px[3], img.pixel(x, y)[3]);
        }
    }
}

#[test]
fn white_levels_to_high() {
    let white = Image::filled(1, 1, [255, 255, 255, 255]);
    let out = level_image(&white, LevelRange::new(100, 200).unwrap());
    assert_eq!(out.pixel(0, 0), [200, 200, 200, 255]);
}

#[test]
fn identity_brightness() {
    for (i, (w, h)) in sizes().into_iter().enumerate() {
        let img = noise(w, h, 100 + i as u32);
        assert_eq!(scale_brightness(&img, 1.0).unwrap(), img);
    }
}

#[test]
fn half_brightness_halves_mean() {
    let img = Image::from_fn(64, 4, |x, _| {
        let v = (x * 4) as u8;
        [v, v, v, 255]
    });
    let out = scale_brightness(&img, 0.5).unwrap();
    let mean = |im: &Image| {
        let sum: u64 = im.pixels().map(|(_, _, p)| u64::from(p[0])).sum();
        sum as f64 / (im.width() * im.height()) as f64
    };
    assert_relative_eq!(mean(&out), mean(&img) / 2.0, max_relative = 0.01);
}

#[test]
fn checkerboard_parity() {
    for (i, (w1, h1)) in sizes().into_iter().enumerate() {
        for (j, (w2, h2)) in sizes().into_iter().enumerate() {
            let a = noise(w1, h1, i as u32);
            let b = noise(w2, h2, 1000 + j as u32);
            let out = merge_images(&a, &b, None);
            for (x, y, px) in out.pixels() {
                let expected = if takes_first(x, y) {
                    a.pixel_or_transparent(x, y)
                } else {
                    b.pixel_or_transparent(x, y)
                };
                assert_eq!(px, expected, "({x}, {y}) {w1}x{h1} vs {w2}x{h2}");
            }
        }
    }
}

#[test]
fn canvas_is_componentwise_max() {
    for (w1, h1) in sizes() {
        for (w2, h2) in sizes() {
            let a = noise(w1, h1, 1);
            let b = noise(w2, h2, 2);
            let expected = (w1.max(w2), h1.max(h2));
            assert_eq!(merge_images(&a, &b, None).dimensions(), expected);
            let mask = MaskMatrix::checkerboard();
            assert_eq!(merge_images(&a, &b, Some(&mask)).dimensions(), expected);
        }
    }
}

#[test]
fn mask_extremes() {
    let a = noise(9, 6, 3);
    let b = noise(5, 8, 4);
    let opaque = MaskMatrix::new(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
    let clear = MaskMatrix::new(vec![vec![0.0; 3]; 2]).unwrap();

    let over = merge_images(&a, &b, Some(&opaque));
    let under = merge_images(&a, &b, Some(&clear));
    for (x, y, px) in over.pixels() {
        if a.bounds().contains(x, y) && b.bounds().contains(x, y) {
            assert_eq!(px, a.pixel(x, y));
            assert_eq!(under.pixel(x, y), b.pixel(x, y));
        }
    }
}

#[test]
fn transparent_outside_both_sources() {
    let a = Image::filled(3, 1, [255, 255, 255, 255]);
    let b = Image::filled(1, 3, [0, 0, 0, 255]);
    let out = merge_images(&a, &b, Some(&MaskMatrix::uniform(0.5).unwrap()));
    assert_eq!(out.pixel(2, 2), TRANSPARENT);
}

#[test]
fn merge_leaves_inputs_untouched() {
    let a = noise(4, 4, 11);
    let b = noise(4, 4, 12);
    let (a_before, b_before) = (a.as_raw().to_vec(), b.as_raw().to_vec());
    let _ = merge_images(&a, &b, None);
    let _ = merge_images(&a, &b, Some(&MaskMatrix::checkerboard()));
    assert_eq!(a.as_raw(), a_before.as_slice());
    assert_eq!(b.as_raw(), b_before.as_slice());
}

#[test]
fn mask_size_matches_bounds() {
    let m = MaskMatrix::new(vec![vec![1.0, 0.0, 1.0]]).unwrap();
    for (w, h) in sizes() {
        assert_eq!(create_mask(&m, Rect::from_size(w, h)).dimensions(), (w, h));
    }
}

#[test]
fn resize_then_merge_pipeline() {
    let a = noise(40, 20, 5);
    let b = noise(10, 30, 6);
    let a = resize(&a, 16, 0, Filter::Lanczos3).unwrap();
    let b = resize(&b, 16, 0, Filter::Lanczos3).unwrap();
    assert_eq!(a.dimensions(), (16, 8));
    assert_eq!(b.dimensions(), (16, 48));
    let out = merge_images(
        &level_image(&a, LevelRange::new(0, 230).unwrap()),
        &level_image(&b, LevelRange::new(230, 255).unwrap()),
        None,
    );
    assert_eq!(out.dimensions(), (16, 48));
}
