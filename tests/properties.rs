use gmsmatch::{DMatch, GmsConfig, GmsMatcher, ImageSize, Keypoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FLAG_COMBOS: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

fn vga() -> ImageSize {
    ImageSize::new(640, 480).unwrap()
}

/// Translated inliers mixed with uniformly random outliers.
fn random_scene(seed: u64, inliers: usize, outliers: usize) -> (Vec<Keypoint>, Vec<Keypoint>, Vec<DMatch>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let shift = (rng.random_range(-60.0..60.0f32), rng.random_range(-40.0..40.0f32));
    let mut kps1 = Vec::new();
    let mut kps2 = Vec::new();
    let mut matches = Vec::new();

    while kps1.len() < inliers {
        let x = rng.random_range(0.0..640.0f32);
        let y = rng.random_range(0.0..480.0f32);
        let qx = x + shift.0 + rng.random_range(-2.0..2.0f32);
        let qy = y + shift.1 + rng.random_range(-2.0..2.0f32);
        if !(0.0..=640.0).contains(&qx) || !(0.0..=480.0).contains(&qy) {
            continue;
        }
        matches.push(DMatch::new(kps1.len(), kps2.len(), rng.random_range(0.0..64.0)));
        kps1.push(Keypoint::new(x, y));
        kps2.push(Keypoint::new(qx, qy));
    }
    for _ in 0..outliers {
        matches.push(DMatch::new(kps1.len(), kps2.len(), rng.random_range(0.0..64.0)));
        kps1.push(Keypoint::new(rng.random_range(0.0..640.0), rng.random_range(0.0..480.0)));
        kps2.push(Keypoint::new(rng.random_range(0.0..640.0), rng.random_range(0.0..480.0)));
    }

    // Interleave inliers and outliers so order preservation is meaningful.
    let mut order: Vec<usize> = (0..matches.len()).collect();
    for i in (1..order.len()).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    let matches = order.into_iter().map(|i| matches[i]).collect();
    (kps1, kps2, matches)
}

fn is_subsequence(sub: &[DMatch], full: &[DMatch]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|m| it.any(|f| f == m))
}

#[test]
fn output_is_an_ordered_subsequence_of_input() {
    for seed in 0..4 {
        let (kps1, kps2, matches) = random_scene(seed, 600, 300);
        for &(with_rotation, with_scale) in &FLAG_COMBOS {
            let cfg = GmsConfig {
                with_rotation,
                with_scale,
                ..GmsConfig::default()
            };
            let report = GmsMatcher::new(cfg)
                .filter(vga(), vga(), &kps1, &kps2, &matches)
                .unwrap();
            assert!(report.matches.len() <= matches.len());
            assert!(is_subsequence(&report.matches, &matches));
            assert_eq!(report.inlier_mask.len(), matches.len());
            assert_eq!(
                report.inlier_mask.iter().filter(|&&m| m).count(),
                report.num_inliers
            );
            assert_eq!(report.matches.len(), report.num_inliers);
        }
    }
}

#[test]
fn translated_scene_keeps_mostly_inliers() {
    let (kps1, kps2, matches) = random_scene(11, 2000, 500);
    let report = GmsMatcher::default()
        .filter(vga(), vga(), &kps1, &kps2, &matches)
        .unwrap();
    assert!(report.num_inliers > 1000, "kept {}", report.num_inliers);
}

#[test]
fn raising_the_threshold_never_keeps_more_matches() {
    let factors = [0.0, 1.0, 2.0, 4.0, 6.0, 8.0, 12.0, 20.0];
    for seed in 20..23 {
        let (kps1, kps2, matches) = random_scene(seed, 500, 400);
        for &(with_rotation, with_scale) in &FLAG_COMBOS {
            let mut previous = usize::MAX;
            for &threshold_factor in &factors {
                let cfg = GmsConfig {
                    with_rotation,
                    with_scale,
                    threshold_factor,
                    ..GmsConfig::default()
                };
                let kept = GmsMatcher::new(cfg)
                    .filter(vga(), vga(), &kps1, &kps2, &matches)
                    .unwrap()
                    .num_inliers;
                assert!(
                    kept <= previous,
                    "factor {threshold_factor} kept {kept} > {previous}"
                );
                previous = kept;
            }
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let (kps1, kps2, matches) = random_scene(5, 800, 400);
    for &(with_rotation, with_scale) in &FLAG_COMBOS {
        let matcher = GmsMatcher::new(GmsConfig {
            with_rotation,
            with_scale,
            ..GmsConfig::default()
        });
        let first = matcher.filter(vga(), vga(), &kps1, &kps2, &matches).unwrap();
        for _ in 0..3 {
            let again = matcher.filter(vga(), vga(), &kps1, &kps2, &matches).unwrap();
            assert_eq!(first, again);
        }
    }
}

#[test]
fn refiltering_random_scenes_is_a_no_op() {
    let sizes = [(300, 300), (150, 100), (600, 1200)];
    for seed in 30..34 {
        for &(inliers, outliers) in &sizes {
            let (kps1, kps2, matches) = random_scene(seed, inliers, outliers);
            for &(with_rotation, with_scale) in &FLAG_COMBOS {
                let matcher = GmsMatcher::new(GmsConfig {
                    with_rotation,
                    with_scale,
                    ..GmsConfig::default()
                });
                let once = matcher.filter(vga(), vga(), &kps1, &kps2, &matches).unwrap();
                let twice = matcher
                    .filter(vga(), vga(), &kps1, &kps2, &once.matches)
                    .unwrap();
                assert_eq!(
                    twice.matches, once.matches,
                    "seed {seed}, {inliers}+{outliers}, rotation {with_rotation}, scale {with_scale}"
                );
            }
        }
    }
}

#[test]
fn refiltering_clustered_matches_is_a_no_op() {
    // Dense 4x4 point blocks in isolated cells, each translated rigidly.
    let mut kps1 = Vec::new();
    let mut kps2 = Vec::new();
    let mut matches = Vec::new();
    for &(col, row) in &[(2usize, 2usize), (7, 3), (12, 9), (16, 15), (4, 14)] {
        for i in 0..16 {
            let x = 32.0 * col as f32 + 6.0 + (i % 4) as f32;
            let y = 24.0 * row as f32 + 4.0 + (i / 4) as f32;
            matches.push(DMatch::new(kps1.len(), kps2.len(), 0.0));
            kps1.push(Keypoint::new(x, y));
            kps2.push(Keypoint::new(x + 20.0, y + 10.0));
        }
    }
    for (i, &(x, y)) in [(600.0, 30.0), (300.0, 450.0), (500.0, 150.0)].iter().enumerate() {
        matches.push(DMatch::new(kps1.len(), kps2.len(), 0.0));
        kps1.push(Keypoint::new(x, y));
        kps2.push(Keypoint::new(100.0 + 150.0 * i as f32, 300.0));
    }

    for &(with_rotation, with_scale) in &FLAG_COMBOS {
        let matcher = GmsMatcher::new(GmsConfig {
            with_rotation,
            with_scale,
            ..GmsConfig::default()
        });
        let once = matcher.filter(vga(), vga(), &kps1, &kps2, &matches).unwrap();
        assert_eq!(once.num_inliers, 80);
        let twice = matcher
            .filter(vga(), vga(), &kps1, &kps2, &once.matches)
            .unwrap();
        assert_eq!(twice.matches, once.matches);
    }
}

#[test]
fn empty_matches_yield_empty_output() {
    let kps = vec![Keypoint::new(10.0, 10.0); 5];
    for &(with_rotation, with_scale) in &FLAG_COMBOS {
        let report = GmsMatcher::new(GmsConfig {
            with_rotation,
            with_scale,
            ..GmsConfig::default()
        })
        .filter(vga(), vga(), &kps, &kps, &[])
        .unwrap();
        assert!(report.matches.is_empty());
        assert!(report.inlier_mask.is_empty());
        assert_eq!(report.num_inliers, 0);
    }
}
