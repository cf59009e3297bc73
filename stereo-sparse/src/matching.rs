use akaze::Akaze;
use bitarray::{BitArray, Hamming};
use cv_stereo::{FeatureMatch, KeyPoint};
use image::DynamicImage;
use log::*;
use space::{Knn, LinearKnn};

/// Extracts AKAZE features from both images and matches them symmetrically.
pub fn match_features(
    left: &DynamicImage,
    right: &DynamicImage,
    akaze_threshold: f64,
    better_by: u32,
) -> Vec<FeatureMatch<KeyPoint>> {
    let akaze = Akaze::new(akaze_threshold);
    let (key_points_l, descriptors_l) = akaze.extract(left);
    let (key_points_r, descriptors_r) = akaze.extract(right);
    info!(
        "extracted {} left and {} right features",
        key_points_l.len(),
        key_points_r.len()
    );

    let matches = symmetric_matching(&descriptors_l, &descriptors_r, better_by)
        .into_iter()
        .map(|[l, r]| {
            FeatureMatch(
                akaze_key_point(&key_points_l[l]),
                akaze_key_point(&key_points_r[r]),
            )
        })
        .collect::<Vec<_>>();
    info!("found {} symmetric matches", matches.len());
    matches
}

fn akaze_key_point(key_point: &akaze::KeyPoint) -> KeyPoint {
    let (x, y) = key_point.point;
    KeyPoint::new(f64::from(x), f64::from(y))
}

/// This function performs non-symmetric matching from a to b.
///
/// A match is only kept if the best candidate beats the second best by more than `better_by`
/// bits. A lone candidate has nothing to compete with and is kept.
fn matching(
    a_descriptors: &[BitArray<64>],
    b_descriptors: &[BitArray<64>],
    better_by: u32,
) -> Vec<Option<usize>> {
    let knn_b = LinearKnn {
        metric: Hamming,
        iter: b_descriptors.iter(),
    };
    a_descriptors
        .iter()
        .map(|a| {
            let knn = knn_b.knn(a, 2).into_iter().collect::<Vec<_>>();
            match knn.as_slice() {
                [best] => Some(best.index),
                [best, second, ..] if best.distance + better_by < second.distance => {
                    Some(best.index)
                }
                _ => None,
            }
        })
        .collect()
}

/// This function performs symmetric matching between `a` and `b`.
///
/// Symmetric matching requires a feature in `b` to be the best match for a feature in `a`
/// and for the same feature in `a` to be the best match for the same feature in `b`.
/// Returns the index pairs `[a, b]` in the order of `a`.
pub fn symmetric_matching(
    a: &[BitArray<64>],
    b: &[BitArray<64>],
    better_by: u32,
) -> Vec<[usize; 2]> {
    let forward_matches = matching(a, b, better_by);
    let reverse_matches = matching(b, a, better_by);
    forward_matches
        .into_iter()
        .enumerate()
        .filter_map(move |(aix, bix)| {
            bix.map(|bix| [aix, bix])
                .filter(|&[aix, bix]| reverse_matches[bix] == Some(aix))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(fill: u8, flipped_bytes: usize) -> BitArray<64> {
        let mut bytes = [fill; 64];
        for byte in bytes.iter_mut().take(flipped_bytes) {
            *byte = !*byte;
        }
        BitArray::new(bytes)
    }

    #[test]
    fn symmetric_pairs() {
        // Each left descriptor is within one byte (8 bits) of exactly one right descriptor.
        let a = [descriptor(0x00, 0), descriptor(0xff, 0), descriptor(0x0f, 0)];
        let b = [descriptor(0x0f, 1), descriptor(0x00, 1), descriptor(0xff, 1)];
        assert_eq!(symmetric_matching(&a, &b, 24), vec![[0, 1], [1, 2], [2, 0]]);
    }

    #[test]
    fn ambiguous_matches_are_dropped() {
        // Both right descriptors are 64 bits away from the left one.
        let a = [descriptor(0x00, 0)];
        let b = [descriptor(0x01, 0), descriptor(0x80, 0)];
        assert!(symmetric_matching(&a, &b, 24).is_empty());
    }

    #[test]
    fn asymmetric_matches_are_dropped() {
        // X---Y-Z on a line: X's best is Y, but Y prefers Z.
        let x = descriptor(0x00, 0);
        let y = descriptor(0x00, 40);
        let z = descriptor(0x00, 50);
        let a = [x, z];
        let b = [y];
        assert_eq!(symmetric_matching(&a, &b, 0), vec![[1, 0]]);
    }

    #[test]
    fn empty_inputs() {
        let a = [descriptor(0x00, 0)];
        assert!(symmetric_matching(&a, &[], 24).is_empty());
        assert!(symmetric_matching(&[], &a, 24).is_empty());
    }
}
