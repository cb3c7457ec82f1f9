//! Eye aspect ratio computation
//!
//! Standard 6-point EAR: `(|p2-p6| + |p3-p5|) / (2 * |p1-p4|)`, where
//! p1/p4 are the horizontal eye corners and p2/p6, p3/p5 the vertical
//! lid pairs. The ratio drops toward zero as the eye closes.

/// Euclidean distance between two points.
fn dist(a: (f32, f32), b: (f32, f32)) -> f64 {
    let dx = (a.0 - b.0) as f64;
    let dy = (a.1 - b.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Compute the EAR for one eye from six pixel-space points in the order
/// `[p1, p2, p3, p4, p5, p6]`.
///
/// A collapsed horizontal span (degenerate landmark geometry) yields a
/// non-finite value; callers treat that as "no measurement" rather than
/// a state change.
pub fn eye_aspect_ratio(points: &[(f32, f32); 6]) -> f64 {
    let vertical1 = dist(points[1], points[5]);
    let vertical2 = dist(points[2], points[4]);
    let horizontal = dist(points[0], points[3]);
    (vertical1 + vertical2) / (2.0 * horizontal)
}

/// Average the two per-eye ratios into the per-frame EAR value.
///
/// Propagates NaN if either eye is degenerate.
pub fn average_ear(left: f64, right: f64) -> f64 {
    if !left.is_finite() || !right.is_finite() {
        return f64::NAN;
    }
    (left + right) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // An idealised open eye: 40px wide, lids 10px apart.
    fn open_eye() -> [(f32, f32); 6] {
        [
            (0.0, 0.0),
            (10.0, -5.0),
            (30.0, -5.0),
            (40.0, 0.0),
            (30.0, 5.0),
            (10.0, 5.0),
        ]
    }

    #[test]
    fn test_known_geometry() {
        // Both vertical pairs are 10px apart, horizontal span is 40px.
        let ear = eye_aspect_ratio(&open_eye());
        assert!((ear - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_closed_eye_is_low() {
        let closed = [
            (0.0, 0.0),
            (10.0, -0.5),
            (30.0, -0.5),
            (40.0, 0.0),
            (30.0, 0.5),
            (10.0, 0.5),
        ];
        assert!(eye_aspect_ratio(&closed) < 0.05);
    }

    #[test]
    fn test_degenerate_horizontal_span() {
        let point = (7.0, 3.0);
        let collapsed = [point; 6];
        assert!(!eye_aspect_ratio(&collapsed).is_finite());
    }

    #[test]
    fn test_average_propagates_nan() {
        assert!(average_ear(f64::NAN, 0.3).is_nan());
        assert!(average_ear(0.3, f64::INFINITY).is_nan());
        assert_eq!(average_ear(0.2, 0.4), 0.3);
    }

    proptest! {
        // EAR is a ratio, so uniform scaling must not change it.
        #[test]
        fn test_scale_invariance(scale in 0.01f32..1000.0) {
            let eye = open_eye();
            let scaled: Vec<(f32, f32)> =
                eye.iter().map(|&(x, y)| (x * scale, y * scale)).collect();
            let scaled: [(f32, f32); 6] = scaled.try_into().unwrap();

            let a = eye_aspect_ratio(&eye);
            let b = eye_aspect_ratio(&scaled);
            prop_assert!((a - b).abs() < 1e-4);
        }

        // Deterministic: identical input, identical output.
        #[test]
        fn test_determinism(pts in prop::array::uniform6((0.0f32..2000.0, 0.0f32..2000.0))) {
            let a = eye_aspect_ratio(&pts);
            let b = eye_aspect_ratio(&pts);
            prop_assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }
}
