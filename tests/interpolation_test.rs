//! Spatial-query tests on a decoded file: point location, barycentric
//! interpolation and transect sampling, end to end from the binary
//! stream to interpolated values.

use std::io::Cursor;

use serafin_rs::mesh::{Location, MeshIndex, apply_weights, cumulative_distances};
use serafin_rs::serafin::{
    FloatKind, Header, Variable, VariableCatalogue, decode, encode, frames,
};

/// Write the reference scenario to an in-memory stream: the unit-square
/// mesh, one variable "H", frames at t=0 (H=1 everywhere) and t=1 (H=2).
fn reference_stream() -> Cursor<Vec<u8>> {
    let header = Header {
        title: "unit square".to_string(),
        float_kind: FloatKind::Single,
        variables: vec![Variable {
            name: "WATER DEPTH".to_string(),
            unit: "M".to_string(),
            id: "H".to_string(),
        }],
        params: [0; 10],
        date: None,
        nb_elements: 2,
        nb_nodes: 4,
        nb_nodes_per_elem: 3,
        ikle: vec![1, 2, 3, 2, 4, 3],
        ipobo: vec![1, 2, 3, 4],
        x: vec![0.0, 1.0, 0.0, 1.0],
        y: vec![0.0, 0.0, 1.0, 1.0],
    };

    let mut buf = Vec::new();
    encode(&header, &mut buf).unwrap();
    frames::write_frame(&mut buf, &header, 0.0, &[vec![1.0; 4]]).unwrap();
    frames::write_frame(&mut buf, &header, 1.0, &[vec![2.0; 4]]).unwrap();
    Cursor::new(buf)
}

#[test]
fn test_interpolate_frame_values_at_a_point() {
    let mut stream = reference_stream();
    let header = decode(&mut stream, &VariableCatalogue::default()).unwrap();
    let sizes = header.compute_sizes();
    let time = frames::index_time(&mut stream, &sizes).unwrap();
    let mesh = MeshIndex::build(&header).unwrap();

    let weights = mesh.interpolate_point(0.25, 0.25);
    assert_eq!(weights.len(), 3);

    // H is uniform in both frames, so any interior point reproduces it.
    for (expected, &t) in [1.0, 2.0].iter().zip(time.iter()) {
        let h = frames::read_var_at_time(&mut stream, &header, &sizes, &time, t, "H").unwrap();
        let value = apply_weights(&weights, &h);
        assert!((value - expected).abs() < 1e-12);
    }
}

#[test]
fn test_outside_point_uses_nearest_node_value() {
    let mut stream = reference_stream();
    let header = decode(&mut stream, &VariableCatalogue::default()).unwrap();
    let sizes = header.compute_sizes();
    let mesh = MeshIndex::build(&header).unwrap();

    assert_eq!(mesh.locate(5.0, 5.0), Location::Outside);
    let weights = mesh.interpolate_point(5.0, 5.0);
    assert_eq!(weights, vec![(4, 1.0)]);

    let h = frames::read_frame_var(&mut stream, &header, &sizes, 1, "H").unwrap();
    assert!((apply_weights(&weights, &h) - 2.0).abs() < 1e-12);
}

#[test]
fn test_transect_across_the_two_triangles() {
    let mut stream = reference_stream();
    let header = decode(&mut stream, &VariableCatalogue::default()).unwrap();
    let mesh = MeshIndex::build(&header).unwrap();

    let samples: Vec<_> = mesh
        .walk((0.25, 0.25), (0.75, 0.75))
        .map(|s| s.unwrap())
        .collect();

    // A, the single diagonal crossing, B
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].position, (0.25, 0.25));
    assert!((samples[1].position.0 - 0.5).abs() < 1e-12);
    assert!((samples[1].position.1 - 0.5).abs() < 1e-12);
    assert_eq!(samples[2].position, (0.75, 0.75));

    // Every sample's weights sum to 1
    for sample in &samples {
        let sum: f64 = sample.weights.iter().map(|&(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_transect_integration_of_a_uniform_field() {
    // Trapezoidal integration of a uniform field along a transect equals
    // field value times transect length; the discharge computation built
    // on these samples relies on exactly this.
    let mut stream = reference_stream();
    let header = decode(&mut stream, &VariableCatalogue::default()).unwrap();
    let sizes = header.compute_sizes();
    let mesh = MeshIndex::build(&header).unwrap();

    let h = frames::read_frame_var(&mut stream, &header, &sizes, 1, "H").unwrap();

    let (a, b) = ((0.25, 0.25), (0.75, 0.75));
    let samples: Vec<_> = mesh.walk(a, b).map(|s| s.unwrap()).collect();
    let distances = cumulative_distances(&samples);

    let mut integral = 0.0;
    for i in 1..samples.len() {
        let v0 = apply_weights(&samples[i - 1].weights, &h);
        let v1 = apply_weights(&samples[i].weights, &h);
        integral += 0.5 * (v0 + v1) * (distances[i] - distances[i - 1]);
    }

    let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
    assert!((integral - 2.0 * length).abs() < 1e-12);
}

#[test]
fn test_batch_interpolation_over_the_stream() {
    let mut stream = reference_stream();
    let header = decode(&mut stream, &VariableCatalogue::default()).unwrap();
    let mesh = MeshIndex::build(&header).unwrap();

    let points = vec![(0.25, 0.25), (0.75, 0.75), (5.0, 5.0)];
    let batch = mesh.interpolate_batch(&points);
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0].len(), 3);
    assert_eq!(batch[1].len(), 3);
    assert_eq!(batch[2], vec![(4, 1.0)]);
}
