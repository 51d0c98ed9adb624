//! Integration tests for pointpick-algorithms
//!
//! These tests check the picking properties that must hold for every
//! point layout: bounding-box rejection never changes the result, larger
//! thresholds only add hits, scaling is compensated and the three layouts
//! agree with each other.

use approx::assert_relative_eq;
use pointpick_algorithms::*;
use pointpick_core::{
    DrawRange, Point3f, PointCloud, PointGeometry, Ray, UnitQuaternion, Vector3f,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::f32::consts::FRAC_PI_2;

/// The three points on the z axis used throughout
fn axis_points() -> Vec<Point3f> {
    vec![
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(0.0, 0.0, 5.0),
        Point3f::new(0.0, 0.0, 10.0),
    ]
}

fn flatten(points: &[Point3f]) -> Vec<f32> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// Create a random cloud of points inside a 10x10x10 cube
fn create_random_points(seed: u64, count: usize) -> Vec<Point3f> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point3f::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            )
        })
        .collect()
}

/// Rays from random points outside the cube aimed roughly at its center
fn create_random_rays(seed: u64, count: usize) -> Vec<Ray> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let origin =
                Point3f::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0), -20.0);
            let target =
                Point3f::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), 0.0);
            Ray::new(origin, target - origin)
        })
        .collect()
}

fn z_ray(x: f32) -> Ray {
    Ray::new(Point3f::new(x, 0.0, -1.0), Vector3f::z())
}

fn hit_indices(hits: &[Intersection<'_>]) -> BTreeSet<usize> {
    hits.iter().map(|hit| hit.index).collect()
}

/// `(index, distance, distance_to_ray)` ordered by index
fn hit_records(hits: &[Intersection<'_>]) -> Vec<(usize, f32, f32)> {
    let mut records: Vec<_> = hits
        .iter()
        .map(|hit| (hit.index, hit.distance, hit.distance_to_ray))
        .collect();
    records.sort_by_key(|record| record.0);
    records
}

fn cloud_of(points: Vec<Point3f>) -> PointCloud {
    PointCloud::with_geometry(PointGeometry::from_vertices(points))
}

fn pick(cloud: &PointCloud, ray: Ray, threshold: f32) -> Vec<Intersection<'_>> {
    PointPicker::pick(cloud, &PickRequest::new(ray, threshold)).unwrap()
}

#[test]
fn test_empty_geometry_never_hits() {
    let layouts = vec![
        PointGeometry::from_vertices(Vec::new()),
        PointGeometry::from_flat(Vec::new()),
        PointGeometry::from_flat_indexed(Vec::new(), Vec::new(), Vec::new()),
        PointGeometry::default().with_bounding_box(),
    ];

    for geometry in layouts {
        let cloud = PointCloud::with_geometry(geometry);
        for ray in create_random_rays(1, 10) {
            assert!(pick(&cloud, ray, 100.0).is_empty());
        }
    }
}

#[test]
fn test_bounding_box_does_not_change_results() {
    let points = create_random_points(7, 500);
    let with_box =
        PointCloud::with_geometry(PointGeometry::from_vertices(points.clone()).with_bounding_box());
    let without_box = cloud_of(points);

    let mut rays = create_random_rays(11, 40);
    // rays that clip the box faces or miss it entirely
    rays.push(Ray::new(Point3f::new(5.3, 0.0, -20.0), Vector3f::z()));
    rays.push(Ray::new(Point3f::new(40.0, 40.0, -20.0), Vector3f::z()));

    for threshold in [0.1, 0.5, 1.0] {
        for ray in &rays {
            let a = pick(&with_box, *ray, threshold);
            let b = pick(&without_box, *ray, threshold);
            assert_eq!(hit_records(&a), hit_records(&b));
        }
    }
}

#[test]
fn test_threshold_monotonicity() {
    let cloud = PointCloud::with_geometry(
        PointGeometry::from_vertices(create_random_points(3, 300)).with_bounding_box(),
    );

    for ray in create_random_rays(5, 20) {
        let mut previous = BTreeSet::new();
        for threshold in [0.05, 0.2, 0.5, 1.0, 2.0] {
            let current = hit_indices(&pick(&cloud, ray, threshold));
            assert!(previous.is_subset(&current));
            previous = current;
        }
    }
}

#[test]
fn test_uniform_scale_compensation() {
    // distances 0.1, 0.4, 0.6 and 0.9 from the ray along x
    let points = vec![
        Point3f::new(0.1, 0.0, 1.0),
        Point3f::new(0.4, 0.0, 2.0),
        Point3f::new(0.6, 0.0, 3.0),
        Point3f::new(0.0, 0.9, 4.0),
    ];
    let threshold = 0.5;

    let unscaled = cloud_of(points.clone());
    let expected = hit_indices(&pick(&unscaled, z_ray(0.0), threshold));
    assert_eq!(expected, BTreeSet::from([0, 1]));

    for s in [2.0, 3.0, 0.5] {
        let mut scaled = cloud_of(points.clone());
        scaled.node.scale = Vector3f::new(s, s, s);
        scaled.node.update_matrix_world(None);

        let hits = pick(&scaled, z_ray(0.0), threshold * s);
        assert_eq!(hit_indices(&hits), expected);
    }
}

#[test]
fn test_anisotropic_scale_uses_mean_scale() {
    // mean of (1, 1, 4) is 2, so a world threshold of 1 becomes 0.5 locally
    // even though x is unscaled
    let mut cloud = cloud_of(vec![Point3f::new(0.6, 0.0, 1.0)]);
    cloud.node.scale = Vector3f::new(1.0, 1.0, 4.0);
    cloud.node.update_matrix_world(None);

    assert!(pick(&cloud, z_ray(0.0), 1.0).is_empty());
    assert_eq!(pick(&cloud, z_ray(0.0), 1.4).len(), 1);
}

#[test]
fn test_threshold_is_strict() {
    let on_boundary = cloud_of(vec![Point3f::new(0.5, 0.0, 5.0)]);
    assert!(pick(&on_boundary, z_ray(0.0), 0.5).is_empty());

    let inside = cloud_of(vec![Point3f::new(0.4999, 0.0, 5.0)]);
    assert_eq!(pick(&inside, z_ray(0.0), 0.5).len(), 1);

    // a point on the ray is not picked with a zero threshold
    let on_ray = cloud_of(axis_points());
    assert!(pick(&on_ray, z_ray(0.0), 0.0).is_empty());
}

#[test]
fn test_threshold_is_strict_in_local_space() {
    // scale 2 turns a world threshold of 1 into 0.5 locally; the world ray
    // at x = 1 is 0.5 local units from the point
    let mut cloud = cloud_of(vec![Point3f::new(0.0, 0.0, 5.0)]);
    cloud.node.scale = Vector3f::new(2.0, 2.0, 2.0);
    cloud.node.update_matrix_world(None);

    assert!(pick(&cloud, z_ray(1.0), 1.0).is_empty());
    assert_eq!(pick(&cloud, z_ray(0.999), 1.0).len(), 1);
}

#[test]
fn test_short_world_direction_is_normalized() {
    let cloud = cloud_of(axis_points());
    let short = Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1e-8));
    let hits = hit_records(&pick(&cloud, short, 0.5));

    assert_eq!(hits.len(), 3);
    for ((_, distance, _), expected) in hits.into_iter().zip([1.0f32, 6.0, 11.0]) {
        assert_relative_eq!(distance, expected, epsilon = 1e-5);
    }
}

#[test]
fn test_large_scale_keeps_local_ray_normalized() {
    // the local ray direction shrinks to 1e-7 before it is re-normalized
    let mut cloud = cloud_of(axis_points());
    cloud.node.scale = Vector3f::repeat(1e7);
    cloud.node.update_matrix_world(None);

    let ray = Ray::new(Point3f::new(0.0, 0.0, -1e7), Vector3f::z());
    let hits = hit_records(&pick(&cloud, ray, 0.5e7));

    assert_eq!(hits.len(), 3);
    for ((index, distance, _), expected) in hits.into_iter().zip([1e7f32, 6e7, 11e7]) {
        assert!(index < 3);
        assert_relative_eq!(distance, expected, max_relative = 1e-5);
    }
}

#[test]
fn test_rotated_cloud_reports_world_points() {
    // a quarter turn about y carries local z onto world x
    let mut cloud = cloud_of(axis_points());
    cloud.node.rotation = UnitQuaternion::from_axis_angle(&Vector3f::y_axis(), FRAC_PI_2);
    cloud.node.position = Vector3f::new(0.0, 2.0, 0.0);
    cloud.node.update_matrix_world(None);

    let ray = Ray::new(Point3f::new(-1.0, 2.0, 0.0), Vector3f::new(3.0, 0.0, 0.0));
    let mut hits = pick(&cloud, ray, 0.5);
    hits.sort_by_key(|hit| hit.index);

    assert_eq!(hit_indices(&hits), BTreeSet::from([0, 1, 2]));
    let expected = [
        (Point3f::new(0.0, 2.0, 0.0), 1.0),
        (Point3f::new(5.0, 2.0, 0.0), 6.0),
        (Point3f::new(10.0, 2.0, 0.0), 11.0),
    ];
    for (hit, (point, distance)) in hits.iter().zip(expected) {
        assert_relative_eq!(hit.point, point, epsilon = 1e-5);
        assert_relative_eq!(hit.distance, distance, epsilon = 1e-5);
        assert_relative_eq!(hit.distance_to_ray, 0.0, epsilon = 1e-5);
    }

    // along world z the ray only crosses the first point
    let across = Ray::new(Point3f::new(0.0, 2.0, -1.0), Vector3f::z());
    let hits = pick(&cloud, across, 0.5);
    assert_eq!(hit_indices(&hits), BTreeSet::from([0]));
    assert_relative_eq!(hits[0].point, Point3f::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(hits[0].distance, 1.0, epsilon = 1e-5);
}

#[test]
fn test_layouts_agree() {
    let points = axis_points();
    let positions = flatten(&points);

    let layouts = vec![
        PointGeometry::from_vertices(points.clone()),
        PointGeometry::from_flat(positions.clone()),
        PointGeometry::from_flat_indexed(positions.clone(), vec![0, 1, 2], Vec::new()),
        PointGeometry::from_flat_indexed(
            positions,
            vec![0, 0, 1],
            vec![DrawRange::new(0, 1, 0), DrawRange::new(1, 2, 1)],
        ),
    ];

    for geometry in layouts {
        for geometry in [geometry.clone(), geometry.with_bounding_box()] {
            let cloud = PointCloud::with_geometry(geometry);
            let hits = hit_records(&pick(&cloud, z_ray(0.0), 0.5));

            assert_eq!(hits.len(), 3);
            let expected = [1.0f32, 6.0, 11.0];
            for ((index, distance, distance_to_ray), expected) in hits.into_iter().zip(expected) {
                assert!(index < 3);
                assert_relative_eq!(distance, expected);
                assert_relative_eq!(distance_to_ray, 0.0);
            }
        }
    }
}

#[test]
fn test_random_layouts_agree() {
    let points = create_random_points(21, 200);
    let positions = flatten(&points);
    let half = (points.len() / 2) as u32;

    let vertex_list = cloud_of(points.clone());
    let flat = PointCloud::with_geometry(PointGeometry::from_flat(positions.clone()));
    // second half addressed relative to a base index
    let indices: Vec<u32> = (0..half).chain(0..half).collect();
    let ranged = PointCloud::with_geometry(PointGeometry::from_flat_indexed(
        positions,
        indices,
        vec![
            DrawRange::new(0, half as usize, 0),
            DrawRange::new(half as usize, half as usize, half as usize),
        ],
    ));

    for ray in create_random_rays(23, 20) {
        let expected = hit_records(&pick(&vertex_list, ray, 0.75));
        assert_eq!(hit_records(&pick(&flat, ray, 0.75)), expected);
        assert_eq!(hit_records(&pick(&ranged, ray, 0.75)), expected);
    }
}

#[test]
fn test_off_axis_ray_misses() {
    let cloud = cloud_of(axis_points());
    assert!(pick(&cloud, z_ray(10.0), 0.5).is_empty());

    let boxed =
        PointCloud::with_geometry(PointGeometry::from_vertices(axis_points()).with_bounding_box());
    assert!(pick(&boxed, z_ray(10.0), 0.5).is_empty());
}

#[test]
fn test_pick_is_idempotent() {
    let cloud = cloud_of(create_random_points(9, 100));
    let ray = create_random_rays(10, 1)[0];
    assert_eq!(hit_records(&pick(&cloud, ray, 1.0)), hit_records(&pick(&cloud, ray, 1.0)));
}

#[test]
fn test_concurrent_picks_on_shared_cloud() {
    let cloud = PointCloud::with_geometry(
        PointGeometry::from_vertices(create_random_points(13, 1000)).with_bounding_box(),
    );
    let rays = create_random_rays(17, 8);
    let expected: Vec<_> = rays
        .iter()
        .map(|ray| hit_records(&pick(&cloud, *ray, 0.5)))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = rays
            .iter()
            .map(|ray| {
                let cloud = &cloud;
                scope.spawn(move || hit_records(&pick(cloud, *ray, 0.5)))
            })
            .collect();

        for (handle, expected) in handles.into_iter().zip(expected) {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_raycaster_merges_and_sorts() {
    let near = cloud_of(axis_points());
    let mut far = PointCloud::with_geometry(PointGeometry::from_flat(flatten(&axis_points())));
    far.node.position = Vector3f::new(0.0, 0.0, 2.0);
    far.node.update_matrix_world(None);

    let raycaster = Raycaster::new(z_ray(0.0)).with_params(RaycasterParams {
        point_cloud: PointCloudParams { threshold: 0.5 },
    });
    let clouds = [near, far];
    let hits = raycaster.intersect_objects(&clouds).unwrap();

    let distances: Vec<f32> = hits.iter().map(|hit| hit.distance).collect();
    assert_eq!(distances, vec![1.0, 3.0, 6.0, 8.0, 11.0, 13.0]);
}
