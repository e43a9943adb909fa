use std::sync::atomic::AtomicBool;

use rs_sqtrace::core::error::SqError;
use rs_sqtrace::core::film::Film;
use rs_sqtrace::core::geometry::{Point3f, Ray, Vector3f};
use rs_sqtrace::core::parser::{load_scene, parse_scene};
use rs_sqtrace::integrators::iotest::{inside_points, Grid};
use rs_sqtrace::integrators::{render, RenderOptions};
use rs_sqtrace::shapes::superquadric::SolverSettings;

const NESTED: &str = r#"
camera { translate 0 0 -10 }
light { position 0 0 10 }
superquadric "unit" { exponents 1 1 }
assembly "inner" { children "unit" translate 0 0 1 }
assembly "outer" root { children "inner" scale 2 2 2 }
"#;

#[test]
fn nested_assemblies_from_text() {
    let scene = parse_scene(NESTED, &SolverSettings::default()).unwrap();
    // the sphere is moved to z = 1 and then scaled: center (0, 0, 2), radius 2
    let ray = Ray::new(Point3f::new(0.0, 0.0, 10.0), Vector3f::new(0.0, 0.0, -1.0));
    let (t, hit) = scene.closest_intersection(&ray);
    assert!((t - 6.0).abs() < 1e-6, "t = {}", t);
    assert!((hit.p() - Point3f::new(0.0, 0.0, 4.0)).length() < 1e-6);
    assert!((hit.n().z - 1.0).abs() < 1e-9);
    assert!(scene.io_test(&Point3f::new(0.0, 0.0, 0.5)));
    assert!(!scene.io_test(&Point3f::new(0.0, 0.0, -0.5)));
}

#[test]
fn bundled_scene_renders() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/assembly.sq");
    let scene = load_scene(&path, &SolverSettings::default()).unwrap();
    assert_eq!(scene.roots().len(), 2);
    let mut film = Film::new(32, 32);
    let options = RenderOptions {
        nthreads: 2,
        tile_size: 8,
        progress: false,
    };
    let stats = render(&scene, &mut film, &options, &AtomicBool::new(false)).unwrap();
    assert_eq!(stats.camera_rays, 32 * 32);
    assert!(stats.hits > 0);
    let output = std::env::temp_dir().join(format!("sqtrace_it_{}.png", std::process::id()));
    film.write_image(&output).unwrap();
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
    std::fs::remove_file(&output).unwrap();
}

#[test]
fn grid_sampling_finds_volume() {
    let scene = parse_scene(NESTED, &SolverSettings::default()).unwrap();
    let grid = Grid {
        min: -3.0,
        max: 3.0,
        step: 1.0,
    };
    let points = inside_points(&scene, &grid).unwrap();
    // center (0, 0, 2) radius 2: the 27 grid points within one step of
    // the center, the ones at distance 2 lie on the surface
    assert!(points.contains(&Point3f::new(0.0, 0.0, 2.0)));
    assert!(points.contains(&Point3f::new(1.0, 1.0, 1.0)));
    assert!(!points.contains(&Point3f::new(0.0, 0.0, 0.0)));
    assert_eq!(points.len(), 27);
}

#[test]
fn missing_child_is_fatal() {
    let err = parse_scene(
        "assembly \"a\" root { children \"nope\" }",
        &SolverSettings::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SqError::MissingChildReference { .. }));
    assert!(err.to_string().contains("nope"));
}
