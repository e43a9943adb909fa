//! Integrators turn the scene into pixel colors.
//!
//! - PhongIntegrator
//!
//! ## Phong Lighting
//!
//! Every camera ray is traced to the nearest superquadric and shaded
//! with ambient, diffuse and specular terms from all point lights.
//! There are no shadows and no secondary rays.
//!
//! ## Inside-Outside Sampling
//!
//! The **iotest** module evaluates point containment on a regular
//! grid instead of tracing rays.

// std
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
// others
use log::{info, warn};
use num::Zero;
// sqtrace
use crate::blockqueue::BlockQueue;
use crate::core::error::{Result, SqError};
use crate::core::film::{Film, FilmTile};
use crate::core::geometry::Bounds2i;
use crate::core::scene::Scene;
use crate::core::sqtrace::Spectrum;

pub mod iotest;
pub mod phong;

use phong::PhongIntegrator;

#[derive(Debug, Copy, Clone)]
pub struct RenderOptions {
    /// 0 means one thread per core
    pub nthreads: usize,
    pub tile_size: u32,
    pub progress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            nthreads: 0,
            tile_size: 16,
            progress: true,
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct RenderStats {
    pub tiles: usize,
    pub camera_rays: u64,
    pub hits: u64,
    pub elapsed: Duration,
    /// set when the abort flag stopped rendering early
    pub aborted: bool,
}

/// **Main function** to **render** a scene multi-threaded into the
/// given film. Setting *abort* makes the workers stop after their
/// current tile; pixels of unfinished tiles stay black.
pub fn render(
    scene: &Scene,
    film: &mut Film,
    options: &RenderOptions,
    abort: &AtomicBool,
) -> Result<RenderStats> {
    let start = Instant::now();
    let integrator = PhongIntegrator::default();
    let xres: u32 = film.full_resolution.x as u32;
    let yres: u32 = film.full_resolution.y as u32;
    let num_cores: usize = if options.nthreads == 0 {
        num_cpus::get()
    } else {
        options.nthreads
    };
    info!(
        "Rendering {}x{} pixels with {} thread(s) ...",
        xres, yres, num_cores
    );
    let block_queue = BlockQueue::new((xres, yres), (options.tile_size, options.tile_size));
    let bq = &block_queue;
    let integrator = &integrator;
    let camera = scene.get_camera();
    let mut stats: RenderStats = crossbeam::scope(|scope| {
        let (pixel_tx, pixel_rx) = crossbeam_channel::bounded::<(FilmTile, u64)>(num_cores);
        // spawn worker threads
        for _ in 0..num_cores {
            let pixel_tx = pixel_tx.clone();
            scope.spawn(move |_| {
                while let Some(block) = bq.next() {
                    if abort.load(Ordering::Relaxed) {
                        break;
                    }
                    let tile_bounds: Bounds2i = bq.tile_bounds(block);
                    let mut film_tile = FilmTile::new(tile_bounds);
                    let mut hits: u64 = 0;
                    for pixel in &tile_bounds {
                        let ray = camera.generate_ray(pixel.x as u32, pixel.y as u32, xres, yres);
                        let (mut l, hit) = integrator.li(&ray, scene);
                        if hit {
                            hits += 1;
                        }
                        if l.has_nans() || !l.is_finite() {
                            warn!(
                                "Invalid color {:?} returned for pixel ({}, {}). Setting to black.",
                                l.c, pixel.x, pixel.y
                            );
                            l = Spectrum::zero();
                        }
                        film_tile.set_pixel(&pixel, l);
                    }
                    // send the tile through the channel to the collecting thread
                    if pixel_tx.send((film_tile, hits)).is_err() {
                        break;
                    }
                }
            });
        }
        // the channel closes once all workers are done
        drop(pixel_tx);
        let mut progress = if options.progress {
            Some(pbr::ProgressBar::new(bq.len() as u64))
        } else {
            None
        };
        let mut stats = RenderStats::default();
        for (film_tile, hits) in pixel_rx.iter() {
            stats.tiles += 1;
            stats.camera_rays += film_tile.pixel_bounds.area() as u64;
            stats.hits += hits;
            // merge image tile into _Film_
            film.merge_film_tile(&film_tile);
            if let Some(pb) = progress.as_mut() {
                pb.inc();
            }
        }
        if let Some(pb) = progress.as_mut() {
            pb.finish();
        }
        stats
    })
    .map_err(|_| SqError::WorkerPanic)?;
    stats.elapsed = start.elapsed();
    stats.aborted = stats.tiles < bq.len();
    info!(
        "Traced {} camera rays ({} hits) in {:.3}s",
        stats.camera_rays,
        stats.hits,
        stats.elapsed.as_secs_f64()
    );
    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::camera::{Camera, Frustum};
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::core::object::Object;
    use crate::core::scene::SceneBuilder;
    use crate::lights::point::PointLight;
    use crate::shapes::superquadric::Superquadric;

    fn sphere_scene() -> Scene {
        let mut builder = SceneBuilder::new();
        builder
            .add_object("ball", Object::from(Superquadric::new(1.0, 1.0).unwrap()), true)
            .unwrap();
        builder.add_light(PointLight::new(
            Point3f::new(0.0, 0.0, 5.0),
            Spectrum::new(1.0),
            0.0,
        ));
        builder.set_camera(
            Camera::new(
                Vector3f::new(0.0, 0.0, -5.0),
                Vector3f::new(0.0, 1.0, 0.0),
                0.0,
                Frustum::default(),
            )
            .unwrap(),
        );
        builder.build().unwrap()
    }

    fn options(nthreads: usize) -> RenderOptions {
        RenderOptions {
            nthreads,
            tile_size: 4,
            progress: false,
        }
    }

    #[test]
    fn renders_sphere_in_center() {
        let scene = sphere_scene();
        let mut film = Film::new(9, 7);
        let stats = render(&scene, &mut film, &options(3), &AtomicBool::new(false)).unwrap();
        assert_eq!(stats.camera_rays, 63);
        assert_eq!(stats.tiles, 6);
        assert!(!stats.aborted);
        assert!(stats.hits > 0 && stats.hits < 63);
        // lit head-on in the middle, background in the corner
        let center = film.get_pixel(4, 3).unwrap();
        assert!(center[0] > 0.9);
        assert_eq!(film.get_pixel(0, 0).unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn thread_count_does_not_change_image() {
        let scene = sphere_scene();
        let mut single = Film::new(12, 12);
        let mut multi = Film::new(12, 12);
        render(&scene, &mut single, &options(1), &AtomicBool::new(false)).unwrap();
        render(&scene, &mut multi, &options(4), &AtomicBool::new(false)).unwrap();
        for y in 0..12 {
            for x in 0..12 {
                assert_eq!(single.get_pixel(x, y), multi.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn abort_flag_stops_rendering() {
        let scene = sphere_scene();
        let mut film = Film::new(16, 16);
        let stats = render(&scene, &mut film, &options(2), &AtomicBool::new(true)).unwrap();
        assert_eq!(stats.tiles, 0);
        assert!(stats.aborted);
        assert_eq!(film.get_pixel(8, 8).unwrap(), [0.0, 0.0, 0.0]);
    }
}
