//! Provides a queue of image tiles for the worker threads. The queue
//! itself is not changed after creation, workers pull from it through
//! an atomic counter holding the index of the next tile.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use log::warn;
// sqtrace
use crate::core::geometry::{Bounds2i, Point2i};

/// The queue of tiles to be worked on, shared immutably between
/// worker threads.
pub struct BlockQueue {
    /// tile indices, in Morton order
    blocks: Vec<(u32, u32)>,
    /// image resolution
    image: (u32, u32),
    /// dimensions of a full tile
    dimensions: (u32, u32),
    /// index of the next tile to be worked on
    next: AtomicUsize,
}

impl BlockQueue {
    /// Create a queue covering an image of resolution `img` with tiles
    /// of dimension `dim`. Tiles in the last row and column are
    /// cropped when the resolution is not a multiple of the tile size.
    pub fn new(img: (u32, u32), dim: (u32, u32)) -> BlockQueue {
        let dim = (dim.0.max(1), dim.1.max(1));
        let num_blocks = (
            (img.0 + dim.0 - 1) / dim.0,
            (img.1 + dim.1 - 1) / dim.1,
        );
        let mut blocks: Vec<(u32, u32)> = (0..num_blocks.0 * num_blocks.1)
            .map(|i| (i % num_blocks.0, i / num_blocks.0))
            .collect();
        blocks.sort_by_key(|b| morton2(*b));
        if blocks.is_empty() {
            warn!("Block queue for image {:?} is empty", img);
        }
        BlockQueue {
            blocks,
            image: img,
            dimensions: dim,
            next: AtomicUsize::new(0),
        }
    }
    /// Get the dimensions of a full tile
    pub fn block_dim(&self) -> (u32, u32) {
        self.dimensions
    }
    /// Get the next tile in the queue or None if the queue is finished
    pub fn next(&self) -> Option<(u32, u32)> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        self.blocks.get(i).copied()
    }
    /// Pixel bounds of a tile, cropped to the image.
    pub fn tile_bounds(&self, block: (u32, u32)) -> Bounds2i {
        let x0: u32 = block.0 * self.dimensions.0;
        let y0: u32 = block.1 * self.dimensions.1;
        let x1: u32 = std::cmp::min(x0 + self.dimensions.0, self.image.0);
        let y1: u32 = std::cmp::min(y0 + self.dimensions.1, self.image.1);
        Bounds2i::new(
            Point2i {
                x: x0 as i32,
                y: y0 as i32,
            },
            Point2i {
                x: x1 as i32,
                y: y1 as i32,
            },
        )
    }
    /// Get the length of the queue
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    /// Check if all tiles were handed out
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.blocks.len()
    }
}

// Morton codes follow Fabian Giesen's bit interleaving, see
// https://fgiesen.wordpress.com/2009/12/13/decoding-morton-codes/

/// Insert a 0 bit between each of the low 16 bits of x
fn part1_by1(mut x: u32) -> u32 {
    // x = ---- ---- ---- ---- fedc ba98 7654 3210
    x &= 0x0000_ffff;
    // x = ---- ---- fedc ba98 ---- ---- 7654 3210
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    // x = ---- fedc ---- ba98 ---- 7654 ---- 3210
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    // x = --fe --dc --ba --98 --76 --54 --32 --10
    x = (x ^ (x << 2)) & 0x3333_3333;
    // x = -f-e -d-c -b-a -9-8 -7-6 -5-4 -3-2 -1-0
    (x ^ (x << 1)) & 0x5555_5555
}

/// Compute the Morton code for the `(x, y)` position.
fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tiles_cover_image_exactly_once() {
        let queue = BlockQueue::new((37, 20), (16, 16));
        assert_eq!(queue.len(), 6);
        let mut covered = vec![0_u32; 37 * 20];
        while let Some(block) = queue.next() {
            for p in &queue.tile_bounds(block) {
                covered[(p.y * 37 + p.x) as usize] += 1;
            }
        }
        assert!(covered.iter().all(|c| *c == 1));
        assert!(queue.is_empty());
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn morton_order_starts_at_origin() {
        let queue = BlockQueue::new((64, 64), (16, 16));
        assert_eq!(queue.next(), Some((0, 0)));
        assert_eq!(queue.next(), Some((1, 0)));
        assert_eq!(queue.next(), Some((0, 1)));
        assert_eq!(queue.next(), Some((1, 1)));
        assert_eq!(queue.block_dim(), (16, 16));
    }
}
