//! Connected component analysis
//!
//! Two-pass labeling with a union-find (disjoint set) structure. Final
//! labels are numbered from 1 in raster order of each component's first
//! pixel (top to bottom, then left to right).

use crate::error::{RegionError, RegionResult};
use glyphrec_core::{Box, Pix, PixMut, PixelDepth, Pixa};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

/// A connected component in an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Label, starting at 1
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: Box,
}

/// Per-pixel labels of a binary image together with component summaries
#[derive(Debug, Clone)]
pub struct ComponentMap {
    width: u32,
    height: u32,
    /// Row-major labels, 0 for background
    labels: Vec<u32>,
    components: Vec<ConnectedComponent>,
}

impl ComponentMap {
    /// Components in label order
    pub fn components(&self) -> &[ConnectedComponent] {
        &self.components
    }

    /// Label at `(x, y)`, 0 for background or out of bounds
    pub fn label_at(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.labels[(y * self.width + x) as usize]
    }

    /// Bitmap of a single component, clipped to its bounding box.
    ///
    /// Pixels of other components inside the box are not included.
    pub fn extract(&self, label: u32) -> RegionResult<Pix> {
        let comp = label
            .checked_sub(1)
            .and_then(|i| self.components.get(i as usize))
            .ok_or_else(|| RegionError::InvalidParameters(format!("no component {}", label)))?;
        let b = comp.bounds;
        let mut pm = PixMut::new(b.w as u32, b.h as u32, PixelDepth::Bit1)?;
        for dy in 0..b.h as u32 {
            for dx in 0..b.w as u32 {
                if self.label_at(b.x as u32 + dx, b.y as u32 + dy) == label {
                    pm.set_pixel_unchecked(dx, dy, 1);
                }
            }
        }
        Ok(pm.into())
    }
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Index 0 is the background sentinel.
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let p = self.parent[x as usize];
            self.parent[x as usize] = self.parent[p as usize];
            x = p;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

fn check_binary(pix: &Pix) -> RegionResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

/// Label all connected components in a binary image
pub fn label_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<ComponentMap> {
    check_binary(pix)?;
    let (w, h) = (pix.width(), pix.height());
    let mut labels = vec![0u32; w as usize * h as usize];
    let mut uf = UnionFind::new();
    let idx = |x: u32, y: u32| (y * w + x) as usize;

    for y in 0..h {
        for x in 0..w {
            if pix.get_pixel_unchecked(x, y) == 0 {
                continue;
            }
            let mut neighbors = [0u32; 4];
            if x > 0 {
                neighbors[0] = labels[idx(x - 1, y)];
            }
            if y > 0 {
                neighbors[1] = labels[idx(x, y - 1)];
                if connectivity == ConnectivityType::EightWay {
                    if x > 0 {
                        neighbors[2] = labels[idx(x - 1, y - 1)];
                    }
                    if x + 1 < w {
                        neighbors[3] = labels[idx(x + 1, y - 1)];
                    }
                }
            }
            let mut current = 0u32;
            for &n in neighbors.iter().filter(|&&n| n != 0) {
                if current == 0 {
                    current = n;
                } else {
                    uf.union(current, n);
                }
            }
            if current == 0 {
                current = uf.make();
            }
            labels[idx(x, y)] = current;
        }
    }

    // Second pass: resolve roots to sequential labels and gather stats.
    let mut root_to_label = vec![0u32; uf.parent.len()];
    let mut extents: Vec<(u32, u32, u32, u32, u32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let l = labels[idx(x, y)];
            if l == 0 {
                continue;
            }
            let root = uf.find(l) as usize;
            if root_to_label[root] == 0 {
                extents.push((x, y, x, y, 0));
                root_to_label[root] = extents.len() as u32;
            }
            let final_label = root_to_label[root];
            labels[idx(x, y)] = final_label;
            let e = &mut extents[final_label as usize - 1];
            e.0 = e.0.min(x);
            e.1 = e.1.min(y);
            e.2 = e.2.max(x);
            e.3 = e.3.max(y);
            e.4 += 1;
        }
    }

    let components = extents
        .into_iter()
        .enumerate()
        .map(|(i, (x0, y0, x1, y1, n))| ConnectedComponent {
            label: i as u32 + 1,
            pixel_count: n,
            bounds: Box::new_unchecked(
                x0 as i32,
                y0 as i32,
                (x1 - x0 + 1) as i32,
                (y1 - y0 + 1) as i32,
            ),
        })
        .collect();

    Ok(ComponentMap {
        width: w,
        height: h,
        labels,
        components,
    })
}

/// Find all connected components in a binary image
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    Ok(label_components(pix, connectivity)?.components)
}

/// Extract every component as its own bitmap, with its bounding box.
///
/// Components are returned in label order.
pub fn extract_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pixa> {
    let map = label_components(pix, connectivity)?;
    let mut pixa = Pixa::with_capacity(map.components.len());
    for comp in &map.components {
        pixa.push_with_box(map.extract(comp.label)?, comp.bounds);
    }
    Ok(pixa)
}

/// Remove components with fewer than `min_size` pixels.
pub fn remove_small_components(
    pix: &Pix,
    min_size: u32,
    connectivity: ConnectivityType,
) -> RegionResult<Pix> {
    let map = label_components(pix, connectivity)?;
    let small: Vec<u32> = map
        .components
        .iter()
        .filter(|c| c.pixel_count < min_size)
        .map(|c| c.label)
        .collect();
    if small.is_empty() {
        return Ok(pix.clone());
    }
    let mut pm = pix.to_mut();
    for label in small {
        let b = map.components[label as usize - 1].bounds;
        for y in b.y..b.bottom() {
            for x in b.x..b.right() {
                if map.label_at(x as u32, y as u32) == label {
                    pm.set_pixel_unchecked(x as u32, y as u32, 0);
                }
            }
        }
    }
    Ok(pm.into())
}
