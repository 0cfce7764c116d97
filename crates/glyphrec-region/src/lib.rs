//! glyphrec-region - Connected components of binary images
//!
//! Used to split a line image into candidate glyphs and to drop isolated
//! noise pixels from training samples.
//!
//! # Examples
//!
//! ```
//! use glyphrec_region::{find_connected_components, ConnectivityType};
//! use glyphrec_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(100, 100, PixelDepth::Bit1).unwrap();
//! let mut pix_mut = pix.try_into_mut().unwrap();
//! pix_mut.set_pixel(10, 10, 1).unwrap();
//! pix_mut.set_pixel(11, 10, 1).unwrap();
//! pix_mut.set_pixel(50, 50, 1).unwrap();
//! let pix: Pix = pix_mut.into();
//!
//! let components = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
//! assert_eq!(components.len(), 2);
//! ```

pub mod conncomp;
mod error;

pub use conncomp::{
    ComponentMap, ConnectedComponent, ConnectivityType, extract_components,
    find_connected_components, label_components, remove_small_components,
};
pub use error::{RegionError, RegionResult};
