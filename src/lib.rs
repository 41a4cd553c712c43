//! Constructs the Regional Intersection Graph (RIG) of a collection of
//! axis-aligned hyperrectangles and lazily enumerates their pairwise and
//! multi-way intersections.
//!
//! A [`Region`] is a d-dimensional box; a [`RegionSet`] is a same-dimensioned
//! collection of them, optionally bounded. [`slig::build`] sweeps each axis
//! once to construct a [`Rig`] whose nodes are regions and whose edges carry
//! the pairwise intersection; [`enumerate::Enumerator`] then walks the graph
//! breadth-first to yield every k-wise intersection (k >= 2) in
//! non-decreasing size order.
//!
//! # Examples
//! ```
//! use rig::region::Region;
//! use rig::regionset::RegionSet;
//! use rig::{slig, enumerate::Enumerator};
//!
//! let mut regions = RegionSet::new(2);
//! regions.add(Region::with_id(&[0.0, 0.0], &[5.0, 5.0], "A".into())).unwrap();
//! regions.add(Region::with_id(&[4.0, 4.0], &[9.0, 9.0], "B".into())).unwrap();
//!
//! let rig = slig::build(&regions).unwrap();
//! assert!(rig.contains_edge("A", "B"));
//!
//! let pairs: Vec<_> = Enumerator::new(&rig).all().collect();
//! assert_eq!(pairs.len(), 1);
//! ```

pub mod enumerate;
pub mod error;
pub mod interval;
pub mod json;
pub mod region;
pub mod regionset;
pub mod rig;
pub mod slig;

pub use enumerate::Enumerator;
pub use error::{Result, RigError};
pub use interval::Interval;
pub use region::{Region, RegionId};
pub use regionset::RegionSet;
pub use rig::Rig;
