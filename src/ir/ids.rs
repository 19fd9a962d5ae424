//! Newtype IDs for the records of a converted partition.
//!
//! Image, annotation, and category ids are all plain integers in COCO JSON,
//! which makes it easy to pass one where another is expected. The newtypes
//! keep them apart while serializing transparently.
//!
//! Category ids are signed: a label row's class index is carried through
//! unchecked, so a negative index must survive into the output.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident: $repr:ty => $as_repr:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            #[inline]
            pub fn new(id: $repr) -> Self {
                Self(id)
            }

            #[inline]
            pub fn $as_repr(&self) -> $repr {
                self.0
            }

            /// Returns this id and advances `self` to the next one.
            #[inline]
            pub fn take_next(&mut self) -> Self {
                let current = *self;
                self.0 += 1;
                current
            }
        }

        impl From<$repr> for $name {
            fn from(id: $repr) -> Self {
                Self::new(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Per-partition image id, assigned from 0 in discovery order.
    ImageId: u64 => as_u64
);

define_id!(
    /// Partition-wide annotation id, shared across all images.
    AnnotationId: u64 => as_u64
);

define_id!(
    /// Category id: the zero-based position of the class name, or the raw
    /// class index of a label row.
    CategoryId: i64 => as_i64
);
