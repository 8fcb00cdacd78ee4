//! Type descriptors: the shapes a memory block can be viewed as, and the
//! element sizes they resolve to.

use std::alloc::Layout;
use std::fmt;

use memview_common::{Result, error::Error};

/// Width in bytes of the platform's native integers (`isize`/`usize`),
/// fixed at build time.
pub const NATIVE_WIDTH: usize = std::mem::size_of::<usize>();

/// The primitive integer kinds a block can be projected as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Isize,
    Usize,
}

impl ScalarKind {
    /// Width of the scalar in bytes.
    pub const fn size(self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I32 | ScalarKind::U32 => 4,
            ScalarKind::I64 | ScalarKind::U64 => 8,
            ScalarKind::Isize | ScalarKind::Usize => NATIVE_WIDTH,
        }
    }

    /// Required alignment of the scalar in bytes.
    pub const fn align(self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => std::mem::align_of::<u8>(),
            ScalarKind::I16 | ScalarKind::U16 => std::mem::align_of::<u16>(),
            ScalarKind::I32 | ScalarKind::U32 => std::mem::align_of::<u32>(),
            ScalarKind::I64 | ScalarKind::U64 => std::mem::align_of::<u64>(),
            ScalarKind::Isize | ScalarKind::Usize => std::mem::align_of::<usize>(),
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64 | ScalarKind::Isize
        )
    }

    pub fn layout(self) -> Layout {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => Layout::new::<u8>(),
            ScalarKind::I16 | ScalarKind::U16 => Layout::new::<u16>(),
            ScalarKind::I32 | ScalarKind::U32 => Layout::new::<u32>(),
            ScalarKind::I64 | ScalarKind::U64 => Layout::new::<u64>(),
            ScalarKind::Isize | ScalarKind::Usize => Layout::new::<usize>(),
        }
    }

    /// The Rust name of the corresponding primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::U8 => "u8",
            ScalarKind::I16 => "i16",
            ScalarKind::U16 => "u16",
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::I64 => "i64",
            ScalarKind::U64 => "u64",
            ScalarKind::Isize => "isize",
            ScalarKind::Usize => "usize",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive integer type a block can be projected as.
///
/// Implemented for exactly the types listed in [`ScalarKind`].
pub trait Scalar: bytemuck::Pod + sealed::Sealed {
    const KIND: ScalarKind;
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;
            }
        )*
    };
}

impl_scalar! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    isize => Isize,
    usize => Usize,
}

/// Value categories that have no single fixed address and byte extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Callable,
    KeyedMap,
    Channel,
    Opaque,
    Dynamic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Callable => "callable",
            Category::KeyedMap => "keyed map",
            Category::Channel => "channel",
            Category::Opaque => "opaque value",
            Category::Dynamic => "dynamically-typed value",
        };
        f.write_str(name)
    }
}

/// A requested view shape.
///
/// Pointers may be nested to any depth; they are unwrapped transparently
/// during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(ScalarKind),
    /// A fixed-size value (struct or array) with the given layout.
    Aggregate(Layout),
    /// A run of elements filling the block.
    Sequence(Box<Shape>),
    Pointer(Box<Shape>),
    Unsupported(Category),
}

impl Shape {
    pub fn scalar<T: Scalar>() -> Shape {
        Shape::Scalar(T::KIND)
    }

    /// Describes the fixed-size type `T`.
    pub fn aggregate<T: bytemuck::Pod>() -> Shape {
        Shape::Aggregate(Layout::new::<T>())
    }

    /// Describes the type of `exemplar`.
    pub fn of_val<T: bytemuck::Pod>(exemplar: &T) -> Shape {
        Shape::Aggregate(Layout::for_value(exemplar))
    }

    pub fn sequence_of(element: Shape) -> Shape {
        Shape::Sequence(Box::new(element))
    }

    pub fn pointer_to(target: Shape) -> Shape {
        Shape::Pointer(Box::new(target))
    }

    /// Unwraps pointers and resolves the shape to the element layout a view
    /// needs.
    ///
    /// Sequence elements must be scalars, aggregates of non-zero size, or
    /// pointers. Pointer elements are `NATIVE_WIDTH` bytes wide; they are
    /// counted, never followed.
    pub fn resolve(&self) -> Result<ResolvedShape> {
        match self {
            Shape::Pointer(target) => target.resolve(),
            Shape::Scalar(kind) => Ok(ResolvedShape::Scalar(*kind)),
            Shape::Aggregate(layout) => Ok(ResolvedShape::Aggregate(*layout)),
            Shape::Sequence(element) => {
                let layout = match element.as_ref() {
                    Shape::Scalar(kind) => kind.layout(),
                    Shape::Aggregate(layout) => *layout,
                    Shape::Pointer(_) => Layout::new::<usize>(),
                    other => {
                        return Err(Error::unsupported_shape(format!(
                            "sequence of {other}"
                        )));
                    }
                };
                if layout.size() == 0 {
                    return Err(Error::unsupported_shape("sequence of zero-sized elements"));
                }
                Ok(ResolvedShape::Sequence(layout))
            }
            Shape::Unsupported(category) => Err(Error::unsupported_shape(category.to_string())),
        }
    }

    /// Byte size of one element of the resolved shape.
    pub fn element_size(&self) -> Result<usize> {
        Ok(self.resolve()?.element_size())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(kind) => write!(f, "{kind}"),
            Shape::Aggregate(layout) => write!(
                f,
                "aggregate(size={}, align={})",
                layout.size(),
                layout.align()
            ),
            Shape::Sequence(element) => write!(f, "[{element}]"),
            Shape::Pointer(target) => write!(f, "*{target}"),
            Shape::Unsupported(category) => write!(f, "{category}"),
        }
    }
}

/// A shape with pointers unwrapped and element layout known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedShape {
    Scalar(ScalarKind),
    Sequence(Layout),
    Aggregate(Layout),
}

impl ResolvedShape {
    pub fn element_size(&self) -> usize {
        self.element_layout().size()
    }

    pub fn element_layout(&self) -> Layout {
        match self {
            ResolvedShape::Scalar(kind) => kind.layout(),
            ResolvedShape::Sequence(layout) | ResolvedShape::Aggregate(layout) => *layout,
        }
    }

    /// Minimum number of bytes a block needs to back this shape: one element.
    pub fn required_size(&self) -> usize {
        self.element_size()
    }

    /// Number of elements a block of `size` bytes yields, and the bytes they
    /// span. Trailing partial elements of a sequence are not counted.
    pub fn extent(&self, size: usize) -> (usize, usize) {
        match self {
            ResolvedShape::Sequence(layout) => {
                let count = size / layout.size();
                (count, count * layout.size())
            }
            _ => (1, self.element_size()),
        }
    }
}
