//! Runtime selection of a generic routine by component type.
//!
//! A [`ComponentVisitor`] is written once, generically over the element
//! type, and [`ComponentType::dispatch`] calls the instantiation matching a
//! probed component type.
//!
//! [`ComponentVisitor`]: ./trait.ComponentVisitor.html
//! [`ComponentType::dispatch`]: ../volume/element/enum.ComponentType.html#method.dispatch
use crate::error::{ReshapeError, Result};
use crate::volume::{ComponentType, DataElement};

/// A routine which can run for any supported element type.
pub trait ComponentVisitor {
    /// The outcome of the routine.
    type Output;

    /// Run the routine for elements of type `T`.
    fn visit<T: DataElement>(self) -> Self::Output;
}

impl ComponentType {
    /// Call `visitor.visit::<T>()` with `T` being the Rust type of this
    /// component type.
    ///
    /// # Errors
    ///
    /// `UnknownComponentType` if this is `ComponentType::Unknown`. The
    /// visitor is not called in that case.
    pub fn dispatch<V>(self, visitor: V) -> Result<V::Output>
    where
        V: ComponentVisitor,
    {
        Ok(match self {
            ComponentType::U8 => visitor.visit::<u8>(),
            ComponentType::I8 => visitor.visit::<i8>(),
            ComponentType::U16 => visitor.visit::<u16>(),
            ComponentType::I16 => visitor.visit::<i16>(),
            ComponentType::U32 => visitor.visit::<u32>(),
            ComponentType::I32 => visitor.visit::<i32>(),
            ComponentType::U64 => visitor.visit::<u64>(),
            ComponentType::I64 => visitor.visit::<i64>(),
            ComponentType::F32 => visitor.visit::<f32>(),
            ComponentType::F64 => visitor.visit::<f64>(),
            ComponentType::Unknown(code) => {
                return Err(ReshapeError::UnknownComponentType(code))
            }
        })
    }
}
