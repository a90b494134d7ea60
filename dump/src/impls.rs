//! Structural impls of [`Dump`] for standard library types.
//!
//! These hold for every adapter: scalars and text are leaves, `Option` is
//! nullable, smart pointers are shared references, and collections are
//! sequences or maps tagged with their short type name.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::{Dump, DumpError, Dumper, Identity, Renderer, short_type_name};

fn tag_of<T: ?Sized>() -> String {
    short_type_name(core::any::type_name::<T>())
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<A: ?Sized> Dump<A> for $ty {
                fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
                    d.scalar(self)
                }

                fn identity(&self) -> Option<Identity> {
                    None
                }
            }
        )*
    };
}

impl_scalar!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl<A: ?Sized> Dump<A> for () {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.scalar("()")
    }

    fn identity(&self) -> Option<Identity> {
        None
    }
}

impl<A: ?Sized> Dump<A> for str {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.text(self)
    }

    fn identity(&self) -> Option<Identity> {
        None
    }
}

impl<A: ?Sized> Dump<A> for String {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.text(self)
    }

    fn identity(&self) -> Option<Identity> {
        None
    }
}

impl<A: ?Sized> Dump<A> for Cow<'_, str> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.text(self)
    }

    fn identity(&self) -> Option<Identity> {
        None
    }
}

// References are transparent: they render and deduplicate as their target.
impl<A: ?Sized, T: Dump<A> + ?Sized> Dump<A> for &T {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        (**self).dump(d)
    }

    fn identity(&self) -> Option<Identity> {
        (**self).identity()
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for Option<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.nullable(self, self.as_ref())
    }
}

impl<A: ?Sized, T: Dump<A> + ?Sized> Dump<A> for Box<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.shared(self, Some(&**self))
    }
}

impl<A: ?Sized, T: Dump<A> + ?Sized> Dump<A> for Rc<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.shared(self, Some(&**self))
    }
}

impl<A: ?Sized, T: Dump<A> + ?Sized> Dump<A> for Arc<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.shared(self, Some(&**self))
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for std::rc::Weak<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        let strong = self.upgrade();
        d.shared(self, strong.as_deref())
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for std::sync::Weak<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        let strong = self.upgrade();
        d.shared(self, strong.as_deref())
    }
}

impl<A: ?Sized, T: Dump<A> + ?Sized> Dump<A> for RefCell<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        match self.try_borrow() {
            Ok(inner) => d.shared(self, Some(&*inner)),
            Err(_) => {
                d.error("already mutably borrowed")?;
                d.type_addr(self)
            }
        }
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for [T] {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<Self>(), self.iter())
    }
}

impl<A: ?Sized, T: Dump<A>, const N: usize> Dump<A> for [T; N] {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<Self>(), self.iter())
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for Vec<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<Self>(), self.iter())
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for VecDeque<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<Self>(), self.iter())
    }
}

impl<A: ?Sized, T: Dump<A>> Dump<A> for BTreeSet<T> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<Self>(), self.iter())
    }
}

impl<A: ?Sized, T: Dump<A>, S> Dump<A> for HashSet<T, S> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<HashSet<T>>(), self.iter())
    }
}

impl<A: ?Sized, K: Dump<A>, V: Dump<A>> Dump<A> for BTreeMap<K, V> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.map(self, &tag_of::<Self>(), self.iter())
    }
}

impl<A: ?Sized, K: Dump<A>, V: Dump<A>, S> Dump<A> for HashMap<K, V, S> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.map(self, &tag_of::<HashMap<K, V>>(), self.iter())
    }
}

#[cfg(feature = "indexmap")]
impl<A: ?Sized, T: Dump<A>, S> Dump<A> for indexmap::IndexSet<T, S> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.list(self, &tag_of::<indexmap::IndexSet<T>>(), self.iter())
    }
}

#[cfg(feature = "indexmap")]
impl<A: ?Sized, K: Dump<A>, V: Dump<A>, S> Dump<A> for indexmap::IndexMap<K, V, S> {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.map(self, &tag_of::<indexmap::IndexMap<K, V>>(), self.iter())
    }
}
