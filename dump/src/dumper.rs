//! The traversal core: the [`Dump`] contract and the [`Dumper`] handle.

use tracing::{debug, trace};

use crate::{Attribute, DumpError, Identity, Renderer};

/// How a value of this type is rendered under adapter `A`.
///
/// A domain adapter is any type `A` (usually a unit struct) for which
/// application types implement `Dump<A>`. The implementation calls the
/// structural primitives on the [`Dumper`] it is handed, and never writes
/// output directly, so the same implementation drives every backend.
///
/// ```
/// use dump::{Dump, DumpError, Dumper, Renderer};
///
/// struct Full;
///
/// struct Engine {
///     power: f32,
/// }
///
/// impl Dump<Full> for Engine {
///     fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
///         d.node(self, "Engine")?;
///         d.attr(self, "power", &self.power, true, true)
///     }
/// }
///
/// let out = dump::Backend::Plaintext.render_to_string(&Full, &Engine { power: 69.0 }).unwrap();
/// assert_eq!(out, "Engine power '69'\n");
/// ```
pub trait Dump<A: ?Sized> {
    /// Renders `self` through `d`.
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError>;

    /// The identity used to deduplicate this value.
    ///
    /// Defaults to the value's own address and type. Scalars and text
    /// return `None`: they are never deduplicated or aliased.
    fn identity(&self) -> Option<Identity> {
        Some(Identity::of(self))
    }
}

/// Handle passed to [`Dump::dump`], bound to one adapter and one renderer.
pub struct Dumper<'r, A: ?Sized, R> {
    adapter: &'r A,
    renderer: &'r mut R,
    /// Shared referents currently being rendered, outermost first.
    path: &'r mut Vec<Identity>,
}

impl<'r, A: ?Sized, R: Renderer> Dumper<'r, A, R> {
    /// The adapter this pass renders with.
    pub fn adapter(&self) -> &'r A {
        self.adapter
    }

    /// Renders `value` in the current frame.
    pub fn dump<T: Dump<A> + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        value.dump(self)
    }

    /// Announces `value` as a node tagged `text`.
    pub fn node<T: Dump<A> + ?Sized>(&mut self, value: &T, text: &str) -> Result<(), DumpError> {
        self.renderer.node(value.identity(), text)
    }

    /// Renders `child` as the attribute `label` of `parent`.
    ///
    /// An inlined attribute stays on the parent's line (tree backends) or
    /// inside the parent's node (graph backend). Anything else opens a new
    /// level. `last_child` picks the branch glyph.
    pub fn attr<P, C>(
        &mut self,
        parent: &P,
        label: &str,
        child: &C,
        last_child: bool,
        inlined: bool,
    ) -> Result<(), DumpError>
    where
        P: Dump<A> + ?Sized,
        C: Dump<A> + ?Sized,
    {
        self.attribute(parent.identity(), label, child, last_child, inlined)
    }

    fn attribute<C>(
        &mut self,
        parent: Option<Identity>,
        label: &str,
        child: &C,
        last_child: bool,
        inlined: bool,
    ) -> Result<(), DumpError>
    where
        C: Dump<A> + ?Sized,
    {
        let attribute = Attribute {
            parent,
            child: child.identity(),
            label,
            last_child,
            inlined,
        };
        let adapter = self.adapter;
        let path = &mut *self.path;
        self.renderer.attr(&attribute, |renderer| {
            child.dump(&mut Dumper {
                adapter,
                renderer,
                path,
            })
        })
    }

    /// A primitive leaf, formatted with `Display`.
    pub fn scalar(&mut self, value: impl core::fmt::Display) -> Result<(), DumpError> {
        self.renderer.value(&value.to_string())
    }

    /// A text leaf. Line breaks are reflowed by the backend.
    pub fn text(&mut self, text: &str) -> Result<(), DumpError> {
        self.renderer.value(text)
    }

    /// A fieldless enumeration value.
    pub fn enum_tag(&mut self, text: &str) -> Result<(), DumpError> {
        self.renderer.enum_tag(text)
    }

    /// A free-form multi-line block on its own branch.
    pub fn block(&mut self, text: &str) -> Result<(), DumpError> {
        self.renderer.block(text)
    }

    /// The `undefined` marker.
    pub fn undefined(&mut self) -> Result<(), DumpError> {
        self.renderer.undefined()
    }

    /// A diagnostic leaf.
    pub fn error(&mut self, text: &str) -> Result<(), DumpError> {
        self.renderer.error(text)
    }

    /// The type name and address of `value`.
    pub fn type_addr<T: ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.renderer.type_addr(Identity::of(value))
    }

    /// The diagnostic leaf for a type the adapter has no case for.
    ///
    /// Rendering carries on with siblings and ancestors.
    pub fn not_implemented<T: ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        debug!(type_name = core::any::type_name::<T>(), "no dispatch case");
        self.renderer.error("not implemented")?;
        self.type_addr(value)
    }

    /// Renders the active case of a tagged union.
    ///
    /// The adapter matches on `union` and hands over the payload of the
    /// active case; the match itself keeps the dispatch exhaustive.
    pub fn tagged<U, C>(&mut self, union: &U, active: &C) -> Result<(), DumpError>
    where
        U: ?Sized,
        C: Dump<A> + ?Sized,
    {
        if let Some(inner) = active.identity() {
            self.renderer.dereference(Identity::of(union), inner)?;
        }
        active.dump(self)
    }

    /// Renders an optional value, or `undefined` when it is absent.
    pub fn nullable<O, T>(&mut self, outer: &O, value: Option<&T>) -> Result<(), DumpError>
    where
        O: ?Sized,
        T: Dump<A> + ?Sized,
    {
        let Some(value) = value else {
            return self.renderer.undefined();
        };
        if let Some(inner) = value.identity() {
            self.renderer.dereference(Identity::of(outer), inner)?;
        }
        value.dump(self)
    }

    /// Renders the referent of a shared reference, or `undefined` when the
    /// reference is null.
    ///
    /// A referent that is already being rendered further up the current
    /// path is not entered again; the renderer gets [`Renderer::cycle`]
    /// instead.
    pub fn shared<O, T>(&mut self, outer: &O, referent: Option<&T>) -> Result<(), DumpError>
    where
        O: ?Sized,
        T: Dump<A> + ?Sized,
    {
        let Some(referent) = referent else {
            return self.renderer.undefined();
        };
        let Some(inner) = referent.identity() else {
            return referent.dump(self);
        };
        self.renderer.dereference(Identity::of(outer), inner)?;
        if self.path.contains(&inner) {
            trace!(%inner, "referent is already on the path");
            return self.renderer.cycle(inner);
        }
        self.path.push(inner);
        let result = referent.dump(self);
        self.path.pop();
        result
    }

    /// Emits the inlined `size` attribute and one `item` attribute per element.
    pub fn sequence<C, I>(&mut self, container: &C, items: I) -> Result<(), DumpError>
    where
        C: ?Sized,
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Dump<A>,
    {
        let parent = Some(Identity::of(container));
        let items = items.into_iter();
        let mut remaining = items.len();
        self.attribute(parent, "size", &remaining, remaining == 0, true)?;
        for item in items {
            remaining = remaining.saturating_sub(1);
            self.attribute(parent, "item", &item, remaining == 0, false)?;
        }
        Ok(())
    }

    /// A node tagged `text` followed by [`sequence`](Self::sequence).
    pub fn list<C, I>(&mut self, container: &C, text: &str, items: I) -> Result<(), DumpError>
    where
        C: ?Sized,
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Dump<A>,
    {
        self.renderer.node(Some(Identity::of(container)), text)?;
        self.sequence(container, items)
    }

    /// Emits the inlined `size` attribute and one `item` attribute per
    /// entry, each rendered as an `Item` node with `key` and `value`.
    pub fn entries<'e, C, K, V, I>(&mut self, container: &C, entries: I) -> Result<(), DumpError>
    where
        C: ?Sized,
        K: Dump<A> + ?Sized + 'e,
        V: Dump<A> + ?Sized + 'e,
        I: IntoIterator<Item = (&'e K, &'e V)>,
        I::IntoIter: ExactSizeIterator,
    {
        let parent = Some(Identity::of(container));
        let entries = entries.into_iter();
        let mut remaining = entries.len();
        self.attribute(parent, "size", &remaining, remaining == 0, true)?;
        for (key, value) in entries {
            remaining = remaining.saturating_sub(1);
            let entry = MapEntry { key, value };
            self.attribute(parent, "item", &entry, remaining == 0, false)?;
        }
        Ok(())
    }

    /// A node tagged `text` followed by [`entries`](Self::entries).
    pub fn map<'e, C, K, V, I>(&mut self, container: &C, text: &str, entries: I) -> Result<(), DumpError>
    where
        C: ?Sized,
        K: Dump<A> + ?Sized + 'e,
        V: Dump<A> + ?Sized + 'e,
        I: IntoIterator<Item = (&'e K, &'e V)>,
        I::IntoIter: ExactSizeIterator,
    {
        self.renderer.node(Some(Identity::of(container)), text)?;
        self.entries(container, entries)
    }
}

/// One key/value pair of a map, rendered as an `Item` node.
struct MapEntry<'e, K: ?Sized, V: ?Sized> {
    key: &'e K,
    value: &'e V,
}

impl<A: ?Sized, K, V> Dump<A> for MapEntry<'_, K, V>
where
    K: Dump<A> + ?Sized,
    V: Dump<A> + ?Sized,
{
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.node(self, "Item")?;
        d.attr(self, "key", self.key, false, false)?;
        d.attr(self, "value", self.value, true, false)
    }

    // The entry itself is a temporary, so it borrows the key's storage.
    fn identity(&self) -> Option<Identity> {
        Some(Identity::new(
            core::ptr::from_ref(self.key).cast::<()>().addr(),
            core::any::type_name::<Self>(),
        ))
    }
}

/// Runs one render pass of `value` through `renderer`.
///
/// The renderer's pass state is reset by [`Renderer::begin`], so a
/// renderer can be reused, but nothing carries over between passes.
pub fn render<R, A, T>(renderer: &mut R, adapter: &A, value: &T) -> Result<(), DumpError>
where
    R: Renderer,
    A: ?Sized,
    T: Dump<A> + ?Sized,
{
    let backend = renderer.name();
    debug!(backend, type_name = core::any::type_name::<T>(), "render pass started");
    renderer.begin()?;
    let mut path = Vec::new();
    value.dump(&mut Dumper {
        adapter,
        renderer: &mut *renderer,
        path: &mut path,
    })?;
    renderer.finish()?;
    debug!(backend, "render pass finished");
    Ok(())
}

/// Declares types an adapter deliberately has no case for.
///
/// Each listed type renders as the `not implemented` diagnostic leaf,
/// followed by its type name and address.
///
/// ```
/// use dump::dump_unimplemented;
///
/// struct Sparse;
/// struct Engine;
///
/// dump_unimplemented!(Sparse => Engine);
///
/// let out = dump::Backend::Plaintext.render_to_string(&Sparse, &Engine).unwrap();
/// assert!(out.starts_with("not implemented Engine 0x"));
/// ```
#[macro_export]
macro_rules! dump_unimplemented {
    ($adapter:ty => $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Dump<$adapter> for $ty {
                fn dump<R: $crate::Renderer>(
                    &self,
                    d: &mut $crate::Dumper<'_, $adapter, R>,
                ) -> ::core::result::Result<(), $crate::DumpError> {
                    d.not_implemented(self)
                }
            }
        )+
    };
}
