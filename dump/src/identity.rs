//! Stable identities for visited values and the alias map that folds them together.

use std::collections::{BTreeMap, BTreeSet};

use crate::DumpError;

/// Identifies a value by where it lives and what type it has.
///
/// Two identities are equal iff both the address and the type match, so a
/// struct and its first field never collide even when they share storage.
/// An identity says nothing about ownership and is only meaningful within the
/// render pass that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    address: usize,
    type_name: &'static str,
}

impl Identity {
    /// Builds an identity from raw parts.
    pub const fn new(address: usize, type_name: &'static str) -> Self {
        Self { address, type_name }
    }

    /// Returns the identity of `value`: its address and its type name.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self {
            address: core::ptr::from_ref(value).cast::<()>().addr(),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// The address part of this identity.
    pub const fn address(&self) -> usize {
        self.address
    }

    /// The full type name, module paths included.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type name with module paths stripped, see [`short_type_name`].
    pub fn short_type_name(&self) -> String {
        short_type_name(self.type_name)
    }
}

/// Formats as `0x<address>-<type>`, with every non-alphanumeric character of
/// the type dropped so the result can name a TikZ node.
impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#x}-", self.address)?;
        for c in self.type_name.chars().filter(char::is_ascii_alphanumeric) {
            core::fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// Strips module paths from a type name.
///
/// `[my_crate::car::Tire; 4]` becomes `[Tire; 4]` and
/// `alloc::vec::Vec<alloc::rc::Rc<my_crate::Binding>>` becomes `Vec<Rc<Binding>>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    // Where the path segment currently being copied starts in `out`.
    let mut segment = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment);
        } else {
            out.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment = out.len();
            }
        }
    }
    out
}

/// Maps identities to the identity they should be rendered as.
///
/// The map is append-only: once an identity has an alias it keeps it for the
/// rest of the pass. It belongs to a single render pass and is reset when the
/// next one begins.
#[derive(Clone, Debug, Default)]
pub struct AliasMap {
    aliases: BTreeMap<Identity, Identity>,
}

impl AliasMap {
    /// Creates an empty alias map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if no alias has been recorded.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Follows the alias chain starting at `identity`.
    ///
    /// Returns `identity` itself when it has no alias. A chain that comes
    /// back to an identity it already visited is reported as
    /// [`DumpError::AliasCycle`].
    pub fn resolve(&self, identity: Identity) -> Result<Identity, DumpError> {
        let mut current = identity;
        let mut seen = BTreeSet::new();
        let mut chain = vec![identity];
        seen.insert(identity);
        while let Some(&next) = self.aliases.get(&current) {
            chain.push(next);
            if !seen.insert(next) {
                return Err(DumpError::AliasCycle { identity, chain });
            }
            current = next;
        }
        Ok(current)
    }

    /// Records that `from` should be rendered as `to`.
    ///
    /// Returns `false` when nothing was recorded, either because `from`
    /// already has an alias or because `from == to`.
    pub fn add(&mut self, from: Identity, to: Identity) -> bool {
        if from == to {
            return false;
        }
        match self.aliases.entry(from) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(to);
                true
            }
        }
    }

    /// Records the alias produced by dereferencing `outer` into `inner`.
    ///
    /// Dereferencing a value into itself carries no information and means
    /// the caller's bookkeeping is broken, so it is an error.
    pub fn add_dereference(&mut self, outer: Identity, inner: Identity) -> Result<bool, DumpError> {
        if outer == inner {
            return Err(DumpError::SelfAlias { identity: outer });
        }
        Ok(self.add(outer, inner))
    }

    /// Returns the direct alias of `identity`, without following the chain.
    pub fn get(&self, identity: &Identity) -> Option<&Identity> {
        self.aliases.get(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(address: usize) -> Identity {
        Identity::new(address, "test::Node")
    }

    #[test]
    fn identity_depends_on_address_and_type() {
        let pair = (1u32, 2u32);
        assert_eq!(Identity::of(&pair), Identity::of(&pair));
        assert_ne!(Identity::of(&pair.0), Identity::of(&pair.1));

        #[repr(C)]
        struct Wrapper {
            inner: u32,
        }
        let wrapper = Wrapper { inner: 3 };
        let outer = Identity::of(&wrapper);
        let inner = Identity::of(&wrapper.inner);
        assert_eq!(outer.address(), inner.address());
        assert_ne!(outer, inner);
        assert_eq!(inner.type_name(), "u32");
    }

    #[test]
    fn identity_display_is_a_node_name() {
        let id = Identity::new(0xbeef, "alloc::vec::Vec<my_crate::Tire>");
        assert_eq!(id.to_string(), "0xbeef-allocvecVecmycrateTire");
    }

    #[test]
    fn short_type_names() {
        assert_eq!(short_type_name("u32"), "u32");
        assert_eq!(short_type_name("[dump_demo::car::Tire; 4]"), "[Tire; 4]");
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::rc::Rc<dump_demo::ast::Binding>>"),
            "Vec<Rc<Binding>>"
        );
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<alloc::string::String, u8>"),
            "HashMap<String, u8>"
        );
    }

    #[test]
    fn resolve_follows_chains() {
        let mut aliases = AliasMap::new();
        assert_eq!(aliases.resolve(id(1)).unwrap(), id(1));
        assert!(aliases.add(id(1), id(2)));
        assert!(aliases.add(id(2), id(3)));
        assert_eq!(aliases.resolve(id(1)).unwrap(), id(3));
        assert_eq!(aliases.resolve(id(2)).unwrap(), id(3));
        assert_eq!(aliases.resolve(id(3)).unwrap(), id(3));
    }

    #[test]
    fn aliases_are_append_only() {
        let mut aliases = AliasMap::new();
        assert!(aliases.add(id(1), id(2)));
        assert!(!aliases.add(id(1), id(3)));
        assert!(!aliases.add(id(4), id(4)));
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.get(&id(1)), Some(&id(2)));
    }

    #[test]
    fn self_dereference_is_rejected() {
        let mut aliases = AliasMap::new();
        let err = aliases.add_dereference(id(7), id(7)).unwrap_err();
        assert!(matches!(err, DumpError::SelfAlias { identity } if identity == id(7)));
        assert!(aliases.add_dereference(id(7), id(8)).unwrap());
    }

    #[test]
    fn cycles_are_reported() {
        let mut aliases = AliasMap::new();
        aliases.add(id(1), id(2));
        aliases.add(id(2), id(3));
        aliases.add(id(3), id(1));
        match aliases.resolve(id(2)) {
            Err(DumpError::AliasCycle { identity, chain }) => {
                assert_eq!(identity, id(2));
                assert_eq!(chain, vec![id(2), id(3), id(1), id(2)]);
            }
            other => panic!("expected an alias cycle, got {other:?}"),
        }
    }
}
