//! Entity trait: identity + continuity across state changes, without the
//! aggregate root's version counter.

pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
