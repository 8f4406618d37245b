//! Things storage keeps track of by id.

/// A domain object whose identity comes from storage.
///
/// It starts out *transient*: built from a request payload, with no id.
/// Once a repository writes it, the repository hands back a *persisted* copy
/// carrying the id it assigned, and that id never changes afterwards.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// `None` until storage has assigned an id.
    fn id(&self) -> Option<&Self::Id>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
