//! # IDs
//! Every overlay element carries an `ElementId`, unique within its editing
//! session. Ids are handed out by the session's [`IdSource`] in increasing
//! order and are *never* reused, even after reorders or a state restore.

/// Identity of one overlay element within a session.
///
/// Ids from different sessions may share a value and should not be compared.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(std::num::NonZeroU32);

impl ElementId {
    /// Get the raw numeric value of this id.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
    /// Rebuild an id from its persisted numeric value. Zero is not a valid id.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        std::num::NonZeroU32::new(raw).map(Self)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Element#{}", self.0)
    }
}
impl std::fmt::Debug for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

/// Monotonic id allocator, one per session.
///
/// With no element-removal operation in the session API this hands out the
/// same values as counting the current list, while also guaranteeing that an
/// id observed once is never observed again.
#[derive(Clone, Debug)]
pub struct IdSource {
    next: u32,
}

impl IdSource {
    #[must_use]
    pub const fn new() -> Self {
        // Id of zero is invalid, start at one and go up.
        Self { next: 1 }
    }
    /// Allocate the next id. Strictly greater than every id allocated before.
    pub fn mint(&mut self) -> ElementId {
        let Some(id) = std::num::NonZeroU32::new(self.next) else {
            // In builds, terminate. In testing, panic, so overflow tests are possible.
            #[cfg(not(test))]
            {
                log::error!("element id overflow! aborting!");
                log::logger().flush();
                std::process::abort();
            }
            #[cfg(test)]
            {
                panic!("element id overflow! aborting!")
            }
        };
        self.next = self.next.wrapping_add(1);
        ElementId(id)
    }
    /// Mark an id as already in use, e.g. while decoding persisted state.
    /// Future [`IdSource::mint`] calls will stay above it.
    pub fn observe(&mut self, id: ElementId) {
        self.next = self.next.max(id.get().saturating_add(1));
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{ElementId, IdSource};

    #[test]
    fn strictly_increasing() {
        let mut ids = IdSource::new();
        let mut last = 0;
        for _ in 0..64 {
            let id = ids.mint().get();
            assert!(id > last);
            last = id;
        }
    }
    #[test]
    fn observe_reserves() {
        let mut ids = IdSource::new();
        ids.observe(ElementId::from_raw(17).unwrap());
        assert_eq!(ids.mint().get(), 18);
        // Observing something already passed changes nothing.
        ids.observe(ElementId::from_raw(3).unwrap());
        assert_eq!(ids.mint().get(), 19);
    }
    #[test]
    fn zero_is_invalid() {
        assert!(ElementId::from_raw(0).is_none());
    }
    #[test]
    #[should_panic(expected = "id overflow")]
    fn overflow() {
        let mut ids = IdSource::new();
        ids.observe(ElementId::from_raw(u32::MAX - 1).unwrap());
        // The very last id is still fine.
        assert_eq!(ids.mint().get(), u32::MAX);
        // Should panic!
        let _ = ids.mint();
    }
}
