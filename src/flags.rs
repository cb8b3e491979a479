use bitflags::bitflags;

bitflags! {
    /// Per-field synchronization policies, composable via bitwise OR.
    ///
    /// The schema builder preserves which fields carry which flags and
    /// enforces the interpolated-prefix ordering; everything else here is
    /// consumed downstream by the delta/apply engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SyncFlags: u8 {
        /// Value is smoothed client-side between two received states.
        /// Requires an interpolation function registered for the field's
        /// type, and places the field in the interpolated prefix
        const INTERPOLATED = 0b0000_0001;
        /// A history of past values is retained so server-side logic can
        /// rewind this field to a past instant for hit validation
        const LAG_COMPENSATED = 0b0000_0010;
        /// Value is replicated only to clients that do not control the entity
        const ONLY_FOR_OTHER_PLAYERS = 0b0000_0100;
        /// Value is replicated only to the entity's controlling client
        const ONLY_FOR_OWNER = 0b0000_1000;
        /// Field participates in client-side speculative simulation even for
        /// state not yet server-confirmed
        const ALWAYS_PREDICT = 0b0001_0000;
    }
}
