/// Error type for the key-value store and credential operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// A requested key (or one half of the credential pair) is absent
    NotFound,
    /// The caller supplied a value the store refuses to persist
    InvalidInput,
    /// The underlying storage driver failed
    Driver,
}

/// Error type for the platform capabilities (radio layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// The radio stack refused to start or join
    Hardware,
    /// The operation did not complete within its bound
    Timeout,
}

/// Error type for the remote schedule collaborator boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// The collaborator has no working implementation yet
    Unavailable,
    /// The collaborator answered but found nothing
    NotFound,
}
