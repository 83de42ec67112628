use super::error::CollectorError;

/// A convenient type alias for results returned by collectors.
///
/// Every operation of the metrics source (registration, snapshot capture,
/// producing families, gathering) fails with the domain-specific
/// `CollectorError`, so they all share this alias.
pub type CollectorResult<T> = std::result::Result<T, CollectorError>;
