use crate::Numeric;

/// Numeric conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The source kind cannot be represented by the destination kind without loss.
	#[error("{src} cannot be converted to {dst} without loss")]
	Lossy { dst: Numeric, src: Numeric },
}
