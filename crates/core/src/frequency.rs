//! Entity frequency analysis.

use crate::bitio::{read_fixed, FixedWidth};
use crate::error::LayoutError;
use std::collections::HashMap;

/// Entity → number of occurrences. No ordering guarantee.
pub type FrequencyTable<T> = HashMap<T, u64>;

/// Count every entity in `src`.
///
/// The stream is read to its end, one `T::WIDTH`-byte entity at a time.
///
/// # Errors
/// `LayoutError::UnexpectedEnd` if the input length is not a multiple of
/// the entity width (the trailing partial entity fails to read).
pub fn frequency_table<T, I>(src: &mut I) -> Result<FrequencyTable<T>, LayoutError>
where
    T: FixedWidth,
    I: Iterator<Item = u8>,
{
    let mut table = FrequencyTable::new();
    let mut src = src.peekable();

    while src.peek().is_some() {
        let entity = read_fixed::<T, _>(&mut src)?;
        *table.entry(entity).or_insert(0) += 1;
    }

    Ok(table)
}
